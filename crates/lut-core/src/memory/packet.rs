//! Packet-like access contract exchanged between a requester and the device.

/// Widest access the device can service, in bytes (one 32-bit value).
pub const MAX_ACCESS_BYTES: u32 = 4;

/// Command carried by a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemCmd {
    /// Read request awaiting a payload.
    ReadReq,
    /// Read response carrying the payload.
    ReadResp,
    /// Write request carrying a value.
    WriteReq,
    /// Write acknowledgement.
    WriteResp,
}

impl MemCmd {
    /// Returns `true` for read requests and read responses.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::ReadReq | Self::ReadResp)
    }

    /// Returns `true` for write requests and write responses.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::WriteReq | Self::WriteResp)
    }

    /// Returns `true` once the command has been turned into a response.
    #[must_use]
    pub const fn is_response(self) -> bool {
        matches!(self, Self::ReadResp | Self::WriteResp)
    }

    /// Response command paired with a request command.
    #[must_use]
    pub const fn response_command(self) -> Option<Self> {
        match self {
            Self::ReadReq => Some(Self::ReadResp),
            Self::WriteReq => Some(Self::WriteResp),
            Self::ReadResp | Self::WriteResp => None,
        }
    }
}

/// A single memory access in flight between a requester and the device.
///
/// The requester builds a request, the device turns it into a response in
/// place, and in timing mode the packet itself travels through the response
/// queue and back to the requester by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    addr: u64,
    size: u32,
    cmd: MemCmd,
    tag: u64,
    data: [u8; MAX_ACCESS_BYTES as usize],
}

impl Packet {
    /// Builds a read request of `size` bytes at `addr`.
    #[must_use]
    pub const fn read(addr: u64, size: u32) -> Self {
        Self {
            addr,
            size,
            cmd: MemCmd::ReadReq,
            tag: 0,
            data: [0; MAX_ACCESS_BYTES as usize],
        }
    }

    /// Builds a write request of `size` bytes at `addr` carrying `value`.
    #[must_use]
    pub fn write(addr: u64, size: u32, value: u32) -> Self {
        let mut packet = Self {
            cmd: MemCmd::WriteReq,
            ..Self::read(addr, size)
        };
        packet.store_le(value);
        packet
    }

    /// Attaches a requester-chosen tag used to correlate responses.
    #[must_use]
    pub const fn with_tag(mut self, tag: u64) -> Self {
        self.tag = tag;
        self
    }

    /// Target address.
    #[must_use]
    pub const fn addr(&self) -> u64 {
        self.addr
    }

    /// Access width in bytes.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Current command.
    #[must_use]
    pub const fn cmd(&self) -> MemCmd {
        self.cmd
    }

    /// Requester-chosen correlation tag.
    #[must_use]
    pub const fn tag(&self) -> u64 {
        self.tag
    }

    /// Returns `true` for read requests and responses.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.cmd.is_read()
    }

    /// Returns `true` for write requests and responses.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        self.cmd.is_write()
    }

    /// Returns `true` once the device has made this packet a response.
    #[must_use]
    pub const fn is_response(&self) -> bool {
        self.cmd.is_response()
    }

    /// Turns a request into its response.
    ///
    /// # Panics
    ///
    /// Panics when the packet is already a response.
    pub fn make_response(&mut self) {
        let Some(cmd) = self.cmd.response_command() else {
            panic!("packet at {:#x} is already a response", self.addr);
        };
        self.cmd = cmd;
    }

    /// Writes the low `size` bytes of `value` into the data buffer.
    ///
    /// # Panics
    ///
    /// Panics when the access is wider than [`MAX_ACCESS_BYTES`].
    pub fn set_payload(&mut self, value: u32) {
        assert!(
            self.size <= MAX_ACCESS_BYTES,
            "access of {} bytes at {:#x} exceeds the {MAX_ACCESS_BYTES}-byte value width",
            self.size,
            self.addr
        );
        self.store_le(value);
    }

    /// Payload bytes interpreted as a little-endian 32-bit value.
    #[must_use]
    pub const fn payload(&self) -> u32 {
        u32::from_le_bytes(self.data)
    }

    /// Bytes visible to the requester for this access width.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.visible_len()]
    }

    fn visible_len(&self) -> usize {
        self.size.min(MAX_ACCESS_BYTES) as usize
    }

    fn store_le(&mut self, value: u32) {
        let len = self.visible_len();
        self.data = [0; MAX_ACCESS_BYTES as usize];
        self.data[..len].copy_from_slice(&value.to_le_bytes()[..len]);
    }
}
