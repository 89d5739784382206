//! Mode-independent request handling: key derivation, lookup and response.

use crate::{AddrRange, LookupTable, Packet, MAX_ACCESS_BYTES};

/// What servicing a single request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupOutcome {
    /// Read whose key was present in the table.
    Hit {
        /// Address-derived key.
        key: u32,
        /// Value written into the response.
        value: u32,
    },
    /// Read whose key was absent; the response carries zero.
    Miss {
        /// Address-derived key.
        key: u32,
    },
    /// Write request acknowledged without touching the table.
    WriteIgnored,
}

impl LookupOutcome {
    /// Payload the response carries for reads, `None` for ignored writes.
    #[must_use]
    pub const fn payload(self) -> Option<u32> {
        match self {
            Self::Hit { value, .. } => Some(value),
            Self::Miss { .. } => Some(0),
            Self::WriteIgnored => None,
        }
    }
}

/// Derives the table key for `addr`: its offset into `range`, truncated to
/// the low 32 bits.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn derive_key(addr: u64, range: AddrRange) -> u32 {
    (range.offset_of(addr) & 0xFFFF_FFFF) as u32
}

/// Services one request in place and turns it into a response.
///
/// Writes are acknowledged and discarded. Reads look up the address-derived
/// key and carry the stored value, or zero on a miss. This knows nothing
/// about timing; callers decide when the response becomes visible.
///
/// # Panics
///
/// Panics when `pkt` is already a response, or when a read is wider than
/// [`MAX_ACCESS_BYTES`].
pub fn handle_request(pkt: &mut Packet, range: AddrRange, table: &LookupTable) -> LookupOutcome {
    if pkt.is_write() {
        pkt.make_response();
        return LookupOutcome::WriteIgnored;
    }

    let key = derive_key(pkt.addr(), range);
    let outcome = table.lookup(key).map_or(LookupOutcome::Miss { key }, |value| {
        LookupOutcome::Hit { key, value }
    });

    assert!(
        pkt.size() <= MAX_ACCESS_BYTES,
        "read of {} bytes at {:#x} exceeds the {MAX_ACCESS_BYTES}-byte lookup value",
        pkt.size(),
        pkt.addr()
    );
    pkt.set_payload(outcome.payload().unwrap_or_default());
    pkt.make_response();
    outcome
}
