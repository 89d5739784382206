//! Address window and packet primitives shared by every access path.

/// Packet commands, payload buffer and access-width limit.
pub mod packet;
/// Half-open device address window.
pub mod range;

pub use packet::{MemCmd, Packet, MAX_ACCESS_BYTES};
pub use range::AddrRange;

/// Size of the window the reference configuration maps the device into (4 KiB).
pub const DEFAULT_WINDOW_BYTES: u64 = 4 * 1024;

/// Base address the reference configuration maps the device at.
pub const DEFAULT_WINDOW_BASE: u64 = 0x1000_0000;

/// Returns the reference `[0x1000_0000, 0x1000_1000)` window.
#[must_use]
pub const fn default_window() -> AddrRange {
    AddrRange {
        start: DEFAULT_WINDOW_BASE,
        end: DEFAULT_WINDOW_BASE + DEFAULT_WINDOW_BYTES,
    }
}
