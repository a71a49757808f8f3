//! Platform layer - byte transfer, tick source and diagnostics
//!
//! Design: The object model never touches hardware; it consumes a
//! `Platform`. Two implementations ship with the crate:
//! - `HostPlatform` for desktop builds (stdin/stdout)
//! - `MemoryPlatform` for tests (shared loopback buffers, injectable faults)

mod host;
mod memory;
pub mod ticks;

pub use host::HostPlatform;
pub use memory::{MemoryPlatform, MemoryPort};
pub use ticks::{periodic, read_ms_ticks, TickCounter};

use crate::error::{ErrorKind, PmResult};

pub trait Platform {
    /// Bring up the hardware the VM depends on
    fn init(&mut self) -> PmResult<()>;

    fn send_byte(&mut self, byte: u8) -> PmResult<()>;

    /// Blocking receive; a transfer fault is an I/O error
    fn receive_byte(&mut self) -> PmResult<u8>;

    /// Monotonic millisecond count, read atomically
    fn tick_count(&self) -> u32;

    /// Best-effort diagnostic sink
    fn report_error(&mut self, kind: ErrorKind);
}
