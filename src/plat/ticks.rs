//! Millisecond tick source fed by the periodic interrupt
//!
//! The interrupt handler is the only writer. Every other reader goes through
//! a single atomic load, so a multi-byte count is never observed torn.

use std::sync::atomic::{AtomicU32, Ordering};

/// Global counter advanced by the platform's timer interrupt
static TICKS: TickCounter = TickCounter::new();

/// Microsecond accumulator and millisecond count
#[derive(Debug, Default)]
pub struct TickCounter {
    usec: AtomicU32,
    ms: AtomicU32,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            usec: AtomicU32::new(0),
            ms: AtomicU32::new(0),
        }
    }

    /// Account `usec` elapsed microseconds (interrupt context)
    pub fn periodic(&self, usec: u32) {
        let total = self.usec.load(Ordering::Relaxed).wrapping_add(usec);
        let whole_ms = total / 1000;
        self.usec.store(total % 1000, Ordering::Relaxed);
        if whole_ms > 0 {
            self.ms.fetch_add(whole_ms, Ordering::Release);
        }
    }

    #[inline]
    pub fn read_ms(&self) -> u32 {
        self.ms.load(Ordering::Acquire)
    }
}

/// Called by the timer interrupt with the microseconds since its last call
#[inline]
pub fn periodic(usec: u32) {
    TICKS.periodic(usec);
}

/// Milliseconds counted by the timer interrupt so far
#[inline]
pub fn read_ms_ticks() -> u32 {
    TICKS.read_ms()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_milliseconds() {
        let ticks = TickCounter::new();
        ticks.periodic(400);
        ticks.periodic(400);
        assert_eq!(ticks.read_ms(), 0);
        ticks.periodic(400);
        assert_eq!(ticks.read_ms(), 1);
        ticks.periodic(2_800);
        assert_eq!(ticks.read_ms(), 4);
    }

    #[test]
    fn test_global_counter_is_monotonic() {
        let before = read_ms_ticks();
        periodic(5_000);
        assert!(read_ms_ticks() >= before + 5);
    }
}
