//! Garbage collector - synchronous stop-the-world mark-sweep
//!
//! Design: Collection is driven by the allocator:
//! 1. Triggered only when an allocation does not fit the arena
//! 2. Marks from globals, frame roots, guarded objects and constants
//! 3. Handles pending in the allocation itself are pinned for the cycle

mod roots;
mod collector;


pub use roots::{ConstructionGuard, RootSet};

use std::time::Instant;

use crate::allocator::Heap;
use crate::logging::{log_gc_complete, warn};
use crate::objects::ObjRef;

/// Statistics of one completed collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcStats {
    pub marked: usize,
    pub freed: usize,
    pub bytes_reclaimed: usize,
    pub duration_us: u64,
}

/// Collect now
pub fn collect(heap: &mut Heap) -> GcStats {
    collect_with(heap, &[])
}

/// Collect with additional handles pinned for this cycle only
pub(crate) fn collect_with(heap: &mut Heap, extra_roots: &[ObjRef]) -> GcStats {
    let start = Instant::now();
    let outcome = collector::run(heap, extra_roots);
    heap.record_collection();

    let elapsed = start.elapsed();
    if elapsed.as_millis() > 10 {
        warn!(
            duration_ms = elapsed.as_millis() as u64,
            "GC collection took significant time"
        );
    }

    let duration_us = elapsed.as_micros() as u64;
    log_gc_complete(duration_us, outcome.freed, heap.live_objects());

    GcStats {
        marked: outcome.marked,
        freed: outcome.freed,
        bytes_reclaimed: outcome.bytes_reclaimed,
        duration_us,
    }
}
