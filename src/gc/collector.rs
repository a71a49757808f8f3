//! Reachability collection via tricolor mark-sweep
//!
//! White objects are unmarked, gray objects sit in the worklist, black
//! objects are marked with their children scanned. Anything still white
//! after propagation is unreachable and swept.

use std::collections::VecDeque;

use crate::allocator::Heap;
use crate::logging::{log_gc_mark, log_gc_roots, log_gc_start, log_gc_sweep, trace, warn};
use crate::objects::ObjRef;

/// Outcome of one phase run
pub(super) struct CycleOutcome {
    pub marked: usize,
    pub freed: usize,
    pub bytes_reclaimed: usize,
}

/// Run a full mark-sweep cycle over `heap`
pub(super) fn run(heap: &mut Heap, extra_roots: &[ObjRef]) -> CycleOutcome {
    log_gc_start(heap.live_objects());

    trace!("Phase 1: Marking all objects white");
    mark_white(heap);

    trace!("Phase 2: Marking from roots");
    let mut gray = VecDeque::with_capacity(64);
    let mut marked = mark_from_roots(heap, extra_roots, &mut gray);

    trace!("Phase 3: Propagating marks");
    marked += propagate_marks(heap, &mut gray);
    log_gc_mark(marked);

    trace!("Phase 4: Sweeping unreachable objects");
    let (freed, bytes_reclaimed) = sweep(heap);
    log_gc_sweep(freed, bytes_reclaimed);

    CycleOutcome { marked, freed, bytes_reclaimed }
}

/// Phase 1: Clear every mark
fn mark_white(heap: &mut Heap) {
    for header in heap.arena.headers_mut() {
        header.marked = false;
    }
}

/// Phase 2: Shade roots, guarded objects, constants and pinned handles gray
fn mark_from_roots(heap: &mut Heap, extra_roots: &[ObjRef], gray: &mut VecDeque<ObjRef>) -> usize {
    let mut roots: Vec<ObjRef> = heap.roots.iter().collect();
    if !heap.roots.in_flight.is_empty() {
        log_gc_roots(roots.len(), heap.roots.in_flight.len());
    }
    roots.extend(heap.constants().as_array());
    roots.extend_from_slice(extra_roots);

    roots
        .into_iter()
        .filter(|&root| mark_gray(heap, root, gray))
        .count()
}

/// Phase 3: Scan gray objects until the worklist drains
fn propagate_marks(heap: &mut Heap, gray: &mut VecDeque<ObjRef>) -> usize {
    let mut marked = 0;
    let mut children = Vec::with_capacity(16);

    while let Some(obj) = gray.pop_front() {
        children.clear();
        match heap.arena.get(obj) {
            Some((_, data)) => data.for_each_child(|child| children.push(child)),
            None => continue,
        }

        for &child in &children {
            if mark_gray(heap, child, gray) {
                marked += 1;
            }
        }
    }

    marked
}

/// Phase 4: Free every object left white
fn sweep(heap: &mut Heap) -> (usize, usize) {
    let garbage: Vec<ObjRef> = heap
        .arena
        .live_refs()
        .filter(|&obj| matches!(heap.arena.get(obj), Some((header, _)) if !header.is_marked()))
        .collect();

    let mut bytes = 0;
    for &obj in &garbage {
        if let Some((header, _)) = heap.arena.remove(obj) {
            trace!(slot = obj.index(), kind = header.tag().name(), "swept unreachable object");
            bytes += header.chunk_size();
        }
    }
    heap.release_bytes(bytes);

    (garbage.len(), bytes)
}

/// Shade one object gray; false when already marked or not live
fn mark_gray(heap: &mut Heap, obj: ObjRef, gray: &mut VecDeque<ObjRef>) -> bool {
    match heap.arena.header_mut(obj) {
        Some(header) if !header.marked => {
            header.marked = true;
            gray.push_back(obj);
            true
        }
        Some(_) => false,
        None => {
            warn!(slot = obj.index(), "reference edge to a free slot ignored during marking");
            false
        }
    }
}
