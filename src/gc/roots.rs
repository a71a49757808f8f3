//! GC root tracking - starting points for reachability marking
//!
//! Roots include:
//! - Global namespace (the globals dict)
//! - Objects pinned by active frames (the root stack)
//! - Objects under construction, registered through a `ConstructionGuard`
//! - Heap constants

use std::ops::{Deref, DerefMut};

use crate::allocator::Heap;
use crate::objects::ObjRef;

/// Explicit roots owned by the heap
#[derive(Debug, Default)]
pub struct RootSet {
    pub(crate) globals: Option<ObjRef>,
    pub(crate) stack: Vec<ObjRef>,
    pub(crate) in_flight: Vec<ObjRef>,
    pub(crate) constructions: usize,
}

impl RootSet {
    pub fn new() -> Self {
        Self {
            globals: None,
            stack: Vec::with_capacity(32),
            in_flight: Vec::with_capacity(8),
            constructions: 0,
        }
    }

    /// Every explicit root: globals, then frame roots, then in-flight objects
    pub fn iter(&self) -> impl Iterator<Item = ObjRef> + '_ {
        self.globals
            .into_iter()
            .chain(self.stack.iter().copied())
            .chain(self.in_flight.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.stack.len() + self.in_flight.len() + usize::from(self.globals.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAII construction-in-progress guard
///
/// The guard borrows the heap and derefs to it, so a builder allocates
/// through the guard. Objects passed to `protect` are roots until the guard
/// drops, on every exit path. Collection keeps running underneath.
///
/// Usage:
/// ```ignore
/// let mut heap = ConstructionGuard::acquire(heap);
/// let result = list_new(&mut heap)?;
/// heap.protect(result);
/// list_append(&mut heap, result, item)?;
/// ```
#[must_use = "the guard releases as soon as it is dropped"]
pub struct ConstructionGuard<'h> {
    heap: &'h mut Heap,
    depth: usize,
}

impl<'h> ConstructionGuard<'h> {
    pub fn acquire(heap: &'h mut Heap) -> Self {
        let depth = heap.roots.in_flight.len();
        heap.roots.constructions += 1;
        Self { heap, depth }
    }

    /// Root `obj` for the lifetime of this guard
    #[inline]
    pub fn protect(&mut self, obj: ObjRef) -> ObjRef {
        self.heap.roots.in_flight.push(obj);
        obj
    }
}

impl Deref for ConstructionGuard<'_> {
    type Target = Heap;

    #[inline]
    fn deref(&self) -> &Heap {
        self.heap
    }
}

impl DerefMut for ConstructionGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Heap {
        self.heap
    }
}

impl Drop for ConstructionGuard<'_> {
    fn drop(&mut self) {
        self.heap.roots.in_flight.truncate(self.depth);
        self.heap.roots.constructions = self.heap.roots.constructions.saturating_sub(1);
    }
}
