//! Heap allocator - fixed-budget chunk arena
//!
//! Design: Two-layer architecture sized for a microcontroller heap:
//! 1. Slot arena (stable handles, free-list recycling)
//! 2. Byte budget (every object charged its target chunk size)
//!
//! Exhaustion triggers one synchronous collection before `OutOfMemory`
//! is reported. The heap owns every object; everything else holds handles.

pub(crate) mod header;
mod arena;


pub use header::{chunk_size_for, ObjectHeader, MIN_CHUNK_SIZE};
pub use arena::Arena;

use crate::config::HeapConfig;
use crate::error::{Error, PmResult};
use crate::gc::{self, RootSet};
use crate::logging::{debug, log_allocation, log_free, log_out_of_memory};
use crate::objects::{type_mismatch, HeapData, ObjRef, ObjectType};

/// Permanently rooted objects created with the heap
#[derive(Debug, Clone, Copy)]
pub struct Constants {
    pub none: ObjRef,
    pub negative_one: ObjRef,
    pub zero: ObjRef,
    pub one: ObjRef,
}

impl Constants {
    pub fn as_array(&self) -> [ObjRef; 4] {
        [self.none, self.negative_one, self.zero, self.one]
    }
}

/// The object heap
pub struct Heap {
    pub(crate) arena: Arena,
    pub(crate) roots: RootSet,
    config: HeapConfig,
    bytes_in_use: usize,
    collections: usize,
    constants: Constants,
}

impl Heap {
    /// Create a heap and its constant objects
    pub fn new(config: HeapConfig) -> PmResult<Self> {
        config.validate()?;

        // Placeholder handles until the constants exist
        let placeholder = ObjRef::from_index(0);
        let mut heap = Self {
            arena: Arena::new(),
            roots: RootSet::new(),
            config,
            bytes_in_use: 0,
            collections: 0,
            constants: Constants {
                none: placeholder,
                negative_one: placeholder,
                zero: placeholder,
                one: placeholder,
            },
        };

        let mut made = [placeholder; 4];
        {
            let mut build = gc::ConstructionGuard::acquire(&mut heap);
            let values = [HeapData::None, HeapData::Int(-1), HeapData::Int(0), HeapData::Int(1)];
            for (slot, data) in made.iter_mut().zip(values) {
                let obj = build.allocate(data)?;
                *slot = build.protect(obj);
            }
        }
        let [none, negative_one, zero, one] = made;
        heap.constants = Constants { none, negative_one, zero, one };

        debug!(
            arena_bytes = heap.config.arena_bytes,
            max_chunk_bytes = heap.config.max_chunk_bytes,
            "heap initialized"
        );
        Ok(heap)
    }

    /// Allocate a chunk for `data`, collecting once if the arena is full
    ///
    /// References held by `data` are protected during that collection, so a
    /// single-step constructor never loses the objects it is about to link.
    pub fn allocate(&mut self, data: HeapData) -> PmResult<ObjRef> {
        self.allocate_pinned(data, &[])
    }

    /// Allocate while also protecting `pins`, handles the caller is about to
    /// link that `data` itself does not reference
    pub fn allocate_pinned(&mut self, data: HeapData, pins: &[ObjRef]) -> PmResult<ObjRef> {
        let size = data.chunk_size();

        if size > self.config.max_chunk_bytes {
            log_out_of_memory(size, self.bytes_free());
            return Err(Error::out_of_memory("object exceeds the maximum chunk size"));
        }

        if !self.fits(size) && self.config.collect_on_exhaustion {
            let mut pending = pins.to_vec();
            data.for_each_child(|r| pending.push(r));
            gc::collect_with(self, &pending);
        }

        if !self.fits(size) {
            log_out_of_memory(size, self.bytes_free());
            return Err(Error::out_of_memory("heap exhausted"));
        }

        let tag = data.object_type();
        self.bytes_in_use += size;
        let obj = self.arena.insert(ObjectHeader::new(tag, size), data);
        log_allocation(tag.name(), obj.index() as u32, size);
        Ok(obj)
    }

    /// Release one chunk immediately (SegmentedList segments only)
    pub fn free_chunk(&mut self, obj: ObjRef) -> PmResult<()> {
        let (header, _) = self
            .arena
            .remove(obj)
            .ok_or_else(|| Error::system_error("free of a dangling object reference"))?;
        self.release_bytes(header.chunk_size());
        log_free(obj.index() as u32, header.chunk_size());
        Ok(())
    }

    pub(crate) fn release_bytes(&mut self, bytes: usize) {
        self.bytes_in_use = self.bytes_in_use.saturating_sub(bytes);
    }

    pub(crate) fn record_collection(&mut self) {
        self.collections += 1;
    }

    #[inline]
    fn fits(&self, size: usize) -> bool {
        self.bytes_in_use + size <= self.config.arena_bytes
    }

    /// Payload of a live object
    #[inline]
    pub fn get(&self, obj: ObjRef) -> PmResult<&HeapData> {
        self.arena
            .get(obj)
            .map(|(_, data)| data)
            .ok_or_else(|| Error::system_error("dangling object reference"))
    }

    #[inline]
    pub fn get_mut(&mut self, obj: ObjRef) -> PmResult<&mut HeapData> {
        self.arena
            .get_mut(obj)
            .ok_or_else(|| Error::system_error("dangling object reference"))
    }

    #[inline]
    pub fn header(&self, obj: ObjRef) -> PmResult<&ObjectHeader> {
        self.arena
            .get(obj)
            .map(|(header, _)| header)
            .ok_or_else(|| Error::system_error("dangling object reference"))
    }

    /// Tag stamped on the object at allocation
    #[inline]
    pub fn type_of(&self, obj: ObjRef) -> PmResult<ObjectType> {
        self.header(obj).map(|header| header.tag())
    }

    /// Fail with a type error unless `obj` carries the `expected` tag
    pub fn expect_type(&self, obj: ObjRef, expected: ObjectType) -> PmResult<()> {
        let found = self.type_of(obj)?;
        if found == expected {
            Ok(())
        } else {
            Err(type_mismatch(expected, found))
        }
    }

    #[inline]
    pub fn is_live(&self, obj: ObjRef) -> bool {
        self.arena.get(obj).is_some()
    }

    #[inline]
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    /// The shared None object
    #[inline]
    pub fn none(&self) -> ObjRef {
        self.constants.none
    }

    /// Shared constant for -1, 0 and 1
    pub fn int_constant(&self, value: i32) -> Option<ObjRef> {
        match value {
            -1 => Some(self.constants.negative_one),
            0 => Some(self.constants.zero),
            1 => Some(self.constants.one),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Root set
    // ------------------------------------------------------------------------

    /// Install the global namespace (a dict) as a root
    pub fn set_globals(&mut self, globals: Option<ObjRef>) {
        self.roots.globals = globals;
    }

    #[inline]
    pub fn globals(&self) -> Option<ObjRef> {
        self.roots.globals
    }

    /// Pin an object as if referenced by an active frame
    #[inline]
    pub fn push_root(&mut self, obj: ObjRef) {
        self.roots.stack.push(obj);
    }

    #[inline]
    pub fn pop_root(&mut self) -> Option<ObjRef> {
        self.roots.stack.pop()
    }

    #[inline]
    pub fn root_depth(&self) -> usize {
        self.roots.stack.len()
    }

    /// Drop frame roots down to `depth`
    pub fn truncate_roots(&mut self, depth: usize) {
        self.roots.stack.truncate(depth);
    }

    /// True while a construction guard is held on this heap
    #[inline]
    pub fn construction_in_progress(&self) -> bool {
        self.roots.constructions > 0
    }

    /// Number of nested construction guards held on this heap
    #[inline]
    pub fn construction_depth(&self) -> usize {
        self.roots.constructions
    }

    /// Objects currently rooted by construction guards
    #[inline]
    pub fn in_flight(&self) -> &[ObjRef] {
        &self.roots.in_flight
    }

    // ------------------------------------------------------------------------
    // Accounting
    // ------------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    #[inline]
    pub fn bytes_in_use(&self) -> usize {
        self.bytes_in_use
    }

    #[inline]
    pub fn bytes_free(&self) -> usize {
        self.config.arena_bytes.saturating_sub(self.bytes_in_use)
    }

    #[inline]
    pub fn live_objects(&self) -> usize {
        self.arena.live_count()
    }

    /// Heap statistics for monitoring and debugging
    pub fn stats(&self) -> HeapStats {
        HeapStats {
            live_objects: self.arena.live_count(),
            free_slots: self.arena.free_count(),
            bytes_in_use: self.bytes_in_use,
            bytes_free: self.bytes_free(),
            collections: self.collections,
        }
    }
}

/// Heap statistics for monitoring and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    pub live_objects: usize,
    pub free_slots: usize,
    pub bytes_in_use: usize,
    pub bytes_free: usize,
    pub collections: usize,
}
