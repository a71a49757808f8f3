//! Slot arena - stable handles over recycled storage
//!
//! Design: Objects live in a slot vector addressed by index. Freed slots are
//! threaded onto a free list and reused before the vector grows, so a handle
//! stays valid exactly as long as its object is live.

use super::header::ObjectHeader;
use crate::objects::{HeapData, ObjRef};

enum Slot {
    Live { header: ObjectHeader, data: HeapData },
    Free { next: Option<u32> },
}

/// Slot storage backing the heap
pub struct Arena {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    live: usize,
    free: usize,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(256),
            free_head: None,
            live: 0,
            free: 0,
        }
    }

    /// Store an object, reusing a free slot when one exists
    pub fn insert(&mut self, header: ObjectHeader, data: HeapData) -> ObjRef {
        self.live += 1;
        match self.free_head {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                self.free_head = match slot {
                    Slot::Free { next } => *next,
                    Slot::Live { .. } => None,
                };
                *slot = Slot::Live { header, data };
                self.free -= 1;
                ObjRef::from_index(idx)
            }
            None => {
                let idx = self.slots.len() as u32;
                self.slots.push(Slot::Live { header, data });
                ObjRef::from_index(idx)
            }
        }
    }

    /// Release a live slot, returning what it held
    pub fn remove(&mut self, obj: ObjRef) -> Option<(ObjectHeader, HeapData)> {
        let slot = self.slots.get_mut(obj.index())?;
        if matches!(slot, Slot::Free { .. }) {
            return None;
        }
        let old = std::mem::replace(slot, Slot::Free { next: self.free_head });
        self.free_head = Some(obj.index() as u32);
        self.live -= 1;
        self.free += 1;
        match old {
            Slot::Live { header, data } => Some((header, data)),
            Slot::Free { .. } => None,
        }
    }

    #[inline]
    pub fn get(&self, obj: ObjRef) -> Option<(&ObjectHeader, &HeapData)> {
        match self.slots.get(obj.index())? {
            Slot::Live { header, data } => Some((header, data)),
            Slot::Free { .. } => None,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, obj: ObjRef) -> Option<&mut HeapData> {
        match self.slots.get_mut(obj.index())? {
            Slot::Live { data, .. } => Some(data),
            Slot::Free { .. } => None,
        }
    }

    #[inline]
    pub fn header_mut(&mut self, obj: ObjRef) -> Option<&mut ObjectHeader> {
        match self.slots.get_mut(obj.index())? {
            Slot::Live { header, .. } => Some(header),
            Slot::Free { .. } => None,
        }
    }

    /// Handles of every live object, in slot order
    pub fn live_refs(&self) -> impl Iterator<Item = ObjRef> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| match slot {
            Slot::Live { .. } => Some(ObjRef::from_index(idx as u32)),
            Slot::Free { .. } => None,
        })
    }

    /// Headers of every live object
    pub fn headers_mut(&mut self) -> impl Iterator<Item = &mut ObjectHeader> + '_ {
        self.slots.iter_mut().filter_map(|slot| match slot {
            Slot::Live { header, .. } => Some(header),
            Slot::Free { .. } => None,
        })
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
