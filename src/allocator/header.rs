//! Chunk metadata - size model and per-object header
//!
//! Design: Chunk sizes follow the layout of the 8/16-bit target rather than the
//! host, so the arena budget means the same thing on a desktop build as on
//! the device:
//! - 2-byte object descriptor (type tag + size class)
//! - 2-byte heap references
//! - 4-byte integers
//! - 4-byte chunk granule, 8-byte minimum chunk

use crate::objects::ObjectType;

/// Object descriptor size on the target
pub const HEADER_SIZE: usize = 2;

/// Size of one heap reference on the target
pub const REF_SIZE: usize = 2;

/// Size of a length/count field
pub const LENGTH_SIZE: usize = 2;

/// Size of an integer payload
pub const INT_SIZE: usize = 4;

/// Chunk sizes are multiples of this
pub const CHUNK_GRANULE: usize = 4;

/// Smallest chunk the allocator hands out
pub const MIN_CHUNK_SIZE: usize = 8;

/// Round a payload size (header included) up to a whole chunk
#[inline]
pub const fn chunk_size_for(bytes: usize) -> usize {
    let rounded = (bytes + CHUNK_GRANULE - 1) / CHUNK_GRANULE * CHUNK_GRANULE;
    if rounded < MIN_CHUNK_SIZE {
        MIN_CHUNK_SIZE
    } else {
        rounded
    }
}

/// Header kept alongside every live object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHeader {
    tag: ObjectType,
    chunk_size: usize,
    pub(crate) marked: bool,
}

impl ObjectHeader {
    #[inline]
    pub const fn new(tag: ObjectType, chunk_size: usize) -> Self {
        Self { tag, chunk_size, marked: false }
    }

    /// The type discriminant stamped at allocation
    #[inline]
    pub fn tag(&self) -> ObjectType {
        self.tag
    }

    /// Bytes charged against the arena for this object
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked
    }
}
