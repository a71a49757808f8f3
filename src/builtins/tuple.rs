//! Tuple type - fixed-length immutable sequences
//!
//! Design: One chunk holding every element reference; the read-only
//! counterpart of List for slice assignment and class bases.

use crate::allocator::Heap;
use crate::error::{Error, PmResult};
use crate::objects::{type_mismatch, HeapData, ObjRef, ObjectType};

pub fn tuple_new(heap: &mut Heap, items: &[ObjRef]) -> PmResult<ObjRef> {
    heap.allocate(HeapData::Tuple(items.into()))
}

/// Element references of a tuple
pub fn tuple_items(heap: &Heap, tuple: ObjRef) -> PmResult<&[ObjRef]> {
    match heap.get(tuple)? {
        HeapData::Tuple(items) => Ok(&**items),
        other => Err(type_mismatch(ObjectType::Tuple, other.object_type())),
    }
}

#[inline]
pub fn tuple_len(heap: &Heap, tuple: ObjRef) -> PmResult<usize> {
    tuple_items(heap, tuple).map(<[ObjRef]>::len)
}

/// Element at `index`; negative indices count from the end
pub fn tuple_get_item(heap: &Heap, tuple: ObjRef, index: isize) -> PmResult<ObjRef> {
    let items = tuple_items(heap, tuple)?;
    let normalized = if index < 0 { index + items.len() as isize } else { index };
    if normalized < 0 || normalized as usize >= items.len() {
        return Err(Error::index_error("tuple index out of range"));
    }
    Ok(items[normalized as usize])
}
