//! String type - immutable byte strings compared by content

use crate::allocator::Heap;
use crate::error::PmResult;
use crate::objects::{type_mismatch, HeapData, ObjRef, ObjectType};

pub fn string_new(heap: &mut Heap, s: &str) -> PmResult<ObjRef> {
    heap.allocate(HeapData::Str(s.into()))
}

#[inline]
pub fn string_as_str(heap: &Heap, obj: ObjRef) -> PmResult<&str> {
    match heap.get(obj)? {
        HeapData::Str(s) => Ok(&**s),
        other => Err(type_mismatch(ObjectType::Str, other.object_type())),
    }
}

/// True when `obj` is a string equal to `s`
pub fn string_equals(heap: &Heap, obj: ObjRef, s: &str) -> PmResult<bool> {
    match heap.get(obj)? {
        HeapData::Str(value) => Ok(&**value == s),
        _ => Ok(false),
    }
}
