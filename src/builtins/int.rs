//! Int type - small immutable integers

use crate::allocator::Heap;
use crate::error::PmResult;
use crate::objects::{type_mismatch, HeapData, ObjRef, ObjectType};

/// Integer object; -1, 0 and 1 are the heap's shared constants
pub fn int_new(heap: &mut Heap, value: i32) -> PmResult<ObjRef> {
    match heap.int_constant(value) {
        Some(constant) => Ok(constant),
        None => heap.allocate(HeapData::Int(value)),
    }
}

#[inline]
pub fn int_value(heap: &Heap, obj: ObjRef) -> PmResult<i32> {
    match heap.get(obj)? {
        HeapData::Int(value) => Ok(*value),
        other => Err(type_mismatch(ObjectType::Int, other.object_type())),
    }
}
