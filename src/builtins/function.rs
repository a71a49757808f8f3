//! Function type - named code objects the interpreter can invoke

use crate::allocator::Heap;
use crate::error::PmResult;
use crate::objects::{type_mismatch, FunctionData, FunctionKind, HeapData, ObjRef, ObjectType};

/// Create a function named by the string `name`
pub fn function_new(heap: &mut Heap, name: ObjRef, kind: FunctionKind) -> PmResult<ObjRef> {
    heap.expect_type(name, ObjectType::Str)?;
    heap.allocate(HeapData::Function(FunctionData { name, kind }))
}

pub fn function_data(heap: &Heap, func: ObjRef) -> PmResult<FunctionData> {
    match heap.get(func)? {
        HeapData::Function(data) => Ok(*data),
        other => Err(type_mismatch(ObjectType::Function, other.object_type())),
    }
}
