//! Slice type - start/end/step descriptors for subscripting

use crate::allocator::Heap;
use crate::builtins::int::int_value;
use crate::builtins::print::{obj_print, Output};
use crate::error::{Error, PmResult};
use crate::objects::{type_mismatch, HeapData, ObjRef, ObjectType, SliceData};

/// Absent, or the None object, means "use the default"
fn endpoint(heap: &Heap, obj: Option<ObjRef>) -> PmResult<Option<ObjRef>> {
    let obj = match obj {
        Some(obj) => obj,
        None => return Ok(None),
    };
    match heap.type_of(obj)? {
        ObjectType::None => Ok(None),
        ObjectType::Int => Ok(Some(obj)),
        found => Err(Error::type_error(format!("slice indices must be integers, found {}", found))),
    }
}

/// Create a slice; a negative step is rejected before anything is allocated
pub fn slice_new(
    heap: &mut Heap,
    start: Option<ObjRef>,
    end: Option<ObjRef>,
    step: Option<ObjRef>,
) -> PmResult<ObjRef> {
    let start = endpoint(heap, start)?;
    let end = endpoint(heap, end)?;
    let step = endpoint(heap, step)?;

    if let Some(step) = step {
        if int_value(heap, step)? < 0 {
            return Err(Error::value_error("slice step cannot be negative"));
        }
    }

    heap.allocate(HeapData::Slice(SliceData { start, end, step }))
}

pub fn slice_data(heap: &Heap, slice: ObjRef) -> PmResult<SliceData> {
    match heap.get(slice)? {
        HeapData::Slice(data) => Ok(*data),
        other => Err(type_mismatch(ObjectType::Slice, other.object_type())),
    }
}

/// (start, end, step) with defaults 0, `length` and 1
pub fn slice_indices(heap: &Heap, slice: ObjRef, length: usize) -> PmResult<(isize, isize, isize)> {
    let data = slice_data(heap, slice)?;
    let value = |obj: Option<ObjRef>, default: isize| -> PmResult<isize> {
        match obj {
            Some(obj) => int_value(heap, obj).map(|v| v as isize),
            None => Ok(default),
        }
    };
    Ok((
        value(data.start, 0)?,
        value(data.end, length as isize)?,
        value(data.step, 1)?,
    ))
}

/// Print as `[start:end:step]`, absent endpoints empty
pub fn slice_print(heap: &Heap, slice: ObjRef, out: &mut dyn Output) -> PmResult<()> {
    heap.expect_type(slice, ObjectType::Slice)?;
    obj_print(heap, slice, out)
}
