//! List type - mutable sequences over a SegmentedList
//!
//! Design: The cached `length` is the single source of truth for index and
//! slice arithmetic:
//! - Negative indices are normalized by adding the length
//! - get/set/remove report out-of-range positions as index errors
//! - insert clamps instead of failing
//! - Slice endpoints clamp into `[0, length]`; a negative step is rejected

use crate::allocator::Heap;
use crate::builtins::print::{obj_print, Output};
use crate::builtins::seglist::{
    seglist_append, seglist_clear, seglist_get, seglist_insert, seglist_new, seglist_remove,
    seglist_set, seglist_to_vec,
};
use crate::builtins::slice::slice_indices;
use crate::error::{Error, PmResult};
use crate::gc::ConstructionGuard;
use crate::objects::{obj_compare, sequence_items, type_mismatch, HeapData, ListData, ObjRef, ObjectType};

fn list_data(heap: &Heap, list: ObjRef) -> PmResult<ListData> {
    match heap.get(list)? {
        HeapData::List(data) => Ok(*data),
        other => Err(type_mismatch(ObjectType::List, other.object_type())),
    }
}

fn list_data_mut(heap: &mut Heap, list: ObjRef) -> PmResult<&mut ListData> {
    match heap.get_mut(list)? {
        HeapData::List(data) => Ok(data),
        other => Err(type_mismatch(ObjectType::List, other.object_type())),
    }
}

#[inline]
fn normalize(index: isize, length: usize) -> isize {
    if index < 0 {
        index + length as isize
    } else {
        index
    }
}

/// Normalize and bounds check an element position
fn checked_index(index: isize, length: usize) -> PmResult<usize> {
    let index = normalize(index, length);
    if index < 0 || index as usize >= length {
        return Err(Error::index_error("list index out of range"));
    }
    Ok(index as usize)
}

/// Normalize and clamp a position into `[low, length]`
#[inline]
fn clamp_index(index: isize, low: usize, length: usize) -> usize {
    normalize(index, length).clamp(low as isize, length as isize) as usize
}

/// Create an empty list
pub fn list_new(heap: &mut Heap) -> PmResult<ObjRef> {
    let storage = seglist_new(heap)?;
    heap.allocate(HeapData::List(ListData { length: 0, storage }))
}

#[inline]
pub fn list_len(heap: &Heap, list: ObjRef) -> PmResult<usize> {
    list_data(heap, list).map(|data| data.length)
}

/// Snapshot of the elements, in order
pub fn list_to_vec(heap: &Heap, list: ObjRef) -> PmResult<Vec<ObjRef>> {
    let data = list_data(heap, list)?;
    seglist_to_vec(heap, data.storage)
}

pub fn list_append(heap: &mut Heap, list: ObjRef, obj: ObjRef) -> PmResult<()> {
    let data = list_data(heap, list)?;
    seglist_append(heap, data.storage, obj)?;
    list_data_mut(heap, list)?.length += 1;
    Ok(())
}

pub fn list_get_item(heap: &Heap, list: ObjRef, index: isize) -> PmResult<ObjRef> {
    let data = list_data(heap, list)?;
    let index = checked_index(index, data.length)?;
    seglist_get(heap, data.storage, index)
}

pub fn list_set_item(heap: &mut Heap, list: ObjRef, index: isize, obj: ObjRef) -> PmResult<()> {
    let data = list_data(heap, list)?;
    let index = checked_index(index, data.length)?;
    seglist_set(heap, data.storage, index, obj)
}

/// Insert before the clamped position; never an index error
pub fn list_insert(heap: &mut Heap, list: ObjRef, index: isize, obj: ObjRef) -> PmResult<()> {
    let data = list_data(heap, list)?;
    let index = clamp_index(index, 0, data.length);
    seglist_insert(heap, data.storage, obj, index)?;
    list_data_mut(heap, list)?.length += 1;
    Ok(())
}

pub fn list_remove_index(heap: &mut Heap, list: ObjRef, index: isize) -> PmResult<()> {
    let data = list_data(heap, list)?;
    let index = checked_index(index, data.length)?;
    seglist_remove(heap, data.storage, index)?;
    list_data_mut(heap, list)?.length -= 1;
    Ok(())
}

/// Position of the first element equal to `value`
pub fn list_index(heap: &Heap, list: ObjRef, value: ObjRef) -> PmResult<usize> {
    let data = list_data(heap, list)?;
    for index in 0..data.length {
        let item = seglist_get(heap, data.storage, index)?;
        if obj_compare(heap, item, value)?.is_same() {
            return Ok(index);
        }
    }
    Err(Error::value_error("list.index(x): x not in list"))
}

/// Remove the first element equal to `value`
pub fn list_remove(heap: &mut Heap, list: ObjRef, value: ObjRef) -> PmResult<()> {
    let index = list_index(heap, list, value)?;
    list_remove_index(heap, list, index as isize)
}

/// New list holding the elements of `list` repeated `count` times
pub fn list_replicate(heap: &mut Heap, list: ObjRef, count: isize) -> PmResult<ObjRef> {
    let data = list_data(heap, list)?;

    let mut heap = ConstructionGuard::acquire(heap);
    let result = list_new(&mut heap)?;
    heap.protect(result);
    for _ in 0..count.max(0) {
        for index in 0..data.length {
            let item = seglist_get(&heap, data.storage, index)?;
            list_append(&mut heap, result, item)?;
        }
    }
    Ok(result)
}

#[inline]
pub fn list_copy(heap: &mut Heap, list: ObjRef) -> PmResult<ObjRef> {
    list_replicate(heap, list, 1)
}

/// Empty the list, releasing its segments
pub fn list_clear(heap: &mut Heap, list: ObjRef) -> PmResult<()> {
    let data = list_data(heap, list)?;
    seglist_clear(heap, data.storage)?;
    list_data_mut(heap, list)?.length = 0;
    Ok(())
}

fn check_step(step: isize) -> PmResult<usize> {
    if step == 0 {
        return Err(Error::value_error("slice step cannot be zero"));
    }
    if step < 0 {
        return Err(Error::value_error("negative slice step is not supported"));
    }
    Ok(step as usize)
}

/// New list of the elements from `start` to `end` (exclusive) every `step`
pub fn list_get_slice(
    heap: &mut Heap,
    list: ObjRef,
    start: isize,
    end: isize,
    step: isize,
) -> PmResult<ObjRef> {
    let data = list_data(heap, list)?;
    let step = check_step(step)?;
    let start = clamp_index(start, 0, data.length);
    let end = clamp_index(end, 0, data.length);

    let mut heap = ConstructionGuard::acquire(heap);
    let result = list_new(&mut heap)?;
    heap.protect(result);
    for index in (start..end).step_by(step) {
        let item = seglist_get(&heap, data.storage, index)?;
        list_append(&mut heap, result, item)?;
    }
    Ok(result)
}

/// Slice by a Slice object, defaulting absent endpoints
pub fn list_subscript_slice(heap: &mut Heap, list: ObjRef, slice: ObjRef) -> PmResult<ObjRef> {
    let length = list_len(heap, list)?;
    let (start, end, step) = slice_indices(heap, slice, length)?;
    list_get_slice(heap, list, start, end, step)
}

/// Replace `[start, end)` with the elements of a List or Tuple
///
/// Allocation failure after the resize has begun leaves the list shorter
/// than requested but structurally consistent.
pub fn list_store_slice(
    heap: &mut Heap,
    list: ObjRef,
    start: isize,
    end: isize,
    source: ObjRef,
) -> PmResult<()> {
    let data = list_data(heap, list)?;
    let items = sequence_items(heap, source)?;

    let start = clamp_index(start, 0, data.length);
    let end = clamp_index(end, start, data.length);
    let target = data.length - (end - start) + items.len();

    // Removed elements survive only in `items` when the list feeds itself
    let mut heap = ConstructionGuard::acquire(heap);
    if source == list {
        for &item in &items {
            heap.protect(item);
        }
    }

    let placeholder = heap.none();
    while list_len(&heap, list)? > target {
        list_remove_index(&mut heap, list, start as isize)?;
    }
    while list_len(&heap, list)? < target {
        list_insert(&mut heap, list, start as isize, placeholder)?;
    }

    for (offset, &item) in items.iter().enumerate() {
        list_set_item(&mut heap, list, (start + offset) as isize, item)?;
    }
    Ok(())
}

/// Print as `[a, b, 'c']`
pub fn list_print(heap: &Heap, list: ObjRef, out: &mut dyn Output) -> PmResult<()> {
    heap.expect_type(list, ObjectType::List)?;
    obj_print(heap, list, out)
}
