//! Dict type - insertion-ordered attribute tables
//!
//! Design: Two parallel SegmentedLists, keys and values, always the same
//! length with index `i` of one pairing with index `i` of the other.
//! Lookup is a linear scan under the equality comparator; entries are
//! also addressable by position for class instantiation.

use crate::allocator::Heap;
use crate::builtins::seglist::{
    seglist_append, seglist_clear, seglist_get, seglist_new, seglist_remove, seglist_set,
};
use crate::builtins::string::string_equals;
use crate::error::{Error, PmResult};
use crate::gc::ConstructionGuard;
use crate::objects::{obj_compare, type_mismatch, DictData, HeapData, ObjRef, ObjectType, SegListData};

fn dict_data(heap: &Heap, dict: ObjRef) -> PmResult<DictData> {
    match heap.get(dict)? {
        HeapData::Dict(data) => Ok(*data),
        other => Err(type_mismatch(ObjectType::Dict, other.object_type())),
    }
}

fn dict_data_mut(heap: &mut Heap, dict: ObjRef) -> PmResult<&mut DictData> {
    match heap.get_mut(dict)? {
        HeapData::Dict(data) => Ok(data),
        other => Err(type_mismatch(ObjectType::Dict, other.object_type())),
    }
}

fn find_key(heap: &Heap, data: &DictData, key: ObjRef) -> PmResult<Option<usize>> {
    for index in 0..data.length {
        let candidate = seglist_get(heap, data.keys, index)?;
        if obj_compare(heap, candidate, key)?.is_same() {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Create an empty table
pub fn dict_new(heap: &mut Heap) -> PmResult<ObjRef> {
    let keys = seglist_new(heap)?;
    let vals = heap.allocate_pinned(HeapData::SegList(SegListData::default()), &[keys])?;
    heap.allocate(HeapData::Dict(DictData { length: 0, keys, vals }))
}

#[inline]
pub fn dict_len(heap: &Heap, dict: ObjRef) -> PmResult<usize> {
    dict_data(heap, dict).map(|data| data.length)
}

/// Set `key` to `value`, overwriting an equal key in place
pub fn dict_set_item(heap: &mut Heap, dict: ObjRef, key: ObjRef, value: ObjRef) -> PmResult<()> {
    let data = dict_data(heap, dict)?;
    if let Some(index) = find_key(heap, &data, key)? {
        return seglist_set(heap, data.vals, index, value);
    }

    // `value` is linked only after the key append, which may collect
    let mut heap = ConstructionGuard::acquire(heap);
    heap.protect(value);
    seglist_append(&mut heap, data.keys, key)?;
    if let Err(err) = seglist_append(&mut heap, data.vals, value) {
        seglist_remove(&mut heap, data.keys, data.length)?;
        return Err(err);
    }

    dict_data_mut(&mut heap, dict)?.length += 1;
    Ok(())
}

/// Value stored under `key`, if any
pub fn dict_lookup(heap: &Heap, dict: ObjRef, key: ObjRef) -> PmResult<Option<ObjRef>> {
    let data = dict_data(heap, dict)?;
    match find_key(heap, &data, key)? {
        Some(index) => seglist_get(heap, data.vals, index).map(Some),
        None => Ok(None),
    }
}

/// Value stored under the string key `name`, without allocating a key
pub fn dict_lookup_str(heap: &Heap, dict: ObjRef, name: &str) -> PmResult<Option<ObjRef>> {
    let data = dict_data(heap, dict)?;
    for index in 0..data.length {
        let key = seglist_get(heap, data.keys, index)?;
        if string_equals(heap, key, name)? {
            return seglist_get(heap, data.vals, index).map(Some);
        }
    }
    Ok(None)
}

pub fn dict_get_item(heap: &Heap, dict: ObjRef, key: ObjRef) -> PmResult<ObjRef> {
    dict_lookup(heap, dict, key)?.ok_or_else(|| Error::key_error("key not found"))
}

pub fn dict_del_item(heap: &mut Heap, dict: ObjRef, key: ObjRef) -> PmResult<()> {
    let data = dict_data(heap, dict)?;
    let index = find_key(heap, &data, key)?.ok_or_else(|| Error::key_error("key not found"))?;

    seglist_remove(heap, data.keys, index)?;
    seglist_remove(heap, data.vals, index)?;
    dict_data_mut(heap, dict)?.length -= 1;
    Ok(())
}

pub fn dict_clear(heap: &mut Heap, dict: ObjRef) -> PmResult<()> {
    let data = dict_data(heap, dict)?;
    seglist_clear(heap, data.keys)?;
    seglist_clear(heap, data.vals)?;
    dict_data_mut(heap, dict)?.length = 0;
    Ok(())
}

/// The (key, value) pair at insertion position `index`
pub fn dict_entry(heap: &Heap, dict: ObjRef, index: usize) -> PmResult<(ObjRef, ObjRef)> {
    let data = dict_data(heap, dict)?;
    if index >= data.length {
        return Err(Error::index_error("dict entry index out of range"));
    }
    Ok((
        seglist_get(heap, data.keys, index)?,
        seglist_get(heap, data.vals, index)?,
    ))
}

/// SegmentedList of keys, in insertion order
pub fn dict_keys(heap: &Heap, dict: ObjRef) -> PmResult<ObjRef> {
    dict_data(heap, dict).map(|data| data.keys)
}

/// SegmentedList of values, parallel to `dict_keys`
pub fn dict_vals(heap: &Heap, dict: ObjRef) -> PmResult<ObjRef> {
    dict_data(heap, dict).map(|data| data.vals)
}
