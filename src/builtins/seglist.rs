//! SegmentedList - ordered references in a chain of fixed-capacity segments
//!
//! Design: Growth allocates one bounded chunk, never a contiguous realloc:
//! - Every segment except the tail is full; an empty list has no segments
//! - Insert and remove ripple one item per segment to keep that shape
//! - A cursor remembers the last segment resolved, so sequential access
//!   does not rewalk the chain from the head
//!
//! Indices are pre-normalized by callers; out-of-range is an index error.

use smallvec::SmallVec;

use crate::allocator::Heap;
use crate::error::{Error, PmResult};
use crate::objects::{type_mismatch, HeapData, ObjRef, ObjectType, SegListData, SegmentData};

/// References held by one segment
pub const SEGMENT_CAPACITY: usize = 8;

fn broken_chain() -> Error {
    Error::system_error("segmented list chain is corrupt")
}

fn header(heap: &Heap, seglist: ObjRef) -> PmResult<&SegListData> {
    match heap.get(seglist)? {
        HeapData::SegList(data) => Ok(data),
        other => Err(type_mismatch(ObjectType::SegList, other.object_type())),
    }
}

fn header_mut(heap: &mut Heap, seglist: ObjRef) -> PmResult<&mut SegListData> {
    match heap.get_mut(seglist)? {
        HeapData::SegList(data) => Ok(data),
        other => Err(type_mismatch(ObjectType::SegList, other.object_type())),
    }
}

fn segment(heap: &Heap, seg: ObjRef) -> PmResult<&SegmentData> {
    match heap.get(seg)? {
        HeapData::Segment(data) => Ok(data),
        _ => Err(broken_chain()),
    }
}

fn segment_mut(heap: &mut Heap, seg: ObjRef) -> PmResult<&mut SegmentData> {
    match heap.get_mut(seg)? {
        HeapData::Segment(data) => Ok(data),
        _ => Err(broken_chain()),
    }
}

/// Resolve `index` to its (segment, offset) pair
fn locate(heap: &Heap, seglist: ObjRef, index: usize) -> PmResult<(ObjRef, usize)> {
    let data = header(heap, seglist)?;
    if index >= data.length {
        return Err(Error::index_error("segmented list index out of range"));
    }

    let target = index / SEGMENT_CAPACITY;
    let (mut number, mut seg) = match data.cursor.get() {
        Some((number, seg)) if number <= target => (number, seg),
        _ => (0, data.head.ok_or_else(broken_chain)?),
    };
    while number < target {
        seg = segment(heap, seg)?.next.ok_or_else(broken_chain)?;
        number += 1;
    }

    data.cursor.set(Some((target, seg)));
    Ok((seg, index % SEGMENT_CAPACITY))
}

/// Create an empty segmented list (no segments)
pub fn seglist_new(heap: &mut Heap) -> PmResult<ObjRef> {
    heap.allocate(HeapData::SegList(SegListData::default()))
}

#[inline]
pub fn seglist_len(heap: &Heap, seglist: ObjRef) -> PmResult<usize> {
    header(heap, seglist).map(|data| data.length)
}

/// Number of segments currently chained
pub fn seglist_segment_count(heap: &Heap, seglist: ObjRef) -> PmResult<usize> {
    let mut count = 0;
    let mut next = header(heap, seglist)?.head;
    while let Some(seg) = next {
        count += 1;
        next = segment(heap, seg)?.next;
    }
    Ok(count)
}

/// Append at the end, allocating a new tail segment when the tail is full
pub fn seglist_append(heap: &mut Heap, seglist: ObjRef, obj: ObjRef) -> PmResult<()> {
    let (tail, length) = {
        let data = header(heap, seglist)?;
        (data.tail, data.length)
    };

    match tail {
        Some(tail) if length % SEGMENT_CAPACITY != 0 => {
            segment_mut(heap, tail)?.items.push(obj);
        }
        _ => {
            let mut items = SmallVec::new();
            items.push(obj);
            let seg = heap.allocate(HeapData::Segment(SegmentData { items, next: None }))?;
            match tail {
                Some(tail) => segment_mut(heap, tail)?.next = Some(seg),
                None => header_mut(heap, seglist)?.head = Some(seg),
            }
            header_mut(heap, seglist)?.tail = Some(seg);
        }
    }

    header_mut(heap, seglist)?.length += 1;
    Ok(())
}

/// Insert before `index` (`index == length` appends)
pub fn seglist_insert(heap: &mut Heap, seglist: ObjRef, obj: ObjRef, index: usize) -> PmResult<()> {
    let length = seglist_len(heap, seglist)?;
    if index > length {
        return Err(Error::index_error("segmented list insert position out of range"));
    }
    if index == length {
        return seglist_append(heap, seglist, obj);
    }

    // A full tail overflows; its successor exists before any item moves
    let mut spare = if length % SEGMENT_CAPACITY == 0 {
        Some(heap.allocate_pinned(HeapData::Segment(SegmentData::default()), &[obj])?)
    } else {
        None
    };

    let (mut seg, mut offset) = locate(heap, seglist, index)?;
    let mut carry = obj;
    loop {
        let data = segment_mut(heap, seg)?;
        if data.items.len() < SEGMENT_CAPACITY {
            data.items.insert(offset, carry);
            break;
        }

        let overflow = data.items.pop().ok_or_else(broken_chain)?;
        data.items.insert(offset, carry);
        carry = overflow;

        let next = data.next;
        seg = match next {
            Some(next) => next,
            None => {
                let new_tail = spare.take().ok_or_else(broken_chain)?;
                data.next = Some(new_tail);
                header_mut(heap, seglist)?.tail = Some(new_tail);
                new_tail
            }
        };
        offset = 0;
    }

    let data = header_mut(heap, seglist)?;
    data.length += 1;
    data.cursor.set(None);
    Ok(())
}

#[inline]
pub fn seglist_get(heap: &Heap, seglist: ObjRef, index: usize) -> PmResult<ObjRef> {
    let (seg, offset) = locate(heap, seglist, index)?;
    segment(heap, seg)?.items.get(offset).copied().ok_or_else(broken_chain)
}

#[inline]
pub fn seglist_set(heap: &mut Heap, seglist: ObjRef, index: usize, obj: ObjRef) -> PmResult<()> {
    let (seg, offset) = locate(heap, seglist, index)?;
    let slot = segment_mut(heap, seg)?.items.get_mut(offset).ok_or_else(broken_chain)?;
    *slot = obj;
    Ok(())
}

/// Remove the reference at `index`, freeing the tail segment if it empties
pub fn seglist_remove(heap: &mut Heap, seglist: ObjRef, index: usize) -> PmResult<()> {
    let (mut seg, offset) = locate(heap, seglist, index)?;
    {
        let data = segment_mut(heap, seg)?;
        if offset >= data.items.len() {
            return Err(broken_chain());
        }
        data.items.remove(offset);
    }

    // Pull the first item of each later segment back by one
    loop {
        let next = segment(heap, seg)?.next;
        let next = match next {
            Some(next) => next,
            None => break,
        };
        let first = {
            let data = segment_mut(heap, next)?;
            if data.items.is_empty() {
                return Err(broken_chain());
            }
            data.items.remove(0)
        };
        segment_mut(heap, seg)?.items.push(first);
        seg = next;
    }

    let length = {
        let data = header_mut(heap, seglist)?;
        data.length -= 1;
        data.cursor.set(None);
        data.length
    };

    if segment(heap, seg)?.items.is_empty() {
        if length == 0 {
            let data = header_mut(heap, seglist)?;
            data.head = None;
            data.tail = None;
        } else {
            let (new_tail, _) = locate(heap, seglist, length - 1)?;
            segment_mut(heap, new_tail)?.next = None;
            header_mut(heap, seglist)?.tail = Some(new_tail);
        }
        heap.free_chunk(seg)?;
    }

    Ok(())
}

/// Release every segment and reset to empty
pub fn seglist_clear(heap: &mut Heap, seglist: ObjRef) -> PmResult<()> {
    let mut next = {
        let data = header_mut(heap, seglist)?;
        data.cursor.set(None);
        data.length = 0;
        data.tail = None;
        data.head.take()
    };

    while let Some(seg) = next {
        next = segment(heap, seg)?.next;
        heap.free_chunk(seg)?;
    }
    Ok(())
}

/// Snapshot of every reference, in order
pub fn seglist_to_vec(heap: &Heap, seglist: ObjRef) -> PmResult<Vec<ObjRef>> {
    let data = header(heap, seglist)?;
    let mut items = Vec::with_capacity(data.length);
    let mut next = data.head;
    while let Some(seg) = next {
        let seg = segment(heap, seg)?;
        items.extend_from_slice(&seg.items);
        next = seg.next;
    }

    if items.len() != data.length {
        return Err(broken_chain());
    }
    Ok(items)
}
