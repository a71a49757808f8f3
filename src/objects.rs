//! Object system - tagged variants for every heap value
//!
//! Design: One discriminant per object, consulted by free functions:
//! - `ObjRef` is a copyable slot handle, never a pointer
//! - `HeapData` is the closed set of variant payloads
//! - Every edge between objects is an `ObjRef`, so the collector can walk
//!   the graph through `HeapData::for_each_child`

use smallvec::SmallVec;
use std::cell::Cell;
use std::fmt;

use crate::allocator::header::{chunk_size_for, HEADER_SIZE, INT_SIZE, LENGTH_SIZE, REF_SIZE};
use crate::allocator::Heap;
use crate::builtins::{list, seglist, SEGMENT_CAPACITY};
use crate::error::{Error, PmResult};

/// Handle to a heap object (slot index)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef(u32);

impl ObjRef {
    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Type discriminant stamped into every object header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    None,
    Int,
    Str,
    Tuple,
    List,
    Dict,
    Function,
    Class,
    Instance,
    Method,
    Slice,
    SegList,
    Segment,
}

impl ObjectType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Int => "int",
            Self::Str => "str",
            Self::Tuple => "tuple",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Function => "function",
            Self::Class => "class",
            Self::Instance => "instance",
            Self::Method => "method",
            Self::Slice => "slice",
            Self::SegList => "seglist",
            Self::Segment => "segment",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the type error every variant check reports
pub(crate) fn type_mismatch(expected: ObjectType, found: ObjectType) -> Error {
    Error::type_error(format!("expected {}, found {}", expected, found))
}

/// List: cached length over a SegmentedList
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListData {
    pub length: usize,
    pub storage: ObjRef,
}

/// Attribute table: parallel key and value SegmentedLists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictData {
    pub length: usize,
    pub keys: ObjRef,
    pub vals: ObjRef,
}

/// Shared layout of Class and Instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassData {
    pub name: ObjRef,
    pub attrs: ObjRef,
    pub bases: ObjRef,
}

/// Bound callable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodData {
    pub func: ObjRef,
    pub self_obj: ObjRef,
}

/// Slice descriptor; each endpoint is an Int object or absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceData {
    pub start: Option<ObjRef>,
    pub end: Option<ObjRef>,
    pub step: Option<ObjRef>,
}

/// How a function body is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Code object id interpreted by the bytecode loop
    Bytecode(u16),
    /// Index into the native function table
    Native(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionData {
    pub name: ObjRef,
    pub kind: FunctionKind,
}

/// SegmentedList header
#[derive(Debug, Clone, Default)]
pub struct SegListData {
    pub head: Option<ObjRef>,
    pub tail: Option<ObjRef>,
    pub length: usize,
    /// Last segment resolved by an index lookup: (segment number, handle)
    pub(crate) cursor: Cell<Option<(usize, ObjRef)>>,
}

/// Fixed capacity block of a SegmentedList
#[derive(Debug, Clone, Default)]
pub struct SegmentData {
    pub items: SmallVec<[ObjRef; SEGMENT_CAPACITY]>,
    pub next: Option<ObjRef>,
}

/// Variant payload of a heap object
#[derive(Debug, Clone)]
pub enum HeapData {
    None,
    Int(i32),
    Str(Box<str>),
    Tuple(Box<[ObjRef]>),
    List(ListData),
    Dict(DictData),
    Function(FunctionData),
    Class(ClassData),
    Instance(ClassData),
    Method(MethodData),
    Slice(SliceData),
    SegList(SegListData),
    Segment(SegmentData),
}

impl HeapData {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::None => ObjectType::None,
            Self::Int(_) => ObjectType::Int,
            Self::Str(_) => ObjectType::Str,
            Self::Tuple(_) => ObjectType::Tuple,
            Self::List(_) => ObjectType::List,
            Self::Dict(_) => ObjectType::Dict,
            Self::Function(_) => ObjectType::Function,
            Self::Class(_) => ObjectType::Class,
            Self::Instance(_) => ObjectType::Instance,
            Self::Method(_) => ObjectType::Method,
            Self::Slice(_) => ObjectType::Slice,
            Self::SegList(_) => ObjectType::SegList,
            Self::Segment(_) => ObjectType::Segment,
        }
    }

    /// Bytes this object occupies on the target, rounded to a whole chunk
    pub fn chunk_size(&self) -> usize {
        let payload = match self {
            Self::None => 0,
            Self::Int(_) => INT_SIZE,
            Self::Str(s) => LENGTH_SIZE + s.len(),
            Self::Tuple(items) => LENGTH_SIZE + items.len() * REF_SIZE,
            Self::List(_) => LENGTH_SIZE + REF_SIZE,
            Self::Dict(_) => LENGTH_SIZE + 2 * REF_SIZE,
            Self::Function(_) => REF_SIZE + 2,
            Self::Class(_) | Self::Instance(_) | Self::Slice(_) => 3 * REF_SIZE,
            Self::Method(_) => 2 * REF_SIZE,
            Self::SegList(_) => LENGTH_SIZE + 2 * REF_SIZE,
            // Segments are sized for full capacity so they never grow in place
            Self::Segment(_) => (SEGMENT_CAPACITY + 1) * REF_SIZE,
        };
        chunk_size_for(HEADER_SIZE + payload)
    }

    /// Visit every reference edge leaving this object
    pub fn for_each_child(&self, mut f: impl FnMut(ObjRef)) {
        match self {
            Self::None | Self::Int(_) | Self::Str(_) => {}
            Self::Tuple(items) => items.iter().copied().for_each(f),
            Self::List(l) => f(l.storage),
            Self::Dict(d) => {
                f(d.keys);
                f(d.vals);
            }
            Self::Function(func) => f(func.name),
            Self::Class(c) | Self::Instance(c) => {
                f(c.name);
                f(c.attrs);
                f(c.bases);
            }
            Self::Method(m) => {
                f(m.func);
                f(m.self_obj);
            }
            Self::Slice(s) => {
                for end in [s.start, s.end, s.step].into_iter().flatten() {
                    f(end);
                }
            }
            Self::SegList(sl) => {
                if let Some(head) = sl.head {
                    f(head);
                }
            }
            Self::Segment(seg) => {
                seg.items.iter().copied().for_each(&mut f);
                if let Some(next) = seg.next {
                    f(next);
                }
            }
        }
    }
}

/// Outcome of the equality comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Same,
    Differ,
}

impl Comparison {
    #[inline]
    pub fn is_same(self) -> bool {
        self == Self::Same
    }

    fn from_bool(same: bool) -> Self {
        if same {
            Self::Same
        } else {
            Self::Differ
        }
    }
}

/// Containers nested deeper than this are not compared
pub const MAX_COMPARE_DEPTH: usize = 16;

/// Equality comparator used by search operations and attribute tables
///
/// Ints compare by value, strings by bytes, tuples and lists element-wise;
/// every other variant compares by identity. Element-wise comparison
/// nested past `MAX_COMPARE_DEPTH` is a value error, which also bounds
/// self-containing containers.
pub fn obj_compare(heap: &Heap, a: ObjRef, b: ObjRef) -> PmResult<Comparison> {
    compare_at(heap, a, b, 0)
}

fn compare_at(heap: &Heap, a: ObjRef, b: ObjRef, depth: usize) -> PmResult<Comparison> {
    if a == b {
        return Ok(Comparison::Same);
    }

    match (heap.get(a)?, heap.get(b)?) {
        (HeapData::None, HeapData::None) => Ok(Comparison::Same),
        (HeapData::Int(x), HeapData::Int(y)) => Ok(Comparison::from_bool(x == y)),
        (HeapData::Str(x), HeapData::Str(y)) => Ok(Comparison::from_bool(x == y)),
        (HeapData::Tuple(x), HeapData::Tuple(y)) => compare_elementwise(heap, x, y, depth),
        (HeapData::List(x), HeapData::List(y)) => {
            if x.length != y.length {
                return Ok(Comparison::Differ);
            }
            let x = seglist::seglist_to_vec(heap, x.storage)?;
            let y = seglist::seglist_to_vec(heap, y.storage)?;
            compare_elementwise(heap, &x, &y, depth)
        }
        _ => Ok(Comparison::Differ),
    }
}

fn compare_elementwise(heap: &Heap, x: &[ObjRef], y: &[ObjRef], depth: usize) -> PmResult<Comparison> {
    if x.len() != y.len() {
        return Ok(Comparison::Differ);
    }
    if depth >= MAX_COMPARE_DEPTH {
        return Err(Error::value_error("maximum comparison depth exceeded"));
    }
    for (&a, &b) in x.iter().zip(y) {
        if !compare_at(heap, a, b, depth + 1)?.is_same() {
            return Ok(Comparison::Differ);
        }
    }
    Ok(Comparison::Same)
}

/// Elements of a List or Tuple, in order
pub(crate) fn sequence_items(heap: &Heap, seq: ObjRef) -> PmResult<Vec<ObjRef>> {
    match heap.get(seq)? {
        HeapData::Tuple(items) => Ok(items.to_vec()),
        HeapData::List(_) => list::list_to_vec(heap, seq),
        other => Err(Error::type_error(format!(
            "expected list or tuple, found {}",
            other.object_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::header::MIN_CHUNK_SIZE;

    #[test]
    fn test_chunk_sizes_follow_target_layout() {
        assert_eq!(HeapData::None.chunk_size(), MIN_CHUNK_SIZE);
        assert_eq!(HeapData::Int(7).chunk_size(), 8);
        assert_eq!(HeapData::Str("hello world".into()).chunk_size(), 16);
        assert_eq!(HeapData::Segment(SegmentData::default()).chunk_size(), 20);
    }

    #[test]
    fn test_children_of_method_and_slice() {
        let a = ObjRef::from_index(1);
        let b = ObjRef::from_index(2);

        let mut seen = Vec::new();
        HeapData::Method(MethodData { func: a, self_obj: b }).for_each_child(|r| seen.push(r));
        assert_eq!(seen, vec![a, b]);

        seen.clear();
        HeapData::Slice(SliceData { start: None, end: Some(b), step: None })
            .for_each_child(|r| seen.push(r));
        assert_eq!(seen, vec![b]);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ObjectType::List.name(), "list");
        assert_eq!(HeapData::Int(0).object_type(), ObjectType::Int);
        let err = type_mismatch(ObjectType::List, ObjectType::Int);
        assert_eq!(err.message(), "expected list, found int");
    }
}
