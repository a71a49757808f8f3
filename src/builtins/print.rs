//! Output operations - byte-oriented printing of heap objects
//!
//! Design: Objects render straight into an `Output` sink with no
//! intermediate string, so printing allocates nothing on the heap.
//! Strings nested inside containers are quoted; top-level strings are not.

use crate::allocator::Heap;
use crate::builtins::seglist::seglist_to_vec;
use crate::builtins::string::string_as_str;
use crate::error::PmResult;
use crate::objects::{HeapData, ObjRef};
use crate::plat::Platform;

/// Containers nested deeper than this print as `...`
const MAX_PRINT_DEPTH: usize = 16;

/// Output target abstraction
pub trait Output {
    fn write_bytes(&mut self, bytes: &[u8]) -> PmResult<()>;

    #[inline]
    fn write_str(&mut self, s: &str) -> PmResult<()> {
        self.write_bytes(s.as_bytes())
    }
}

impl Output for Vec<u8> {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> PmResult<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Writes through a platform's byte transmitter
pub struct PlatformOutput<'a, P: Platform + ?Sized> {
    plat: &'a mut P,
}

impl<'a, P: Platform + ?Sized> PlatformOutput<'a, P> {
    pub fn new(plat: &'a mut P) -> Self {
        Self { plat }
    }
}

impl<P: Platform + ?Sized> Output for PlatformOutput<'_, P> {
    fn write_bytes(&mut self, bytes: &[u8]) -> PmResult<()> {
        bytes.iter().try_for_each(|&b| self.plat.send_byte(b))
    }
}

/// Print any object
pub fn obj_print(heap: &Heap, obj: ObjRef, out: &mut dyn Output) -> PmResult<()> {
    print_value(heap, obj, out, 0)
}

/// Render into an owned string
pub fn obj_to_string(heap: &Heap, obj: ObjRef) -> PmResult<String> {
    let mut buf = Vec::new();
    obj_print(heap, obj, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn print_value(heap: &Heap, obj: ObjRef, out: &mut dyn Output, depth: usize) -> PmResult<()> {
    if depth > MAX_PRINT_DEPTH {
        return out.write_str("...");
    }

    match heap.get(obj)? {
        HeapData::None => out.write_str("None"),
        HeapData::Int(value) => out.write_str(&value.to_string()),
        HeapData::Str(s) if depth > 0 => {
            out.write_str("'")?;
            out.write_str(s)?;
            out.write_str("'")
        }
        HeapData::Str(s) => out.write_str(s),
        HeapData::Tuple(items) => {
            out.write_str("(")?;
            print_items(heap, items, out, depth)?;
            if items.len() == 1 {
                out.write_str(",")?;
            }
            out.write_str(")")
        }
        HeapData::List(data) => {
            let items = seglist_to_vec(heap, data.storage)?;
            out.write_str("[")?;
            print_items(heap, &items, out, depth)?;
            out.write_str("]")
        }
        HeapData::Dict(data) => {
            let keys = seglist_to_vec(heap, data.keys)?;
            let vals = seglist_to_vec(heap, data.vals)?;
            out.write_str("{")?;
            for (i, (&key, &val)) in keys.iter().zip(&vals).enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                print_value(heap, key, out, depth + 1)?;
                out.write_str(": ")?;
                print_value(heap, val, out, depth + 1)?;
            }
            out.write_str("}")
        }
        HeapData::Slice(data) => {
            out.write_str("[")?;
            for (i, end) in [data.start, data.end, data.step].into_iter().enumerate() {
                if i > 0 {
                    out.write_str(":")?;
                }
                if let Some(end) = end {
                    print_value(heap, end, out, depth + 1)?;
                }
            }
            out.write_str("]")
        }
        HeapData::Function(func) => {
            out.write_str("<function ")?;
            out.write_str(string_as_str(heap, func.name)?)?;
            out.write_str(">")
        }
        HeapData::Class(class) => {
            out.write_str("<class ")?;
            out.write_str(string_as_str(heap, class.name)?)?;
            out.write_str(">")
        }
        HeapData::Instance(instance) => {
            out.write_str("<")?;
            out.write_str(string_as_str(heap, instance.name)?)?;
            out.write_str(" instance>")
        }
        HeapData::Method(_) => out.write_str("<bound method>"),
        HeapData::SegList(data) => out.write_str(&format!("<seglist of {}>", data.length)),
        HeapData::Segment(_) => out.write_str("<segment>"),
    }
}

fn print_items(heap: &Heap, items: &[ObjRef], out: &mut dyn Output, depth: usize) -> PmResult<()> {
    for (i, &item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        print_value(heap, item, out, depth + 1)?;
    }
    Ok(())
}
