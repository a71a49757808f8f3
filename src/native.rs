//! Native function table - index-addressed host callables
//!
//! Design: Slot 0 is a reserved placeholder that always fails with a system
//! error; reaching it means the caller and the table disagree on the
//! calling convention. The table also serves as an `Interpreter` for
//! native functions and the methods bound to them.

use crate::allocator::Heap;
use crate::builtins::class::method_call_args;
use crate::builtins::function::function_data;
use crate::error::{Error, PmResult};
use crate::interp::Interpreter;
use crate::logging::log_native_call;
use crate::objects::{FunctionKind, ObjRef, ObjectType};

/// Host callable: heap access plus explicit arguments
pub type NativeFn = fn(&mut Heap, &[ObjRef]) -> PmResult<ObjRef>;

fn placeholder(_heap: &mut Heap, _args: &[ObjRef]) -> PmResult<ObjRef> {
    Err(Error::system_error("native function slot 0 is a placeholder"))
}

pub struct NativeTable {
    entries: Vec<NativeFn>,
}

impl NativeTable {
    /// Table holding only the placeholder slot
    pub fn new() -> Self {
        Self { entries: vec![placeholder as NativeFn] }
    }

    /// Append a native function, returning its index
    pub fn register(&mut self, func: NativeFn) -> u16 {
        self.entries.push(func);
        (self.entries.len() - 1) as u16
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the native function at `index`
    pub fn call(&self, index: u16, heap: &mut Heap, args: &[ObjRef]) -> PmResult<ObjRef> {
        let func = self
            .entries
            .get(index as usize)
            .copied()
            .ok_or_else(|| Error::system_error("native function index out of range"))?;
        log_native_call(index as usize, args.len());
        func(heap, args)
    }
}

impl Default for NativeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter for NativeTable {
    fn call_function(&mut self, heap: &mut Heap, callable: ObjRef, args: &[ObjRef]) -> PmResult<ObjRef> {
        let (func, args) = match heap.type_of(callable)? {
            ObjectType::Method => method_call_args(heap, callable, args)?,
            _ => (callable, args.to_vec()),
        };

        match function_data(heap, func)?.kind {
            FunctionKind::Native(index) => self.call(index, heap, &args),
            FunctionKind::Bytecode(_) => Err(Error::system_error(
                "bytecode function called without an interpreter loop",
            )),
        }
    }
}
