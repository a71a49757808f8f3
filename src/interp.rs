//! Interpreter seam - the single operation consumed from the bytecode loop

use crate::allocator::Heap;
use crate::error::PmResult;
use crate::objects::ObjRef;

/// Invokes callables on behalf of the object model
///
/// Class instantiation uses this to run `__init__`. A bound method passed
/// as `callable` receives its `self` ahead of `args`.
pub trait Interpreter {
    fn call_function(&mut self, heap: &mut Heap, callable: ObjRef, args: &[ObjRef]) -> PmResult<ObjRef>;
}
