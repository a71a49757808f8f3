//! Class, Instance and Method types
//!
//! Design: Instantiation is a guarded multi-step build:
//! 1. Shallow-clone the class into an Instance
//! 2. Give the instance a fresh attribute table
//! 3. Copy class members in order, binding functions as Methods
//! 4. Run `__init__` through the interpreter when present
//!
//! The construction guard roots the instance from its allocation until it
//! is returned or the failure propagates, so `__init__` may collect freely.

use crate::allocator::Heap;
use crate::builtins::dict::{dict_entry, dict_len, dict_lookup, dict_lookup_str, dict_new, dict_set_item};
use crate::builtins::tuple::tuple_items;
use crate::error::{Error, PmResult};
use crate::gc::ConstructionGuard;
use crate::interp::Interpreter;
use crate::logging::{debug, trace};
use crate::objects::{type_mismatch, ClassData, HeapData, MethodData, ObjRef, ObjectType};

/// Layout of a Class or Instance
fn class_like(heap: &Heap, obj: ObjRef) -> PmResult<ClassData> {
    match heap.get(obj)? {
        HeapData::Class(data) | HeapData::Instance(data) => Ok(*data),
        other => Err(type_mismatch(ObjectType::Class, other.object_type())),
    }
}

/// Create a class from its name, member table and base classes
pub fn class_create(heap: &mut Heap, name: ObjRef, attrs: ObjRef, bases: ObjRef) -> PmResult<ObjRef> {
    heap.expect_type(name, ObjectType::Str)?;
    heap.expect_type(attrs, ObjectType::Dict)?;
    heap.expect_type(bases, ObjectType::Tuple)?;
    heap.allocate(HeapData::Class(ClassData { name, attrs, bases }))
}

/// Bind `func` to `self_obj`
pub fn method_new(heap: &mut Heap, func: ObjRef, self_obj: ObjRef) -> PmResult<ObjRef> {
    heap.allocate(HeapData::Method(MethodData { func, self_obj }))
}

pub fn method_data(heap: &Heap, method: ObjRef) -> PmResult<MethodData> {
    match heap.get(method)? {
        HeapData::Method(data) => Ok(*data),
        other => Err(type_mismatch(ObjectType::Method, other.object_type())),
    }
}

/// Function and full argument vector (`self` first) for calling a method
pub fn method_call_args(heap: &Heap, method: ObjRef, args: &[ObjRef]) -> PmResult<(ObjRef, Vec<ObjRef>)> {
    let data = method_data(heap, method)?;
    let mut full = Vec::with_capacity(args.len() + 1);
    full.push(data.self_obj);
    full.extend_from_slice(args);
    Ok((data.func, full))
}

/// Instantiate `class`, running its `__init__` if it has one
pub fn class_new_instance(
    heap: &mut Heap,
    interp: &mut dyn Interpreter,
    class: ObjRef,
) -> PmResult<ObjRef> {
    let template = match heap.get(class)? {
        HeapData::Class(data) => *data,
        other => return Err(type_mismatch(ObjectType::Class, other.object_type())),
    };

    let mut heap = ConstructionGuard::acquire(heap);
    trace!(class = class.index(), "instantiating");

    let result = build_instance(&mut heap, interp, template);
    match &result {
        Ok(instance) => trace!(instance = instance.index(), "instance ready"),
        Err(err) => debug!(class = class.index(), error = %err, "instantiation failed"),
    }
    result
}

fn build_instance(
    heap: &mut ConstructionGuard<'_>,
    interp: &mut dyn Interpreter,
    template: ClassData,
) -> PmResult<ObjRef> {
    let instance = heap.allocate(HeapData::Instance(template))?;
    heap.protect(instance);

    let attrs = dict_new(heap)?;
    if let HeapData::Instance(data) = heap.get_mut(instance)? {
        data.attrs = attrs;
    }

    for index in 0..dict_len(heap, template.attrs)? {
        let (key, value) = dict_entry(heap, template.attrs, index)?;
        let member = if heap.type_of(value)? == ObjectType::Function {
            method_new(heap, value, instance)?
        } else {
            value
        };
        dict_set_item(heap, attrs, key, member)?;
    }

    if let Some(init) = dict_lookup_str(heap, attrs, "__init__")? {
        if heap.type_of(init)? != ObjectType::Method {
            return Err(Error::type_error("__init__ is not a method"));
        }
        interp.call_function(heap, init, &[])?;
    }

    Ok(instance)
}

/// Attribute of a Class or Instance, searching bases depth-first
pub fn class_get_attr(heap: &Heap, obj: ObjRef, key: ObjRef) -> PmResult<ObjRef> {
    lookup_attr(heap, obj, key)?.ok_or_else(|| Error::key_error("attribute not found"))
}

fn lookup_attr(heap: &Heap, obj: ObjRef, key: ObjRef) -> PmResult<Option<ObjRef>> {
    let data = class_like(heap, obj)?;
    if let Some(value) = dict_lookup(heap, data.attrs, key)? {
        return Ok(Some(value));
    }
    for &base in tuple_items(heap, data.bases)? {
        if let Some(value) = lookup_attr(heap, base, key)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Set an attribute in the object's own table
pub fn class_set_attr(heap: &mut Heap, obj: ObjRef, key: ObjRef, value: ObjRef) -> PmResult<()> {
    let data = class_like(heap, obj)?;
    dict_set_item(heap, data.attrs, key, value)
}

/// The object's own attribute table
pub fn class_attrs(heap: &Heap, obj: ObjRef) -> PmResult<ObjRef> {
    class_like(heap, obj).map(|data| data.attrs)
}

pub fn class_name(heap: &Heap, obj: ObjRef) -> PmResult<ObjRef> {
    class_like(heap, obj).map(|data| data.name)
}
