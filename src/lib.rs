//! Mite Core - heap, collector and object model of a flyweight Python VM
//!
//! This crate provides the memory and object substrate for an interpreter
//! running on microcontrollers with a few kilobytes of RAM:
//! - a fixed-budget chunk heap with a mark-sweep collector
//! - segmented lists, the backing store of every variable-length object
//! - tagged list, dict, slice, class, instance and method variants

pub mod error;
pub mod config;
pub mod logging;
pub mod objects;
pub mod allocator;
pub mod gc;
pub mod builtins;
pub mod interp;
pub mod native;
pub mod plat;

// Re-export core types
pub use allocator::{Heap, HeapStats};
pub use config::{HeapConfig, LogSettings, RuntimeConfig};
pub use error::{Error, ErrorKind, PmResult};
pub use gc::{collect, ConstructionGuard, GcStats};
pub use interp::Interpreter;
pub use native::{NativeFn, NativeTable};
pub use objects::{obj_compare, Comparison, FunctionKind, HeapData, ObjRef, ObjectType};
pub use plat::Platform;

use crate::logging::{info, LogConfig};

/// Runtime initialization: logging from `config`, then a fresh heap
pub fn init(config: &RuntimeConfig) -> PmResult<Heap> {
    logging::init_with_config(LogConfig::from(&config.logging));
    let heap = Heap::new(config.heap.clone())?;
    info!(
        arena_bytes = config.heap.arena_bytes,
        live_objects = heap.live_objects(),
        "runtime initialized"
    );
    Ok(heap)
}
