//! Resolved imports of a module instance
//!
//! Instantiation (performed outside this crate) resolves every import to a
//! concrete callable or cell; the runtime only ever sees the resolved form.

use super::{execute_with_context, ExecutionContext, ExecutionResult, Instance, Value};
use crate::module::{GlobalType, ValType};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// An embedder-provided native function.
///
/// `args` is a slice of contiguous cells matching the function's input
/// types; the result must conform to its output types (0 or 1 values). Host
/// state is carried by closure capture. A host function may re-enter
/// [`execute_with_context`] with the same context; the call depth is shared.
pub type HostFunction = Box<dyn Fn(&Instance, &[Value], &ExecutionContext) -> ExecutionResult>;

/// A callable bound at instantiation time: either a function of some
/// (possibly different) module instance, or a host function.
pub enum ExecuteFunction {
    Wasm { instance: Rc<Instance>, func_idx: u32 },
    Host(HostFunction),
}

impl ExecuteFunction {
    /// Invoke the callable. `caller` is the instance whose code performed
    /// the call; a wasm target executes in its own instance instead.
    pub fn call(
        &self,
        caller: &Instance,
        args: &[Value],
        ctx: &ExecutionContext,
    ) -> ExecutionResult {
        match self {
            ExecuteFunction::Wasm { instance, func_idx } => {
                execute_with_context(instance, *func_idx, args, ctx)
            }
            ExecuteFunction::Host(function) => function(caller, args, ctx),
        }
    }
}

impl fmt::Debug for ExecuteFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteFunction::Wasm { func_idx, .. } => {
                write!(f, "ExecuteFunction::Wasm({func_idx})")
            }
            ExecuteFunction::Host(_) => write!(f, "ExecuteFunction::Host"),
        }
    }
}

/// An imported function with its resolved callable and signature.
#[derive(Debug)]
pub struct ImportedFunction {
    pub function: ExecuteFunction,
    pub inputs: Vec<ValType>,
    pub outputs: Vec<ValType>,
}

/// An imported global: a cell shared with the exporting side.
#[derive(Debug, Clone)]
pub struct ImportedGlobal {
    pub value: Rc<Cell<Value>>,
    pub typ: GlobalType,
}

impl ImportedGlobal {
    pub fn new(initial: Value, typ: GlobalType) -> ImportedGlobal {
        ImportedGlobal {
            value: Rc::new(Cell::new(initial)),
            typ,
        }
    }
}
