//! WebAssembly runtime implementation
//!
//! This module provides the execution engine: the untagged value cell, the
//! operand stack, linear memory, tables, module instances, and the
//! instruction interpreter.

pub mod context;
pub mod executor;
pub mod imports;
pub mod instance;
pub mod memory;
pub mod ops;
pub mod stack;
pub mod table;
pub mod value;

pub use context::{ExecutionContext, CALL_STACK_LIMIT};
pub use executor::{execute, execute_with_context};
pub use imports::{ExecuteFunction, HostFunction, ImportedFunction, ImportedGlobal};
pub use instance::Instance;
pub use memory::Memory;
pub use table::{Table, TableElement};
pub use value::Value;

use fhex::ToHex;

/// Why a computation trapped.
///
/// Traps are values, not panics: they terminate the current WebAssembly
/// computation, unwind every WebAssembly frame, and reach the host as
/// [`ExecutionResult::Trap`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrapKind {
    #[error("unreachable executed")]
    Unreachable,
    #[error("integer divide by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("invalid conversion to integer: {}", .0.to_hex())]
    InvalidConversion(f64),
    #[error("out of bounds memory access")]
    MemoryAccessOutOfBounds,
    #[error("out of bounds table access: {0}")]
    TableIndexOutOfBounds(u32),
    #[error("uninitialized element {0}")]
    UndefinedElement(u32),
    #[error("indirect call type mismatch: expected {expected}, got {actual}")]
    IndirectCallTypeMismatch { expected: String, actual: String },
    #[error("call stack exhausted")]
    CallStackExhausted,
}

/// Outcome of executing a function.
#[derive(Debug)]
pub enum ExecutionResult {
    /// The computation trapped.
    Trap(TrapKind),
    /// Success with no result value.
    Void,
    /// Success with one result value.
    Value(Value),
}

impl ExecutionResult {
    pub fn trapped(&self) -> bool {
        matches!(self, ExecutionResult::Trap(_))
    }

    /// The result value, if the execution produced one.
    pub fn value(&self) -> Option<Value> {
        match self {
            ExecutionResult::Value(value) => Some(*value),
            _ => None,
        }
    }

    /// The trap cause, if the execution trapped.
    pub fn trap(&self) -> Option<&TrapKind> {
        match self {
            ExecutionResult::Trap(kind) => Some(kind),
            _ => None,
        }
    }
}
