//! A WebAssembly 1.0 interpreter core written in Rust.
//!
//! rewasm executes validated WebAssembly functions against instantiated
//! modules. It does not parse `.wasm` binaries itself; instead it consumes a
//! rewritten instruction stream in which the parser has flattened structured
//! control flow: every `if`, `else`, `br`, `br_if`, `return`, and `br_table`
//! carries pre-computed code offsets and stack-drop counts, so dispatch is
//! O(1) per instruction with no label stack at run time.
//!
//! # Modules
//!
//! - [`decode`] -- Bounded byte cursor and LEB128 primitives that feed the
//!   (external) binary parser.
//! - [`module`] -- Read-only decoded module shapes the parser must produce.
//! - [`instr`] -- Opcode constants for the rewritten instruction stream.
//! - [`runtime`] -- Values, operand stack, linear memory, tables, instances,
//!   and the interpreter itself.
//!
//! # Example
//!
//! Assemble a rewritten body for `(func (result i32) (i32.const 1)
//! (i32.const 2) (i32.add))` by hand, instantiate it, and execute it:
//!
//! ```
//! use rewasm::instr;
//! use rewasm::module::{Code, FuncType, Module, ValType};
//! use rewasm::runtime::{execute, Instance, Value};
//! use std::rc::Rc;
//!
//! let mut body = vec![instr::I32_CONST];
//! body.extend_from_slice(&1i32.to_le_bytes());
//! body.push(instr::I32_CONST);
//! body.extend_from_slice(&2i32.to_le_bytes());
//! body.push(instr::I32_ADD);
//! body.push(instr::END);
//!
//! let module = Rc::new(Module {
//!     typesec: vec![FuncType { inputs: vec![], outputs: vec![ValType::I32] }],
//!     funcsec: vec![0],
//!     codesec: vec![Code { instructions: body, local_count: 0, max_stack_height: 2 }],
//!     ..Module::default()
//! });
//!
//! let instance = Instance::new(module);
//! let result = execute(&instance, 0, &[]);
//! assert_eq!(result.value().map(Value::as_i32), Some(3));
//! ```
//!
//! # Specification
//!
//! Targets the [WebAssembly 1.0 specification](https://webassembly.github.io/spec/core/)
//! (MVP instruction set). Validation is assumed to have run: the interpreter
//! relies on its guarantees and performs no per-instruction type checking.

pub mod decode;
pub mod instr;
pub mod module;
pub mod runtime;
