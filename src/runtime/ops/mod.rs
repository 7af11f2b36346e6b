//! Instruction semantics with edge-case rules
//!
//! Most MVP instructions are a single wrapping or IEEE-754 operation and
//! live inline in the interpreter loop. The ones with trapping or
//! sign/zero edge cases are implemented here as pure functions so their
//! rules are testable in isolation.

pub mod conversion;
pub mod numeric;
