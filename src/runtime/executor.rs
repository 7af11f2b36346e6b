//! WebAssembly instruction executor
//!
//! The interpreter walks a rewritten instruction stream byte by byte. There
//! is no label stack: control flow was flattened during parsing, so every
//! branch arrives with a `(code_offset, stack_drop)` immediate and resolves
//! in constant time (see [`crate::instr`]). `nop`, `block`, and `loop` are
//! no-ops at this point, and every immediate is fixed-width little-endian.
//!
//! Validation has fixed the type and stack height at every instruction, so
//! the loop takes untagged cell views without checking them. A malformed
//! stream is a parser bug, not a runtime condition, and fails hard.

use super::context::ExecutionContext;
use super::instance::Instance;
use super::memory::Memory;
use super::ops::{conversion, numeric};
use super::stack::OperandStack;
use super::{ExecutionResult, TrapKind, Value};
use crate::instr;
use crate::module::{Code, FuncType};
use std::cell::RefCell;
use std::rc::Rc;

/// Execute a function with a fresh [`ExecutionContext`].
///
/// `args` must match the function's input types in count and type; that is
/// the embedder's contract, checked with debug assertions only.
pub fn execute(instance: &Instance, func_idx: u32, args: &[Value]) -> ExecutionResult {
    let ctx = ExecutionContext::new();
    execute_with_context(instance, func_idx, args, &ctx)
}

/// Execute a function, reusing the caller's [`ExecutionContext`].
///
/// Checks the call depth before building any state: at the limit, the
/// result is an immediate `call stack exhausted` trap. Imported functions
/// dispatch straight to their resolved callable.
pub fn execute_with_context(
    instance: &Instance,
    func_idx: u32,
    args: &[Value],
    ctx: &ExecutionContext,
) -> ExecutionResult {
    let Some(_guard) = ctx.enter() else {
        return ExecutionResult::Trap(TrapKind::CallStackExhausted);
    };

    if (func_idx as usize) < instance.imported_functions().len() {
        let imported = &instance.imported_functions()[func_idx as usize];
        return imported.function.call(instance, args, ctx);
    }

    let mut executor = Executor::new(instance, func_idx, args);
    match executor.run(ctx) {
        Ok(Some(value)) => ExecutionResult::Value(value),
        Ok(None) => ExecutionResult::Void,
        Err(kind) => ExecutionResult::Trap(kind),
    }
}

/// Pop two operands, apply, push the result.
macro_rules! binop {
    ($self:ident, $as:ident, $op:expr) => {{
        let rhs = $self.stack.pop().$as();
        let lhs = $self.stack.pop().$as();
        $self.stack.push(Value::from($op(lhs, rhs)));
    }};
}

/// Like `binop!`, for operations that can trap.
macro_rules! try_binop {
    ($self:ident, $as:ident, $op:expr) => {{
        let rhs = $self.stack.pop().$as();
        let lhs = $self.stack.pop().$as();
        $self.stack.push(Value::from($op(lhs, rhs)?));
    }};
}

/// Pop one operand, apply, push the result.
macro_rules! unop {
    ($self:ident, $as:ident, $op:expr) => {{
        let value = $self.stack.pop().$as();
        $self.stack.push(Value::from($op(value)));
    }};
}

/// Like `unop!`, for operations that can trap.
macro_rules! try_unop {
    ($self:ident, $as:ident, $op:expr) => {{
        let value = $self.stack.pop().$as();
        $self.stack.push(Value::from($op(value)?));
    }};
}

/// Pop an address, read `sizeof` bytes at `address + offset`, extend to the
/// target view, push.
macro_rules! load {
    ($self:ident, $code:ident, $read:ident as $target:ty) => {{
        let offset = $self.imm_u32($code);
        let addr = $self.stack.pop().as_u32();
        let ea = u64::from(addr) + u64::from(offset);
        let value = match &$self.memory {
            Some(memory) => memory.borrow().$read(ea)?,
            None => return Err(TrapKind::MemoryAccessOutOfBounds),
        };
        $self.stack.push(Value::from(value as $target));
    }};
}

/// Pop a value then an address, truncate to the stored width, write
/// little-endian at `address + offset`.
macro_rules! store {
    ($self:ident, $code:ident, $write:ident, $as:ident as $stored:ty) => {{
        let offset = $self.imm_u32($code);
        let value = $self.stack.pop().$as() as $stored;
        let addr = $self.stack.pop().as_u32();
        let ea = u64::from(addr) + u64::from(offset);
        match &$self.memory {
            Some(memory) => memory.borrow_mut().$write(ea, value)?,
            None => return Err(TrapKind::MemoryAccessOutOfBounds),
        }
    }};
}

/// One function activation.
struct Executor<'a> {
    instance: &'a Instance,
    code: &'a Code,
    /// Cached so loads and stores skip the instance indirection.
    memory: Option<Rc<RefCell<Memory>>>,
    func_type: &'a FuncType,
    stack: OperandStack,
    pc: usize,
}

impl<'a> Executor<'a> {
    fn new(instance: &'a Instance, func_idx: u32, args: &[Value]) -> Executor<'a> {
        let module = instance.module();
        let code = module.get_code(func_idx);
        let func_type = module.get_function_type(func_idx);
        debug_assert_eq!(args.len(), func_type.inputs.len(), "argument arity mismatch");

        Executor {
            instance,
            code,
            memory: instance.memory().cloned(),
            func_type,
            stack: OperandStack::new(args, code.local_count, code.max_stack_height),
            pc: 0,
        }
    }

    /// Read a 4-byte immediate and advance.
    fn imm_u32(&mut self, code: &[u8]) -> u32 {
        let value = u32::from_le_bytes([
            code[self.pc],
            code[self.pc + 1],
            code[self.pc + 2],
            code[self.pc + 3],
        ]);
        self.pc += 4;
        value
    }

    /// Read an 8-byte immediate and advance.
    fn imm_u64(&mut self, code: &[u8]) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&code[self.pc..self.pc + 8]);
        self.pc += 8;
        u64::from_le_bytes(bytes)
    }

    /// Read one `(code_offset, stack_drop)` branch immediate and advance.
    fn branch_imm(&mut self, code: &[u8]) -> (u32, u32) {
        let code_offset = self.imm_u32(code);
        let stack_drop = self.imm_u32(code);
        (code_offset, stack_drop)
    }

    /// Take a branch: move `pc` to the target, discard `stack_drop` cells,
    /// preserving the transferred value when `arity` is 1.
    fn branch(&mut self, code_offset: u32, stack_drop: u32, arity: u32) {
        debug_assert!(arity <= 1);
        self.pc = code_offset as usize;
        self.stack.drop_keep(stack_drop as usize, arity == 1);
    }

    /// Call a function whose arguments are the top operand cells.
    ///
    /// The arguments stay on this stack and are passed by slice; on success
    /// they are replaced by the result (if any), on trap they are left in
    /// place and the trap propagates.
    fn invoke(
        &mut self,
        func_idx: u32,
        instance: &Instance,
        ctx: &ExecutionContext,
    ) -> Result<(), TrapKind> {
        let func_type = instance.module().get_function_type(func_idx);
        let num_args = func_type.inputs.len();
        let has_output = !func_type.outputs.is_empty();

        match execute_with_context(instance, func_idx, self.stack.top_slice(num_args), ctx) {
            ExecutionResult::Trap(kind) => Err(kind),
            ExecutionResult::Void => {
                self.stack.shrink_by(num_args);
                debug_assert!(!has_output);
                Ok(())
            }
            ExecutionResult::Value(value) => {
                self.stack.shrink_by(num_args);
                debug_assert!(has_output);
                self.stack.push(value);
                Ok(())
            }
        }
    }

    fn run(&mut self, ctx: &ExecutionContext) -> Result<Option<Value>, TrapKind> {
        let code: &[u8] = &self.code.instructions;

        loop {
            let op = code[self.pc];
            self.pc += 1;

            match op {
                // Control instructions ----------------------------------------
                instr::UNREACHABLE => return Err(TrapKind::Unreachable),

                // Structure was flattened into branch immediates during
                // parsing; these carry no behaviour any more.
                instr::NOP | instr::BLOCK | instr::LOOP => {}

                instr::IF => {
                    let false_target = self.imm_u32(code);
                    if self.stack.pop().as_u32() == 0 {
                        self.pc = false_target as usize;
                    }
                }

                // Reached only by falling out of the true branch: skip over
                // the false branch.
                instr::ELSE => {
                    let end_target = self.imm_u32(code);
                    self.pc = end_target as usize;
                }

                instr::END => {
                    // The structural end of the function returns; inner ends
                    // are no-ops.
                    if self.pc == code.len() {
                        return Ok(if self.func_type.outputs.is_empty() {
                            debug_assert_eq!(self.stack.height(), 0);
                            None
                        } else {
                            debug_assert_eq!(self.stack.height(), 1);
                            Some(self.stack.top())
                        });
                    }
                }

                // `return` was rewritten to a branch targeting the
                // function's structural end.
                instr::BR | instr::RETURN => {
                    let arity = self.imm_u32(code);
                    let (code_offset, stack_drop) = self.branch_imm(code);
                    self.branch(code_offset, stack_drop, arity);
                }

                instr::BR_IF => {
                    let arity = self.imm_u32(code);
                    let (code_offset, stack_drop) = self.branch_imm(code);
                    if self.stack.pop().as_u32() != 0 {
                        self.branch(code_offset, stack_drop, arity);
                    }
                }

                instr::BR_TABLE => {
                    let table_size = self.imm_u32(code);
                    let arity = self.imm_u32(code);
                    let index = self.stack.pop().as_u32();
                    // Entries 0..table_size, with the default label last; an
                    // out-of-range index selects the default.
                    let entry = index.min(table_size) as usize;
                    self.pc += entry * instr::BRANCH_IMMEDIATE_SIZE;
                    let (code_offset, stack_drop) = self.branch_imm(code);
                    self.branch(code_offset, stack_drop, arity);
                }

                instr::CALL => {
                    let func_idx = self.imm_u32(code);
                    let instance = self.instance;
                    self.invoke(func_idx, instance, ctx)?;
                }

                instr::CALL_INDIRECT => {
                    let type_idx = self.imm_u32(code);
                    let elem_idx = self.stack.pop().as_u32();

                    let element = match self.instance.table() {
                        Some(table) => {
                            let table = table.borrow();
                            if elem_idx >= table.size() {
                                return Err(TrapKind::TableIndexOutOfBounds(elem_idx));
                            }
                            match table.get(elem_idx) {
                                Some(element) => element.clone(),
                                None => return Err(TrapKind::UndefinedElement(elem_idx)),
                            }
                        }
                        None => return Err(TrapKind::TableIndexOutOfBounds(elem_idx)),
                    };

                    // The callee may live in another instance; check its
                    // actual signature structurally against ours.
                    let expected = &self.instance.module().typesec[type_idx as usize];
                    let actual = element.instance.module().get_function_type(element.func_idx);
                    if actual != expected {
                        return Err(TrapKind::IndirectCallTypeMismatch {
                            expected: expected.to_string(),
                            actual: actual.to_string(),
                        });
                    }

                    self.invoke(element.func_idx, &element.instance, ctx)?;
                }

                // Parametric instructions -------------------------------------
                instr::DROP => {
                    self.stack.pop();
                }

                instr::SELECT => {
                    let cond = self.stack.pop().as_u32();
                    let val2 = self.stack.pop();
                    let val1 = self.stack.pop();
                    self.stack.push(if cond != 0 { val1 } else { val2 });
                }

                // Variable instructions ---------------------------------------
                instr::LOCAL_GET => {
                    let idx = self.imm_u32(code);
                    let value = self.stack.local(idx);
                    self.stack.push(value);
                }

                instr::LOCAL_SET => {
                    let idx = self.imm_u32(code);
                    let value = self.stack.pop();
                    self.stack.set_local(idx, value);
                }

                instr::LOCAL_TEE => {
                    let idx = self.imm_u32(code);
                    let value = self.stack.top();
                    self.stack.set_local(idx, value);
                }

                instr::GLOBAL_GET => {
                    let idx = self.imm_u32(code);
                    self.stack.push(self.instance.global(idx));
                }

                instr::GLOBAL_SET => {
                    let idx = self.imm_u32(code);
                    let value = self.stack.pop();
                    self.instance.set_global(idx, value);
                }

                // Memory instructions -----------------------------------------
                instr::I32_LOAD => load!(self, code, read_u32 as u32),
                instr::I64_LOAD => load!(self, code, read_u64 as u64),
                instr::F32_LOAD => load!(self, code, read_u32 as u32),
                instr::F64_LOAD => load!(self, code, read_u64 as u64),
                instr::I32_LOAD8_S => load!(self, code, read_i8 as i32),
                instr::I32_LOAD8_U => load!(self, code, read_u8 as u32),
                instr::I32_LOAD16_S => load!(self, code, read_i16 as i32),
                instr::I32_LOAD16_U => load!(self, code, read_u16 as u32),
                instr::I64_LOAD8_S => load!(self, code, read_i8 as i64),
                instr::I64_LOAD8_U => load!(self, code, read_u8 as u64),
                instr::I64_LOAD16_S => load!(self, code, read_i16 as i64),
                instr::I64_LOAD16_U => load!(self, code, read_u16 as u64),
                instr::I64_LOAD32_S => load!(self, code, read_i32 as i64),
                instr::I64_LOAD32_U => load!(self, code, read_u32 as u64),

                instr::I32_STORE => store!(self, code, write_u32, as_u32 as u32),
                instr::I64_STORE => store!(self, code, write_u64, as_u64 as u64),
                instr::F32_STORE => store!(self, code, write_u32, as_u32 as u32),
                instr::F64_STORE => store!(self, code, write_u64, as_u64 as u64),
                instr::I32_STORE8 => store!(self, code, write_u8, as_u32 as u8),
                instr::I32_STORE16 => store!(self, code, write_u16, as_u32 as u16),
                instr::I64_STORE8 => store!(self, code, write_u8, as_u64 as u8),
                instr::I64_STORE16 => store!(self, code, write_u16, as_u64 as u16),
                instr::I64_STORE32 => store!(self, code, write_u32, as_u64 as u32),

                instr::MEMORY_SIZE => {
                    let pages = match &self.memory {
                        Some(memory) => memory.borrow().size(),
                        None => return Err(TrapKind::MemoryAccessOutOfBounds),
                    };
                    self.stack.push(Value::from(pages));
                }

                instr::MEMORY_GROW => {
                    let delta = self.stack.pop().as_u32();
                    let result = match &self.memory {
                        Some(memory) => memory.borrow_mut().grow(delta),
                        None => return Err(TrapKind::MemoryAccessOutOfBounds),
                    };
                    self.stack.push(Value::from(result));
                }

                // Numeric constants -------------------------------------------
                instr::I32_CONST => {
                    let value = self.imm_u32(code);
                    self.stack.push(Value::from(value));
                }
                instr::I64_CONST => {
                    let value = self.imm_u64(code);
                    self.stack.push(Value::from(value));
                }
                instr::F32_CONST => {
                    let bits = self.imm_u32(code);
                    self.stack.push(Value::from(bits));
                }
                instr::F64_CONST => {
                    let bits = self.imm_u64(code);
                    self.stack.push(Value::from(bits));
                }

                // i32 comparisons ---------------------------------------------
                instr::I32_EQZ => unop!(self, as_u32, |x: u32| x == 0),
                instr::I32_EQ => binop!(self, as_u32, |a: u32, b: u32| a == b),
                instr::I32_NE => binop!(self, as_u32, |a: u32, b: u32| a != b),
                instr::I32_LT_S => binop!(self, as_i32, |a: i32, b: i32| a < b),
                instr::I32_LT_U => binop!(self, as_u32, |a: u32, b: u32| a < b),
                instr::I32_GT_S => binop!(self, as_i32, |a: i32, b: i32| a > b),
                instr::I32_GT_U => binop!(self, as_u32, |a: u32, b: u32| a > b),
                instr::I32_LE_S => binop!(self, as_i32, |a: i32, b: i32| a <= b),
                instr::I32_LE_U => binop!(self, as_u32, |a: u32, b: u32| a <= b),
                instr::I32_GE_S => binop!(self, as_i32, |a: i32, b: i32| a >= b),
                instr::I32_GE_U => binop!(self, as_u32, |a: u32, b: u32| a >= b),

                // i64 comparisons ---------------------------------------------
                instr::I64_EQZ => unop!(self, as_u64, |x: u64| x == 0),
                instr::I64_EQ => binop!(self, as_u64, |a: u64, b: u64| a == b),
                instr::I64_NE => binop!(self, as_u64, |a: u64, b: u64| a != b),
                instr::I64_LT_S => binop!(self, as_i64, |a: i64, b: i64| a < b),
                instr::I64_LT_U => binop!(self, as_u64, |a: u64, b: u64| a < b),
                instr::I64_GT_S => binop!(self, as_i64, |a: i64, b: i64| a > b),
                instr::I64_GT_U => binop!(self, as_u64, |a: u64, b: u64| a > b),
                instr::I64_LE_S => binop!(self, as_i64, |a: i64, b: i64| a <= b),
                instr::I64_LE_U => binop!(self, as_u64, |a: u64, b: u64| a <= b),
                instr::I64_GE_S => binop!(self, as_i64, |a: i64, b: i64| a >= b),
                instr::I64_GE_U => binop!(self, as_u64, |a: u64, b: u64| a >= b),

                // f32 comparisons ---------------------------------------------
                instr::F32_EQ => binop!(self, as_f32, |a: f32, b: f32| a == b),
                instr::F32_NE => binop!(self, as_f32, |a: f32, b: f32| a != b),
                instr::F32_LT => binop!(self, as_f32, |a: f32, b: f32| a < b),
                instr::F32_GT => binop!(self, as_f32, |a: f32, b: f32| a > b),
                instr::F32_LE => binop!(self, as_f32, |a: f32, b: f32| a <= b),
                instr::F32_GE => binop!(self, as_f32, |a: f32, b: f32| a >= b),

                // f64 comparisons ---------------------------------------------
                instr::F64_EQ => binop!(self, as_f64, |a: f64, b: f64| a == b),
                instr::F64_NE => binop!(self, as_f64, |a: f64, b: f64| a != b),
                instr::F64_LT => binop!(self, as_f64, |a: f64, b: f64| a < b),
                instr::F64_GT => binop!(self, as_f64, |a: f64, b: f64| a > b),
                instr::F64_LE => binop!(self, as_f64, |a: f64, b: f64| a <= b),
                instr::F64_GE => binop!(self, as_f64, |a: f64, b: f64| a >= b),

                // i32 arithmetic ----------------------------------------------
                instr::I32_CLZ => unop!(self, as_u32, |x: u32| x.leading_zeros()),
                instr::I32_CTZ => unop!(self, as_u32, |x: u32| x.trailing_zeros()),
                instr::I32_POPCNT => unop!(self, as_u32, |x: u32| x.count_ones()),
                instr::I32_ADD => binop!(self, as_i32, |a: i32, b: i32| a.wrapping_add(b)),
                instr::I32_SUB => binop!(self, as_i32, |a: i32, b: i32| a.wrapping_sub(b)),
                instr::I32_MUL => binop!(self, as_i32, |a: i32, b: i32| a.wrapping_mul(b)),
                instr::I32_DIV_S => try_binop!(self, as_i32, numeric::i32_div_s),
                instr::I32_DIV_U => try_binop!(self, as_u32, numeric::i32_div_u),
                instr::I32_REM_S => try_binop!(self, as_i32, numeric::i32_rem_s),
                instr::I32_REM_U => try_binop!(self, as_u32, numeric::i32_rem_u),
                instr::I32_AND => binop!(self, as_u32, |a: u32, b: u32| a & b),
                instr::I32_OR => binop!(self, as_u32, |a: u32, b: u32| a | b),
                instr::I32_XOR => binop!(self, as_u32, |a: u32, b: u32| a ^ b),
                // Shift and rotate counts are taken modulo 32
                instr::I32_SHL => binop!(self, as_u32, |a: u32, b: u32| a.wrapping_shl(b)),
                instr::I32_SHR_S => binop!(self, as_i32, |a: i32, b: i32| a.wrapping_shr(b as u32)),
                instr::I32_SHR_U => binop!(self, as_u32, |a: u32, b: u32| a.wrapping_shr(b)),
                instr::I32_ROTL => binop!(self, as_u32, |a: u32, b: u32| a.rotate_left(b & 31)),
                instr::I32_ROTR => binop!(self, as_u32, |a: u32, b: u32| a.rotate_right(b & 31)),

                // i64 arithmetic ----------------------------------------------
                instr::I64_CLZ => unop!(self, as_u64, |x: u64| u64::from(x.leading_zeros())),
                instr::I64_CTZ => unop!(self, as_u64, |x: u64| u64::from(x.trailing_zeros())),
                instr::I64_POPCNT => unop!(self, as_u64, |x: u64| u64::from(x.count_ones())),
                instr::I64_ADD => binop!(self, as_i64, |a: i64, b: i64| a.wrapping_add(b)),
                instr::I64_SUB => binop!(self, as_i64, |a: i64, b: i64| a.wrapping_sub(b)),
                instr::I64_MUL => binop!(self, as_i64, |a: i64, b: i64| a.wrapping_mul(b)),
                instr::I64_DIV_S => try_binop!(self, as_i64, numeric::i64_div_s),
                instr::I64_DIV_U => try_binop!(self, as_u64, numeric::i64_div_u),
                instr::I64_REM_S => try_binop!(self, as_i64, numeric::i64_rem_s),
                instr::I64_REM_U => try_binop!(self, as_u64, numeric::i64_rem_u),
                instr::I64_AND => binop!(self, as_u64, |a: u64, b: u64| a & b),
                instr::I64_OR => binop!(self, as_u64, |a: u64, b: u64| a | b),
                instr::I64_XOR => binop!(self, as_u64, |a: u64, b: u64| a ^ b),
                // Shift and rotate counts are taken modulo 64
                instr::I64_SHL => binop!(self, as_u64, |a: u64, b: u64| a.wrapping_shl(b as u32)),
                instr::I64_SHR_S => {
                    binop!(self, as_i64, |a: i64, b: i64| a.wrapping_shr(b as u32))
                }
                instr::I64_SHR_U => {
                    binop!(self, as_u64, |a: u64, b: u64| a.wrapping_shr(b as u32))
                }
                instr::I64_ROTL => {
                    binop!(self, as_u64, |a: u64, b: u64| a.rotate_left((b & 63) as u32))
                }
                instr::I64_ROTR => {
                    binop!(self, as_u64, |a: u64, b: u64| a.rotate_right((b & 63) as u32))
                }

                // f32 arithmetic ----------------------------------------------
                instr::F32_ABS => unop!(self, as_f32, |x: f32| x.abs()),
                instr::F32_NEG => unop!(self, as_f32, |x: f32| -x),
                instr::F32_CEIL => unop!(self, as_f32, |x: f32| x.ceil()),
                instr::F32_FLOOR => unop!(self, as_f32, |x: f32| x.floor()),
                instr::F32_TRUNC => unop!(self, as_f32, |x: f32| x.trunc()),
                instr::F32_NEAREST => unop!(self, as_f32, |x: f32| x.round_ties_even()),
                instr::F32_SQRT => unop!(self, as_f32, |x: f32| x.sqrt()),
                instr::F32_ADD => binop!(self, as_f32, |a: f32, b: f32| a + b),
                instr::F32_SUB => binop!(self, as_f32, |a: f32, b: f32| a - b),
                instr::F32_MUL => binop!(self, as_f32, |a: f32, b: f32| a * b),
                instr::F32_DIV => binop!(self, as_f32, |a: f32, b: f32| a / b),
                instr::F32_MIN => binop!(self, as_f32, numeric::f32_min),
                instr::F32_MAX => binop!(self, as_f32, numeric::f32_max),
                instr::F32_COPYSIGN => binop!(self, as_f32, |a: f32, b: f32| a.copysign(b)),

                // f64 arithmetic ----------------------------------------------
                instr::F64_ABS => unop!(self, as_f64, |x: f64| x.abs()),
                instr::F64_NEG => unop!(self, as_f64, |x: f64| -x),
                instr::F64_CEIL => unop!(self, as_f64, |x: f64| x.ceil()),
                instr::F64_FLOOR => unop!(self, as_f64, |x: f64| x.floor()),
                instr::F64_TRUNC => unop!(self, as_f64, |x: f64| x.trunc()),
                instr::F64_NEAREST => unop!(self, as_f64, |x: f64| x.round_ties_even()),
                instr::F64_SQRT => unop!(self, as_f64, |x: f64| x.sqrt()),
                instr::F64_ADD => binop!(self, as_f64, |a: f64, b: f64| a + b),
                instr::F64_SUB => binop!(self, as_f64, |a: f64, b: f64| a - b),
                instr::F64_MUL => binop!(self, as_f64, |a: f64, b: f64| a * b),
                instr::F64_DIV => binop!(self, as_f64, |a: f64, b: f64| a / b),
                instr::F64_MIN => binop!(self, as_f64, numeric::f64_min),
                instr::F64_MAX => binop!(self, as_f64, numeric::f64_max),
                instr::F64_COPYSIGN => binop!(self, as_f64, |a: f64, b: f64| a.copysign(b)),

                // Conversions -------------------------------------------------
                instr::I32_WRAP_I64 => unop!(self, as_u64, |x: u64| x as u32),
                instr::I32_TRUNC_F32_S => try_unop!(self, as_f32, conversion::i32_trunc_f32_s),
                instr::I32_TRUNC_F32_U => try_unop!(self, as_f32, conversion::i32_trunc_f32_u),
                instr::I32_TRUNC_F64_S => try_unop!(self, as_f64, conversion::i32_trunc_f64_s),
                instr::I32_TRUNC_F64_U => try_unop!(self, as_f64, conversion::i32_trunc_f64_u),
                instr::I64_EXTEND_I32_S => unop!(self, as_i32, i64::from),
                instr::I64_EXTEND_I32_U => unop!(self, as_u32, u64::from),
                instr::I64_TRUNC_F32_S => try_unop!(self, as_f32, conversion::i64_trunc_f32_s),
                instr::I64_TRUNC_F32_U => try_unop!(self, as_f32, conversion::i64_trunc_f32_u),
                instr::I64_TRUNC_F64_S => try_unop!(self, as_f64, conversion::i64_trunc_f64_s),
                instr::I64_TRUNC_F64_U => try_unop!(self, as_f64, conversion::i64_trunc_f64_u),
                instr::F32_CONVERT_I32_S => unop!(self, as_i32, |x: i32| x as f32),
                instr::F32_CONVERT_I32_U => unop!(self, as_u32, |x: u32| x as f32),
                instr::F32_CONVERT_I64_S => unop!(self, as_i64, |x: i64| x as f32),
                instr::F32_CONVERT_I64_U => unop!(self, as_u64, |x: u64| x as f32),
                instr::F32_DEMOTE_F64 => unop!(self, as_f64, |x: f64| x as f32),
                instr::F64_CONVERT_I32_S => unop!(self, as_i32, |x: i32| f64::from(x)),
                instr::F64_CONVERT_I32_U => unop!(self, as_u32, |x: u32| f64::from(x)),
                instr::F64_CONVERT_I64_S => unop!(self, as_i64, |x: i64| x as f64),
                instr::F64_CONVERT_I64_U => unop!(self, as_u64, |x: u64| x as f64),
                instr::F64_PROMOTE_F32 => unop!(self, as_f32, f64::from),

                // Reinterpret casts change only the view, and views live in
                // the instruction, not the cell.
                instr::I32_REINTERPRET_F32
                | instr::I64_REINTERPRET_F64
                | instr::F32_REINTERPRET_I32
                | instr::F64_REINTERPRET_I64 => {}

                _ => unreachable!(
                    "invalid opcode 0x{:02x} ({}) in rewritten code",
                    op,
                    instr::name(op)
                ),
            }
        }
    }
}
