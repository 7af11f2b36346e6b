//! Common test utilities shared between integration tests
//!
//! The interpreter consumes rewritten code, so tests assemble instruction
//! streams directly: opcodes plus fixed-width immediates, with branch
//! targets resolved through patch handles the way the parser resolves them
//! during the rewrite.

use rewasm::instr;
use rewasm::module::{Code, FuncType, Module, ValType};
use rewasm::runtime::Instance;
use std::rc::Rc;

/// Handle to a forward branch target that is not known yet.
#[derive(Debug, Clone, Copy)]
#[must_use = "an unpatched target leaves a zero offset in the stream"]
pub struct Patch(usize);

/// Assembles one rewritten function body.
pub struct CodeBuilder {
    bytes: Vec<u8>,
    local_count: u32,
    max_stack_height: u32,
    return_patches: Vec<usize>,
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeBuilder {
    pub fn new() -> CodeBuilder {
        CodeBuilder {
            bytes: Vec::new(),
            local_count: 0,
            // Generous default; tests that care set it explicitly
            max_stack_height: 16,
            return_patches: Vec::new(),
        }
    }

    pub fn locals(&mut self, count: u32) -> &mut Self {
        self.local_count = count;
        self
    }

    /// Current byte offset, used as a backward branch target.
    pub fn here(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn op(&mut self, opcode: u8) -> &mut Self {
        self.bytes.push(opcode);
        self
    }

    fn imm_u32(&mut self, value: u32) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn imm_u64(&mut self, value: u64) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn placeholder(&mut self) -> Patch {
        let at = self.bytes.len();
        self.imm_u32(0);
        Patch(at)
    }

    /// Resolve a forward target to the current offset.
    pub fn patch_here(&mut self, patch: Patch) -> &mut Self {
        let target = self.here();
        self.bytes[patch.0..patch.0 + 4].copy_from_slice(&target.to_le_bytes());
        self
    }

    // Constants ---------------------------------------------------------------

    pub fn i32_const(&mut self, value: i32) -> &mut Self {
        self.op(instr::I32_CONST).imm_u32(value as u32)
    }

    pub fn i64_const(&mut self, value: i64) -> &mut Self {
        self.op(instr::I64_CONST).imm_u64(value as u64)
    }

    pub fn f32_const(&mut self, value: f32) -> &mut Self {
        self.op(instr::F32_CONST).imm_u32(value.to_bits())
    }

    pub fn f64_const(&mut self, value: f64) -> &mut Self {
        self.op(instr::F64_CONST).imm_u64(value.to_bits())
    }

    // Variables and calls -----------------------------------------------------

    pub fn local_get(&mut self, idx: u32) -> &mut Self {
        self.op(instr::LOCAL_GET).imm_u32(idx)
    }

    pub fn local_set(&mut self, idx: u32) -> &mut Self {
        self.op(instr::LOCAL_SET).imm_u32(idx)
    }

    pub fn local_tee(&mut self, idx: u32) -> &mut Self {
        self.op(instr::LOCAL_TEE).imm_u32(idx)
    }

    pub fn global_get(&mut self, idx: u32) -> &mut Self {
        self.op(instr::GLOBAL_GET).imm_u32(idx)
    }

    pub fn global_set(&mut self, idx: u32) -> &mut Self {
        self.op(instr::GLOBAL_SET).imm_u32(idx)
    }

    pub fn call(&mut self, func_idx: u32) -> &mut Self {
        self.op(instr::CALL).imm_u32(func_idx)
    }

    pub fn call_indirect(&mut self, type_idx: u32) -> &mut Self {
        self.op(instr::CALL_INDIRECT).imm_u32(type_idx)
    }

    // Memory ------------------------------------------------------------------

    /// A load or store opcode with its static offset.
    pub fn mem(&mut self, opcode: u8, offset: u32) -> &mut Self {
        self.op(opcode).imm_u32(offset)
    }

    // Control flow ------------------------------------------------------------

    /// `if` with its false-branch target unresolved.
    pub fn if_forward(&mut self) -> Patch {
        self.op(instr::IF);
        self.placeholder()
    }

    /// `else` with its end target unresolved.
    pub fn else_forward(&mut self) -> Patch {
        self.op(instr::ELSE);
        self.placeholder()
    }

    /// `br` to a known (backward) target.
    pub fn br(&mut self, arity: u32, target: u32, stack_drop: u32) -> &mut Self {
        self.op(instr::BR).imm_u32(arity).imm_u32(target).imm_u32(stack_drop)
    }

    /// `br` with a forward target.
    pub fn br_forward(&mut self, arity: u32, stack_drop: u32) -> Patch {
        self.op(instr::BR).imm_u32(arity);
        let patch = self.placeholder();
        self.imm_u32(stack_drop);
        patch
    }

    /// `br_if` to a known (backward) target.
    pub fn br_if(&mut self, arity: u32, target: u32, stack_drop: u32) -> &mut Self {
        self.op(instr::BR_IF).imm_u32(arity).imm_u32(target).imm_u32(stack_drop)
    }

    /// `br_if` with a forward target.
    pub fn br_if_forward(&mut self, arity: u32, stack_drop: u32) -> Patch {
        self.op(instr::BR_IF).imm_u32(arity);
        let patch = self.placeholder();
        self.imm_u32(stack_drop);
        patch
    }

    /// `br_table` with every target unresolved. `drops[i]` is the stack drop
    /// of entry i; the last entry is the default label.
    pub fn br_table_forward(&mut self, arity: u32, drops: &[u32]) -> Vec<Patch> {
        assert!(!drops.is_empty(), "br_table needs at least the default label");
        let table_size = (drops.len() - 1) as u32;
        self.op(instr::BR_TABLE).imm_u32(table_size).imm_u32(arity);
        drops
            .iter()
            .map(|&drop| {
                let patch = self.placeholder();
                self.imm_u32(drop);
                patch
            })
            .collect()
    }

    /// `return`: a branch to the function's structural end, patched by
    /// [`CodeBuilder::build`].
    pub fn ret(&mut self, arity: u32, stack_drop: u32) -> &mut Self {
        self.op(instr::RETURN).imm_u32(arity);
        let Patch(at) = self.placeholder();
        self.return_patches.push(at);
        self.imm_u32(stack_drop)
    }

    /// Append the structural `end`, resolve `return` targets, and produce
    /// the code body.
    pub fn build(&mut self) -> Code {
        let end_at = self.here();
        for &at in &self.return_patches {
            self.bytes[at..at + 4].copy_from_slice(&end_at.to_le_bytes());
        }
        self.op(instr::END);
        Code {
            instructions: std::mem::take(&mut self.bytes),
            local_count: self.local_count,
            max_stack_height: self.max_stack_height,
        }
    }
}

// Module fixtures -------------------------------------------------------------

pub fn ftype(inputs: &[ValType], outputs: &[ValType]) -> FuncType {
    FuncType {
        inputs: inputs.to_vec(),
        outputs: outputs.to_vec(),
    }
}

/// A module whose i-th function has signature `typesec[i]` and body
/// `codesec[i]`; everything else defaults.
pub fn module_from(funcs: Vec<(FuncType, Code)>) -> Module {
    let mut module = Module::default();
    for (idx, (func_type, code)) in funcs.into_iter().enumerate() {
        module.typesec.push(func_type);
        module.funcsec.push(idx as u32);
        module.codesec.push(code);
    }
    module
}

pub fn instantiate(module: Module) -> Rc<Instance> {
    Rc::new(Instance::new(Rc::new(module)))
}
