//! Decoded module shapes.
//!
//! A [`Module`] is the read-only output of the (external) binary parser and
//! validator. By the time it reaches the runtime every function body has been
//! rewritten into the flat instruction stream described in [`crate::instr`],
//! and validation has fixed the operand types and stack heights at every
//! instruction. The runtime trusts these guarantees and never re-checks them.

use std::fmt;

/// A WebAssembly value type (MVP set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValType {
    I32,
    I64,
    F32,
    F64,
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValType::I32 => write!(f, "i32"),
            ValType::I64 => write!(f, "i64"),
            ValType::F32 => write!(f, "f32"),
            ValType::F64 => write!(f, "f64"),
        }
    }
}

/// A function signature.
///
/// `call_indirect` compares signatures structurally, so equality is derived
/// over the input and output lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    pub inputs: Vec<ValType>,
    pub outputs: Vec<ValType>,
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) -> {}",
            self.inputs
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<String>>()
                .join(", "),
            if self.outputs.is_empty() {
                "nil".to_string()
            } else {
                self.outputs
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<String>>()
                    .join(", ")
            }
        )
    }
}

/// The type of a global variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalType {
    pub value_type: ValType,
    pub mutable: bool,
}

/// Size limits for a memory (in pages) or table (in elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min: u32,
    pub max: Option<u32>,
}

/// What kind of entity an export refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalKind {
    Function,
    Table,
    Memory,
    Global,
}

/// A named export.
#[derive(Debug, Clone)]
pub struct Export {
    pub name: String,
    pub kind: ExternalKind,
    pub index: u32,
}

/// A rewritten function body.
///
/// `instructions` is the packed byte stream of opcodes and canonicalised
/// fixed-width little-endian immediates (see [`crate::instr`]). It always
/// ends with an `end` opcode. `max_stack_height` is computed by the validator
/// and sizes the operand region of the stack exactly.
#[derive(Debug, Clone)]
pub struct Code {
    pub instructions: Vec<u8>,
    pub local_count: u32,
    pub max_stack_height: u32,
}

/// A decoded, validated module.
///
/// Function indices share one space: imported functions come first, followed
/// by module-defined functions. `funcsec[i]` is the `typesec` index of the
/// i-th module-defined function and `codesec[i]` its body.
#[derive(Debug, Default)]
pub struct Module {
    pub typesec: Vec<FuncType>,
    pub funcsec: Vec<u32>,
    pub codesec: Vec<Code>,
    pub globalsec: Vec<GlobalType>,
    pub tablesec: Option<Limits>,
    pub memsec: Option<Limits>,
    pub imported_function_types: Vec<FuncType>,
    pub exportsec: Vec<Export>,
}

impl Module {
    /// Number of imported functions (they occupy the low function indices).
    pub fn num_imported_functions(&self) -> usize {
        self.imported_function_types.len()
    }

    /// Get the signature of a function by its index in the function space.
    ///
    /// Panics if `func_idx` is out of range; supplying a valid index is the
    /// caller's responsibility.
    pub fn get_function_type(&self, func_idx: u32) -> &FuncType {
        let imported = self.num_imported_functions();
        if (func_idx as usize) < imported {
            &self.imported_function_types[func_idx as usize]
        } else {
            &self.typesec[self.funcsec[func_idx as usize - imported] as usize]
        }
    }

    /// Get the rewritten body of a module-defined function.
    ///
    /// Panics if `func_idx` refers to an imported function or is out of
    /// range; supplying a valid index is the caller's responsibility.
    pub fn get_code(&self, func_idx: u32) -> &Code {
        &self.codesec[func_idx as usize - self.num_imported_functions()]
    }

    /// Look up an exported function by name.
    pub fn find_exported_function(&self, name: &str) -> Option<u32> {
        self.exportsec
            .iter()
            .find(|export| export.kind == ExternalKind::Function && export.name == name)
            .map(|export| export.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ftype(inputs: Vec<ValType>, outputs: Vec<ValType>) -> FuncType {
        FuncType { inputs, outputs }
    }

    #[test]
    fn test_functype_display() {
        assert_eq!(ftype(vec![], vec![]).to_string(), "() -> nil");
        assert_eq!(
            ftype(vec![ValType::I32, ValType::I64], vec![ValType::F64]).to_string(),
            "(i32, i64) -> f64"
        );
    }

    #[test]
    fn test_functype_structural_equality() {
        let a = ftype(vec![ValType::I32], vec![ValType::I32]);
        let b = ftype(vec![ValType::I32], vec![ValType::I32]);
        let c = ftype(vec![ValType::I64], vec![ValType::I32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_function_index_space() {
        let module = Module {
            typesec: vec![
                ftype(vec![], vec![]),
                ftype(vec![ValType::I32], vec![ValType::I32]),
            ],
            funcsec: vec![1],
            codesec: vec![Code {
                instructions: vec![0x0b],
                local_count: 0,
                max_stack_height: 1,
            }],
            imported_function_types: vec![ftype(vec![ValType::F32], vec![])],
            ..Module::default()
        };

        // Index 0 is the import, index 1 the module-defined function
        assert_eq!(module.get_function_type(0).inputs, vec![ValType::F32]);
        assert_eq!(module.get_function_type(1).inputs, vec![ValType::I32]);
        assert_eq!(module.get_code(1).instructions, vec![0x0b]);
    }

    #[test]
    fn test_find_exported_function() {
        let module = Module {
            exportsec: vec![
                Export {
                    name: "mem".to_string(),
                    kind: ExternalKind::Memory,
                    index: 0,
                },
                Export {
                    name: "run".to_string(),
                    kind: ExternalKind::Function,
                    index: 3,
                },
            ],
            ..Module::default()
        };

        assert_eq!(module.find_exported_function("run"), Some(3));
        assert_eq!(module.find_exported_function("mem"), None);
        assert_eq!(module.find_exported_function("missing"), None);
    }
}
