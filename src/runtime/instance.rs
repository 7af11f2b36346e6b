//! WebAssembly module instance
//!
//! The runtime counterpart of a [`Module`]: linear memory, table, global
//! values, and resolved imports. An instance owns the resources it defines
//! and shares imported ones through `Rc`, so tearing an instance down never
//! frees a resource another instance still uses.
//!
//! Interior mutability is deliberately fine-grained (`RefCell` around the
//! memory, table, and globals separately, never around the instance) so a
//! host function can re-enter the interpreter on the same instance without
//! holding a conflicting borrow.

use super::memory::Memory;
use super::table::Table;
use super::{ImportedFunction, ImportedGlobal, Value};
use crate::module::{Limits, Module};
use std::cell::RefCell;
use std::rc::Rc;

/// A WebAssembly module instance.
pub struct Instance {
    module: Rc<Module>,
    /// Owned or imported linear memory; `None` when the module has none.
    memory: Option<Rc<RefCell<Memory>>>,
    memory_limits: Option<Limits>,
    /// Owned or imported function table; `None` when the module has none.
    table: Option<Rc<RefCell<Table>>>,
    /// Values of module-defined globals.
    globals: RefCell<Vec<Value>>,
    imported_functions: Vec<ImportedFunction>,
    imported_globals: Vec<ImportedGlobal>,
}

impl Instance {
    /// Instantiate a module with no imports: memory and table are allocated
    /// from the module's limits and module-defined globals start at zero.
    ///
    /// # Panics
    /// Asserts that the module declares no imports.
    pub fn new(module: Rc<Module>) -> Instance {
        Instance::with_imports(module, Vec::new(), Vec::new())
    }

    /// Instantiate a module with resolved imports. Memory and table are
    /// allocated from the module's own limits; module-defined globals start
    /// at zero.
    pub fn with_imports(
        module: Rc<Module>,
        imported_functions: Vec<ImportedFunction>,
        imported_globals: Vec<ImportedGlobal>,
    ) -> Instance {
        let memory = module
            .memsec
            .map(|limits| Rc::new(RefCell::new(Memory::new(limits.min, limits.max))));
        let table = module
            .tablesec
            .map(|limits| Rc::new(RefCell::new(Table::new(limits))));
        let globals = vec![Value::default(); module.globalsec.len()];
        Instance::with_parts(
            module,
            memory,
            table,
            globals,
            imported_functions,
            imported_globals,
        )
    }

    /// Full-control instantiation: the caller supplies the (possibly
    /// shared) memory and table and the initial global values.
    ///
    /// # Panics
    /// Asserts that the resolved imports and global values line up with the
    /// module's declarations. Supplying consistent parts is the
    /// instantiator's responsibility.
    pub fn with_parts(
        module: Rc<Module>,
        memory: Option<Rc<RefCell<Memory>>>,
        table: Option<Rc<RefCell<Table>>>,
        globals: Vec<Value>,
        imported_functions: Vec<ImportedFunction>,
        imported_globals: Vec<ImportedGlobal>,
    ) -> Instance {
        assert_eq!(
            imported_functions.len(),
            module.imported_function_types.len(),
            "resolved function imports do not match the module"
        );
        assert_eq!(
            globals.len(),
            module.globalsec.len(),
            "global values do not match the module"
        );
        let memory_limits = module.memsec;
        Instance {
            module,
            memory,
            memory_limits,
            table,
            globals: RefCell::new(globals),
            imported_functions,
            imported_globals,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn memory(&self) -> Option<&Rc<RefCell<Memory>>> {
        self.memory.as_ref()
    }

    pub fn memory_limits(&self) -> Option<Limits> {
        self.memory_limits
    }

    pub fn table(&self) -> Option<&Rc<RefCell<Table>>> {
        self.table.as_ref()
    }

    pub fn imported_functions(&self) -> &[ImportedFunction] {
        &self.imported_functions
    }

    pub fn imported_globals(&self) -> &[ImportedGlobal] {
        &self.imported_globals
    }

    /// Read a global. Indices below the imported-global count refer to the
    /// shared import cells, the rest to module-defined globals.
    pub fn global(&self, idx: u32) -> Value {
        let imported = self.imported_globals.len();
        if (idx as usize) < imported {
            self.imported_globals[idx as usize].value.get()
        } else {
            self.globals.borrow()[idx as usize - imported]
        }
    }

    /// Write a global. Mutability was checked by validation.
    pub fn set_global(&self, idx: u32, value: Value) {
        let imported = self.imported_globals.len();
        if (idx as usize) < imported {
            debug_assert!(self.imported_globals[idx as usize].typ.mutable);
            self.imported_globals[idx as usize].value.set(value);
        } else {
            debug_assert!(self.module.globalsec[idx as usize - imported].mutable);
            self.globals.borrow_mut()[idx as usize - imported] = value;
        }
    }
}
