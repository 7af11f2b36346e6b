//! WebAssembly function table implementation
//!
//! A table is a vector of nullable function references that backs
//! `call_indirect`. Type checking there must be rigorous: calling through a
//! slot whose signature does not match the expected type traps.
//!
//! Elements are written during instantiation (element segments) and may be
//! overwritten by the host embedding. An element keeps an `Rc` to the
//! instance that defines the target function; cross-instance calls go
//! through it. `shared_instance` additionally pins the module that wrote the
//! element, so the target stays alive even if the writing instantiation
//! trapped and was torn down.

use super::Instance;
use crate::module::Limits;
use std::rc::Rc;

/// One initialised table slot.
#[derive(Clone)]
pub struct TableElement {
    /// The instance defining the target function.
    pub instance: Rc<Instance>,
    /// Function index within that instance's module.
    pub func_idx: u32,
    /// Back-reference keeping the writing module alive, if it differs from
    /// the target.
    pub shared_instance: Option<Rc<Instance>>,
}

/// A table of function references.
pub struct Table {
    elements: Vec<Option<TableElement>>,
    limits: Limits,
}

impl Table {
    /// Create a table with `limits.min` null slots.
    pub fn new(limits: Limits) -> Table {
        Table {
            elements: vec![None; limits.min as usize],
            limits,
        }
    }

    /// Current number of slots.
    pub fn size(&self) -> u32 {
        self.elements.len() as u32
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// The element at `idx`, or `None` when the slot is out of range or
    /// uninitialised. The caller distinguishes the two via [`Table::size`].
    pub fn get(&self, idx: u32) -> Option<&TableElement> {
        self.elements.get(idx as usize)?.as_ref()
    }

    /// Overwrite the slot at `idx`.
    ///
    /// # Panics
    /// Asserts that `idx` is within the table; the instantiator and host
    /// embedding only write validated offsets.
    pub fn set(&mut self, idx: u32, element: Option<TableElement>) {
        assert!(
            (idx as usize) < self.elements.len(),
            "table slot {idx} out of range"
        );
        self.elements[idx as usize] = element;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;

    fn empty_instance() -> Rc<Instance> {
        Rc::new(Instance::new(Rc::new(Module::default())))
    }

    #[test]
    fn test_new_table_is_null() {
        let table = Table::new(Limits { min: 4, max: Some(8) });
        assert_eq!(table.size(), 4);
        for idx in 0..4 {
            assert!(table.get(idx).is_none());
        }
        assert!(table.get(4).is_none());
    }

    #[test]
    fn test_set_and_get() {
        let mut table = Table::new(Limits { min: 2, max: None });
        let instance = empty_instance();

        table.set(1, Some(TableElement {
            instance: Rc::clone(&instance),
            func_idx: 7,
            shared_instance: None,
        }));

        assert!(table.get(0).is_none());
        let element = table.get(1).expect("slot 1 should be set");
        assert_eq!(element.func_idx, 7);

        // Slots can be reset to null
        table.set(1, None);
        assert!(table.get(1).is_none());
    }

    #[test]
    #[should_panic]
    fn test_set_out_of_range_panics() {
        let mut table = Table::new(Limits { min: 1, max: None });
        table.set(1, None);
    }
}
