//! Constant propagation interface
//!
//! The allocation compiler never decides on its own whether a slot holds a
//! compile-time constant. A [`ConstantResolver`] supplied by the surrounding
//! compiler gives the verdict, and call sites are rewritten with it before
//! they are compiled.

use super::ir::{ArgumentDescriptor, CallSite, Slot};
use std::collections::HashMap;

/// Verdict source for "is this slot a known constant?"
pub trait ConstantResolver {
    /// Constant held by `slot`, or `None` if it is only known at run time
    fn resolve(&self, slot: Slot) -> Option<i64>;
}

impl<F> ConstantResolver for F
where
    F: Fn(Slot) -> Option<i64>,
{
    fn resolve(&self, slot: Slot) -> Option<i64> {
        self(slot)
    }
}

/// Slot-to-constant table filled by constant propagation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantTable {
    values: HashMap<Slot, i64>,
}

impl ConstantTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `slot` holds `value`
    pub fn bind(&mut self, slot: Slot, value: i64) {
        self.values.insert(slot, value);
    }

    /// Drop what is known about `slot` (e.g. after it is reassigned)
    pub fn forget(&mut self, slot: Slot) -> Option<i64> {
        self.values.remove(&slot)
    }

    /// Number of known constants
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is known
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConstantResolver for ConstantTable {
    fn resolve(&self, slot: Slot) -> Option<i64> {
        self.values.get(&slot).copied()
    }
}

impl FromIterator<(Slot, i64)> for ConstantTable {
    fn from_iter<I: IntoIterator<Item = (Slot, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl ArgumentDescriptor {
    /// Replace a dynamic argument with its constant when the resolver knows it
    pub fn classify<R: ConstantResolver + ?Sized>(self, resolver: &R) -> Self {
        match self {
            ArgumentDescriptor::Dynamic(slot) => match resolver.resolve(slot) {
                Some(value) => ArgumentDescriptor::ConstantInt(value),
                None => self,
            },
            ArgumentDescriptor::ConstantInt(_) => self,
        }
    }
}

impl CallSite {
    /// Copy of this call site with every resolvable argument turned into a constant
    pub fn resolved<R: ConstantResolver + ?Sized>(&self, resolver: &R) -> CallSite {
        CallSite {
            intrinsic_name: self.intrinsic_name.clone(),
            arguments: self
                .arguments
                .iter()
                .map(|arg| arg.classify(resolver))
                .collect(),
            destination: self.destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::ArgumentDescriptor::{ConstantInt, Dynamic};

    #[test]
    fn test_table_bind_and_forget() {
        let mut table = ConstantTable::new();
        assert!(table.is_empty());
        table.bind(Slot(3), 64);
        assert_eq!(table.resolve(Slot(3)), Some(64));
        assert_eq!(table.resolve(Slot(4)), None);
        assert_eq!(table.forget(Slot(3)), Some(64));
        assert_eq!(table.resolve(Slot(3)), None);
    }

    #[test]
    fn test_classify_only_rewrites_known_slots() {
        let table: ConstantTable = [(Slot(1), 16)].into_iter().collect();
        assert_eq!(Dynamic(Slot(1)).classify(&table), ConstantInt(16));
        assert_eq!(Dynamic(Slot(2)).classify(&table), Dynamic(Slot(2)));
        assert_eq!(ConstantInt(5).classify(&table), ConstantInt(5));
    }

    #[test]
    fn test_resolved_call_site_keeps_order() {
        let site = CallSite::allocate(vec![Dynamic(Slot(2)), Dynamic(Slot(1))], Slot(0));
        let resolver = |slot: Slot| (slot == Slot(1)).then_some(32i64);
        let resolved = site.resolved(&resolver);
        assert_eq!(resolved.arguments, vec![Dynamic(Slot(2)), ConstantInt(32)]);
        assert_eq!(resolved.destination, Slot(0));
        assert_eq!(resolved.intrinsic_name, "allocate");
    }
}
