use crate::{SymbolIdx, Variable};
use std::{cmp::Ordering, collections::HashMap, ops::Index};

/// A propositional variable and its current truth value (`None` while unassigned)
#[derive(Clone, Debug)]
pub struct Symbol {
    id: Variable,
    value: Option<bool>,
}

impl Symbol {
    pub fn new(id: Variable) -> Self {
        Self { id, value: None }
    }

    #[inline]
    pub fn id(&self) -> Variable {
        self.id
    }

    #[inline]
    pub fn value(&self) -> Option<bool> {
        self.value
    }

    #[inline]
    pub(crate) fn set_value(&mut self, value: Option<bool>) {
        self.value = value;
    }
}

// Ids are unique, so symbols compare by id alone
impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// Every symbol of a formula, indexed by the order in which it first appeared
#[derive(Clone, Debug, Default)]
pub struct Symbols {
    symbols: Vec<Symbol>,
}

impl Symbols {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn value(&self, idx: SymbolIdx) -> Option<bool> {
        self.symbols[idx].value
    }

    #[inline]
    pub fn id(&self, idx: SymbolIdx) -> Variable {
        self.symbols[idx].id
    }

    #[inline]
    pub(crate) fn set(&mut self, idx: SymbolIdx, value: Option<bool>) {
        self.symbols[idx].set_value(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Symbols in ascending id order
    pub fn sorted(&self) -> Vec<&Symbol> {
        let mut sorted = self.symbols.iter().collect::<Vec<_>>();
        sorted.sort();
        sorted
    }

    #[cfg(test)]
    pub(crate) fn new_with(values: Vec<Option<bool>>) -> Self {
        Self {
            symbols: values
                .into_iter()
                .enumerate()
                .map(|(idx, value)| Symbol { id: idx + 1, value })
                .collect(),
        }
    }
}

impl Index<SymbolIdx> for Symbols {
    type Output = Symbol;

    #[inline]
    fn index(&self, idx: SymbolIdx) -> &Self::Output {
        &self.symbols[idx]
    }
}

/// Maps the numeric ids used in the clause file to dense symbol indices
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    indices: HashMap<Variable, SymbolIdx>,
    symbols: Symbols,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `id`, adding a fresh unassigned symbol on first sight
    pub fn declare(&mut self, id: Variable) -> SymbolIdx {
        let symbols = &mut self.symbols.symbols;
        *self.indices.entry(id).or_insert_with(|| {
            symbols.push(Symbol::new(id));
            symbols.len() - 1
        })
    }

    pub fn get(&self, id: Variable) -> Option<SymbolIdx> {
        self.indices.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn into_symbols(self) -> Symbols {
        self.symbols
    }
}

#[test]
fn declaring_symbols() {
    let mut table = SymbolTable::new();
    assert_eq!(table.declare(7), 0);
    assert_eq!(table.declare(3), 1);
    assert_eq!(table.declare(7), 0);
    assert_eq!(table.get(3), Some(1));
    assert_eq!(table.get(4), None);
    assert_eq!(table.len(), 2);

    let symbols = table.into_symbols();
    assert_eq!(symbols.id(0), 7);
    assert_eq!(symbols.value(1), None);
    assert_eq!(
        symbols.sorted().iter().map(|s| s.id()).collect::<Vec<_>>(),
        vec![3, 7]
    );
}

#[test]
fn setting_values() {
    let mut symbols = Symbols::new_with(vec![None, Some(true)]);
    symbols.set(0, Some(false));
    assert_eq!(symbols.value(0), Some(false));
    symbols.set(1, None);
    assert_eq!(symbols[1].value(), None);
    assert!(Symbol::new(2) < Symbol::new(10));
}
