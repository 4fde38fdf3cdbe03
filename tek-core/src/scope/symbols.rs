use std::collections::HashMap;

use crate::ast::NodeId;

use super::ScopeId;

/// Where a name was declared: the declaring node and the scope owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolEntry {
    pub node: NodeId,
    pub scope: ScopeId,
}

/// One overload in the function registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub mangled: String,
    pub entry: SymbolEntry,
}

/// Names bound in a single scope.
///
/// Ordinary bindings and the function registry are kept apart, so a
/// variable never hides a function of the same plain name from call
/// resolution.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolEntry>,
    functions: HashMap<String, Vec<FunctionEntry>>,
}

impl SymbolTable {
    pub fn has(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.symbols.get(name)
    }

    /// Bind `name` unless it is already bound here.
    ///
    /// The first declaration wins; returns `false` when `name` was taken.
    pub fn bind(&mut self, name: impl Into<String>, entry: SymbolEntry) -> bool {
        match self.symbols.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.get(name).is_some_and(|overloads| !overloads.is_empty())
    }

    /// Overloads registered under a plain function name.
    pub fn functions(&self, name: &str) -> &[FunctionEntry] {
        self.functions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn add_function(
        &mut self,
        name: impl Into<String>,
        mangled: impl Into<String>,
        entry: SymbolEntry,
    ) {
        self.functions
            .entry(name.into())
            .or_default()
            .push(FunctionEntry {
                mangled: mangled.into(),
                entry,
            });
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(node: u32) -> SymbolEntry {
        SymbolEntry {
            node: NodeId(node),
            scope: ScopeId(0),
        }
    }

    #[test]
    fn first_binding_wins() {
        let mut table = SymbolTable::default();
        assert!(table.bind("x", entry(1)));
        assert!(!table.bind("x", entry(2)));
        assert_eq!(table.get("x").map(|e| e.node), Some(NodeId(1)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn functions_live_beside_symbols() {
        let mut table = SymbolTable::default();
        table.bind("f", entry(1));
        table.add_function("f", "f(int)", entry(2));
        table.add_function("f", "f(string)", entry(3));
        assert!(table.has("f"));
        assert!(table.has_function("f"));
        assert_eq!(table.functions("f").len(), 2);
        assert!(table.functions("g").is_empty());
        assert!(!table.has_function("g"));
    }
}
