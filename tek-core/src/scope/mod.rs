//! Lexical scopes and the symbols bound in them.
//!
//! Scopes live in an arena owned by [`ScopeTree`] and refer to each other by
//! [`ScopeId`]. Each scope remembers the node that opened it, and its parent
//! maps the node ids of nested constructs to their scopes, so later passes
//! can find the scope for any node they are looking at.

mod builder;
pub mod mangle;
mod symbols;

pub use builder::build_scopes;
pub use symbols::{FunctionEntry, SymbolEntry, SymbolTable};

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::{NodeId, NodeKind};
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Program,
    Function,
    Class,
    /// Static members of a class. Lookups skip the instance members.
    Static,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    id: ScopeId,
    kind: ScopeKind,
    node: NodeId,
    parent: Option<ScopeId>,
    symbols: SymbolTable,
    children: HashMap<NodeId, ScopeId>,
    static_scope: Option<ScopeId>,
}

impl Scope {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The node that opened this scope.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Scope directly opened by `node` inside this one.
    pub fn child(&self, node: NodeId) -> Option<ScopeId> {
        self.children.get(&node).copied()
    }

    pub fn static_scope(&self) -> Option<ScopeId> {
        self.static_scope
    }
}

/// Binding conflicts the scope builder refuses to continue past.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("class '{name}' is already declared in this scope (at {})", .span.start)]
    DuplicateClass { name: String, span: Span },
    #[error("function '{signature}' is already declared in this scope (at {})", .span.start)]
    DuplicateFunction { signature: String, span: Span },
    #[error("scope building must start at a program node, not {0:?}")]
    UnexpectedRoot(NodeKind),
}

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    fn new(root: NodeId) -> Self {
        let mut tree = Self { scopes: Vec::new() };
        tree.alloc(ScopeKind::Program, root, None);
        tree
    }

    pub(crate) fn alloc(
        &mut self,
        kind: ScopeKind,
        node: NodeId,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            id,
            kind,
            node,
            parent,
            symbols: SymbolTable::default(),
            children: HashMap::new(),
            static_scope: None,
        });
        id
    }

    /// Open a scope for `node` and register it with `parent`.
    pub(crate) fn open(&mut self, kind: ScopeKind, node: NodeId, parent: ScopeId) -> ScopeId {
        let id = self.alloc(kind, node, Some(parent));
        self.get_mut(parent).children.insert(node, id);
        id
    }

    /// Give a class scope its companion static scope.
    pub(crate) fn open_static(&mut self, class: ScopeId) -> ScopeId {
        let node = self.get(class).node;
        let id = self.alloc(ScopeKind::Static, node, Some(class));
        self.get_mut(class).static_scope = Some(id);
        id
    }

    pub(crate) fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub(crate) fn symbols_mut(&mut self, id: ScopeId) -> &mut SymbolTable {
        &mut self.get_mut(id).symbols
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// The scopes a lookup from `scope` consults, innermost first.
    ///
    /// A static scope is followed by the scope enclosing its class, so
    /// instance members are invisible to static code.
    pub fn lookup_chain(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self.get(scope)), move |current| {
            let parent = current.parent.map(|id| self.get(id))?;
            if current.kind == ScopeKind::Static {
                parent.parent.map(|id| self.get(id))
            } else {
                Some(parent)
            }
        })
    }

    pub fn has_symbol(&self, scope: ScopeId, name: &str) -> bool {
        self.get_symbol(scope, name).is_some()
    }

    pub fn get_symbol(&self, scope: ScopeId, name: &str) -> Option<&SymbolEntry> {
        self.lookup_chain(scope)
            .find_map(|current| current.symbols.get(name))
    }

    pub fn has_function(&self, scope: ScopeId, name: &str) -> bool {
        self.lookup_chain(scope)
            .any(|current| current.symbols.has_function(name))
    }

    /// Every overload of `name` visible from `scope`, innermost first.
    pub fn functions(&self, scope: ScopeId, name: &str) -> Vec<&FunctionEntry> {
        self.lookup_chain(scope)
            .flat_map(|current| current.symbols.functions(name))
            .collect()
    }

    /// The scope `node` opened directly inside `scope`.
    pub fn own_scope(&self, scope: ScopeId, node: NodeId) -> Option<ScopeId> {
        self.get(scope).child(node)
    }

    /// Like [`own_scope`](Self::own_scope), but also searches the
    /// enclosing scopes of `scope`.
    pub fn find_scope(&self, scope: ScopeId, node: NodeId) -> Option<ScopeId> {
        std::iter::successors(Some(scope), |current| self.get(*current).parent)
            .find_map(|current| self.own_scope(current, node))
    }

    pub fn static_scope(&self, class: ScopeId) -> Option<ScopeId> {
        self.get(class).static_scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(node: u32, scope: ScopeId) -> SymbolEntry {
        SymbolEntry {
            node: NodeId(node),
            scope,
        }
    }

    #[test]
    fn lookups_walk_outwards() {
        let mut tree = ScopeTree::new(NodeId(0));
        let root = tree.root();
        let block = tree.open(ScopeKind::Block, NodeId(1), root);
        tree.symbols_mut(root).bind("outer", entry(2, root));
        tree.symbols_mut(block).bind("inner", entry(3, block));

        assert!(tree.has_symbol(block, "outer"));
        assert!(tree.has_symbol(block, "inner"));
        assert!(!tree.has_symbol(root, "inner"));
        assert_eq!(tree.own_scope(root, NodeId(1)), Some(block));
    }

    #[test]
    fn static_scope_skips_instance_members() {
        let mut tree = ScopeTree::new(NodeId(0));
        let root = tree.root();
        let class = tree.open(ScopeKind::Class, NodeId(1), root);
        let statics = tree.open_static(class);
        tree.symbols_mut(root).bind("global", entry(2, root));
        tree.symbols_mut(class).bind("field", entry(3, class));
        tree.symbols_mut(statics).bind("count", entry(4, statics));

        assert!(tree.has_symbol(statics, "count"));
        assert!(tree.has_symbol(statics, "global"));
        assert!(!tree.has_symbol(statics, "field"));
        assert!(tree.has_symbol(class, "field"));
        assert!(!tree.has_symbol(class, "count"));
        assert_eq!(tree.static_scope(class), Some(statics));
    }

    #[test]
    fn find_scope_searches_ancestors() {
        let mut tree = ScopeTree::new(NodeId(0));
        let root = tree.root();
        let first = tree.open(ScopeKind::Block, NodeId(1), root);
        let second = tree.open(ScopeKind::Block, NodeId(2), first);
        assert_eq!(tree.own_scope(second, NodeId(1)), None);
        assert_eq!(tree.find_scope(second, NodeId(1)), Some(first));
        assert_eq!(tree.find_scope(second, NodeId(2)), Some(second));
    }

    #[test]
    fn errors_name_the_conflict() {
        let error = ScopeError::DuplicateFunction {
            signature: "f(int)".into(),
            span: Span::default(),
        };
        assert_eq!(
            error.to_string(),
            "function 'f(int)' is already declared in this scope (at 1:1)"
        );
    }
}
