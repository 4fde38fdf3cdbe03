//! Single-pass traversal with per-kind callbacks.
//!
//! The walker tracks the active scope and the ancestor stack while it walks,
//! so callbacks can ask what a name refers to at the point they are called.

use std::collections::HashMap;

use crate::ast::{Node, NodeData, NodeKind};
use crate::scope::{ScopeId, ScopeTree, SymbolEntry};

pub type Callback<'a> = Box<dyn FnMut(&Node, &WalkContext<'_>) + 'a>;

/// Where the walk currently is.
pub struct WalkContext<'a> {
    scopes: &'a ScopeTree,
    scope: ScopeId,
    parents: Vec<&'a Node>,
}

impl<'a> WalkContext<'a> {
    pub fn scopes(&self) -> &ScopeTree {
        self.scopes
    }

    /// The scope active at the current node.
    ///
    /// In an enter callback this is still the enclosing scope of a node
    /// that opens its own.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Ancestors of the current node, innermost last.
    pub fn parents(&self) -> &[&'a Node] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&Node> {
        self.parents.last().copied()
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.scopes.has_symbol(self.scope, name)
    }

    pub fn get_symbol(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes.get_symbol(self.scope, name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.scopes.has_function(self.scope, name)
    }

    /// Switch into the scope `node` opened, returning the one to restore.
    fn enter(&mut self, node: &Node) -> ScopeId {
        let previous = self.scope;
        if let Some(own) = self.scopes.own_scope(self.scope, node.id) {
            self.scope = own;
        }
        previous
    }
}

pub struct Walker<'a> {
    program: &'a Node,
    scopes: &'a ScopeTree,
    enter: HashMap<NodeKind, Vec<Callback<'a>>>,
    leave: HashMap<NodeKind, Vec<Callback<'a>>>,
}

impl<'a> Walker<'a> {
    pub fn new(program: &'a Node, scopes: &'a ScopeTree) -> Self {
        Self {
            program,
            scopes,
            enter: HashMap::new(),
            leave: HashMap::new(),
        }
    }

    /// Run `callback` before any node of `kind` or its children are visited.
    pub fn on_enter(
        &mut self,
        kind: NodeKind,
        callback: impl FnMut(&Node, &WalkContext<'_>) + 'a,
    ) -> &mut Self {
        self.enter.entry(kind).or_default().push(Box::new(callback));
        self
    }

    /// Run `callback` after a node of `kind` and all of its children.
    pub fn on_leave(
        &mut self,
        kind: NodeKind,
        callback: impl FnMut(&Node, &WalkContext<'_>) + 'a,
    ) -> &mut Self {
        self.leave.entry(kind).or_default().push(Box::new(callback));
        self
    }

    pub fn walk(&mut self) {
        let mut context = WalkContext {
            scopes: self.scopes,
            scope: self.scopes.root(),
            parents: Vec::new(),
        };
        let program = self.program;
        self.visit(program, &mut context);
    }

    fn fire(
        callbacks: &mut HashMap<NodeKind, Vec<Callback<'a>>>,
        node: &Node,
        context: &WalkContext<'a>,
    ) {
        if let Some(callbacks) = callbacks.get_mut(&node.kind()) {
            for callback in callbacks {
                callback(node, context);
            }
        }
    }

    fn visit_all(&mut self, nodes: &'a [Node], context: &mut WalkContext<'a>) {
        for node in nodes {
            self.visit(node, context);
        }
    }

    fn visit(&mut self, node: &'a Node, context: &mut WalkContext<'a>) {
        Self::fire(&mut self.enter, node, context);
        context.parents.push(node);

        match &node.data {
            NodeData::EmptyFunctionDecl { .. }
            | NodeData::FunctionDecl { .. }
            | NodeData::Constructor { .. } => {
                let previous = context.enter(node);
                self.visit_children(node, context);
                context.scope = previous;
            }
            NodeData::ClassDecl {
                generic_params,
                extends,
                ..
            } => self.class(node, generic_params, extends, context),

            NodeData::IfExpr {
                condition,
                body,
                else_clause,
            }
            | NodeData::IfStmt {
                condition,
                body,
                else_clause,
            } => {
                self.visit(condition, context);
                let previous = context.enter(node);
                self.visit_all(body, context);
                context.scope = previous;
                if let Some(else_clause) = else_clause {
                    self.visit(else_clause, context);
                }
            }
            NodeData::SwitchCase {
                conditions: headers,
                body,
            } => {
                self.visit_all(headers, context);
                self.block(node, body, context);
            }
            NodeData::ForStmt {
                variable_type,
                iterable,
                body,
                ..
            } => {
                if let Some(variable_type) = variable_type {
                    self.visit(variable_type, context);
                }
                self.visit(iterable, context);
                self.block(node, body, context);
            }
            NodeData::RepeatStmt { amount: header, body }
            | NodeData::WhileStmt {
                condition: header,
                body,
            } => {
                self.visit(header, context);
                self.block(node, body, context);
            }
            NodeData::TryStmt { body, catch_clause } => {
                self.block(node, body, context);
                self.visit(catch_clause, context);
            }
            NodeData::CatchClause {
                variable_type,
                body,
                ..
            } => {
                if let Some(variable_type) = variable_type {
                    self.visit(variable_type, context);
                }
                self.block(node, body, context);
            }
            NodeData::ElseExpr { body } | NodeData::ElseStmt { body } => {
                self.block(node, body, context);
            }

            NodeData::EmptyVariableDecl { .. }
            | NodeData::VariableDecl { .. }
            | NodeData::ImportDecl { .. }
            | NodeData::AssignmentExpr { .. }
            | NodeData::WrappedExpr { .. }
            | NodeData::UnaryExpr { .. }
            | NodeData::BinaryExpr { .. }
            | NodeData::CallExpr { .. }
            | NodeData::IndexExpr { .. }
            | NodeData::MemberExpr { .. }
            | NodeData::NewExpr { .. }
            | NodeData::InstanceofExpr { .. }
            | NodeData::AsyncExpr { .. }
            | NodeData::ArrayExpr { .. }
            | NodeData::Identifier(_)
            | NodeData::This
            | NodeData::Super
            | NodeData::NumberLiteral(_)
            | NodeData::StringLiteral(_)
            | NodeData::BooleanLiteral(_)
            | NodeData::SwitchStmt { .. }
            | NodeData::ThrowStmt { .. }
            | NodeData::ReturnStmt { .. }
            | NodeData::YieldStmt { .. }
            | NodeData::ExpressionStmt { .. }
            | NodeData::BreakStmt
            | NodeData::ContinueStmt
            | NodeData::FallthroughStmt
            | NodeData::Program { .. }
            | NodeData::VariableType { .. }
            | NodeData::Parameter { .. }
            | NodeData::GenericParam { .. }
            | NodeData::ClassProp { .. }
            | NodeData::ImportExpose { .. } => self.visit_children(node, context),
        }

        context.parents.pop();
        Self::fire(&mut self.leave, node, context);
    }

    fn visit_children(&mut self, node: &'a Node, context: &mut WalkContext<'a>) {
        for child in node.children() {
            self.visit(child, context);
        }
    }

    fn block(&mut self, node: &'a Node, body: &'a [Node], context: &mut WalkContext<'a>) {
        let previous = context.enter(node);
        self.visit_all(body, context);
        context.scope = previous;
    }

    /// Class members in source order, static ones under the static scope.
    fn class(
        &mut self,
        node: &'a Node,
        generic_params: &'a [Node],
        extends: &'a [Node],
        context: &mut WalkContext<'a>,
    ) {
        let previous = context.enter(node);
        let class_scope = context.scope;
        let static_scope = context.scopes.static_scope(class_scope);

        self.visit_all(generic_params, context);
        self.visit_all(extends, context);

        let members = node
            .children()
            .into_iter()
            .skip(generic_params.len() + extends.len());
        for member in members {
            let is_static = matches!(member.data, NodeData::ClassProp { is_static: true, .. });
            context.scope = match static_scope {
                Some(statics) if is_static => statics,
                _ => class_scope,
            };
            self.visit(member, context);
        }

        context.scope = previous;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::parser::tests::parse_source;
    use crate::scope::{build_scopes, ScopeKind};

    fn prepare(source: &str) -> (Node, ScopeTree) {
        let output = parse_source(source);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let scopes = build_scopes(&output.program).expect("scopes");
        (output.program, scopes)
    }

    fn identifier_name(node: &Node) -> String {
        match &node.data {
            NodeData::Identifier(token) => token.lexeme.clone(),
            _ => String::new(),
        }
    }

    #[test]
    fn enter_and_leave_bracket_children() {
        let (program, scopes) = prepare("var x = a + b\n");
        let events = RefCell::new(Vec::new());
        let mut walker = Walker::new(&program, &scopes);
        walker
            .on_enter(NodeKind::BinaryExpr, |_, _| events.borrow_mut().push("enter".to_string()))
            .on_enter(NodeKind::Identifier, |node, _| {
                events.borrow_mut().push(identifier_name(node))
            })
            .on_leave(NodeKind::BinaryExpr, |_, _| events.borrow_mut().push("leave".to_string()));
        walker.walk();
        drop(walker);
        assert_eq!(events.into_inner(), vec!["enter", "a", "b", "leave"]);
    }

    #[test]
    fn reports_ancestors_innermost_last() {
        let (program, scopes) = prepare("function f()\n  return x\n");
        let seen = RefCell::new(Vec::new());
        let mut walker = Walker::new(&program, &scopes);
        walker.on_enter(NodeKind::Identifier, |_, context| {
            let kinds: Vec<NodeKind> = context.parents().iter().map(|node| node.kind()).collect();
            seen.borrow_mut().push(kinds);
        });
        walker.walk();
        drop(walker);
        assert_eq!(
            seen.into_inner(),
            vec![vec![
                NodeKind::Program,
                NodeKind::FunctionDecl,
                NodeKind::ReturnStmt
            ]]
        );
    }

    #[test]
    fn scope_opens_after_enter_callback() {
        let (program, scopes) = prepare("function f(a: int)\n  a\n");
        let seen = RefCell::new(Vec::new());
        let mut walker = Walker::new(&program, &scopes);
        walker
            .on_enter(NodeKind::FunctionDecl, |_, context| {
                seen.borrow_mut()
                    .push(context.scopes().get(context.scope()).kind())
            })
            .on_enter(NodeKind::Identifier, |_, context| {
                seen.borrow_mut()
                    .push(context.scopes().get(context.scope()).kind());
                assert!(context.has_symbol("a"));
            })
            .on_leave(NodeKind::FunctionDecl, |_, context| {
                seen.borrow_mut()
                    .push(context.scopes().get(context.scope()).kind())
            });
        walker.walk();
        drop(walker);
        assert_eq!(
            seen.into_inner(),
            vec![ScopeKind::Program, ScopeKind::Function, ScopeKind::Program]
        );
    }

    #[test]
    fn headers_use_the_enclosing_scope() {
        let source = "var items = 1\nfor i in items\n  i\n";
        let (program, scopes) = prepare(source);
        let seen = RefCell::new(Vec::new());
        let mut walker = Walker::new(&program, &scopes);
        walker.on_enter(NodeKind::Identifier, |node, context| {
            seen.borrow_mut().push((
                identifier_name(node),
                context.scopes().get(context.scope()).kind(),
                context.has_symbol("i"),
            ));
        });
        walker.walk();
        drop(walker);
        assert_eq!(
            seen.into_inner(),
            vec![
                ("items".to_string(), ScopeKind::Program, false),
                ("i".to_string(), ScopeKind::Block, true),
            ]
        );
    }

    #[test]
    fn static_members_walk_in_static_scope() {
        let source = "class A\n  var x = 1\n  static var y = x\n";
        let (program, scopes) = prepare(source);
        let seen = RefCell::new(Vec::new());
        let mut walker = Walker::new(&program, &scopes);
        walker.on_enter(NodeKind::Identifier, |_, context| {
            seen.borrow_mut().push((
                context.scopes().get(context.scope()).kind(),
                context.has_symbol("x"),
            ));
        });
        walker.walk();
        drop(walker);
        assert_eq!(seen.into_inner(), vec![(ScopeKind::Static, false)]);
    }

    #[test]
    fn visits_every_node_once() {
        let source = "class A\n  new()\n  function f(a: int)\n    if a\n      return 1\n    else\n      return 2\nswitch 1\n  case 1\n    fallthrough\n";
        let (program, scopes) = prepare(source);
        let count = RefCell::new(0usize);
        let mut walker = Walker::new(&program, &scopes);
        for kind in NodeKind::ALL {
            walker.on_enter(kind, |_, _| *count.borrow_mut() += 1);
        }
        walker.walk();
        drop(walker);
        assert_eq!(count.into_inner(), program.descendants().len());
    }
}
