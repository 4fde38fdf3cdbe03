use tracing::{debug, trace};

use crate::ast::{Node, NodeData, NodeId};
use crate::lexer::Token;

use super::{mangle, ScopeError, ScopeId, ScopeKind, ScopeTree, SymbolEntry};

/// Build the scope tree for a parsed program in one depth-first pass.
///
/// Redeclared variables, parameters and imports keep their first binding
/// and are left for the linter to report. A class name or a function
/// signature declared twice in the same scope is an error.
pub fn build_scopes(program: &Node) -> Result<ScopeTree, ScopeError> {
    let NodeData::Program { body } = &program.data else {
        return Err(ScopeError::UnexpectedRoot(program.kind()));
    };

    let mut builder = Builder {
        tree: ScopeTree::new(program.id),
    };
    let root = builder.tree.root();
    builder.visit_all(body, root)?;

    debug!(scopes = builder.tree.len(), "built scopes");
    Ok(builder.tree)
}

struct Builder {
    tree: ScopeTree,
}

impl Builder {
    fn open(&mut self, kind: ScopeKind, node: &Node, parent: ScopeId) -> ScopeId {
        let id = self.tree.open(kind, node.id, parent);
        trace!(scope = id.0, ?kind, node = node.id.0, "opened scope");
        id
    }

    fn bind(&mut self, scope: ScopeId, name: &str, node: NodeId) -> bool {
        self.tree
            .symbols_mut(scope)
            .bind(name, SymbolEntry { node, scope })
    }

    fn bind_generics(&mut self, scope: ScopeId, generics: &[Node]) {
        for generic in generics {
            if let NodeData::GenericParam { identifier, .. } = &generic.data {
                self.bind(scope, &identifier.lexeme, generic.id);
            }
        }
    }

    fn bind_params(&mut self, scope: ScopeId, params: &[Node]) {
        for param in params {
            if let NodeData::Parameter { identifier, .. } = &param.data {
                self.bind(scope, &identifier.lexeme, param.id);
            }
        }
    }

    fn visit_all(&mut self, nodes: &[Node], scope: ScopeId) -> Result<(), ScopeError> {
        nodes.iter().try_for_each(|node| self.visit(node, scope))
    }

    fn visit_children(&mut self, node: &Node, scope: ScopeId) -> Result<(), ScopeError> {
        node.children()
            .into_iter()
            .try_for_each(|child| self.visit(child, scope))
    }

    /// Open a block scope for `node` and fill it with `body`.
    fn block(&mut self, node: &Node, body: &[Node], scope: ScopeId) -> Result<ScopeId, ScopeError> {
        let inner = self.open(ScopeKind::Block, node, scope);
        self.visit_all(body, inner)?;
        Ok(inner)
    }

    fn visit(&mut self, node: &Node, scope: ScopeId) -> Result<(), ScopeError> {
        match &node.data {
            NodeData::EmptyVariableDecl { identifier, .. } => {
                self.bind(scope, &identifier.lexeme, node.id);
            }
            NodeData::VariableDecl {
                identifier, value, ..
            } => {
                self.bind(scope, &identifier.lexeme, node.id);
                self.visit(value, scope)?;
            }
            NodeData::EmptyFunctionDecl {
                identifier,
                generic_params,
                params,
                ..
            } => self.function(node, identifier, generic_params, params, &[], scope)?,
            NodeData::FunctionDecl {
                identifier,
                generic_params,
                params,
                body,
                ..
            } => self.function(node, identifier, generic_params, params, body, scope)?,
            NodeData::ClassDecl { .. } => self.class(node, scope)?,
            NodeData::ImportDecl { path, rename, expose } => {
                if let Some(rename) = rename {
                    self.bind(scope, &rename.lexeme, node.id);
                } else if !expose.is_empty() {
                    for exposed in expose {
                        if let Some(name) = exposed.declared_name() {
                            self.bind(scope, &name.lexeme, exposed.id);
                        }
                    }
                } else if let Some(last) = path.last() {
                    self.bind(scope, &last.lexeme, node.id);
                }
            }

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
                self.visit(condition, scope)?;
                self.block(node, body, scope)?;
                if let Some(else_clause) = else_clause {
                    self.visit(else_clause, scope)?;
                }
            }
            NodeData::ElseExpr { body } | NodeData::ElseStmt { body } => {
                self.block(node, body, scope)?;
            }
            NodeData::AssignmentExpr { .. }
            | NodeData::WrappedExpr { .. }
            | NodeData::UnaryExpr { .. }
            | NodeData::BinaryExpr { .. }
            | NodeData::CallExpr { .. }
            | NodeData::IndexExpr { .. }
            | NodeData::MemberExpr { .. }
            | NodeData::NewExpr { .. }
            | NodeData::InstanceofExpr { .. }
            | NodeData::AsyncExpr { .. }
            | NodeData::ArrayExpr { .. } => self.visit_children(node, scope)?,
            NodeData::Identifier(_)
            | NodeData::This
            | NodeData::Super
            | NodeData::NumberLiteral(_)
            | NodeData::StringLiteral(_)
            | NodeData::BooleanLiteral(_) => {}

            NodeData::SwitchStmt { subject, cases } => {
                self.visit(subject, scope)?;
                self.visit_all(cases, scope)?;
            }
            NodeData::SwitchCase { conditions, body } => {
                self.visit_all(conditions, scope)?;
                self.block(node, body, scope)?;
            }
            NodeData::ForStmt {
                identifier,
                iterable,
                body,
                ..
            } => {
                self.visit(iterable, scope)?;
                let inner = self.open(ScopeKind::Block, node, scope);
                self.bind(inner, &identifier.lexeme, node.id);
                self.visit_all(body, inner)?;
            }
            NodeData::RepeatStmt { amount: header, body }
            | NodeData::WhileStmt {
                condition: header,
                body,
            } => {
                self.visit(header, scope)?;
                self.block(node, body, scope)?;
            }
            NodeData::TryStmt { body, catch_clause } => {
                self.block(node, body, scope)?;
                self.visit(catch_clause, scope)?;
            }
            NodeData::CatchClause {
                identifier, body, ..
            } => {
                let inner = self.open(ScopeKind::Block, node, scope);
                self.bind(inner, &identifier.lexeme, node.id);
                self.visit_all(body, inner)?;
            }
            NodeData::ThrowStmt { .. }
            | NodeData::ReturnStmt { .. }
            | NodeData::YieldStmt { .. }
            | NodeData::ExpressionStmt { .. } => self.visit_children(node, scope)?,
            NodeData::BreakStmt | NodeData::ContinueStmt | NodeData::FallthroughStmt => {}

            NodeData::Program { body } => self.visit_all(body, scope)?,
            NodeData::ClassProp { value, .. } => self.visit(value, scope)?,
            NodeData::Constructor { params, body } => {
                let inner = self.open(ScopeKind::Function, node, scope);
                self.bind_params(inner, params);
                self.visit_all(body, inner)?;
            }
            // Bound by the construct that owns them.
            NodeData::VariableType { .. }
            | NodeData::Parameter { .. }
            | NodeData::GenericParam { .. }
            | NodeData::ImportExpose { .. } => {}
        }
        Ok(())
    }

    fn function(
        &mut self,
        node: &Node,
        identifier: &Token,
        generic_params: &[Node],
        params: &[Node],
        body: &[Node],
        scope: ScopeId,
    ) -> Result<(), ScopeError> {
        let signature = mangle::function(&identifier.lexeme, generic_params, params);
        if !self.bind(scope, &signature, node.id) {
            return Err(ScopeError::DuplicateFunction {
                signature,
                span: node.span,
            });
        }
        self.tree.symbols_mut(scope).add_function(
            identifier.lexeme.as_str(),
            signature,
            SymbolEntry { node: node.id, scope },
        );

        let inner = self.open(ScopeKind::Function, node, scope);
        self.bind_generics(inner, generic_params);
        self.bind_params(inner, params);
        self.visit_all(body, inner)
    }

    fn class(&mut self, node: &Node, scope: ScopeId) -> Result<(), ScopeError> {
        let NodeData::ClassDecl {
            identifier,
            generic_params,
            constructors,
            static_body,
            instance_body,
            ..
        } = &node.data
        else {
            return Ok(());
        };

        if !self.bind(scope, &identifier.lexeme, node.id) {
            return Err(ScopeError::DuplicateClass {
                name: identifier.lexeme.clone(),
                span: identifier.span,
            });
        }

        let class_scope = self.open(ScopeKind::Class, node, scope);
        let static_scope = self.tree.open_static(class_scope);
        self.bind_generics(class_scope, generic_params);

        for constructor in constructors {
            if let NodeData::Constructor { params, .. } = &constructor.data {
                let signature = mangle::constructor(generic_params, params);
                // Identical overloads are reported by the linter.
                self.bind(class_scope, &signature, constructor.id);
            }
            self.visit(constructor, class_scope)?;
        }
        self.visit_all(static_body, static_scope)?;
        self.visit_all(instance_body, class_scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::parser::tests::parse_source;
    use crate::span::Span;

    fn build(source: &str) -> (Node, ScopeTree) {
        let output = parse_source(source);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let tree = build_scopes(&output.program).expect("scopes");
        (output.program, tree)
    }

    fn scope_for(program: &Node, tree: &ScopeTree, kind: NodeKind, nth: usize) -> ScopeId {
        let node = program
            .descendants()
            .into_iter()
            .filter(|node| node.kind() == kind)
            .nth(nth)
            .expect("node of kind");
        tree.scopes
            .iter()
            .find(|scope| scope.node == node.id)
            .map(|scope| scope.id)
            .expect("scope for node")
    }

    #[test]
    fn rejects_non_program_root() {
        let node = Node::new(NodeId(0), Span::default(), NodeData::BreakStmt);
        assert_eq!(
            build_scopes(&node).unwrap_err(),
            ScopeError::UnexpectedRoot(NodeKind::BreakStmt)
        );
    }

    #[test]
    fn binds_program_level_names() {
        let (_, tree) = build("var a = 1\nvar b\nclass C\nimport std.io\nimport x.y as z\n");
        let root = tree.root();
        for name in ["a", "b", "C", "io", "z"] {
            assert!(tree.has_symbol(root, name), "{name} should be bound");
        }
        assert!(!tree.has_symbol(root, "y"));
    }

    #[test]
    fn binds_exposed_imports() {
        let (_, tree) = build("import std.io (read, write as put)\n");
        let root = tree.root();
        assert!(tree.has_symbol(root, "read"));
        assert!(tree.has_symbol(root, "put"));
        assert!(!tree.has_symbol(root, "io"));
        assert!(!tree.has_symbol(root, "write"));
    }

    #[test]
    fn static_members_cannot_see_instance_members() {
        let source = "class A\n  var x = 1\n  static var y = 2\n";
        let (program, tree) = build(source);
        let class = scope_for(&program, &tree, NodeKind::ClassDecl, 0);
        let statics = tree.static_scope(class).expect("static scope");

        assert!(tree.has_symbol(statics, "y"));
        assert!(!tree.has_symbol(statics, "x"));
        assert!(tree.has_symbol(class, "x"));
        assert!(tree.has_symbol(statics, "A"));
    }

    #[test]
    fn overloads_with_different_signatures_coexist() {
        let source = "function f(a: int)\n  a\nfunction f(a: string)\n  a\n";
        let (_, tree) = build(source);
        let root = tree.root();
        assert!(tree.has_function(root, "f"));
        assert!(tree.has_symbol(root, "f(int)"));
        assert!(tree.has_symbol(root, "f(string)"));
        assert_eq!(tree.functions(root, "f").len(), 2);
    }

    #[test]
    fn identical_overload_is_fatal() {
        let source = "function f(a: int)\nfunction f(a: string)\nfunction f(b: int)\n";
        let output = parse_source(source);
        let error = build_scopes(&output.program).unwrap_err();
        assert!(matches!(
            error,
            ScopeError::DuplicateFunction { ref signature, .. } if signature == "f(int)"
        ));
    }

    #[test]
    fn generic_renaming_does_not_make_a_new_overload() {
        let output = parse_source("function f<T>(a: T)\nfunction f<U>(a: U)\n");
        assert!(build_scopes(&output.program).is_err());
    }

    #[test]
    fn duplicate_class_is_fatal() {
        let output = parse_source("class A\nclass A\n");
        let error = build_scopes(&output.program).unwrap_err();
        assert!(matches!(error, ScopeError::DuplicateClass { ref name, .. } if name == "A"));
    }

    #[test]
    fn redeclared_variable_keeps_first_binding() {
        let (program, tree) = build("var x = 1\nvar x = 2\n");
        let first = program
            .descendants()
            .into_iter()
            .find(|node| node.kind() == NodeKind::VariableDecl)
            .map(|node| node.id);
        assert_eq!(tree.get_symbol(tree.root(), "x").map(|e| e.node), first);
    }

    #[test]
    fn function_scope_holds_generics_and_params() {
        let (program, tree) = build("function f<T>(a: T, b: int)\n  var c = a\n");
        let function = scope_for(&program, &tree, NodeKind::FunctionDecl, 0);
        assert_eq!(tree.get(function).kind(), ScopeKind::Function);
        for name in ["T", "a", "b", "c"] {
            assert!(tree.get(function).symbols().has(name), "{name}");
        }
        assert!(!tree.has_symbol(tree.root(), "a"));
    }

    #[test]
    fn else_scope_is_sibling_of_if_scope() {
        let source = "if a\n  var x = 1\nelse\n  var y = 2\n";
        let (program, tree) = build(source);
        let if_scope = scope_for(&program, &tree, NodeKind::IfStmt, 0);
        let else_scope = scope_for(&program, &tree, NodeKind::ElseStmt, 0);
        assert_eq!(tree.get(if_scope).parent(), Some(tree.root()));
        assert_eq!(tree.get(else_scope).parent(), Some(tree.root()));
        assert!(!tree.has_symbol(else_scope, "x"));
        assert!(tree.has_symbol(else_scope, "y"));
    }

    #[test]
    fn loop_and_catch_variables_live_in_their_blocks() {
        let source = "for i in items\n  i\ntry\n  risky()\ncatch e\n  e\n";
        let (program, tree) = build(source);
        let for_scope = scope_for(&program, &tree, NodeKind::ForStmt, 0);
        let catch_scope = scope_for(&program, &tree, NodeKind::CatchClause, 0);
        assert!(tree.get(for_scope).symbols().has("i"));
        assert!(tree.get(catch_scope).symbols().has("e"));
        assert!(!tree.has_symbol(tree.root(), "i"));
        assert!(!tree.has_symbol(tree.root(), "e"));
    }

    #[test]
    fn nested_if_expression_gets_a_scope() {
        let source = "var v = if a\n  yield 1\nelse\n  yield 2\n";
        let (program, tree) = build(source);
        let if_scope = scope_for(&program, &tree, NodeKind::IfExpr, 0);
        assert_eq!(tree.get(if_scope).kind(), ScopeKind::Block);
        assert_eq!(tree.get(if_scope).parent(), Some(tree.root()));
    }

    #[test]
    fn constructors_are_bound_by_signature() {
        let source = "class Box<T>\n  new(value: T)\n    value\n  new()\n";
        let (program, tree) = build(source);
        let class = scope_for(&program, &tree, NodeKind::ClassDecl, 0);
        assert!(tree.get(class).symbols().has("new($0)"));
        assert!(tree.get(class).symbols().has("new()"));
        let constructor = scope_for(&program, &tree, NodeKind::Constructor, 0);
        assert!(tree.get(constructor).symbols().has("value"));
        assert!(tree.has_symbol(constructor, "T"));
    }
}
