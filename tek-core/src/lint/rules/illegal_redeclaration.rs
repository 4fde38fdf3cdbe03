use std::collections::HashSet;

use crate::ast::{Node, NodeData, NodeKind};
use crate::lexer::Token;
use crate::lint::{LintRule, Report};
use crate::scope::{mangle, ScopeId, ScopeKind, ScopeTree, SymbolEntry};
use crate::walker::{WalkContext, Walker};

/// Reports names that are declared while already in use.
///
/// Declarations may not shadow anything visible from an enclosing scope,
/// except that members of a class do not count for code inside its
/// methods.
pub struct IllegalRedeclaration;

/// The earliest declaration of `name` that a new declaration in `scope`
/// would collide with.
///
/// Outer scopes win over inner ones. Class and static scopes only look at
/// their own members, and a scope directly inside a class continues with
/// the class's enclosing scope.
fn find_declaration<'t>(
    scopes: &'t ScopeTree,
    scope: ScopeId,
    name: &str,
) -> Option<&'t SymbolEntry> {
    let current = scopes.get(scope);
    if matches!(current.kind(), ScopeKind::Class | ScopeKind::Static) {
        return current.symbols().get(name);
    }

    let outer = current.parent().and_then(|parent| {
        let parent_scope = scopes.get(parent);
        if parent_scope.kind() == ScopeKind::Class {
            parent_scope.parent()
        } else {
            Some(parent)
        }
    });
    outer
        .and_then(|outer| find_declaration(scopes, outer, name))
        .or_else(|| current.symbols().get(name))
}

fn already_used(kind: &str, name: &Token, report: &Report) {
    report.report(
        format!(
            "You can't declare a {kind} with the name '{}', because it is already used",
            name.lexeme
        ),
        name.span,
    );
}

fn check_declaration(
    node: &Node,
    scopes: &ScopeTree,
    scope: ScopeId,
    kind: &str,
    report: &Report,
) {
    let Some(name) = node.declared_name() else {
        return;
    };
    let clashes = find_declaration(scopes, scope, &name.lexeme)
        .is_some_and(|entry| entry.node != node.id)
        || scopes.has_function(scope, &name.lexeme);
    if clashes {
        already_used(kind, name, report);
    }
}

fn check_function(node: &Node, context: &WalkContext<'_>, report: &Report) {
    let (Some(name), Some(signature)) = (node.declared_name(), mangle::of_node(node, &[])) else {
        return;
    };
    let scopes = context.scopes();
    let scope = context.scope();

    // Repeating a signature within one scope already fails scope building,
    // so any other binding of it comes from an enclosing scope.
    let shadows_signature = find_declaration(scopes, scope, &signature)
        .is_some_and(|entry| entry.node != node.id);
    if find_declaration(scopes, scope, &name.lexeme).is_some() || shadows_signature {
        already_used("function", name, report);
    }
}

fn check_class(node: &Node, context: &WalkContext<'_>, report: &Report) {
    check_declaration(node, context.scopes(), context.scope(), "class", report);

    let NodeData::ClassDecl {
        generic_params,
        constructors,
        ..
    } = &node.data
    else {
        return;
    };

    let mut signatures = HashSet::new();
    for constructor in constructors {
        if let NodeData::Constructor { params, .. } = &constructor.data {
            if !signatures.insert(mangle::constructor(generic_params, params)) {
                report.report("Identical constructor overload exists", constructor.span);
            }
        }
    }

    // Class generics are checked against the enclosing scope, which cannot
    // see a repeat within the same list.
    let mut names = HashSet::new();
    for generic in generic_params {
        if let Some(name) = generic.declared_name() {
            if !names.insert(name.lexeme.as_str()) {
                already_used("generic", name, report);
            }
        }
    }
}

impl LintRule for IllegalRedeclaration {
    fn name(&self) -> &'static str {
        "illegal-redeclaration"
    }

    fn description(&self) -> &'static str {
        "Report illegal redeclarations"
    }

    fn create(&self, walker: &mut Walker<'_>, report: Report) {
        let simple = [
            (NodeKind::EmptyVariableDecl, "variable"),
            (NodeKind::VariableDecl, "variable"),
            (NodeKind::Parameter, "param"),
            (NodeKind::ForStmt, "variable"),
            (NodeKind::CatchClause, "variable"),
            (NodeKind::ImportExpose, "import"),
        ];
        for (kind, label) in simple {
            let report = report.clone();
            walker.on_enter(kind, move |node, context| {
                check_declaration(node, context.scopes(), context.scope(), label, &report);
            });
        }

        for kind in [NodeKind::FunctionDecl, NodeKind::EmptyFunctionDecl] {
            let report = report.clone();
            walker.on_enter(kind, move |node, context| check_function(node, context, &report));
        }

        let class_report = report.clone();
        let import_report = report.clone();
        walker
            .on_enter(NodeKind::ClassDecl, move |node, context| {
                check_class(node, context, &class_report)
            })
            .on_enter(NodeKind::ImportDecl, move |node, context| {
                // An expose list declares its entries instead of the module.
                if let NodeData::ImportDecl { rename, expose, .. } = &node.data {
                    if rename.is_some() || expose.is_empty() {
                        let (scopes, scope) = (context.scopes(), context.scope());
                        check_declaration(node, scopes, scope, "import", &import_report);
                    }
                }
            })
            .on_enter(NodeKind::GenericParam, move |node, context| {
                let scopes = context.scopes();
                let mut scope = context.scope();
                let current = scopes.get(scope);
                if current.kind() == ScopeKind::Class {
                    scope = current.parent().unwrap_or(scope);
                }
                check_declaration(node, scopes, scope, "generic", &report);
            });
    }
}
