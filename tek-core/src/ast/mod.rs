//! Syntax tree produced by the parser.
//!
//! Nodes own their children. Later passes never rewrite the tree; they key
//! side tables by [`NodeId`] instead.

mod nodes;

pub use nodes::{NodeData, NodeKind};

use crate::lexer::Token;
use crate::span::Span;

/// Identity of a node within one parse.
///
/// Ids are handed out by the parser in creation order, so parsing the same
/// tokens twice yields the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub span: Span,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: NodeId, span: Span, data: NodeData) -> Self {
        Self { id, span, data }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn is_declaration(&self) -> bool {
        self.kind().is_declaration()
    }

    pub fn is_expression(&self) -> bool {
        self.kind().is_expression()
    }

    pub fn is_statement(&self) -> bool {
        self.kind().is_statement()
    }

    pub fn is_other(&self) -> bool {
        self.kind().is_other()
    }

    /// The name a declaration-like node introduces, if any.
    pub fn declared_name(&self) -> Option<&Token> {
        match &self.data {
            NodeData::EmptyVariableDecl { identifier, .. }
            | NodeData::VariableDecl { identifier, .. }
            | NodeData::EmptyFunctionDecl { identifier, .. }
            | NodeData::FunctionDecl { identifier, .. }
            | NodeData::ClassDecl { identifier, .. }
            | NodeData::ForStmt { identifier, .. }
            | NodeData::Parameter { identifier, .. }
            | NodeData::GenericParam { identifier, .. }
            | NodeData::CatchClause { identifier, .. } => Some(identifier),
            NodeData::ImportDecl { path, rename, .. } => rename.as_ref().or(path.last()),
            NodeData::ImportExpose { value, rename } => Some(rename.as_ref().unwrap_or(value)),
            _ => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        let mut out: Vec<&Node> = Vec::new();
        match &self.data {
            NodeData::EmptyVariableDecl { variable_type, .. } => {
                out.extend(variable_type.as_deref());
            }
            NodeData::VariableDecl {
                variable_type,
                value,
                ..
            } => {
                out.extend(variable_type.as_deref());
                out.push(value);
            }
            NodeData::EmptyFunctionDecl {
                generic_params,
                params,
                return_type,
                ..
            } => {
                out.extend(generic_params);
                out.extend(params);
                out.extend(return_type.as_deref());
            }
            NodeData::FunctionDecl {
                generic_params,
                params,
                return_type,
                body,
                ..
            } => {
                out.extend(generic_params);
                out.extend(params);
                out.extend(return_type.as_deref());
                out.extend(body);
            }
            NodeData::ClassDecl {
                generic_params,
                extends,
                constructors,
                static_body,
                instance_body,
                ..
            } => {
                out.extend(generic_params);
                out.extend(extends);
                let mut members: Vec<&Node> = constructors
                    .iter()
                    .chain(static_body)
                    .chain(instance_body)
                    .collect();
                members.sort_by_key(|member| member.span.start);
                out.extend(members);
            }
            NodeData::ImportDecl { expose, .. } => out.extend(expose),
            NodeData::AssignmentExpr { target, value } => {
                out.push(target);
                out.push(value);
            }
            NodeData::WrappedExpr { inner } | NodeData::AsyncExpr { inner } => out.push(inner),
            NodeData::UnaryExpr { operand, .. } => out.push(operand),
            NodeData::BinaryExpr { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            NodeData::CallExpr {
                callee,
                generic_args,
                args,
            } => {
                out.push(callee);
                out.extend(generic_args);
                out.extend(args);
            }
            NodeData::IndexExpr { object, index } => {
                out.push(object);
                out.push(index);
            }
            NodeData::MemberExpr { object, .. } => out.push(object),
            NodeData::NewExpr { class_type, args } => {
                out.push(class_type);
                out.extend(args);
            }
            NodeData::InstanceofExpr { value, class_type } => {
                out.push(value);
                out.push(class_type);
            }
            NodeData::ArrayExpr { elements } => out.extend(elements),
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
                out.push(condition);
                out.extend(body);
                out.extend(else_clause.as_deref());
            }
            NodeData::ElseExpr { body }
            | NodeData::ElseStmt { body }
            | NodeData::Program { body } => out.extend(body),
            NodeData::SwitchStmt { subject, cases } => {
                out.push(subject);
                out.extend(cases);
            }
            NodeData::ForStmt {
                variable_type,
                iterable,
                body,
                ..
            } => {
                out.extend(variable_type.as_deref());
                out.push(iterable);
                out.extend(body);
            }
            NodeData::RepeatStmt { amount, body } => {
                out.push(amount);
                out.extend(body);
            }
            NodeData::WhileStmt { condition, body } => {
                out.push(condition);
                out.extend(body);
            }
            NodeData::TryStmt { body, catch_clause } => {
                out.extend(body);
                out.push(catch_clause);
            }
            NodeData::ThrowStmt { value } | NodeData::YieldStmt { value } => out.push(value),
            NodeData::ReturnStmt { value } => out.extend(value.as_deref()),
            NodeData::ExpressionStmt { expression } => out.push(expression),
            NodeData::VariableType { generics, .. } => out.extend(generics),
            NodeData::Parameter { variable_type, .. } => out.push(variable_type),
            NodeData::GenericParam { extends, .. } => out.extend(extends.as_deref()),
            NodeData::ClassProp { value, .. } => out.push(value),
            NodeData::Constructor { params, body } => {
                out.extend(params);
                out.extend(body);
            }
            NodeData::SwitchCase { conditions, body } => {
                out.extend(conditions);
                out.extend(body);
            }
            NodeData::CatchClause {
                variable_type,
                body,
                ..
            } => {
                out.extend(variable_type.as_deref());
                out.extend(body);
            }
            NodeData::Identifier(_)
            | NodeData::This
            | NodeData::Super
            | NodeData::NumberLiteral(_)
            | NodeData::StringLiteral(_)
            | NodeData::BooleanLiteral(_)
            | NodeData::ImportExpose { .. }
            | NodeData::BreakStmt
            | NodeData::ContinueStmt
            | NodeData::FallthroughStmt => {}
        }
        out
    }

    /// This node and all of its descendants, in pre-order.
    pub fn descendants(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children = node.children();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;
    use crate::span::Position;

    #[test]
    fn kinds_partition_into_exactly_one_category() {
        for kind in NodeKind::ALL {
            let hits = [
                kind.is_declaration(),
                kind.is_expression(),
                kind.is_statement(),
                kind.is_other(),
            ]
            .into_iter()
            .filter(|hit| *hit)
            .count();
            assert_eq!(hits, 1, "{kind:?} belongs to {hits} categories");
        }
    }

    #[test]
    fn all_lists_kinds_in_discriminant_order() {
        for (index, kind) in NodeKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
    }

    #[test]
    fn import_declares_alias_before_last_segment() {
        let span = Span::new(Position::new(0, 0), Position::new(0, 1));
        let token = |text: &str| Token::new(TokenKind::Identifier, text, span);
        let plain = Node::new(
            NodeId(0),
            span,
            NodeData::ImportDecl {
                path: vec![token("a"), token("b")],
                rename: None,
                expose: Vec::new(),
            },
        );
        assert_eq!(plain.declared_name().map(|t| t.lexeme.as_str()), Some("b"));

        let renamed = Node::new(
            NodeId(1),
            span,
            NodeData::ImportDecl {
                path: vec![token("a"), token("b")],
                rename: Some(token("c")),
                expose: Vec::new(),
            },
        );
        assert_eq!(renamed.declared_name().map(|t| t.lexeme.as_str()), Some("c"));
    }
}
