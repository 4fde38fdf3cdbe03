//! Prefix and infix handlers referenced from the rule table.
//!
//! Prefix handlers run with their leading token already consumed and
//! available as `previous()`; infix handlers additionally receive the
//! operand parsed so far.

use crate::ast::{Node, NodeData};
use crate::lexer::TokenKind;

use super::rules::{self, Precedence};
use super::{ParseError, ParseResult, Parser};

pub(crate) fn literal(parser: &mut Parser) -> ParseResult<Node> {
    let token = parser.previous().clone();
    let span = token.span;
    let data = match token.kind {
        TokenKind::Identifier => NodeData::Identifier(token),
        TokenKind::Number => NodeData::NumberLiteral(token),
        TokenKind::String => NodeData::StringLiteral(token),
        TokenKind::Boolean => NodeData::BooleanLiteral(token),
        TokenKind::This => NodeData::This,
        TokenKind::Super => NodeData::Super,
        _ => return Err(ParseError::from(&token)),
    };
    Ok(parser.node(span, data))
}

pub(crate) fn wrapped(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let inner = Box::new(parser.expression()?);
    parser.consume(TokenKind::RightParen, "Expected ')' after the expression")?;
    let span = parser.span_from(start);
    Ok(parser.node(span, NodeData::WrappedExpr { inner }))
}

pub(crate) fn array(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let elements = parser.expression_list(TokenKind::RightBracket)?;
    let span = parser.span_from(start);
    Ok(parser.node(span, NodeData::ArrayExpr { elements }))
}

pub(crate) fn unary(parser: &mut Parser) -> ParseResult<Node> {
    let operator = parser.previous().clone();
    let operand = Box::new(parser.parse_precedence(Precedence::Unary)?);
    let span = operator.span.to(operand.span);
    Ok(parser.node(span, NodeData::UnaryExpr { operator, operand }))
}

pub(crate) fn new_expr(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let class_type = Box::new(parser.type_decl()?);
    let args = if parser.match_kind(TokenKind::LeftParen) {
        parser.expression_list(TokenKind::RightParen)?
    } else {
        Vec::new()
    };
    let span = parser.span_from(start);
    Ok(parser.node(span, NodeData::NewExpr { class_type, args }))
}

pub(crate) fn async_expr(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let inner = Box::new(parser.parse_precedence(Precedence::Unary)?);
    let span = start.to(inner.span);
    Ok(parser.node(span, NodeData::AsyncExpr { inner }))
}

/// `if cond <block> (else (if ... | <block>))?` in expression position.
pub(crate) fn if_expr(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let condition = Box::new(parser.expression()?);
    let body = parser.block("the if condition")?;

    let else_clause = if parser.match_kind(TokenKind::Else) {
        let else_start = parser.previous().span;
        let body = if parser.match_kind(TokenKind::If) {
            vec![if_expr(parser)?]
        } else {
            parser.block("'else'")?
        };
        let span = parser.span_from(else_start);
        Some(Box::new(parser.node(span, NodeData::ElseExpr { body })))
    } else {
        None
    };

    let span = parser.span_from(start);
    Ok(parser.node(
        span,
        NodeData::IfExpr {
            condition,
            body,
            else_clause,
        },
    ))
}

pub(crate) fn binary(parser: &mut Parser, left: Node) -> ParseResult<Node> {
    let operator = parser.previous().clone();
    let precedence = rules::rule(operator.kind).precedence;
    // `^` groups to the right.
    let right_precedence = if operator.kind == TokenKind::Caret {
        precedence
    } else {
        precedence.next()
    };
    let right = Box::new(parser.parse_precedence(right_precedence)?);
    let span = left.span.to(right.span);
    Ok(parser.node(
        span,
        NodeData::BinaryExpr {
            left: Box::new(left),
            operator,
            right,
        },
    ))
}

/// `<` is either a comparison or the start of `callee<Types>(args)`.
pub(crate) fn less(parser: &mut Parser, left: Node) -> ParseResult<Node> {
    let callable = matches!(
        left.data,
        NodeData::Identifier(_) | NodeData::MemberExpr { .. }
    );
    if !callable || !parser.looks_like_generic_call() {
        return binary(parser, left);
    }

    let generic_args = parser.generic_args()?;
    parser.consume(TokenKind::LeftParen, "Expected '(' after the generic arguments")?;
    let args = parser.expression_list(TokenKind::RightParen)?;
    let span = parser.span_from(left.span);
    Ok(parser.node(
        span,
        NodeData::CallExpr {
            callee: Box::new(left),
            generic_args,
            args,
        },
    ))
}

pub(crate) fn assignment(parser: &mut Parser, left: Node) -> ParseResult<Node> {
    if !matches!(
        left.data,
        NodeData::Identifier(_) | NodeData::MemberExpr { .. } | NodeData::IndexExpr { .. }
    ) {
        return Err(ParseError::new("Invalid assignment target", left.span));
    }
    // Same level on the right makes `a = b = c` group as `a = (b = c)`.
    let value = Box::new(parser.parse_precedence(Precedence::Assignment)?);
    let span = left.span.to(value.span);
    Ok(parser.node(
        span,
        NodeData::AssignmentExpr {
            target: Box::new(left),
            value,
        },
    ))
}

pub(crate) fn call(parser: &mut Parser, left: Node) -> ParseResult<Node> {
    let args = parser.expression_list(TokenKind::RightParen)?;
    let span = parser.span_from(left.span);
    Ok(parser.node(
        span,
        NodeData::CallExpr {
            callee: Box::new(left),
            generic_args: Vec::new(),
            args,
        },
    ))
}

pub(crate) fn index(parser: &mut Parser, left: Node) -> ParseResult<Node> {
    let index = Box::new(parser.expression()?);
    parser.consume(TokenKind::RightBracket, "Expected ']' after the index")?;
    let span = parser.span_from(left.span);
    Ok(parser.node(
        span,
        NodeData::IndexExpr {
            object: Box::new(left),
            index,
        },
    ))
}

pub(crate) fn member(parser: &mut Parser, left: Node) -> ParseResult<Node> {
    if !parser.match_any(&[TokenKind::Identifier, TokenKind::Super]) {
        return Err(parser.error_at_current("Expected an identifier or 'super' after '.'"));
    }
    let property = parser.previous().clone();
    let span = left.span.to(property.span);
    Ok(parser.node(
        span,
        NodeData::MemberExpr {
            object: Box::new(left),
            property,
        },
    ))
}

pub(crate) fn instanceof(parser: &mut Parser, left: Node) -> ParseResult<Node> {
    let class_type = Box::new(parser.type_decl()?);
    let span = left.span.to(class_type.span);
    Ok(parser.node(
        span,
        NodeData::InstanceofExpr {
            value: Box::new(left),
            class_type,
        },
    ))
}

#[cfg(test)]
mod tests {
    use crate::ast::{Node, NodeData, NodeKind};
    use crate::parser::tests::{body, parse_source};

    fn expression(source: &str) -> Node {
        let output = parse_source(source);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        match &body(&output)[0].data {
            NodeData::ExpressionStmt { expression } => (**expression).clone(),
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn operator(node: &Node) -> &str {
        match &node.data {
            NodeData::BinaryExpr { operator, .. } => &operator.lexeme,
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    fn operands(node: &Node) -> (&Node, &Node) {
        match &node.data {
            NodeData::BinaryExpr { left, right, .. } => (left, right),
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let sum = expression("1 + 2 * 3\n");
        assert_eq!(operator(&sum), "+");
        assert_eq!(operator(operands(&sum).1), "*");

        let sum = expression("2 * 3 + 1\n");
        assert_eq!(operator(&sum), "+");
        assert_eq!(operator(operands(&sum).0), "*");
    }

    #[test]
    fn subtraction_is_left_associative() {
        let outer = expression("a - b - c\n");
        let (left, right) = operands(&outer);
        assert_eq!(operator(left), "-");
        assert_eq!(right.kind(), NodeKind::Identifier);
    }

    #[test]
    fn exponent_is_right_associative() {
        let outer = expression("a ^ b ^ c\n");
        let (left, right) = operands(&outer);
        assert_eq!(left.kind(), NodeKind::Identifier);
        assert_eq!(operator(right), "^");
    }

    #[test]
    fn logical_operators_bind_loosest() {
        let outer = expression("a == 1 or b < 2 and c\n");
        assert_eq!(operator(&outer), "or");
        let (left, right) = operands(&outer);
        assert_eq!(operator(left), "==");
        assert_eq!(operator(right), "and");
    }

    #[test]
    fn assignment_is_right_associative() {
        let outer = expression("a = b = 3\n");
        match outer.data {
            NodeData::AssignmentExpr { target, value } => {
                assert_eq!(target.kind(), NodeKind::Identifier);
                assert_eq!(value.kind(), NodeKind::AssignmentExpr);
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn parses_call_member_and_index_chains() {
        let chain = expression("a.b(1, 2)[0].super\n");
        assert_eq!(chain.kind(), NodeKind::MemberExpr);
        let index = chain.children()[0];
        assert_eq!(index.kind(), NodeKind::IndexExpr);
        let call = index.children()[0];
        match &call.data {
            NodeData::CallExpr { callee, args, .. } => {
                assert_eq!(callee.kind(), NodeKind::MemberExpr);
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn distinguishes_generic_calls_from_comparisons() {
        let call = expression("make<int, List<string>>(x)\n");
        match &call.data {
            NodeData::CallExpr { generic_args, args, .. } => {
                assert_eq!(generic_args.len(), 2);
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected generic call, got {other:?}"),
        }

        let comparison = expression("a < b\n");
        assert_eq!(operator(&comparison), "<");

        let chained = expression("a < b > (c)\n");
        assert_eq!(chained.kind(), NodeKind::CallExpr);
    }

    #[test]
    fn parses_prefix_forms() {
        assert_eq!(expression("-x\n").kind(), NodeKind::UnaryExpr);
        assert_eq!(expression("not x\n").kind(), NodeKind::UnaryExpr);
        assert_eq!(expression("(x)\n").kind(), NodeKind::WrappedExpr);
        assert_eq!(expression("[1, 2,]\n").kind(), NodeKind::ArrayExpr);
        assert_eq!(expression("async f()\n").kind(), NodeKind::AsyncExpr);
        assert_eq!(expression("this\n").kind(), NodeKind::This);
        assert_eq!(expression("'s'\n").kind(), NodeKind::StringLiteral);
        assert_eq!(expression("true\n").kind(), NodeKind::BooleanLiteral);
    }

    #[test]
    fn parses_new_and_instanceof() {
        let created = expression("new Box<int>(1)\n");
        match &created.data {
            NodeData::NewExpr { class_type, args } => {
                assert_eq!(class_type.kind(), NodeKind::VariableType);
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected new expression, got {other:?}"),
        }
        assert_eq!(expression("new Box\n").kind(), NodeKind::NewExpr);
        assert_eq!(
            expression("x instanceof Box\n").kind(),
            NodeKind::InstanceofExpr
        );
    }

    #[test]
    fn parses_if_expression_with_else_if() {
        let output = parse_source("var v = if a\n  yield 1\nelse if b\n  yield 2\nelse\n  yield 3\n");
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let NodeData::VariableDecl { value, .. } = &body(&output)[0].data else {
            panic!("expected variable declaration");
        };
        let NodeData::IfExpr { else_clause, .. } = &value.data else {
            panic!("expected if expression");
        };
        let else_clause = else_clause.as_ref().expect("else clause");
        let NodeData::ElseExpr { body } = &else_clause.data else {
            panic!("expected else expression");
        };
        assert_eq!(body[0].kind(), NodeKind::IfExpr);
    }

    #[test]
    fn reports_unexpected_member_property() {
        let output = parse_source("a.1\n");
        assert_eq!(
            output.diagnostics[0].message,
            "Expected an identifier or 'super' after '.'"
        );
    }
}
