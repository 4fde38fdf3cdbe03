use crate::ast::{Node, NodeData};
use crate::lexer::TokenKind;

use super::{ParseResult, Parser};

pub(crate) fn expression_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let expression = Box::new(parser.expression()?);
    let span = expression.span;
    parser.end_of_statement("the expression")?;
    Ok(parser.node(span, NodeData::ExpressionStmt { expression }))
}

pub(crate) fn if_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let condition = Box::new(parser.expression()?);
    let body = parser.block("the if condition")?;

    let else_clause = if parser.match_kind(TokenKind::Else) {
        let else_start = parser.previous().span;
        let body = if parser.match_kind(TokenKind::If) {
            vec![if_stmt(parser)?]
        } else {
            parser.block("'else'")?
        };
        let span = parser.span_from(else_start);
        Some(Box::new(parser.node(span, NodeData::ElseStmt { body })))
    } else {
        None
    };

    let span = parser.span_from(start);
    Ok(parser.node(
        span,
        NodeData::IfStmt {
            condition,
            body,
            else_clause,
        },
    ))
}

pub(crate) fn for_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let (identifier, variable_type) = parser.var_loc("'for'")?;
    parser.consume(TokenKind::In, "Expected 'in' after the loop variable")?;
    let iterable = Box::new(parser.expression()?);
    let body = parser.block("the for header")?;
    let span = parser.span_from(start);
    Ok(parser.node(
        span,
        NodeData::ForStmt {
            identifier,
            variable_type,
            iterable,
            body,
        },
    ))
}

pub(crate) fn while_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let condition = Box::new(parser.expression()?);
    let body = parser.block("the while condition")?;
    let span = parser.span_from(start);
    Ok(parser.node(span, NodeData::WhileStmt { condition, body }))
}

pub(crate) fn repeat_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let amount = Box::new(parser.expression()?);
    parser.consume(TokenKind::Times, "Expected 'times' after the repeat amount")?;
    let body = parser.block("'times'")?;
    let span = parser.span_from(start);
    Ok(parser.node(span, NodeData::RepeatStmt { amount, body }))
}

pub(crate) fn switch_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let subject = Box::new(parser.expression()?);
    let message = "Expected a newline and indent after the switch expression";
    parser.consume(TokenKind::Newline, message)?;
    parser.sync_indentation();
    parser.consume(TokenKind::Indent, message)?;

    let mut cases = Vec::new();
    while !parser.match_kind(TokenKind::Outdent) {
        let case = parser.consume(TokenKind::Case, "Expected 'case'")?;
        let mut conditions = vec![parser.expression()?];
        while parser.match_kind(TokenKind::Comma) {
            conditions.push(parser.expression()?);
        }
        let body = parser.block("the case conditions")?;
        let span = parser.span_from(case.span);
        cases.push(parser.node(span, NodeData::SwitchCase { conditions, body }));
    }

    let span = parser.span_from(start);
    Ok(parser.node(span, NodeData::SwitchStmt { subject, cases }))
}

pub(crate) fn try_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let body = parser.block("'try'")?;

    let catch = parser.consume(TokenKind::Catch, "Expected 'catch' after the try block")?;
    let (identifier, variable_type) = parser.var_loc("'catch'")?;
    let catch_body = parser.block("the catch variable")?;
    let span = parser.span_from(catch.span);
    let catch_clause = Box::new(parser.node(
        span,
        NodeData::CatchClause {
            identifier,
            variable_type,
            body: catch_body,
        },
    ));

    let span = parser.span_from(start);
    Ok(parser.node(span, NodeData::TryStmt { body, catch_clause }))
}

pub(crate) fn return_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let value = if parser.at_statement_end() {
        None
    } else {
        Some(Box::new(parser.expression()?))
    };
    let span = parser.span_from(start);
    parser.end_of_statement("'return'")?;
    Ok(parser.node(span, NodeData::ReturnStmt { value }))
}

pub(crate) fn throw_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let value = Box::new(parser.expression()?);
    let span = parser.span_from(start);
    parser.end_of_statement("'throw'")?;
    Ok(parser.node(span, NodeData::ThrowStmt { value }))
}

pub(crate) fn yield_stmt(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let value = Box::new(parser.expression()?);
    let span = parser.span_from(start);
    parser.end_of_statement("'yield'")?;
    Ok(parser.node(span, NodeData::YieldStmt { value }))
}

pub(crate) fn break_stmt(parser: &mut Parser) -> ParseResult<Node> {
    keyword_stmt(parser, "'break'", NodeData::BreakStmt)
}

pub(crate) fn continue_stmt(parser: &mut Parser) -> ParseResult<Node> {
    keyword_stmt(parser, "'continue'", NodeData::ContinueStmt)
}

pub(crate) fn fallthrough_stmt(parser: &mut Parser) -> ParseResult<Node> {
    keyword_stmt(parser, "'fallthrough'", NodeData::FallthroughStmt)
}

fn keyword_stmt(parser: &mut Parser, what: &str, data: NodeData) -> ParseResult<Node> {
    let span = parser.previous().span;
    parser.end_of_statement(what)?;
    Ok(parser.node(span, data))
}
