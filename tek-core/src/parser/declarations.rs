use crate::ast::{Node, NodeData};
use crate::lexer::TokenKind;

use super::{ParseResult, Parser};

/// `var name (: Type)? (= value)?`
///
/// Without an initializer the declaration is an `EmptyVariableDecl`.
pub(crate) fn var_decl(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let (identifier, variable_type) = parser.var_loc("'var'")?;

    let data = if parser.match_kind(TokenKind::Equal) {
        NodeData::VariableDecl {
            identifier,
            variable_type,
            value: Box::new(parser.expression()?),
        }
    } else {
        NodeData::EmptyVariableDecl {
            identifier,
            variable_type,
        }
    };

    let span = parser.span_from(start);
    parser.end_of_statement("the variable declaration")?;
    Ok(parser.node(span, data))
}

/// A function with a body, or a bare signature when no block follows.
pub(crate) fn function_decl(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let identifier = parser.consume(
        TokenKind::Identifier,
        "Expected an identifier after 'function'",
    )?;

    let generic_params = if parser.match_kind(TokenKind::Less) {
        parser.generic_params()?
    } else {
        Vec::new()
    };

    parser.consume(TokenKind::LeftParen, "Expected '(' after the function name")?;
    let params = parser.param_list()?;
    let return_type = if parser.match_kind(TokenKind::Colon) {
        Some(Box::new(parser.type_decl()?))
    } else {
        None
    };

    if !parser.starts_block() {
        let span = parser.span_from(start);
        parser.end_of_statement("the function signature")?;
        return Ok(parser.node(
            span,
            NodeData::EmptyFunctionDecl {
                identifier,
                generic_params,
                params,
                return_type,
            },
        ));
    }

    let body = parser.block("the function signature")?;
    let span = parser.span_from(start);
    Ok(parser.node(
        span,
        NodeData::FunctionDecl {
            identifier,
            generic_params,
            params,
            return_type,
            body,
        },
    ))
}

/// `class Name<T> extends A, B` followed by an optional member block.
pub(crate) fn class_decl(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let identifier = parser.consume(TokenKind::Identifier, "Expected an identifier after 'class'")?;

    let generic_params = if parser.match_kind(TokenKind::Less) {
        parser.generic_params()?
    } else {
        Vec::new()
    };

    let mut extends = Vec::new();
    if parser.match_kind(TokenKind::Extends) {
        loop {
            extends.push(parser.type_decl()?);
            if !parser.match_kind(TokenKind::Comma) {
                break;
            }
        }
    }

    let mut constructors = Vec::new();
    let mut static_body = Vec::new();
    let mut instance_body = Vec::new();

    if parser.starts_block() {
        let message = "Expected a newline and indent after the class signature";
        parser.consume(TokenKind::Newline, message)?;
        parser.sync_indentation();
        parser.consume(TokenKind::Indent, message)?;

        while !parser.match_kind(TokenKind::Outdent) {
            if parser.is_at_end() {
                return Err(parser.error_at_current("Expected the class body to end"));
            }
            if parser.check(TokenKind::New) && parser.peek_at(1).kind == TokenKind::LeftParen {
                parser.advance();
                constructors.push(constructor(parser)?);
                continue;
            }

            let member_start = parser.peek().span;
            let is_static = parser.match_kind(TokenKind::Static);
            // A class body may hold bare `var` declarations.
            let value = if parser.match_kind(TokenKind::Var) {
                var_decl(parser)?
            } else {
                parser.declaration()?
            };
            let span = member_start.to(value.span);
            let member = parser.node(
                span,
                NodeData::ClassProp {
                    is_static,
                    value: Box::new(value),
                },
            );
            if is_static {
                static_body.push(member);
            } else {
                instance_body.push(member);
            }
        }
    } else {
        parser.end_of_statement("the class signature")?;
    }

    let span = parser.span_from(start);
    Ok(parser.node(
        span,
        NodeData::ClassDecl {
            identifier,
            generic_params,
            extends,
            constructors,
            static_body,
            instance_body,
        },
    ))
}

/// `new(params)` inside a class body, with an optional block.
fn constructor(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    parser.consume(TokenKind::LeftParen, "Expected '(' after 'new'")?;
    let params = parser.param_list()?;

    let body = if parser.starts_block() {
        parser.block("the constructor signature")?
    } else {
        parser.end_of_statement("the constructor signature")?;
        Vec::new()
    };

    let span = parser.span_from(start);
    Ok(parser.node(span, NodeData::Constructor { params, body }))
}

/// `import a.b (as c | (x, y as z))?`
pub(crate) fn import_decl(parser: &mut Parser) -> ParseResult<Node> {
    let start = parser.previous().span;
    let mut path = vec![parser.consume(
        TokenKind::Identifier,
        "Expected an identifier after 'import'",
    )?];
    while parser.match_kind(TokenKind::Dot) {
        path.push(parser.consume(TokenKind::Identifier, "Expected an identifier after '.'")?);
    }

    let mut rename = None;
    let mut expose = Vec::new();
    if parser.match_kind(TokenKind::As) {
        rename = Some(parser.consume(TokenKind::Identifier, "Expected an identifier after 'as'")?);
    } else if parser.match_kind(TokenKind::LeftParen) {
        while !parser.match_kind(TokenKind::RightParen) {
            let value = parser.consume(
                TokenKind::Identifier,
                "Expected an identifier in the import list",
            )?;
            let exposed_rename = if parser.match_kind(TokenKind::As) {
                Some(parser.consume(TokenKind::Identifier, "Expected an identifier after 'as'")?)
            } else {
                None
            };
            let span = parser.span_from(value.span);
            expose.push(parser.node(
                span,
                NodeData::ImportExpose {
                    value,
                    rename: exposed_rename,
                },
            ));
            if !parser.check(TokenKind::RightParen) {
                parser.consume(TokenKind::Comma, "Expected ',' or ')' in the import list")?;
            }
        }
    }

    let span = parser.span_from(start);
    parser.end_of_statement("the import")?;
    Ok(parser.node(span, NodeData::ImportDecl { path, rename, expose }))
}
