//! Shared grammar fragments: blocks, type annotations and comma lists.

use crate::ast::{Node, NodeData};
use crate::lexer::{Token, TokenKind};

use super::{ParseError, ParseResult, Parser};

impl Parser {
    /// Skip redundant line breaks before an expected `Indent`.
    pub(crate) fn sync_indentation(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Whether the upcoming tokens open an indented block.
    pub(crate) fn starts_block(&self) -> bool {
        let mut offset = 0;
        while self.peek_at(offset).kind == TokenKind::Newline {
            offset += 1;
        }
        offset > 0 && self.peek_at(offset).kind == TokenKind::Indent
    }

    /// Parse `NEWLINE INDENT declaration* OUTDENT`.
    pub(crate) fn block(&mut self, after: &str) -> ParseResult<Vec<Node>> {
        let message = format!("Expected a newline and indent after {after}");
        self.consume(TokenKind::Newline, &message)?;
        self.sync_indentation();
        self.consume(TokenKind::Indent, &message)?;
        self.block_body()
    }

    /// Declarations up to and including the closing `Outdent`.
    pub(crate) fn block_body(&mut self) -> ParseResult<Vec<Node>> {
        let mut body = Vec::new();
        while !self.match_kind(TokenKind::Outdent) {
            if self.is_at_end() {
                return Err(self.error_at_current("Expected the block to end"));
            }
            body.push(self.declaration()?);
        }
        Ok(body)
    }

    /// Whether the statement that was just parsed is properly terminated.
    ///
    /// A statement ends at a newline, before the end of its block or the
    /// input, or right after a nested block closed.
    pub(crate) fn at_statement_end(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Newline | TokenKind::Outdent | TokenKind::Eof
        ) || self.previous().kind == TokenKind::Outdent
    }

    pub(crate) fn end_of_statement(&mut self, what: &str) -> ParseResult<()> {
        if self.match_kind(TokenKind::Newline) || self.at_statement_end() {
            return Ok(());
        }
        Err(self.error_at_current(format!("Expected a newline after {what}")))
    }

    /// `IDENT (':' type)?`, shared by `var`, `for` and `catch`.
    pub(crate) fn var_loc(&mut self, after: &str) -> ParseResult<(Token, Option<Box<Node>>)> {
        let identifier = self.consume(
            TokenKind::Identifier,
            &format!("Expected an identifier after {after}"),
        )?;
        let variable_type = if self.match_kind(TokenKind::Colon) {
            Some(Box::new(self.type_decl()?))
        } else {
            None
        };
        Ok((identifier, variable_type))
    }

    /// `IDENT ('.' IDENT)* generics? ('[' ']')*`
    pub(crate) fn type_decl(&mut self) -> ParseResult<Node> {
        let first = self.consume(TokenKind::Identifier, "Expected a type")?;
        let start = first.span;
        let mut path = vec![first];
        while self.match_kind(TokenKind::Dot) {
            path.push(self.consume(TokenKind::Identifier, "Expected an identifier after '.'")?);
        }

        let generics = if self.match_kind(TokenKind::Less) {
            self.generic_args()?
        } else {
            Vec::new()
        };

        let mut array_depth = 0;
        while self.match_kind(TokenKind::LeftBracket) {
            self.consume(TokenKind::RightBracket, "Expected ']' after '['")?;
            array_depth += 1;
        }

        let span = self.span_from(start);
        Ok(self.node(
            span,
            NodeData::VariableType {
                path,
                generics,
                array_depth,
            },
        ))
    }

    /// Generic parameters after the opening `<`. A trailing comma is allowed.
    pub(crate) fn generic_params(&mut self) -> ParseResult<Vec<Node>> {
        let mut params = Vec::new();
        while !self.match_kind(TokenKind::Greater) {
            let identifier = self.consume(
                TokenKind::Identifier,
                "Expected an identifier in the generic parameter list",
            )?;
            let extends = if self.match_kind(TokenKind::Extends) {
                Some(Box::new(self.type_decl()?))
            } else {
                None
            };
            let span = self.span_from(identifier.span);
            params.push(self.node(span, NodeData::GenericParam { identifier, extends }));

            if !self.match_kind(TokenKind::Comma) {
                self.consume(TokenKind::Greater, "Expected ',' or '>'")?;
                break;
            }
        }
        Ok(params)
    }

    /// Generic type arguments after the opening `<`.
    pub(crate) fn generic_args(&mut self) -> ParseResult<Vec<Node>> {
        let mut args = Vec::new();
        while !self.match_kind(TokenKind::Greater) {
            args.push(self.type_decl()?);
            if !self.match_kind(TokenKind::Comma) {
                self.consume(TokenKind::Greater, "Expected ',' or '>'")?;
                break;
            }
        }
        Ok(args)
    }

    /// `(name: Type, ...)` after the opening `(`.
    pub(crate) fn param_list(&mut self) -> ParseResult<Vec<Node>> {
        let mut params = Vec::new();
        while !self.match_kind(TokenKind::RightParen) {
            let identifier = self.consume(TokenKind::Identifier, "Expected a parameter name")?;
            self.consume(TokenKind::Colon, "Expected ':' after the parameter name")?;
            let variable_type = Box::new(self.type_decl()?);
            let span = self.span_from(identifier.span);
            params.push(self.node(
                span,
                NodeData::Parameter {
                    identifier,
                    variable_type,
                },
            ));

            if !self.check(TokenKind::RightParen) {
                self.consume(TokenKind::Comma, "Expected ',' or ')' after the parameter")?;
            }
        }
        Ok(params)
    }

    /// Comma separated expressions up to and including `closing`.
    pub(crate) fn expression_list(&mut self, closing: TokenKind) -> ParseResult<Vec<Node>> {
        let mut items = Vec::new();
        while !self.match_kind(closing) {
            if self.is_at_end() {
                return Err(self.error_at_current(format!("Expected '{closing}'")));
            }
            items.push(self.expression()?);
            if !self.check(closing) {
                self.consume(TokenKind::Comma, &format!("Expected ',' or '{closing}'"))?;
            }
        }
        Ok(items)
    }

    /// Bracket-balanced lookahead deciding whether the `<` just consumed
    /// opens the generic arguments of a call such as `f<int>(x)`.
    pub(crate) fn looks_like_generic_call(&self) -> bool {
        let mut depth = 1;
        let mut offset = 0;
        loop {
            match self.peek_at(offset).kind {
                TokenKind::Identifier
                | TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::LeftBracket
                | TokenKind::RightBracket => {}
                TokenKind::Less => depth += 1,
                TokenKind::Greater => {
                    depth -= 1;
                    if depth == 0 {
                        return self.peek_at(offset + 1).kind == TokenKind::LeftParen;
                    }
                }
                _ => return false,
            }
            offset += 1;
        }
    }
}

impl From<&Token> for ParseError {
    fn from(token: &Token) -> Self {
        ParseError::new(format!("Unexpected token '{}'", token.lexeme), token.span)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Node, NodeData, NodeKind};
    use crate::parser::tests::{body, parse_source};

    fn first_type(source: &str) -> Node {
        let output = parse_source(source);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        match &body(&output)[0].data {
            NodeData::EmptyVariableDecl {
                variable_type: Some(ty),
                ..
            } => (**ty).clone(),
            other => panic!("expected typed variable, got {other:?}"),
        }
    }

    #[test]
    fn parses_dotted_generic_array_type() {
        let ty = first_type("var x: a.List<int, Map<string, B>,>[][]\n");
        match ty.data {
            NodeData::VariableType {
                path,
                generics,
                array_depth,
            } => {
                let names: Vec<_> = path.iter().map(|t| t.lexeme.as_str()).collect();
                assert_eq!(names, vec!["a", "List"]);
                assert_eq!(generics.len(), 2);
                assert_eq!(generics[1].kind(), NodeKind::VariableType);
                assert_eq!(array_depth, 2);
            }
            other => panic!("expected type, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unclosed_array_marker() {
        let output = parse_source("var x: int[\n");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].message, "Expected ']' after '['");
    }

    #[test]
    fn rejects_bad_generic_separator() {
        let output = parse_source("function f<T U>()\n");
        assert_eq!(output.diagnostics[0].message, "Expected ',' or '>'");
    }

    #[test]
    fn parses_parameter_list() {
        let output = parse_source("function f(a: int, b: string[])\n");
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        match &body(&output)[0].data {
            NodeData::EmptyFunctionDecl { params, .. } => {
                let names: Vec<_> = params
                    .iter()
                    .filter_map(|p| p.declared_name())
                    .map(|t| t.lexeme.as_str())
                    .collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("expected function signature, got {other:?}"),
        }
    }

    #[test]
    fn reports_missing_parameter_type() {
        let output = parse_source("function f(a)\n");
        assert_eq!(
            output.diagnostics[0].message,
            "Expected ':' after the parameter name"
        );
    }
}
