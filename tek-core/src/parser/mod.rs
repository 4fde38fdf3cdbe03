//! Token-to-tree parser.
//!
//! Expressions are parsed by precedence climbing over the table in
//! [`rules`]; declarations and statements are dispatched by their leading
//! keyword. A failed top-level declaration is recorded as a diagnostic and
//! the parser resynchronizes at the next keyword that can safely start a
//! new construct.

mod declarations;
mod expressions;
mod rules;
mod statements;
mod support;

pub use rules::Precedence;

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{Node, NodeData, NodeId};
use crate::diagnostic::Diagnostic;
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

/// Tree plus everything that went wrong while building it.
///
/// A program is always produced. Non-empty diagnostics mean the tree is a
/// best-effort reconstruction and should not be trusted semantically.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Node,
    pub diagnostics: Vec<Diagnostic>,
}

/// Unwinds the parser to the enclosing top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub(crate) struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error("parser", self.message, self.span)
    }
}

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Parse a token sequence into a `Program` node.
///
/// A missing trailing `Eof` token is tolerated.
pub fn parse(tokens: Vec<Token>) -> ParseOutput {
    Parser::new(tokens).parse_program()
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    current: usize,
    next_id: u32,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|token| token.kind != TokenKind::Eof) {
            let end = tokens.last().map(|token| token.span.end).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, "", Span::new(end, end)));
        }
        Self {
            tokens,
            current: 0,
            next_id: 0,
            diagnostics: Vec::new(),
        }
    }

    fn parse_program(mut self) -> ParseOutput {
        let start = self.peek().span;
        let mut body = Vec::new();

        while !self.is_at_end() {
            // Stray layout tokens only show up after an earlier error.
            if self.match_any(&[TokenKind::Newline, TokenKind::Outdent]) {
                continue;
            }

            let before = self.current;
            match self.declaration() {
                Ok(node) => body.push(node),
                Err(error) => {
                    trace!(message = %error, position = %error.span.start, "parse error");
                    self.diagnostics.push(error.into_diagnostic());
                    if self.current == before {
                        self.advance();
                    }
                    self.synchronize();
                }
            }
        }

        let span = start.to(self.peek().span);
        let program = self.node(span, NodeData::Program { body });
        debug!(
            nodes = self.next_id,
            diagnostics = self.diagnostics.len(),
            "parsed program"
        );
        ParseOutput {
            program,
            diagnostics: self.diagnostics,
        }
    }

    /// Skip tokens until one that starts a construct we can parse again.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Switch
                | TokenKind::Function
                | TokenKind::Import
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Var => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub(crate) fn declaration(&mut self) -> ParseResult<Node> {
        if let Some(parse) = rules::declaration_rule(self.peek().kind) {
            self.advance();
            return parse(self);
        }
        self.statement()
    }

    fn statement(&mut self) -> ParseResult<Node> {
        if let Some(parse) = rules::statement_rule(self.peek().kind) {
            self.advance();
            return parse(self);
        }
        statements::expression_stmt(self)
    }

    pub(crate) fn expression(&mut self) -> ParseResult<Node> {
        self.parse_precedence(Precedence::Assignment)
    }

    pub(crate) fn parse_precedence(&mut self, precedence: Precedence) -> ParseResult<Node> {
        if self.is_at_end() {
            return Err(self.error_at_current("Expected an expression"));
        }
        let token = self.advance().clone();
        if token.kind == TokenKind::Abstract {
            return Err(ParseError::new(
                format!("'{}' is a reserved word", token.lexeme),
                token.span,
            ));
        }
        let Some(prefix) = rules::rule(token.kind).prefix else {
            return Err(ParseError::new(
                "Expected a declaration, expression, or statement",
                token.span,
            ));
        };
        let mut left = prefix(self)?;

        while precedence <= rules::rule(self.peek().kind).precedence {
            let token = self.advance().clone();
            let Some(infix) = rules::rule(token.kind).infix else {
                return Err(ParseError::from(&token));
            };
            left = infix(self, left)?;
        }

        Ok(left)
    }

    pub(crate) fn node(&mut self, span: Span, data: NodeData) -> Node {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Node::new(id, span, data)
    }

    /// Span from `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        start.to(self.previous().span)
    }

    pub(crate) fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + offset).min(last)]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|&kind| self.match_kind(kind))
    }

    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        Err(self.error_at_current(message))
    }

    pub(crate) fn error_at_current(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.peek().span)
    }
}
