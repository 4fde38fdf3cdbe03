//! Lexer for Tek source text.
//!
//! Besides ordinary tokens the lexer encodes block structure with synthetic
//! `Newline`, `Indent` and `Outdent` tokens, so the parser never has to look
//! at raw whitespace.

use std::fmt;

use tracing::trace;

use crate::diagnostic::Diagnostic;
use crate::span::{Position, Span};

const TAB_WIDTH: u32 = 4;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Layout
    Newline,
    Indent,
    Outdent,
    Eof,

    // Identifiers and literals
    Identifier,
    Number,
    String,
    Boolean,

    // Punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,
    Dot,          // .
    Colon,        // :

    // Operators
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    Caret,        // ^
    Equal,        // =
    EqualEqual,   // ==
    BangEqual,    // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=

    // Keywords
    Class,
    Extends,
    New,
    Abstract,
    Static,
    This,
    Super,
    Instanceof,
    If,
    Else,
    Function,
    Return,
    Async,
    Import,
    As,
    For,
    In,
    While,
    Repeat,
    Times,
    Switch,
    Case,
    Fallthrough,
    Try,
    Catch,
    Throw,
    Continue,
    Break,
    Yield,
    And,
    Or,
    Not,
    Var,
}

impl TokenKind {
    /// Human readable form used in parse diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Outdent => "outdent",
            TokenKind::Eof => "end of input",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Boolean => "boolean",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Class => "class",
            TokenKind::Extends => "extends",
            TokenKind::New => "new",
            TokenKind::Abstract => "abstract",
            TokenKind::Static => "static",
            TokenKind::This => "this",
            TokenKind::Super => "super",
            TokenKind::Instanceof => "instanceof",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::Async => "async",
            TokenKind::Import => "import",
            TokenKind::As => "as",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::While => "while",
            TokenKind::Repeat => "repeat",
            TokenKind::Times => "times",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Fallthrough => "fallthrough",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Throw => "throw",
            TokenKind::Continue => "continue",
            TokenKind::Break => "break",
            TokenKind::Yield => "yield",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Var => "var",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A single token: its kind, the source text it covers and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

/// Result of lexing a source file.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lex a source string into tokens.
///
/// Lexing never fails: characters that cannot start a token are reported
/// and skipped. The token list always ends with `Eof`.
pub fn lex(source: &str) -> LexResult {
    let mut lexer = Lexer {
        source,
        chars: source.as_bytes(),
        index: 0,
        line: 0,
        column: 0,
        indents: vec![0],
        nesting: 0,
        at_line_start: true,
        line_has_tokens: false,
        tokens: Vec::new(),
        diagnostics: Vec::new(),
    };
    lexer.run();
    trace!(tokens = lexer.tokens.len(), "lexed source");
    LexResult {
        tokens: lexer.tokens,
        diagnostics: lexer.diagnostics,
    }
}

struct Lexer<'src> {
    source: &'src str,
    chars: &'src [u8],
    index: usize,
    line: u32,
    column: u32,
    /// Widths of the currently open indentation levels, outermost first.
    indents: Vec<u32>,
    /// Depth of open `(` and `[`; line breaks inside them are ignored.
    nesting: u32,
    at_line_start: bool,
    line_has_tokens: bool,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) {
        loop {
            if self.at_line_start && self.nesting == 0 {
                if !self.line_indentation() {
                    break;
                }
                continue;
            }

            let Some(ch) = self.peek_char() else {
                break;
            };

            match ch {
                b' ' | b'\t' | b'\r' => self.consume_char(),
                b'\n' => self.line_break(),
                b'#' => self.skip_comment(),
                _ => self.token(ch),
            }
        }

        let end = self.position();
        let eof = Span::new(end, end);
        if self.line_has_tokens {
            self.push(TokenKind::Newline, "", eof);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Outdent, "", eof);
        }
        self.push(TokenKind::Eof, "", eof);
    }

    /// Measure the indentation of a new line and emit layout tokens.
    ///
    /// Blank and comment-only lines are consumed whole without affecting
    /// indentation. Returns `false` at end of input.
    fn line_indentation(&mut self) -> bool {
        let start = self.position();
        let mut width = 0;
        while let Some(ch) = self.peek_char() {
            match ch {
                b' ' => width += 1,
                b'\t' => width += TAB_WIDTH,
                _ => break,
            }
            self.consume_char();
        }

        match self.peek_char() {
            None => return false,
            Some(b'\r' | b'\n' | b'#') => {
                self.skip_comment();
                if self.peek_char() == Some(b'\n') {
                    self.consume_char();
                }
                return true;
            }
            Some(_) => {}
        }

        self.at_line_start = false;
        let span = Span::new(start, self.position());
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent, "", span);
        } else if width < current {
            while self.indents.last().is_some_and(|&level| level > width) {
                self.indents.pop();
                self.push(TokenKind::Outdent, "", span);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                self.diagnostics.push(Diagnostic::error(
                    "lexer",
                    "Inconsistent indentation",
                    span,
                ));
            }
        }
        true
    }

    fn line_break(&mut self) {
        let start = self.position();
        self.consume_char();
        if self.nesting > 0 {
            return;
        }
        if self.line_has_tokens {
            self.push(TokenKind::Newline, "\n", Span::new(start, self.position()));
        }
        self.line_has_tokens = false;
        self.at_line_start = true;
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == b'\n' {
                break;
            }
            self.consume_char();
        }
    }

    fn token(&mut self, ch: u8) {
        let start = self.index;
        let start_pos = self.position();

        let kind = match ch {
            b'(' => {
                self.nesting += 1;
                self.single(TokenKind::LeftParen)
            }
            b')' => {
                self.nesting = self.nesting.saturating_sub(1);
                self.single(TokenKind::RightParen)
            }
            b'[' => {
                self.nesting += 1;
                self.single(TokenKind::LeftBracket)
            }
            b']' => {
                self.nesting = self.nesting.saturating_sub(1);
                self.single(TokenKind::RightBracket)
            }
            b',' => self.single(TokenKind::Comma),
            b'.' => self.single(TokenKind::Dot),
            b':' => self.single(TokenKind::Colon),
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'*' => self.single(TokenKind::Star),
            b'/' => self.single(TokenKind::Slash),
            b'%' => self.single(TokenKind::Percent),
            b'^' => self.single(TokenKind::Caret),
            b'=' => self.with_equal(TokenKind::Equal, TokenKind::EqualEqual),
            b'<' => self.with_equal(TokenKind::Less, TokenKind::LessEqual),
            b'>' => self.with_equal(TokenKind::Greater, TokenKind::GreaterEqual),
            b'!' => {
                if self.peek_next() == Some(b'=') {
                    self.consume_char();
                    self.consume_char();
                    Some(TokenKind::BangEqual)
                } else {
                    self.unexpected_char(start_pos)
                }
            }
            b'"' | b'\'' => self.lex_string(ch, start_pos),
            b'0'..=b'9' => self.lex_number(),
            _ if is_ident_start(ch) => self.lex_ident_or_keyword(start),
            _ => self.unexpected_char(start_pos),
        };

        if let Some(kind) = kind {
            let span = Span::new(start_pos, self.position());
            let lexeme = &self.source[start..self.index];
            self.push(kind, lexeme, span);
        }
    }

    fn single(&mut self, kind: TokenKind) -> Option<TokenKind> {
        self.consume_char();
        Some(kind)
    }

    fn with_equal(&mut self, plain: TokenKind, compound: TokenKind) -> Option<TokenKind> {
        self.consume_char();
        if self.peek_char() == Some(b'=') {
            self.consume_char();
            Some(compound)
        } else {
            Some(plain)
        }
    }

    fn unexpected_char(&mut self, start: Position) -> Option<TokenKind> {
        self.consume_char();
        // Swallow the rest of a multi-byte character.
        while self.peek_char().is_some_and(|ch| ch & 0xC0 == 0x80) {
            self.consume_char();
        }
        let span = Span::new(start, self.position());
        self.diagnostics
            .push(Diagnostic::error("lexer", "Unexpected character", span));
        None
    }

    fn lex_string(&mut self, quote: u8, start: Position) -> Option<TokenKind> {
        self.consume_char();

        while let Some(ch) = self.peek_char() {
            match ch {
                b'\n' => break,
                b'\\' => {
                    self.consume_char();
                    if self.peek_char().is_some_and(|next| next != b'\n') {
                        self.consume_char();
                    }
                }
                _ if ch == quote => {
                    self.consume_char();
                    return Some(TokenKind::String);
                }
                _ => self.consume_char(),
            }
        }

        let span = Span::new(start, self.position());
        self.diagnostics.push(Diagnostic::error(
            "lexer",
            "Unterminated string literal",
            span,
        ));
        None
    }

    fn lex_number(&mut self) -> Option<TokenKind> {
        self.skip_digits();
        if self.peek_char() == Some(b'.') && self.peek_next().is_some_and(|ch| ch.is_ascii_digit())
        {
            self.consume_char();
            self.skip_digits();
        }
        Some(TokenKind::Number)
    }

    fn skip_digits(&mut self) {
        while self
            .peek_char()
            .is_some_and(|ch| ch.is_ascii_digit() || ch == b'_')
        {
            self.consume_char();
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Option<TokenKind> {
        while self.peek_char().is_some_and(is_ident_continue) {
            self.consume_char();
        }
        Some(keyword(&self.source[start..self.index]).unwrap_or(TokenKind::Identifier))
    }

    fn push(&mut self, kind: TokenKind, lexeme: &str, span: Span) {
        if !matches!(
            kind,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Outdent | TokenKind::Eof
        ) {
            self.line_has_tokens = true;
        }
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek_char(&self) -> Option<u8> {
        self.chars.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.chars.get(self.index + 1).copied()
    }

    fn consume_char(&mut self) {
        let Some(ch) = self.peek_char() else {
            return;
        };
        self.index += 1;
        if ch == b'\n' {
            self.line += 1;
            self.column = 0;
        } else if ch & 0xC0 != 0x80 {
            self.column += 1;
        }
    }
}

fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "class" => TokenKind::Class,
        "extends" => TokenKind::Extends,
        "new" => TokenKind::New,
        "abstract" => TokenKind::Abstract,
        "static" => TokenKind::Static,
        "this" => TokenKind::This,
        "super" => TokenKind::Super,
        "instanceof" => TokenKind::Instanceof,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "function" => TokenKind::Function,
        "return" => TokenKind::Return,
        "async" => TokenKind::Async,
        "import" => TokenKind::Import,
        "as" => TokenKind::As,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "while" => TokenKind::While,
        "repeat" => TokenKind::Repeat,
        "times" => TokenKind::Times,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "fallthrough" => TokenKind::Fallthrough,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "throw" => TokenKind::Throw,
        "continue" => TokenKind::Continue,
        "break" => TokenKind::Break,
        "yield" => TokenKind::Yield,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "var" => TokenKind::Var,
        "true" | "false" => TokenKind::Boolean,
        _ => return None,
    };
    Some(kind)
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let result = lex(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        result.tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn lexes_operators_and_keywords() {
        assert_eq!(
            kinds("var x = a <= b != not c"),
            vec![
                Var, Identifier, Equal, Identifier, LessEqual, Identifier, BangEqual, Not,
                Identifier, Newline, Eof
            ]
        );
    }

    #[test]
    fn emits_layout_tokens_for_blocks() {
        let source = "if x\n  y\nz\n";
        assert_eq!(
            kinds(source),
            vec![
                If, Identifier, Newline, Indent, Identifier, Newline, Outdent, Identifier,
                Newline, Eof
            ]
        );
    }

    #[test]
    fn closes_open_blocks_at_end_of_input() {
        assert_eq!(
            kinds("class A\n  var x\n    "),
            vec![Class, Identifier, Newline, Indent, Var, Identifier, Newline, Outdent, Eof]
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let source = "a\n\n   # note\n\nb # trailing\n";
        assert_eq!(kinds(source), vec![Identifier, Newline, Identifier, Newline, Eof]);
    }

    #[test]
    fn joins_lines_inside_brackets() {
        let source = "f(1,\n    2)\n";
        assert_eq!(
            kinds(source),
            vec![Identifier, LeftParen, Number, Comma, Number, RightParen, Newline, Eof]
        );
    }

    #[test]
    fn tracks_positions_and_lexemes() {
        let result = lex("var name = 'hi'\n  x");
        let name = &result.tokens[1];
        assert_eq!(name.lexeme, "name");
        assert_eq!(name.span.start, Position::new(0, 4));
        assert_eq!(name.span.end, Position::new(0, 8));
        let string = &result.tokens[3];
        assert_eq!(string.kind, String);
        assert_eq!(string.lexeme, "'hi'");
        let x = result
            .tokens
            .iter()
            .find(|token| token.lexeme == "x")
            .expect("x token");
        assert_eq!(x.span.start, Position::new(1, 2));
    }

    #[test]
    fn reports_inconsistent_dedent() {
        let result = lex("a\n    b\n  c\n");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].message, "Inconsistent indentation");
        assert_eq!(result.tokens.last().map(|t| t.kind), Some(Eof));
    }

    #[test]
    fn reports_unterminated_string_and_bad_characters() {
        let result = lex("var s = \"open\n$");
        let messages: Vec<_> = result
            .diagnostics
            .iter()
            .map(|diag| diag.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec!["Unterminated string literal", "Unexpected character"]
        );
    }

    #[test]
    fn lexes_decimal_numbers() {
        let result = lex("3.14 1_000 4.");
        let lexemes: Vec<_> = result
            .tokens
            .iter()
            .filter(|token| token.kind == Number)
            .map(|token| token.lexeme.as_str())
            .collect();
        assert_eq!(lexemes, vec!["3.14", "1_000", "4"]);
    }
}
