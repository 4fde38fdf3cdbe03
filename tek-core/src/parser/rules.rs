//! Dispatch tables for the parser.
//!
//! Adding an operator means adding one row to [`rule`].

use crate::ast::Node;
use crate::lexer::TokenKind;

use super::{ParseResult, Parser, declarations, expressions, statements};

pub(crate) type PrefixFn = fn(&mut Parser) -> ParseResult<Node>;
pub(crate) type InfixFn = fn(&mut Parser, Node) -> ParseResult<Node>;

/// Binding power of infix operators, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Exponent,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    /// The next tighter level.
    pub fn next(self) -> Self {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Exponent,
            Precedence::Exponent => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

pub(crate) struct ParseRule {
    pub precedence: Precedence,
    pub prefix: Option<PrefixFn>,
    pub infix: Option<InfixFn>,
}

pub(crate) fn rule(kind: TokenKind) -> ParseRule {
    let (precedence, prefix, infix): (Precedence, Option<PrefixFn>, Option<InfixFn>) =
        match kind {
            TokenKind::LeftParen => (
                Precedence::Call,
                Some(expressions::wrapped),
                Some(expressions::call),
            ),
            TokenKind::LeftBracket => (
                Precedence::Call,
                Some(expressions::array),
                Some(expressions::index),
            ),
            TokenKind::Dot => (Precedence::Call, None, Some(expressions::member)),

            TokenKind::Minus => (
                Precedence::Term,
                Some(expressions::unary),
                Some(expressions::binary),
            ),
            TokenKind::Plus => (Precedence::Term, None, Some(expressions::binary)),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
                (Precedence::Factor, None, Some(expressions::binary))
            }
            TokenKind::Caret => (Precedence::Exponent, None, Some(expressions::binary)),
            TokenKind::Not => (Precedence::None, Some(expressions::unary), None),

            TokenKind::EqualEqual | TokenKind::BangEqual => {
                (Precedence::Equality, None, Some(expressions::binary))
            }
            TokenKind::Less => (Precedence::Comparison, None, Some(expressions::less)),
            TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
                (Precedence::Comparison, None, Some(expressions::binary))
            }
            TokenKind::Instanceof => (Precedence::Comparison, None, Some(expressions::instanceof)),
            TokenKind::And => (Precedence::And, None, Some(expressions::binary)),
            TokenKind::Or => (Precedence::Or, None, Some(expressions::binary)),
            TokenKind::Equal => (Precedence::Assignment, None, Some(expressions::assignment)),

            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Boolean
            | TokenKind::This
            | TokenKind::Super => (Precedence::None, Some(expressions::literal), None),
            TokenKind::New => (Precedence::None, Some(expressions::new_expr), None),
            TokenKind::Async => (Precedence::None, Some(expressions::async_expr), None),
            TokenKind::If => (Precedence::None, Some(expressions::if_expr), None),

            _ => (Precedence::None, None, None),
        };

    ParseRule {
        precedence,
        prefix,
        infix,
    }
}

/// Constructs that may appear only where a declaration is expected.
pub(crate) fn declaration_rule(kind: TokenKind) -> Option<PrefixFn> {
    let parse: PrefixFn = match kind {
        TokenKind::Class => declarations::class_decl,
        TokenKind::Function => declarations::function_decl,
        TokenKind::Var => declarations::var_decl,
        TokenKind::Import => declarations::import_decl,
        _ => return None,
    };
    Some(parse)
}

pub(crate) fn statement_rule(kind: TokenKind) -> Option<PrefixFn> {
    let parse: PrefixFn = match kind {
        TokenKind::If => statements::if_stmt,
        TokenKind::For => statements::for_stmt,
        TokenKind::While => statements::while_stmt,
        TokenKind::Repeat => statements::repeat_stmt,
        TokenKind::Switch => statements::switch_stmt,
        TokenKind::Try => statements::try_stmt,
        TokenKind::Return => statements::return_stmt,
        TokenKind::Throw => statements::throw_stmt,
        TokenKind::Yield => statements::yield_stmt,
        TokenKind::Break => statements::break_stmt,
        TokenKind::Continue => statements::continue_stmt,
        TokenKind::Fallthrough => statements::fallthrough_stmt,
        _ => return None,
    };
    Some(parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_weakest_first() {
        assert!(Precedence::None < Precedence::Assignment);
        assert!(Precedence::Term < Precedence::Factor);
        assert!(Precedence::Factor < Precedence::Exponent);
        assert_eq!(Precedence::Term.next(), Precedence::Factor);
        assert_eq!(Precedence::Primary.next(), Precedence::Primary);
    }

    #[test]
    fn layout_tokens_end_expressions() {
        for kind in [TokenKind::Newline, TokenKind::Indent, TokenKind::Outdent, TokenKind::Eof] {
            let entry = rule(kind);
            assert_eq!(entry.precedence, Precedence::None);
            assert!(entry.prefix.is_none() && entry.infix.is_none());
        }
    }

    #[test]
    fn keywords_dispatch_to_one_table() {
        for kind in [TokenKind::Class, TokenKind::Function, TokenKind::Var, TokenKind::Import] {
            assert!(declaration_rule(kind).is_some());
            assert!(statement_rule(kind).is_none());
        }
        assert!(statement_rule(TokenKind::If).is_some());
        assert!(declaration_rule(TokenKind::Identifier).is_none());
    }
}
