//! Structured diagnostics shared by the lexer, parser and lint rules.

use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => f.write_str("error"),
        }
    }
}

/// A single reported problem.
///
/// `source` names the producer: `"lexer"`, `"parser"`, or the name of the
/// lint rule that reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub source: String,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(
        level: Level,
        source: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            level,
            source: source.into(),
            message: message.into(),
            span,
        }
    }

    pub fn error(source: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, source, message, span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.span.start, self.level, self.source, self.message
        )
    }
}
