//! Front end for the Tek language.
//!
//! The pipeline is:
//!
//!   source .tek
//!     -> lexer   (tokens, with indentation as Indent/Outdent)
//!     -> parser  (syntax tree, recovering at declaration boundaries)
//!     -> scope   (scope tree and symbol tables)
//!     -> lint    (rules run over one walk of the tree)
//!
//! Problems in the source are returned as [`Diagnostic`]s. Only conditions
//! the front end cannot continue past surface as [`CoreError`].

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod span;
pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod ast;

// ---------------------------------------------------------------------
// Semantic layers: scopes, traversal, lint rules
// ---------------------------------------------------------------------

pub mod scope;
pub mod walker;
pub mod lint;

// ---------------------------------------------------------------------
// Builtins and source discovery
// ---------------------------------------------------------------------

pub mod builtins;
pub mod sources;

// ---------------------------------------------------------------------
// Pipeline orchestration
// ---------------------------------------------------------------------

pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use compiler::{CheckOutput, check_path, check_source};
pub use diagnostic::{Diagnostic, Level};
pub use error::CoreError;
pub use lint::{LintConfig, Linter};
