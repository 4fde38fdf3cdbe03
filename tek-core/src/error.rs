use std::path::PathBuf;

use thiserror::Error;

use crate::scope::ScopeError;

/// Failures that stop processing of a compilation unit.
///
/// Problems in the checked source itself are never reported here; they are
/// collected as [`Diagnostic`](crate::diagnostic::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("source path was not found at {0}")]
    MissingSource(PathBuf),
    #[error("internal compiler error: {0}")]
    Internal(#[from] ScopeError),
}
