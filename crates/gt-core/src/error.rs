//! Workspace base error type.
//!
//! Sub-crates define their own error enums; `gt-service` wraps them all and
//! converts `CoreError` via `From`.

use thiserror::Error;

/// Errors raised by `gt-core` itself.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `gt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
