//! Index-subsystem error type.

use thiserror::Error;

use gt_core::GeoBox;

/// Errors produced by `gt-index`.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("bounds {0} are not well formed (upper-left must be strictly north-west of lower-right)")]
    InvalidBounds(GeoBox),

    #[error("index configuration error: {0}")]
    InvalidConfig(String),

    #[error("viewport width must be positive")]
    ZeroViewport,

    #[error("invalid tile id {0:?}: expected \"0\" or digits 1-4")]
    InvalidTileId(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
