//! Service-layer error type.

use thiserror::Error;

use gt_core::{CoreError, SessionId};
use gt_index::IndexError;
use gt_raster::RasterError;
use gt_route::RouteError;

/// Errors produced by `gt-service`.  Lower-layer errors are wrapped as-is.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A request parameter was missing, non-finite, or out of range.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown session {0}")]
    UnknownSession(SessionId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
