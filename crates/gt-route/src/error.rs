//! Routing-subsystem error type.

use thiserror::Error;

use gt_core::{NodeId, RawId};

/// Errors produced by `gt-route`.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The search frontier emptied before reaching the target.
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("road graph has no routable nodes")]
    EmptyGraph,

    #[error("road references unknown node {0}")]
    UnknownNode(RawId),

    #[error("search frontier exceeded {limit} entries")]
    FrontierLimit { limit: usize },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RouteResult<T> = Result<T, RouteError>;
