//! Raster-subsystem error type.

use std::path::PathBuf;

use thiserror::Error;

use gt_index::TileId;

/// Errors produced by `gt-raster`.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The selection had no tiles; there is nothing to stitch.
    #[error("cannot compose an empty tile selection")]
    EmptySelection,

    #[error("tile {id} is {got_w}x{got_h}, expected {expected}x{expected}")]
    TileSize {
        id:       TileId,
        expected: u32,
        got_w:    u32,
        got_h:    u32,
    },

    #[error("no image for tile {0}")]
    MissingTile(TileId),

    #[error("failed to decode tile {id} from {path:?}: {source}")]
    Decode {
        id:     TileId,
        path:   PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RasterResult<T> = Result<T, RasterError>;
