//! `gt-raster` — tile stitching, route overlay, and PNG encoding.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`compositor`] | `Compositor`, `Raster`, `project`, `clip_segment`          |
//! | [`tiles`]      | `TileSource` trait, `DirTileSource`, `MemoryTileSource`    |
//! | [`error`]      | `RasterError`, `RasterResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Decodes the selected tiles on Rayon's thread pool.        |

pub mod compositor;
pub mod error;
pub mod tiles;


pub use compositor::{clip_segment, project, Compositor, Raster};
pub use error::{RasterError, RasterResult};
pub use tiles::{DirTileSource, MemoryTileSource, TileSource};
