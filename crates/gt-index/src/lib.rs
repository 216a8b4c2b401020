//! `gt-index` — quad-tree tile index and tile selection.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`quadtree`]   | `QuadTree`, `QuadNode`, `TileId`, `TileRef`, `Quadrant` |
//! | [`selector`]   | `QuadTree::select`, `Selection`, `raster_order`         |
//! | [`error`]      | `IndexError`, `IndexResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `TileId`.               |

pub mod error;
pub mod quadtree;
pub mod selector;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};
pub use quadtree::{QuadNode, QuadTree, Quadrant, TileId, TileRef};
pub use selector::{raster_order, Selection};
