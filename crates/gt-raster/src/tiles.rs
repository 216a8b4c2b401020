//! Tile image sources.
//!
//! The compositor never touches the filesystem itself; it asks a
//! [`TileSource`] for the decoded image of each selected tile.  The
//! production source reads `<dir>/<tile id>.<ext>`; tests plug in an
//! in-memory source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use gt_core::MapConfig;
use gt_index::TileId;

use crate::{RasterError, RasterResult};

// ── TileSource trait ──────────────────────────────────────────────────────────

/// Maps a [`TileId`] to its decoded RGBA image.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: with the `parallel` feature the
/// compositor calls `load` from Rayon worker threads.
pub trait TileSource: Send + Sync {
    fn load(&self, id: &TileId) -> RasterResult<RgbaImage>;
}

// ── DirTileSource ─────────────────────────────────────────────────────────────

/// Reads pre-rendered tiles named `<id>.<ext>` from one directory.
///
/// Images are decoded on every call; there is no cache.
#[derive(Clone, Debug)]
pub struct DirTileSource {
    dir: PathBuf,
    ext: String,
}

impl DirTileSource {
    pub fn new(dir: impl Into<PathBuf>, ext: impl Into<String>) -> Self {
        Self { dir: dir.into(), ext: ext.into() }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.tile_dir.clone(), config.tile_ext.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds tile `id`.
    pub fn path_for(&self, id: &TileId) -> PathBuf {
        self.dir.join(format!("{id}.{}", self.ext))
    }
}

impl TileSource for DirTileSource {
    fn load(&self, id: &TileId) -> RasterResult<RgbaImage> {
        let path = self.path_for(id);
        let img = image::open(&path).map_err(|source| RasterError::Decode {
            id: id.clone(),
            path: path.clone(),
            source,
        })?;
        Ok(img.to_rgba8())
    }
}

// ── MemoryTileSource ──────────────────────────────────────────────────────────

/// Tiles held in memory, keyed by id.  Unknown ids fail with
/// [`RasterError::MissingTile`].
#[derive(Clone, Debug, Default)]
pub struct MemoryTileSource {
    tiles: HashMap<TileId, RgbaImage>,
}

impl MemoryTileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TileId, image: RgbaImage) {
        self.tiles.insert(id, image);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileSource for MemoryTileSource {
    fn load(&self, id: &TileId) -> RasterResult<RgbaImage> {
        self.tiles
            .get(id)
            .cloned()
            .ok_or_else(|| RasterError::MissingTile(id.clone()))
    }
}
