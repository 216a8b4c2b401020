//! Map configuration shared by the index, router, and compositor.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to the service at startup.  [`MapConfig::default`]
//! reproduces the reference tile set's constants.

use std::path::PathBuf;

use crate::{CoreError, CoreResult, GeoBox};

/// Edge length of every pre-rendered tile, in pixels.
pub const TILE_SIZE: u32 = 256;

/// Deepest quad-tree level that has tiles on disk.
pub const MAX_DEPTH: u8 = 7;

/// Hard ceiling on `max_depth`: the tree is built eagerly and has
/// `(4^(d+1) - 1) / 3` nodes.
pub const MAX_SUPPORTED_DEPTH: u8 = 10;

/// Route overlay stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStroke {
    /// Line width in pixels.  Roads are rarely wider than 5 px on a tile.
    pub width_px: f32,
    /// RGBA; alpha is blended over the tiles.
    pub rgba: [u8; 4],
}

impl Default for RouteStroke {
    fn default() -> Self {
        Self { width_px: 5.0, rgba: [108, 181, 230, 200] }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// Geographic extent of the root tile.
    pub root_bounds: GeoBox,

    /// Tile edge in pixels.  Tiles are square.
    pub tile_size: u32,

    /// Deepest quad-tree level (root is depth 0).
    pub max_depth: u8,

    /// Directory holding `<tile id>.<tile_ext>` images.
    pub tile_dir: PathBuf,

    /// File extension of tile images, without the dot.
    pub tile_ext: String,

    pub route_stroke: RouteStroke,

    /// Abort a route search once the frontier holds more entries than this.
    /// `None` means unbounded.
    pub max_frontier: Option<usize>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            root_bounds: GeoBox::from_edges(
                37.892195547244356,
                -122.2998046875,
                37.82280243352756,
                -122.2119140625,
            ),
            tile_size:    TILE_SIZE,
            max_depth:    MAX_DEPTH,
            tile_dir:     PathBuf::from("img"),
            tile_ext:     "png".to_owned(),
            route_stroke: RouteStroke::default(),
            max_frontier: None,
        }
    }
}

impl MapConfig {
    /// Reject configurations the index or compositor cannot honour.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.root_bounds.is_well_formed() {
            return Err(CoreError::Config(format!(
                "root bounds {} must have the upper-left corner strictly north-west of the lower-right",
                self.root_bounds
            )));
        }
        if self.tile_size == 0 {
            return Err(CoreError::Config("tile_size must be positive".into()));
        }
        if self.max_depth == 0 || self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(CoreError::Config(format!(
                "max_depth {} outside 1..={MAX_SUPPORTED_DEPTH}",
                self.max_depth
            )));
        }
        if !(self.route_stroke.width_px > 0.0) {
            return Err(CoreError::Config("route stroke width must be positive".into()));
        }
        if self.max_frontier == Some(0) {
            return Err(CoreError::Config("max_frontier must be positive when set".into()));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl MapConfig {
    /// Load and validate a JSON config file.  Missing fields take their
    /// [`Default`] values.
    pub fn from_json_path(path: &std::path::Path) -> CoreResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Like [`from_json_path`](Self::from_json_path) but accepts any `Read`
    /// source.
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> CoreResult<Self> {
        let config: MapConfig = serde_json::from_reader(reader)
            .map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
