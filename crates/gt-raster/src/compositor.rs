//! Tile stitching and route overlay.
//!
//! # Canvas
//!
//! Tiles arrive in raster order (north-to-south rows, west-to-east within a
//! row).  The canvas is `columns * tile` pixels wide and `rows * tile`
//! pixels tall, and covers the selection's aggregate box exactly, so a
//! geographic point maps to a pixel by linear interpolation:
//!
//! ```text
//! x = (lon - ul.lon) / lon_span * width
//! y = (ul.lat - lat) / lat_span * height
//! ```
//!
//! # Route stroke
//!
//! Each segment is drawn as a chain of filled discs into a coverage mask,
//! which gives round caps and joins for free.  The mask is then blended onto
//! the canvas in one pass, so a pixel covered by several segments is tinted
//! exactly once.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use gt_core::{GeoBox, GeoPoint, MapConfig, RouteStroke};
use gt_index::{QuadNode, Selection};

use crate::tiles::TileSource;
use crate::{RasterError, RasterResult};

// ── Raster ────────────────────────────────────────────────────────────────────

/// A stitched canvas and the geographic box it covers.
#[derive(Clone, Debug)]
pub struct Raster {
    pub image: RgbaImage,
    pub bounds: GeoBox,
    /// Quad-tree depth the tiles were taken from.
    pub depth: u8,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as an opaque RGB PNG.
    pub fn encode_png(&self) -> RasterResult<Vec<u8>> {
        let rgb = DynamicImage::ImageRgba8(self.image.clone()).to_rgb8();
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(rgb).write_to(&mut buf, ImageOutputFormat::Png)?;
        Ok(buf.into_inner())
    }
}

// ── Compositor ────────────────────────────────────────────────────────────────

/// Stitches a [`Selection`] into one image and overlays a route polyline.
#[derive(Clone, Copy, Debug)]
pub struct Compositor {
    tile_size: u32,
    stroke: RouteStroke,
}

impl Compositor {
    pub fn new(tile_size: u32, stroke: RouteStroke) -> Self {
        Self { tile_size, stroke }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.tile_size, config.route_stroke)
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn stroke(&self) -> RouteStroke {
        self.stroke
    }

    /// Load every selected tile from `source`, place them on a canvas, and
    /// draw `route` (if any) on top.
    ///
    /// # Errors
    ///
    /// [`RasterError::EmptySelection`] before any tile is loaded if the
    /// selection is empty; [`RasterError::TileSize`] if a decoded tile is not
    /// `tile_size` square; any error the source returns.
    pub fn compose(
        &self,
        selection: &Selection<'_>,
        source: &dyn TileSource,
        route: Option<&[GeoPoint]>,
    ) -> RasterResult<Raster> {
        let bounds = selection.bounds().ok_or(RasterError::EmptySelection)?;
        let columns = selection.columns() as u32;
        let rows = selection.rows() as u32;
        let tile = self.tile_size;

        let images = load_tiles(selection.tiles(), source)?;

        let mut canvas = RgbaImage::new(columns * tile, rows * tile);
        for (i, (node, img)) in selection.tiles().iter().zip(&images).enumerate() {
            if img.dimensions() != (tile, tile) {
                return Err(RasterError::TileSize {
                    id:       node.id.clone(),
                    expected: tile,
                    got_w:    img.width(),
                    got_h:    img.height(),
                });
            }
            let (col, row) = (i as u32 % columns, i as u32 / columns);
            image::imageops::replace(&mut canvas, img, (col * tile) as i64, (row * tile) as i64);
        }

        if let Some(points) = route {
            self.draw_route(&mut canvas, &bounds, points);
        }

        log::debug!(
            "composed {}x{} canvas from {} tiles at depth {}",
            canvas.width(),
            canvas.height(),
            images.len(),
            selection.depth
        );
        Ok(Raster { image: canvas, bounds, depth: selection.depth })
    }

    /// Blend the route polyline onto `canvas`, which covers `bounds`.
    /// Fewer than two points draw nothing.
    pub fn draw_route(&self, canvas: &mut RgbaImage, bounds: &GeoBox, points: &[GeoPoint]) {
        if points.len() < 2 {
            return;
        }
        let (w, h) = canvas.dimensions();
        let radius = (self.stroke.width_px / 2.0).max(1.0) as i32;

        let mut mask = GrayImage::new(w, h);
        let margin = radius as f32 + 1.0;
        let (lo, hi) = ((-margin, -margin), (w as f32 + margin, h as f32 + margin));
        for seg in points.windows(2) {
            let a = project(seg[0], bounds, w, h);
            let b = project(seg[1], bounds, w, h);
            if let Some((a, b)) = clip_segment(a, b, lo, hi) {
                stamp_segment(&mut mask, a, b, radius);
            }
        }

        let colour = Rgba(self.stroke.rgba);
        let mut covered = 0usize;
        for (x, y, m) in mask.enumerate_pixels() {
            if m[0] > 0 {
                canvas.get_pixel_mut(x, y).blend(&colour);
                covered += 1;
            }
        }
        log::debug!("route overlay: {} segments, {covered} pixels", points.len() - 1);
    }
}

/// Decode the tiles in selection order.
fn load_tiles(tiles: &[&QuadNode], source: &dyn TileSource) -> RasterResult<Vec<RgbaImage>> {
    #[cfg(not(feature = "parallel"))]
    {
        tiles.iter().map(|t| source.load(&t.id)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        tiles.par_iter().map(|t| source.load(&t.id)).collect()
    }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Pixel position of `p` on a `width` x `height` canvas covering `bounds`.
/// Points outside `bounds` map outside the canvas.
pub fn project(p: GeoPoint, bounds: &GeoBox, width: u32, height: u32) -> (f32, f32) {
    let x = (p.lon - bounds.ul.lon) / bounds.lon_span() * width as f64;
    let y = (bounds.ul.lat - p.lat) / bounds.lat_span() * height as f64;
    (x as f32, y as f32)
}

/// Liang–Barsky clip of segment `a`–`b` to the rectangle `lo`..`hi`.
/// `None` if no part of the segment lies inside.
pub fn clip_segment(
    a: (f32, f32),
    b: (f32, f32),
    lo: (f32, f32),
    hi: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [(-dx, a.0 - lo.0), (dx, hi.0 - a.0), (-dy, a.1 - lo.1), (dy, hi.1 - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some(((a.0 + t0 * dx, a.1 + t0 * dy), (a.0 + t1 * dx, a.1 + t1 * dy)))
}

/// Cover `a`–`b` with filled discs of `radius`, spaced at most half a radius
/// apart, plus one at each end.
fn stamp_segment(mask: &mut GrayImage, a: (f32, f32), b: (f32, f32), radius: i32) {
    let on = Luma([255u8]);
    let dot = |mask: &mut GrayImage, x: f32, y: f32| {
        draw_filled_circle_mut(mask, (x.round() as i32, y.round() as i32), radius, on);
    };

    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length >= 0.001 {
        let step = (radius as f32 * 0.5).max(0.5);
        let steps = (length / step).ceil() as i32;
        let (sx, sy) = (dx * step / length, dy * step / length);
        for i in 1..steps {
            dot(mask, a.0 + i as f32 * sx, a.1 + i as f32 * sy);
        }
    }
    dot(mask, a.0, a.1);
    dot(mask, b.0, b.1);
}
