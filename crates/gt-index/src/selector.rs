//! Resolution-aware tile selection.
//!
//! [`QuadTree::select`] answers "which tiles do I stitch together to show this
//! box at this width?" in three steps:
//!
//! 1. **Depth**: the shallowest depth whose degrees-per-pixel is no coarser
//!    than the query's (`query_lon_span / viewport_width`), clamped to
//!    `1..=max_depth`.  Fewer, larger tiles win whenever they suffice.
//! 2. **Collection**: every node at that depth whose rectangle overlaps the
//!    query.  Subtrees that miss the query are pruned on the way down.
//! 3. **Ordering**: raster order: north-to-south rows, west-to-east within a
//!    row, so the compositor can blit left-to-right, top-to-bottom.

use std::cmp::Ordering;

use gt_core::GeoBox;

use crate::quadtree::{QuadNode, QuadTree};
use crate::{IndexError, IndexResult};

// ── Selection ─────────────────────────────────────────────────────────────────

/// Tiles chosen for one raster query, in raster order.
///
/// An empty selection (query entirely outside the root) is a valid outcome:
/// check [`is_empty`](Self::is_empty) or use the `Option`-returning
/// accessors rather than indexing `tiles()`.
#[derive(Clone, Debug)]
pub struct Selection<'t> {
    /// Depth of every selected tile, in `1..=max_depth`.
    pub depth: u8,
    tiles: Vec<&'t QuadNode>,
}

impl<'t> Selection<'t> {
    pub fn tiles(&self) -> &[&'t QuadNode] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Aggregate rectangle: first tile's upper-left to last tile's
    /// lower-right.  `None` when nothing was selected.
    pub fn bounds(&self) -> Option<GeoBox> {
        let first = self.tiles.first()?;
        let last = self.tiles.last()?;
        Some(GeoBox::new(first.bounds.ul, last.bounds.lr))
    }

    /// Number of tiles in the first (northernmost) row.
    pub fn columns(&self) -> usize {
        match self.tiles.first() {
            None => 0,
            Some(first) => self
                .tiles
                .iter()
                .take_while(|t| t.bounds.ul.lat == first.bounds.ul.lat)
                .count(),
        }
    }

    /// Number of distinct rows.
    pub fn rows(&self) -> usize {
        let mut rows = 0;
        let mut last_lat = None;
        for t in &self.tiles {
            if last_lat != Some(t.bounds.ul.lat) {
                rows += 1;
                last_lat = Some(t.bounds.ul.lat);
            }
        }
        rows
    }
}

/// Raster order: decreasing upper-left latitude, then increasing upper-left
/// longitude.
pub fn raster_order(a: &QuadNode, b: &QuadNode) -> Ordering {
    b.bounds
        .ul
        .lat
        .total_cmp(&a.bounds.ul.lat)
        .then_with(|| a.bounds.ul.lon.total_cmp(&b.bounds.ul.lon))
}

// ── Selection on QuadTree ─────────────────────────────────────────────────────

impl QuadTree {
    /// Shallowest depth whose resolution satisfies `query` at
    /// `viewport_width_px`, clamped to `1..=max_depth`.
    ///
    /// Non-decreasing in `viewport_width_px` for a fixed query.
    pub fn depth_for(&self, query: &GeoBox, viewport_width_px: u32) -> u8 {
        let required = query.lon_span() / viewport_width_px as f64;
        let mut depth = 1;
        while depth < self.max_depth() && self.resolution_at(depth) > required {
            depth += 1;
        }
        depth
    }

    /// Select and order the tiles covering `query` for a viewport
    /// `viewport_width_px` pixels wide.
    ///
    /// # Errors
    ///
    /// [`IndexError::InvalidBounds`] for a non-finite or inverted query box,
    /// [`IndexError::ZeroViewport`] for a zero width.  A query that misses
    /// the root entirely is *not* an error; it yields an empty selection.
    pub fn select(&self, query: &GeoBox, viewport_width_px: u32) -> IndexResult<Selection<'_>> {
        if !query.is_well_formed() {
            return Err(IndexError::InvalidBounds(*query));
        }
        if viewport_width_px == 0 {
            return Err(IndexError::ZeroViewport);
        }

        let depth = self.depth_for(query, viewport_width_px);

        let mut tiles = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if !node.bounds.intersects(query) {
                continue;
            }
            if node.depth == depth {
                tiles.push(node);
            } else {
                stack.extend(self.children(node));
            }
        }
        tiles.sort_unstable_by(|a, b| raster_order(a, b));

        log::debug!(
            "select {query} @ {viewport_width_px}px → depth {depth}, {} tiles",
            tiles.len()
        );
        Ok(Selection { depth, tiles })
    }
}
