//! Fixed-depth quad-tree over the root tile rectangle.
//!
//! # Addressing
//!
//! Every node is named by a [`TileId`], a base-4 path string.  The root is
//! `"0"`; its children are `"1"`..`"4"`, their children `"11"`..`"44"`, and
//! so on.  Digit order is NW=1, NE=2, SW=3, SE=4.  A non-root id's length is
//! its depth, and also the name of its tile image on disk.
//!
//! # Layout
//!
//! The tree is built eagerly to `max_depth` and never mutated afterwards.
//! Nodes live in a single arena `Vec<QuadNode>` in depth-first order and
//! reference their children by [`TileRef`] (arena index), so the whole index
//! is `Send + Sync` and can be shared behind an `Arc` without locking.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use gt_core::{GeoBox, MapConfig, MAX_SUPPORTED_DEPTH};

use crate::{IndexError, IndexResult};

// ── TileId ────────────────────────────────────────────────────────────────────

/// Base-4 path name of a quad-tree node.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId(String);

impl TileId {
    pub fn root() -> Self {
        TileId("0".to_owned())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "0"
    }

    /// Depth below the root (root = 0).
    pub fn depth(&self) -> u8 {
        if self.is_root() { 0 } else { self.0.len() as u8 }
    }

    /// Id of the child in quadrant `q`.  The root's leading `0` is dropped.
    pub fn child(&self, q: Quadrant) -> TileId {
        if self.is_root() {
            TileId(q.digit().to_string())
        } else {
            TileId(format!("{}{}", self.0, q.digit()))
        }
    }

    pub fn parent(&self) -> Option<TileId> {
        match self.0.len() {
            _ if self.is_root() => None,
            1 => Some(TileId::root()),
            n => Some(TileId(self.0[..n - 1].to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TileId {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s == "0"
            || (!s.is_empty() && s.bytes().all(|b| (b'1'..=b'4').contains(&b)));
        if valid {
            Ok(TileId(s.to_owned()))
        } else {
            Err(IndexError::InvalidTileId(s.to_owned()))
        }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Quadrant ──────────────────────────────────────────────────────────────────

/// One of the four children of a node, in id-digit order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Quadrant {
    Nw = 1,
    Ne = 2,
    Sw = 3,
    Se = 4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Nw, Quadrant::Ne, Quadrant::Sw, Quadrant::Se];

    /// Digit appended to the parent's id.
    #[inline]
    pub fn digit(self) -> u8 {
        self as u8
    }

    /// Slot in `QuadNode::children`.
    #[inline]
    pub fn slot(self) -> usize {
        self as usize - 1
    }
}

// ── QuadNode ──────────────────────────────────────────────────────────────────

/// Arena index of a [`QuadNode`] inside its [`QuadTree`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TileRef(pub u32);

impl TileRef {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One addressable tile of the index.
#[derive(Clone, Debug)]
pub struct QuadNode {
    pub id: TileId,
    pub bounds: GeoBox,
    pub depth: u8,
    /// Degrees of longitude per pixel when this node's tile is drawn at the
    /// tree's tile size.
    pub dpp: f64,
    /// NW, NE, SW, SE.  `None` at `max_depth`.
    pub children: Option<[TileRef; 4]>,
}

impl QuadNode {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

// ── QuadTree ──────────────────────────────────────────────────────────────────

/// Immutable quad-tree index over a fixed root rectangle.
pub struct QuadTree {
    nodes:     Vec<QuadNode>,
    by_id:     HashMap<TileId, TileRef>,
    tile_size: u32,
    max_depth: u8,
}

impl QuadTree {
    /// Build the full tree under `root_bounds`.
    ///
    /// The result holds `(4^(max_depth+1) - 1) / 3` nodes.  Building twice
    /// from the same inputs yields identical ids and bounds.
    pub fn build(root_bounds: GeoBox, tile_size: u32, max_depth: u8) -> IndexResult<Self> {
        if !root_bounds.is_well_formed() {
            return Err(IndexError::InvalidBounds(root_bounds));
        }
        if tile_size == 0 {
            return Err(IndexError::InvalidConfig("tile size must be positive".into()));
        }
        if max_depth == 0 || max_depth > MAX_SUPPORTED_DEPTH {
            return Err(IndexError::InvalidConfig(format!(
                "max depth {max_depth} outside 1..={MAX_SUPPORTED_DEPTH}"
            )));
        }

        let capacity = (4usize.pow(max_depth as u32 + 1) - 1) / 3;
        let mut tree = QuadTree {
            nodes: Vec::with_capacity(capacity),
            by_id: HashMap::with_capacity(capacity),
            tile_size,
            max_depth,
        };
        tree.insert(TileId::root(), root_bounds, 0);
        debug_assert_eq!(tree.nodes.len(), capacity);

        log::debug!(
            "built quad-tree over {root_bounds}: {} nodes, depth {max_depth}, {tile_size}px tiles",
            tree.nodes.len()
        );
        Ok(tree)
    }

    /// Build from the root bounds, tile size and depth held in `config`.
    pub fn from_config(config: &MapConfig) -> IndexResult<Self> {
        Self::build(config.root_bounds, config.tile_size, config.max_depth)
    }

    fn insert(&mut self, id: TileId, bounds: GeoBox, depth: u8) -> TileRef {
        let me = TileRef(self.nodes.len() as u32);
        self.nodes.push(QuadNode {
            id: id.clone(),
            bounds,
            depth,
            dpp: bounds.lon_span() / self.tile_size as f64,
            children: None,
        });
        self.by_id.insert(id.clone(), me);

        if depth < self.max_depth {
            let quads = bounds.quadrants();
            let mut children = [TileRef(0); 4];
            for q in Quadrant::ALL {
                children[q.slot()] = self.insert(id.child(q), quads[q.slot()], depth + 1);
            }
            self.nodes[me.index()].children = Some(children);
        }
        me
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn root(&self) -> &QuadNode {
        &self.nodes[0]
    }

    #[inline]
    pub fn node(&self, r: TileRef) -> &QuadNode {
        &self.nodes[r.index()]
    }

    pub fn get(&self, id: &TileId) -> Option<&QuadNode> {
        self.by_id.get(id).map(|&r| self.node(r))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Children of `node` in NW, NE, SW, SE order (empty for leaves).
    pub fn children<'a>(&'a self, node: &'a QuadNode) -> impl Iterator<Item = &'a QuadNode> + 'a {
        node.children
            .iter()
            .flat_map(|c| c.iter())
            .map(move |&r| self.node(r))
    }

    /// All nodes at `depth`, in arena (depth-first) order.
    pub fn nodes_at_depth(&self, depth: u8) -> impl Iterator<Item = &QuadNode> + '_ {
        self.nodes.iter().filter(move |n| n.depth == depth)
    }

    /// Degrees of longitude per pixel for tiles at `depth`:
    /// `root_lon_span / (2^depth * tile_size)`.
    pub fn resolution_at(&self, depth: u8) -> f64 {
        self.root().bounds.lon_span() / (2f64.powi(depth as i32) * self.tile_size as f64)
    }
}
