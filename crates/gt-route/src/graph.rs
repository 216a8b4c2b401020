//! Road graph representation and builder.
//!
//! # Data layout
//!
//! The graph is undirected and stored in **Compressed Sparse Row (CSR)**
//! format.  Given a `NodeId n`, its neighbours occupy the slice:
//!
//! ```text
//! adj_to[ adj_start[n] .. adj_start[n+1] ]
//! ```
//!
//! Every undirected road appears twice in `adj_to`, once from each endpoint.
//! Node arrays (`node_pos`, `node_raw`) are indexed by `NodeId`, which is
//! dense and assigned in record insertion order *after* pruning.
//!
//! # Pruning
//!
//! Nodes with no incident road are not part of the routable network and are
//! dropped at build time.  Only their count survives ([`RoadGraph::pruned_count`]).
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest routable
//! `NodeId` for snapping query points onto the network.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashSet;

use gt_core::{GeoPoint, NodeId, RawId};

use crate::{RouteError, RouteResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space, the same metric the
    /// router uses for edge costs.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Pruned, undirected road graph in CSR format plus a spatial index for node
/// snapping.
///
/// Immutable once built and `Send + Sync`; share it behind an `Arc`.  Do not
/// construct directly; use [`RoadGraphBuilder`].
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Ingestion id of each node.  Indexed by `NodeId`.
    pub node_raw: Vec<RawId>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Row pointer.  Neighbours of node `n` are
    /// `adj_to[adj_start[n] .. adj_start[n+1]]`.  Length = `node_count + 1`.
    pub adj_start: Vec<u32>,

    /// Neighbour lists, concatenated.
    pub adj_to: Vec<NodeId>,

    // ── Lookup ────────────────────────────────────────────────────────────
    by_raw: HashMap<RawId, NodeId>,
    pruned: usize,
    spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    /// Construct an empty graph.  Every snap against it returns `None` and
    /// every route request fails with [`RouteError::EmptyGraph`].
    pub fn empty() -> Self {
        RoadGraph {
            node_pos: Vec::new(),
            node_raw: Vec::new(),
            adj_start: vec![0],
            adj_to: Vec::new(),
            by_raw: HashMap::new(),
            pruned: 0,
            spatial_idx: RTree::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of undirected roads.
    pub fn edge_count(&self) -> usize {
        self.adj_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Input nodes dropped for having no incident road.
    pub fn pruned_count(&self) -> usize {
        self.pruned
    }

    // ── Node access ───────────────────────────────────────────────────────

    #[inline]
    pub fn pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn raw_id(&self, node: NodeId) -> RawId {
        self.node_raw[node.index()]
    }

    /// Map an ingestion id to its routable node.  `None` for unknown and
    /// pruned ids alike.
    pub fn lookup(&self, raw: RawId) -> Option<NodeId> {
        self.by_raw.get(&raw).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Neighbours of `node`.  Borrowed straight from the CSR arrays.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        &self.adj_to[start..end]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Snap `pos` to the closest routable node by Euclidean lat/lon distance.
    ///
    /// Among equidistant candidates the lowest `NodeId` wins, which is the
    /// first minimum a linear scan in insertion order would keep.  Returns
    /// `None` only if the graph has no nodes.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        let mut iter = self
            .spatial_idx
            .nearest_neighbor_iter_with_distance_2(&[pos.lat, pos.lon]);
        let (first, best) = iter.next()?;
        let mut winner = first.id;
        for (entry, d2) in iter {
            if d2 > best {
                break;
            }
            winner = winner.min(entry.id);
        }
        Some(winner)
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Collect node and road records, then call [`build`](Self::build).
///
/// Records may arrive in any order; roads refer to nodes by [`RawId`].
/// `build()` resolves ids, drops self-loops and duplicate roads, prunes
/// isolated nodes, assigns dense `NodeId`s, lays out the CSR arrays and
/// bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use gt_core::{GeoPoint, RawId};
/// use gt_route::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// b.add_node(RawId(10), GeoPoint::new(37.87, -122.26));
/// b.add_node(RawId(11), GeoPoint::new(37.88, -122.25));
/// b.add_node(RawId(12), GeoPoint::new(37.89, -122.24)); // no roads → pruned
/// b.add_road(RawId(10), RawId(11));
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.pruned_count(), 1);
/// ```
pub struct RoadGraphBuilder {
    nodes: Vec<(RawId, GeoPoint)>,
    slots: HashMap<RawId, usize>,
    roads: Vec<(RawId, RawId)>,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), slots: HashMap::new(), roads: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and roads.
    pub fn with_capacity(nodes: usize, roads: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            slots: HashMap::with_capacity(nodes),
            roads: Vec::with_capacity(roads),
        }
    }

    /// Add a node.  A repeated `raw` id keeps its original insertion slot but
    /// takes the newer position.
    pub fn add_node(&mut self, raw: RawId, pos: GeoPoint) {
        match self.slots.get(&raw) {
            Some(&slot) => {
                log::warn!("node {raw} added twice; keeping position {pos}");
                self.nodes[slot].1 = pos;
            }
            None => {
                self.slots.insert(raw, self.nodes.len());
                self.nodes.push((raw, pos));
            }
        }
    }

    /// Add an **undirected** road between two nodes.  Both endpoints must be
    /// added (before or after) via [`add_node`](Self::add_node).
    pub fn add_road(&mut self, a: RawId, b: RawId) {
        self.roads.push((a, b));
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// # Errors
    ///
    /// [`RouteError::UnknownNode`] if a road names an id that was never
    /// added.  Nothing is built in that case.
    pub fn build(self) -> RouteResult<RoadGraph> {
        // ── Resolve roads to builder slots, dropping loops and duplicates ──
        let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
        let mut roads: Vec<(usize, usize)> = Vec::with_capacity(self.roads.len());
        let mut loops = 0usize;
        for &(a, b) in &self.roads {
            let sa = *self.slots.get(&a).ok_or(RouteError::UnknownNode(a))?;
            let sb = *self.slots.get(&b).ok_or(RouteError::UnknownNode(b))?;
            if sa == sb {
                loops += 1;
                continue;
            }
            if seen.insert((sa.min(sb), sa.max(sb))) {
                roads.push((sa, sb));
            }
        }
        if loops > 0 {
            log::warn!("ignored {loops} self-loop road(s)");
        }

        // ── Prune isolated nodes and assign dense ids ─────────────────────
        let mut degree = vec![0u32; self.nodes.len()];
        for &(a, b) in &roads {
            degree[a] += 1;
            degree[b] += 1;
        }

        let mut dense = vec![NodeId::INVALID; self.nodes.len()];
        let mut node_pos = Vec::new();
        let mut node_raw = Vec::new();
        for (slot, &(raw, pos)) in self.nodes.iter().enumerate() {
            if degree[slot] > 0 {
                dense[slot] = NodeId(node_pos.len() as u32);
                node_pos.push(pos);
                node_raw.push(raw);
            }
        }
        let node_count = node_pos.len();
        let pruned = self.nodes.len() - node_count;

        // ── CSR row pointer, then fill ────────────────────────────────────
        let mut adj_start = vec![0u32; node_count + 1];
        for &(a, b) in &roads {
            adj_start[dense[a].index() + 1] += 1;
            adj_start[dense[b].index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }

        let mut cursor: Vec<u32> = adj_start[..node_count].to_vec();
        let mut adj_to = vec![NodeId::INVALID; roads.len() * 2];
        for &(a, b) in &roads {
            let (na, nb) = (dense[a], dense[b]);
            adj_to[cursor[na.index()] as usize] = nb;
            cursor[na.index()] += 1;
            adj_to[cursor[nb.index()] as usize] = na;
            cursor[nb.index()] += 1;
        }
        debug_assert_eq!(adj_start[node_count] as usize, adj_to.len());

        // ── Lookup + R-tree bulk load ─────────────────────────────────────
        let by_raw: HashMap<RawId, NodeId> = node_raw
            .iter()
            .enumerate()
            .map(|(i, &raw)| (raw, NodeId(i as u32)))
            .collect();

        let entries: Vec<NodeEntry> = node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        log::info!(
            "road graph built: {node_count} nodes, {} roads, {pruned} isolated nodes pruned",
            roads.len()
        );

        Ok(RoadGraph {
            node_pos,
            node_raw,
            adj_start,
            adj_to,
            by_raw,
            pruned,
            spatial_idx,
        })
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
