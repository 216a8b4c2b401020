//! Routing trait and the informed shortest-path search.
//!
//! # Cost model
//!
//! Edge cost is the straight-line (Euclidean) distance between the two
//! endpoints in raw degrees.  The A* heuristic is the same distance from a
//! node to the target, which never overestimates and is consistent, so the
//! first time the target is popped its cost is optimal.
//!
//! # Search state
//!
//! Best-known distance, predecessor and the visited set live in a
//! [`SearchState`] allocated per query and dropped when it returns.  Nothing
//! is written to the shared [`RoadGraph`], so any number of queries may run
//! concurrently against one graph.
//!
//! # Lazy deletion
//!
//! The frontier is a plain `BinaryHeap`.  A node whose distance improves is
//! pushed again rather than updated in place, and entries for nodes already
//! visited are skipped when popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use gt_core::{GeoPoint, NodeId, RawId};

use crate::graph::RoadGraph;
use crate::{RouteError, RouteResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: nodes from start to end, their ingestion
/// ids and positions (parallel arrays), and the total cost.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub raw_ids: Vec<RawId>,
    pub points: Vec<GeoPoint>,
    /// Sum of Euclidean edge lengths, in degrees.
    pub cost: f64,
}

impl Route {
    /// The "no route" value stored after a failed or cleared query.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Great-circle length in metres along the node sequence.
    pub fn length_m(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance_m(w[1])).sum()
    }

    fn from_nodes(graph: &RoadGraph, nodes: Vec<NodeId>, cost: f64) -> Self {
        Route {
            raw_ids: nodes.iter().map(|&n| graph.raw_id(n)).collect(),
            points:  nodes.iter().map(|&n| graph.pos(n)).collect(),
            nodes,
            cost,
        }
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve concurrent
/// requests against a shared graph.
pub trait Router: Send + Sync {
    /// Shortest route between two nodes of `graph`.
    ///
    /// `from == to` yields a one-node route of cost 0.  A disconnected pair
    /// yields [`RouteError::NoRoute`].
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> RouteResult<Route>;

    /// Snap both points to their nearest routable nodes, then [`route`](Self::route).
    fn shortest_path(&self, graph: &RoadGraph, start: GeoPoint, end: GeoPoint) -> RouteResult<Route> {
        let from = graph.nearest_node(start).ok_or(RouteError::EmptyGraph)?;
        let to = graph.nearest_node(end).ok_or(RouteError::EmptyGraph)?;
        log::debug!("snapped {start} → {from}, {end} → {to}");
        self.route(graph, from, to)
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// Priority-first search ordered by `distance_so_far + euclidean(node, target)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AStarRouter {
    /// Fail with [`RouteError::FrontierLimit`] once the frontier holds more
    /// entries than this.  `None` means unbounded.
    pub max_frontier: Option<usize>,
}

impl AStarRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_frontier(max_frontier: Option<usize>) -> Self {
        Self { max_frontier }
    }
}

impl Router for AStarRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> RouteResult<Route> {
        let target = graph.pos(to);
        search(graph, from, to, self.max_frontier, |p| p.euclidean(target))
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Uninformed variant (zero heuristic).  Same costs, more pops; useful as a
/// reference when checking [`AStarRouter`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> RouteResult<Route> {
        search(graph, from, to, None, |_| 0.0)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Frontier entry.  Ordered so that `BinaryHeap` (a max-heap) pops the
/// smallest priority first; ties go to the smaller remaining estimate, then
/// the smaller `NodeId`.
#[derive(Clone, Copy, Debug)]
struct Frontier {
    priority:  f64,
    heuristic: f64,
    node:      NodeId,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.heuristic.total_cmp(&self.heuristic))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Best-known distance to a node and the node it was reached from.
#[derive(Clone, Copy, Debug)]
struct Label {
    dist: f64,
    prev: Option<NodeId>,
}

/// Per-query scratch space, keyed by node.  Only nodes the search touches
/// get an entry.
#[derive(Default)]
struct SearchState {
    labels:  FxHashMap<NodeId, Label>,
    visited: FxHashSet<NodeId>,
}

impl SearchState {
    /// Walk predecessors back from `to`.  Only called once `to` has been
    /// popped, so every link on the chain exists.
    fn path_to(&self, to: NodeId) -> Vec<NodeId> {
        let mut path = vec![to];
        let mut cur = to;
        while let Some(prev) = self.labels.get(&cur).and_then(|l| l.prev) {
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        path
    }
}

fn search(
    graph: &RoadGraph,
    from: NodeId,
    to: NodeId,
    max_frontier: Option<usize>,
    heuristic: impl Fn(GeoPoint) -> f64,
) -> RouteResult<Route> {
    if from == to {
        return Ok(Route::from_nodes(graph, vec![from], 0.0));
    }

    let mut state = SearchState::default();
    let mut heap: BinaryHeap<Frontier> = BinaryHeap::new();

    let h0 = heuristic(graph.pos(from));
    state.labels.insert(from, Label { dist: 0.0, prev: None });
    heap.push(Frontier { priority: h0, heuristic: h0, node: from });

    let mut pops = 0usize;
    while let Some(Frontier { node, .. }) = heap.pop() {
        // Stale duplicate of a node already finalised.
        if !state.visited.insert(node) {
            continue;
        }
        pops += 1;

        let dist = state.labels[&node].dist;
        if node == to {
            log::debug!("route {from} → {to}: cost {dist:.6} after {pops} pops");
            return Ok(Route::from_nodes(graph, state.path_to(to), dist));
        }

        let here = graph.pos(node);
        for &next in graph.neighbors(node) {
            if state.visited.contains(&next) {
                continue;
            }
            let there = graph.pos(next);
            let candidate = dist + here.euclidean(there);
            let improves = state.labels.get(&next).is_none_or(|l| candidate < l.dist);
            if improves {
                state.labels.insert(next, Label { dist: candidate, prev: Some(node) });
                let h = heuristic(there);
                heap.push(Frontier { priority: candidate + h, heuristic: h, node: next });

                if let Some(limit) = max_frontier {
                    if heap.len() > limit {
                        return Err(RouteError::FrontierLimit { limit });
                    }
                }
            }
        }
    }

    log::debug!("route {from} → {to}: frontier exhausted after {pops} pops");
    Err(RouteError::NoRoute { from, to })
}
