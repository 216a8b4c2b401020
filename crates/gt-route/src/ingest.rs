//! CSV road-graph loader.
//!
//! # CSV format
//!
//! Two files.  `nodes.csv` holds one row per node; `edges.csv` one row per
//! undirected road between two node ids.
//!
//! ```csv
//! id,lat,lon
//! 53085167,37.8731,-122.2612
//! 53085171,37.8739,-122.2598
//! ```
//!
//! ```csv
//! from,to
//! 53085167,53085171
//! ```
//!
//! Nodes without any road are pruned by [`RoadGraphBuilder::build`].  Any
//! malformed row or dangling edge aborts the whole load; no partial graph is
//! returned.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use gt_core::{GeoPoint, RawId};

use crate::graph::{RoadGraph, RoadGraphBuilder};
use crate::{RouteError, RouteResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  u64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from: u64,
    to:   u64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a road graph from a node CSV and an edge CSV on disk.
pub fn load_graph_csv(nodes_path: &Path, edges_path: &Path) -> RouteResult<RoadGraph> {
    let nodes = std::fs::File::open(nodes_path)?;
    let edges = std::fs::File::open(edges_path)?;
    load_graph_reader(nodes, edges)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a byte slice) or loading from network streams.
pub fn load_graph_reader<N: Read, E: Read>(nodes: N, edges: E) -> RouteResult<RoadGraph> {
    let mut builder = RoadGraphBuilder::new();

    let mut node_reader = csv::Reader::from_reader(nodes);
    for (line, result) in node_reader.deserialize::<NodeRecord>().enumerate() {
        let row = result.map_err(|e| RouteError::Parse(format!("nodes row {}: {e}", line + 1)))?;
        let pos = GeoPoint::new(row.lat, row.lon);
        if !pos.is_finite() {
            return Err(RouteError::Parse(format!(
                "nodes row {}: non-finite position for node {}",
                line + 1,
                row.id
            )));
        }
        builder.add_node(RawId(row.id), pos);
    }

    let mut edge_reader = csv::Reader::from_reader(edges);
    for (line, result) in edge_reader.deserialize::<EdgeRecord>().enumerate() {
        let row = result.map_err(|e| RouteError::Parse(format!("edges row {}: {e}", line + 1)))?;
        builder.add_road(RawId(row.from), RawId(row.to));
    }

    log::debug!(
        "ingested {} node rows and {} edge rows",
        builder.node_count(),
        builder.road_count()
    );
    builder.build()
}
