//! `gt-route` — road graph, nearest-node snapping, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`graph`]   | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`              |
//! | [`router`]  | `Router` trait, `Route`, `AStarRouter`, `DijkstraRouter`    |
//! | [`ingest`]  | `load_graph_csv` / `load_graph_reader`                      |
//! | [`error`]   | `RouteError`, `RouteResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Route`.                |

pub mod error;
pub mod graph;
pub mod ingest;
pub mod router;


pub use error::{RouteError, RouteResult};
pub use graph::{RoadGraph, RoadGraphBuilder};
pub use ingest::{load_graph_csv, load_graph_reader};
pub use router::{AStarRouter, DijkstraRouter, Route, Router};
