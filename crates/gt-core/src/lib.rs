//! `gt-core` — shared vocabulary of the `geotile` workspace.
//!
//! Every other `gt-*` crate depends on this one; it depends on none of them.
//! External dependencies are `thiserror` plus, behind the `serde` feature,
//! `serde` and `serde_json`.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `RawId`, `SessionId`                        |
//! | [`geo`]         | `GeoPoint`, `GeoBox`, Euclidean + haversine distance  |
//! | [`config`]      | `MapConfig`, `RouteStroke`, tile constants            |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types and     |
//! |         | `MapConfig::from_json_path`.                               |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MapConfig, RouteStroke, MAX_DEPTH, MAX_SUPPORTED_DEPTH, TILE_SIZE};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoBox, GeoPoint};
pub use ids::{NodeId, RawId, SessionId};
