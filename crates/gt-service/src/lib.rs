//! `gt-service` — the request/response surface of the map.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`service`] | `MapService`: `raster`, `route`, `clear_route`, sessions     |
//! | [`request`] | `RasterRequest`/`RasterResponse`, `RouteRequest`/`RouteResponse` |
//! | [`session`] | `SessionStore`, `DEFAULT_SESSION`                            |
//! | [`error`]   | `ServiceError`, `ServiceResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on request/response types. |
//! | `parallel` | Forwards to `gt-raster/parallel`.                         |

pub mod error;
pub mod request;
pub mod service;
pub mod session;


pub use error::{ServiceError, ServiceResult};
pub use request::{RasterRequest, RasterResponse, RouteRequest, RouteResponse};
pub use service::MapService;
pub use session::{SessionStore, DEFAULT_SESSION};
