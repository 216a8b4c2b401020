//! Request and response types for the three map operations.
//!
//! Requests are validated here, before any core component sees them; a
//! rejected request never touches the index, graph or stored routes.

use gt_core::{GeoBox, GeoPoint};
use gt_route::Route;

use crate::{ServiceError, ServiceResult};

// ── Raster ────────────────────────────────────────────────────────────────────

/// Viewport query: the box the client is looking at and its size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterRequest {
    pub ullat: f64,
    pub ullon: f64,
    pub lrlat: f64,
    pub lrlon: f64,
    /// Viewport width in pixels.
    pub w: u32,
    /// Viewport height in pixels.
    pub h: u32,
}

impl RasterRequest {
    pub fn query_box(&self) -> GeoBox {
        GeoBox::from_edges(self.ullat, self.ullon, self.lrlat, self.lrlon)
    }

    pub fn validate(&self) -> ServiceResult<()> {
        check_point("ul", self.ullat, self.ullon)?;
        check_point("lr", self.lrlat, self.lrlon)?;
        if !(self.ullat > self.lrlat && self.ullon < self.lrlon) {
            return Err(invalid(format!(
                "upper-left ({}, {}) must be north-west of lower-right ({}, {})",
                self.ullat, self.ullon, self.lrlat, self.lrlon
            )));
        }
        if self.w == 0 || self.h == 0 {
            return Err(invalid(format!("viewport {}x{} must be non-empty", self.w, self.h)));
        }
        Ok(())
    }
}

/// Result of a raster query.
///
/// When nothing intersects the query, `query_success` is `false`, every
/// numeric field is zero and there is no image.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterResponse {
    pub raster_ul_lon: f64,
    pub raster_ul_lat: f64,
    pub raster_lr_lon: f64,
    pub raster_lr_lat: f64,
    pub raster_width: u32,
    pub raster_height: u32,
    pub depth: u8,
    pub query_success: bool,
    /// Encoded PNG.  Not serialized; front ends ship it separately.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub image_png: Option<Vec<u8>>,
}

impl RasterResponse {
    pub fn failed() -> Self {
        Self::default()
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
}

impl RouteRequest {
    pub fn start(&self) -> GeoPoint {
        GeoPoint::new(self.start_lat, self.start_lon)
    }

    pub fn end(&self) -> GeoPoint {
        GeoPoint::new(self.end_lat, self.end_lon)
    }

    pub fn validate(&self) -> ServiceResult<()> {
        check_point("start", self.start_lat, self.start_lon)?;
        check_point("end", self.end_lat, self.end_lon)
    }
}

/// Result of a route query.  An empty `node_ids` list means no path.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResponse {
    /// Ingestion ids of the route's nodes, start first.
    pub node_ids: Vec<u64>,
    /// Great-circle length of the route in metres.
    pub distance_m: f64,
    pub success: bool,
}

impl From<&Route> for RouteResponse {
    fn from(route: &Route) -> Self {
        RouteResponse {
            node_ids:   route.raw_ids.iter().map(|r| r.0).collect(),
            distance_m: route.length_m(),
            success:    !route.is_empty(),
        }
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

fn invalid(msg: String) -> ServiceError {
    ServiceError::InvalidRequest(msg)
}

fn check_point(name: &str, lat: f64, lon: f64) -> ServiceResult<()> {
    if !(lat.is_finite() && lon.is_finite()) {
        return Err(invalid(format!("{name} coordinates ({lat}, {lon}) must be finite")));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(invalid(format!("{name} coordinates ({lat}, {lon}) out of range")));
    }
    Ok(())
}
