//! The map service: raster, route and clear-route over shared, immutable
//! map data.
//!
//! # Sharing
//!
//! The quad-tree and road graph are built once and held behind `Arc`s; every
//! operation takes `&self`.  Route search state is allocated per call and
//! the only mutable state is the [`SessionStore`], so one `MapService` can
//! serve requests from any number of threads.

use std::sync::Arc;

use gt_core::{MapConfig, SessionId};
use gt_index::QuadTree;
use gt_raster::{Compositor, DirTileSource, TileSource};
use gt_route::{AStarRouter, RoadGraph, Route, RouteError, Router};

use crate::request::{RasterRequest, RasterResponse, RouteRequest, RouteResponse};
use crate::session::SessionStore;
use crate::ServiceResult;

pub struct MapService {
    config: MapConfig,
    tree: Arc<QuadTree>,
    graph: Arc<RoadGraph>,
    router: AStarRouter,
    compositor: Compositor,
    tiles: Box<dyn TileSource>,
    sessions: SessionStore,
}

impl MapService {
    /// Validate `config`, build the tile index, and wire up the collaborators.
    pub fn new(
        config: MapConfig,
        graph: Arc<RoadGraph>,
        tiles: Box<dyn TileSource>,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let tree = Arc::new(QuadTree::from_config(&config)?);
        log::info!(
            "map service ready: {} tiles to depth {}, {} routable nodes",
            tree.len(),
            tree.max_depth(),
            graph.node_count()
        );
        Ok(Self {
            router: AStarRouter::with_max_frontier(config.max_frontier),
            compositor: Compositor::from_config(&config),
            tree,
            graph,
            tiles,
            sessions: SessionStore::new(),
            config,
        })
    }

    /// Like [`new`](Self::new), reading tiles from `config.tile_dir`.
    pub fn with_tile_dir(config: MapConfig, graph: Arc<RoadGraph>) -> ServiceResult<Self> {
        let tiles = Box::new(DirTileSource::from_config(&config));
        Self::new(config, graph, tiles)
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn tree(&self) -> &Arc<QuadTree> {
        &self.tree
    }

    pub fn graph(&self) -> &Arc<RoadGraph> {
        &self.graph
    }

    // ── Sessions ──────────────────────────────────────────────────────────

    pub fn open_session(&self) -> SessionId {
        self.sessions.open()
    }

    pub fn close_session(&self, session: SessionId) -> bool {
        self.sessions.close(session)
    }

    /// The route currently stored for `session` (possibly empty).
    pub fn current_route(&self, session: SessionId) -> ServiceResult<Arc<Route>> {
        self.sessions.route(session)
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Stitch the tiles covering the request's box and overlay the session's
    /// stored route.
    ///
    /// A box that misses the map entirely is not an error: the response has
    /// `query_success == false`.
    pub fn raster(&self, session: SessionId, req: &RasterRequest) -> ServiceResult<RasterResponse> {
        req.validate()?;
        let route = self.sessions.route(session)?;

        let selection = self.tree.select(&req.query_box(), req.w)?;
        if selection.is_empty() {
            log::debug!("raster {}: no tiles intersect", req.query_box());
            return Ok(RasterResponse::failed());
        }

        let overlay = (!route.is_empty()).then_some(route.points.as_slice());
        let raster = self.compositor.compose(&selection, self.tiles.as_ref(), overlay)?;
        let png = raster.encode_png()?;

        Ok(RasterResponse {
            raster_ul_lon: raster.bounds.ul.lon,
            raster_ul_lat: raster.bounds.ul.lat,
            raster_lr_lon: raster.bounds.lr.lon,
            raster_lr_lat: raster.bounds.lr.lat,
            raster_width:  raster.width(),
            raster_height: raster.height(),
            depth:         raster.depth,
            query_success: true,
            image_png:     Some(png),
        })
    }

    /// Find the shortest route between the nodes nearest the two points and
    /// store it as the session's current route.
    ///
    /// No path (disconnected endpoints or an empty graph) yields an empty
    /// response and clears the stored route.  Any other routing failure also
    /// clears it and is returned as an error.
    pub fn route(&self, session: SessionId, req: &RouteRequest) -> ServiceResult<RouteResponse> {
        req.validate()?;
        // Fail before searching if the session is unknown.
        self.sessions.route(session)?;

        let route = match self.router.shortest_path(&self.graph, req.start(), req.end()) {
            Ok(route) => route,
            Err(e @ (RouteError::NoRoute { .. } | RouteError::EmptyGraph)) => {
                log::info!("{session}: {e}");
                Route::empty()
            }
            Err(e) => {
                self.sessions.clear(session)?;
                return Err(e.into());
            }
        };

        let response = RouteResponse::from(&route);
        log::debug!(
            "{session}: route of {} nodes, {:.1} m",
            response.node_ids.len(),
            response.distance_m
        );
        self.sessions.set_route(session, route)?;
        Ok(response)
    }

    /// Forget the session's stored route.
    pub fn clear_route(&self, session: SessionId) -> ServiceResult<()> {
        self.sessions.clear(session)
    }
}
