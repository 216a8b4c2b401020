//! Per-session route storage.
//!
//! Each session holds at most one "current route", which the next raster
//! request for that session draws on top of the tiles.  [`DEFAULT_SESSION`]
//! always exists, so a single-user front end never needs to open one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use gt_core::SessionId;
use gt_route::Route;

use crate::{ServiceError, ServiceResult};

/// Session that exists from construction and cannot be closed.
pub const DEFAULT_SESSION: SessionId = SessionId(0);

/// Thread-safe map from session to its stored route.
///
/// Routes are handed out as `Arc<Route>` so a raster request can keep
/// drawing one while another request replaces it.
pub struct SessionStore {
    routes: RwLock<HashMap<SessionId, Arc<Route>>>,
    next_id: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        let mut routes = HashMap::new();
        routes.insert(DEFAULT_SESSION, Arc::new(Route::empty()));
        Self { routes: RwLock::new(routes), next_id: AtomicU64::new(DEFAULT_SESSION.0 + 1) }
    }

    /// Allocate a fresh session with an empty route.
    pub fn open(&self) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.write().insert(id, Arc::new(Route::empty()));
        log::debug!("opened {id}");
        id
    }

    /// Drop a session and its route.  Returns `false` for unknown ids and
    /// for [`DEFAULT_SESSION`], which stays open.
    pub fn close(&self, id: SessionId) -> bool {
        if id == DEFAULT_SESSION {
            return false;
        }
        self.write().remove(&id).is_some()
    }

    pub fn route(&self, id: SessionId) -> ServiceResult<Arc<Route>> {
        self.read().get(&id).cloned().ok_or(ServiceError::UnknownSession(id))
    }

    /// Replace the session's route.
    pub fn set_route(&self, id: SessionId, route: Route) -> ServiceResult<()> {
        let mut routes = self.write();
        let slot = routes.get_mut(&id).ok_or(ServiceError::UnknownSession(id))?;
        *slot = Arc::new(route);
        Ok(())
    }

    /// Reset the session's route to empty.
    pub fn clear(&self, id: SessionId) -> ServiceResult<()> {
        self.set_route(id, Route::empty())
    }

    /// Number of open sessions, including the default one.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Every write is one map operation, so a poisoned map is still consistent.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, Arc<Route>>> {
        self.routes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, Arc<Route>>> {
        self.routes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
