use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    ApiError, DocumentStore, StoreSettings, create_diagnostics_router, create_sector_router,
    create_seed_router, create_tool_router,
};

/// State shared by every handler.
///
/// `store` is `None` when no store is configured or the store could not be reached at
/// startup; handlers degrade instead of failing to route.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn DocumentStore>>,
    settings: Arc<StoreSettings>,
}

impl AppState {
    /// Creates state from an optional store and the settings it was configured with.
    pub fn new(store: Option<Arc<dyn DocumentStore>>, settings: StoreSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    /// State backed by `store`.
    pub fn with_store(store: Arc<dyn DocumentStore>, settings: StoreSettings) -> Self {
        Self::new(Some(store), settings)
    }

    /// State with no store.
    pub fn unconfigured() -> Self {
        Self::new(None, StoreSettings::default())
    }

    /// Replaces the reported settings.
    pub fn with_settings(mut self, settings: StoreSettings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    /// The store, if one is available.
    pub fn store(&self) -> Option<&Arc<dyn DocumentStore>> {
        self.store.as_ref()
    }

    /// The store, or the 500 returned when none is configured.
    pub fn require_store(&self) -> Result<&Arc<dyn DocumentStore>, ApiError> {
        self.store.as_ref().ok_or_else(ApiError::store_not_configured)
    }

    /// The settings the store was configured with.
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builds the full application: every route, permissive CORS, and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(create_diagnostics_router())
        .merge(create_seed_router())
        .merge(create_sector_router())
        .merge(create_tool_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::memory_state;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    #[tokio::test]
    async fn unknown_route_is_404() {
        let server = TestServer::new(create_router(memory_state())).unwrap();
        let response = server.get("/nope").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let server = TestServer::new(create_router(memory_state())).unwrap();
        let response = server.get("/").await;
        response.assert_status_ok();
        let allow_origin = response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok());
        assert_eq!(allow_origin, Some("*"));
    }

    #[test]
    fn debug_hides_store() {
        let debug = format!("{:?}", AppState::unconfigured());
        assert!(debug.contains("store: false"));
    }
}
