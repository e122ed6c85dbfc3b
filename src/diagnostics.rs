//! Service diagnostics: the liveness message, schema introspection, and the store check.
//!
//! None of these endpoints fail. Store problems are reported inline in `GET /test`.

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use serde::{Deserialize, Serialize};

use crate::{AppState, Comparison, JsonSchema, Sector, Tool};

/// Number of collection names reported by `GET /test`.
pub const MAX_REPORTED_COLLECTIONS: usize = 10;
/// Number of characters of a store error reported by `GET /test`.
pub const MAX_ERROR_CHARS: usize = 80;

/// Response of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    /// A fixed liveness message.
    pub message: String,
}

/// Response of `GET /schema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    /// Schema of [`Sector`].
    pub sector: serde_json::Value,
    /// Schema of [`Tool`].
    pub tool: serde_json::Value,
    /// Schema of [`Comparison`].
    pub comparison: serde_json::Value,
}

/// Response of `GET /test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    /// Always `"✅ Running"`.
    pub backend: String,
    /// Overall store status.
    pub database: String,
    /// Whether `DATABASE_URL` is set; null without a store.
    pub database_url: Option<String>,
    /// The configured database name; null without a store.
    pub database_name: Option<String>,
    /// `"Connected"` or `"Not Connected"`.
    pub connection_status: String,
    /// Up to ten non-empty collections.
    pub collections: Vec<String>,
}

impl TestReport {
    fn unavailable() -> Self {
        Self {
            backend: "✅ Running".to_string(),
            database: "❌ Not Available".to_string(),
            database_url: None,
            database_name: None,
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// `GET /`.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI Tools Blog Backend Running".to_string(),
    })
}

/// `GET /schema`.
async fn schema() -> Json<SchemaResponse> {
    Json(SchemaResponse {
        sector: Sector::json_schema(),
        tool: Tool::json_schema(),
        comparison: Comparison::json_schema(),
    })
}

/// `GET /test`: reports store availability without ever failing.
async fn test_store(State(state): State<AppState>) -> Json<TestReport> {
    let mut report = TestReport::unavailable();
    let Some(store) = state.store() else {
        return Json(report);
    };

    let settings = state.settings();
    report.database_url = Some(
        if settings.database_url.is_some() {
            "✅ Set"
        } else {
            "❌ Not Set"
        }
        .to_string(),
    );
    report.database_name = Some(
        settings
            .database_name
            .clone()
            .unwrap_or_else(|| "❌ Not Set".to_string()),
    );
    report.connection_status = "Connected".to_string();

    match store.list_collections().await {
        Ok(mut names) => {
            names.truncate(MAX_REPORTED_COLLECTIONS);
            report.collections = names;
            report.database = "✅ Connected & Working".to_string();
        }
        Err(e) => {
            tracing::warn!(error = %e, "listing collections failed");
            report.database = format!(
                "⚠️  Connected but Error: {}",
                truncate_chars(&e.to_string(), MAX_ERROR_CHARS)
            );
        }
    }
    Json(report)
}

/// Routes for `/`, `/schema`, and `/test`.
pub fn create_diagnostics_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/schema", get(schema))
        .route("/test", get(test_store))
}
