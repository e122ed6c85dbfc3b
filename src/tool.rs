//! # Tools
//!
//! A tool is an AI product listed under one sector. Besides the [`Tool`] record this module
//! provides the response shapes used when tools are embedded in other payloads, and the
//! `POST /search` endpoint, which matches a query against tool names, summaries, and sector
//! slugs without regard to case.

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::post;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{AppState, Collection, Record};

/// Fields `POST /search` matches against.
pub const SEARCH_FIELDS: [&str; 3] = ["name", "summary", "sector_slug"];

/// An AI product entry associated with one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sectorguide_derive::JsonSchema)]
pub struct Tool {
    /// Product name.
    #[schema(description = "Tool name", min_length = 1)]
    pub name: String,
    /// Slug of the owning sector.
    #[schema(description = "Slug of sector this tool belongs to", min_length = 1)]
    pub sector_slug: String,
    /// One-line summary.
    #[schema(description = "Short tool summary", min_length = 1)]
    pub summary: String,
    /// Key strengths.
    #[serde(default)]
    #[schema(description = "Key strengths")]
    pub strengths: Vec<String>,
    /// Known limitations.
    #[serde(default)]
    #[schema(description = "Known limitations")]
    pub limitations: Vec<String>,
    /// Absolute http(s) URL of the official website.
    #[schema(description = "Official website", format = "uri")]
    pub website: Option<String>,
    /// Free-form pricing summary.
    #[schema(description = "Pricing summary")]
    pub pricing: Option<String>,
    /// Editor rating in `[0, 5]`.
    #[schema(description = "Editor rating out of 5", minimum = 0, maximum = 5)]
    pub rating: Option<f64>,
}

impl Record for Tool {
    const COLLECTION: Collection = Collection::Tool;

    /// Stores the website in its normalized form, e.g. `https://openai.com/`.
    fn normalized(mut self) -> Self {
        if let Some(website) = self.website.take() {
            self.website = Some(match Url::parse(&website) {
                Ok(url) => url.to_string(),
                Err(_) => website,
            });
        }
        self
    }
}

/// A tool as it appears inside `GET /sectors/{slug}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDetail {
    /// Product name.
    pub name: String,
    /// One-line summary.
    pub summary: String,
    /// Key strengths.
    pub strengths: Vec<String>,
    /// Known limitations.
    pub limitations: Vec<String>,
    /// Official website.
    pub website: Option<String>,
    /// Pricing summary.
    pub pricing: Option<String>,
    /// Editor rating.
    pub rating: Option<f64>,
}

impl From<Tool> for ToolDetail {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name,
            summary: tool.summary,
            strengths: tool.strengths,
            limitations: tool.limitations,
            website: tool.website,
            pricing: tool.pricing,
            rating: tool.rating,
        }
    }
}

/// A tool as it appears in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSummary {
    /// Product name.
    pub name: String,
    /// Slug of the owning sector.
    pub sector_slug: String,
    /// One-line summary.
    pub summary: String,
    /// Editor rating.
    pub rating: Option<f64>,
    /// Official website.
    pub website: Option<String>,
}

impl From<Tool> for ToolSummary {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name,
            sector_slug: tool.sector_slug,
            summary: tool.summary,
            rating: tool.rating,
            website: tool.website,
        }
    }
}

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Text to look for.
    pub q: String,
}

/// Response of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    /// Matching tools in insertion order.
    pub results: Vec<ToolSummary>,
}

/// `POST /search`: tools whose name, summary, or sector slug contains `q`, ignoring case.
///
/// The query is matched literally. Store failures are logged and yield no results.
async fn search_tools(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let Some(store) = state.store() else {
        return Json(SearchResponse::default());
    };
    let docs = match store.search(Collection::Tool, &SEARCH_FIELDS, &request.q).await {
        Ok(docs) => docs,
        Err(e) => {
            tracing::warn!(error = %e, query = %request.q, "search failed");
            return Json(SearchResponse::default());
        }
    };
    let results = docs
        .iter()
        .filter_map(|doc| doc.decode_or_skip::<Tool>().map(ToolSummary::from))
        .collect();
    Json(SearchResponse { results })
}

/// Routes for `/search`.
pub fn create_tool_router() -> Router<AppState> {
    Router::new().route("/search", post(search_tools))
}
