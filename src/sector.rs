//! # Sectors
//!
//! A sector is an industry or use-case category that groups tools and comparisons.
//! This module holds the [`Sector`] record and the two read endpoints built on it:
//!
//! - `GET /sectors` lists every sector.
//! - `GET /sectors/{slug}` returns one sector with its tools and comparison.

use axum::Router;
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::get;
use serde::{Deserialize, Serialize};

use crate::{
    ApiError, AppState, Collection, Comparison, ComparisonDetail, Record, Tool, ToolDetail,
};

/// An industry or use-case category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sectorguide_derive::JsonSchema)]
pub struct Sector {
    /// Display name.
    #[schema(description = "Sector name, e.g., Marketing, Sales", min_length = 1)]
    pub name: String,
    /// URL-friendly identifier; intended to be unique.
    #[schema(description = "URL-friendly unique identifier", min_length = 1)]
    pub slug: String,
    /// Optional blurb.
    #[schema(description = "Short description of the sector")]
    pub description: Option<String>,
}

impl Record for Sector {
    const COLLECTION: Collection = Collection::Sector;
}

/// One entry of `GET /sectors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorListItem {
    /// Store-assigned document id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL-friendly identifier.
    pub slug: String,
    /// Optional blurb.
    pub description: Option<String>,
}

/// Response of `GET /sectors/{slug}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorDetailResponse {
    /// The sector itself.
    pub sector: Sector,
    /// Tools whose `sector_slug` matches, in insertion order.
    pub tools: Vec<ToolDetail>,
    /// The first comparison for the sector, if any.
    pub comparison: Option<ComparisonDetail>,
}

/// `GET /sectors`: every sector in insertion order.
///
/// Without a store the list is empty; a store failure is a 500. Documents that are not
/// sectors are left out.
async fn list_sectors(State(state): State<AppState>) -> Result<Json<Vec<SectorListItem>>, ApiError> {
    let Some(store) = state.store() else {
        return Ok(Json(Vec::new()));
    };
    let sectors = store
        .find_all(Collection::Sector)
        .await?
        .into_iter()
        .filter_map(|doc| {
            let sector: Sector = doc.decode_or_skip()?;
            Some(SectorListItem {
                id: doc.id,
                name: sector.name,
                slug: sector.slug,
                description: sector.description,
            })
        })
        .collect();
    Ok(Json(sectors))
}

/// `GET /sectors/{slug}`: the sector, its tools, and its comparison.
///
/// Undecodable tool or comparison documents are skipped; an undecodable sector is not found.
async fn get_sector(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<SectorDetailResponse>, ApiError> {
    let store = state.require_store()?;
    let Some(sector) = store
        .find_one_by_field(Collection::Sector, "slug", &slug)
        .await?
        .and_then(|doc| doc.decode_or_skip::<Sector>())
    else {
        return Err(ApiError::not_found("Sector not found"));
    };

    let tools: Vec<ToolDetail> = store
        .find_by_field(Collection::Tool, "sector_slug", &slug)
        .await?
        .iter()
        .filter_map(|doc| doc.decode_or_skip::<Tool>().map(ToolDetail::from))
        .collect();

    let comparison = store
        .find_one_by_field(Collection::Comparison, "sector_slug", &slug)
        .await?
        .and_then(|doc| doc.decode_or_skip::<Comparison>())
        .map(ComparisonDetail::from);

    tracing::debug!(slug = %slug, tools = tools.len(), "sector detail");
    Ok(Json(SectorDetailResponse {
        sector,
        tools,
        comparison,
    }))
}

/// Routes for `/sectors` and `/sectors/{slug}`.
pub fn create_sector_router() -> Router<AppState> {
    Router::new()
        .route("/sectors", get(list_sectors))
        .route("/sectors/:slug", get(get_sector))
}
