//! # Seeding
//!
//! `POST /seed` populates empty collections with a fixed starter set: five sectors, ten
//! tools, and one comparison per sector. Each collection is seeded independently and only
//! when it holds no documents, so repeated or concurrent calls never duplicate data.

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::post;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    ApiError, AppState, Collection, Comparison, DataStoreError, DocumentStore, Record, Sector,
    Tool, ValidationError,
};

/// Errors raised while seeding.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedError {
    /// A seed record failed its own schema.
    Validation(ValidationError),
    /// The store rejected a read or write.
    Store(DataStoreError),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Validation(e) => write!(f, "invalid seed record: {}", e),
            SeedError::Store(e) => write!(f, "seeding failed: {}", e),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<ValidationError> for SeedError {
    fn from(e: ValidationError) -> Self {
        SeedError::Validation(e)
    }
}

impl From<DataStoreError> for SeedError {
    fn from(e: DataStoreError) -> Self {
        SeedError::Store(e)
    }
}

impl From<SeedError> for ApiError {
    fn from(e: SeedError) -> Self {
        match e {
            SeedError::Validation(e) => ApiError::from(e),
            SeedError::Store(e) => ApiError::from(e),
        }
    }
}

/// Response of `POST /seed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResponse {
    /// Always `"ok"`.
    pub status: String,
}

/// The starter sectors.
pub fn seed_sectors() -> Result<Vec<Sector>, ValidationError> {
    [
        json!({"name": "Marketing", "slug": "marketing", "description": "Campaigns, content, SEO"}),
        json!({"name": "Sales", "slug": "sales", "description": "Prospecting and enablement"}),
        json!({"name": "Customer Support", "slug": "support", "description": "Helpdesk and chatbots"}),
        json!({"name": "Software Development", "slug": "engineering", "description": "Code assistants and DevOps"}),
        json!({"name": "Design", "slug": "design", "description": "Images, video, UI/UX"}),
    ]
    .into_iter()
    .map(Sector::from_value)
    .collect()
}

/// The starter tools, two per sector.
pub fn seed_tools() -> Result<Vec<Tool>, ValidationError> {
    [
        json!({
            "name": "Jasper",
            "sector_slug": "marketing",
            "summary": "AI copy for ads and blogs",
            "strengths": ["Templates", "Brand voice"],
            "limitations": ["Price"],
            "website": "https://www.jasper.ai",
            "pricing": "From $39/mo",
            "rating": 4.2
        }),
        json!({
            "name": "HubSpot AI",
            "sector_slug": "marketing",
            "summary": "AI features inside HubSpot",
            "strengths": ["Integrated"],
            "limitations": ["Ecosystem lock-in"],
            "website": "https://www.hubspot.com",
            "pricing": "Tiered",
            "rating": 4.0
        }),
        json!({
            "name": "Apollo AI",
            "sector_slug": "sales",
            "summary": "Prospecting with AI signals",
            "strengths": ["Data"],
            "limitations": ["Learning curve"],
            "website": "https://www.apollo.io",
            "pricing": "Freemium",
            "rating": 4.3
        }),
        json!({
            "name": "Gong",
            "sector_slug": "sales",
            "summary": "Revenue intelligence",
            "strengths": ["Call analysis"],
            "limitations": ["Enterprise pricing"],
            "website": "https://www.gong.io",
            "pricing": "Quote-based",
            "rating": 4.5
        }),
        json!({
            "name": "Intercom Fin",
            "sector_slug": "support",
            "summary": "AI chatbot for support",
            "strengths": ["Answers from docs"],
            "limitations": ["Requires good KB"],
            "website": "https://www.intercom.com",
            "pricing": "Add-on",
            "rating": 4.4
        }),
        json!({
            "name": "Zendesk AI",
            "sector_slug": "support",
            "summary": "AI assist in helpdesk",
            "strengths": ["Workflows"],
            "limitations": ["Add-on cost"],
            "website": "https://www.zendesk.com",
            "pricing": "Add-on",
            "rating": 4.1
        }),
        json!({
            "name": "GitHub Copilot",
            "sector_slug": "engineering",
            "summary": "Code completion and chat",
            "strengths": ["IDE integration"],
            "limitations": ["Best with popular langs"],
            "website": "https://github.com/features/copilot",
            "pricing": "$10-$19/mo",
            "rating": 4.7
        }),
        json!({
            "name": "OpenAI o1",
            "sector_slug": "engineering",
            "summary": "Reasoning models for complex tasks",
            "strengths": ["Reasoning"],
            "limitations": ["Cost"],
            "website": "https://openai.com",
            "pricing": "Usage-based",
            "rating": 4.6
        }),
        json!({
            "name": "Midjourney",
            "sector_slug": "design",
            "summary": "Generative images",
            "strengths": ["Quality"],
            "limitations": ["Discord UX"],
            "website": "https://www.midjourney.com",
            "pricing": "From $10/mo",
            "rating": 4.6
        }),
        json!({
            "name": "Figma AI",
            "sector_slug": "design",
            "summary": "Generate and edit UI",
            "strengths": ["Design-native"],
            "limitations": ["Early features"],
            "website": "https://www.figma.com",
            "pricing": "Included",
            "rating": 4.2
        }),
    ]
    .into_iter()
    .map(Tool::from_value)
    .collect()
}

/// The starter comparisons, one per sector.
pub fn seed_comparisons() -> Result<Vec<Comparison>, ValidationError> {
    [
        json!({
            "sector_slug": "marketing",
            "headline": "Best AI Tools for Marketing in 2025",
            "intro": "We tested top tools for content, SEO, and campaigns.",
            "top_tools": ["Jasper", "HubSpot AI"]
        }),
        json!({
            "sector_slug": "sales",
            "headline": "Top AI Tools for Sales Teams",
            "intro": "Prospecting, call analysis, and forecasting.",
            "top_tools": ["Gong", "Apollo AI"]
        }),
        json!({
            "sector_slug": "support",
            "headline": "AI for Customer Support",
            "intro": "Bots, deflection, and agent assistance.",
            "top_tools": ["Intercom Fin", "Zendesk AI"]
        }),
        json!({
            "sector_slug": "engineering",
            "headline": "AI for Software Development",
            "intro": "Code completion, reviews, and reasoning.",
            "top_tools": ["GitHub Copilot", "OpenAI o1"]
        }),
        json!({
            "sector_slug": "design",
            "headline": "AI for Designers",
            "intro": "From ideas to assets.",
            "top_tools": ["Midjourney", "Figma AI"]
        }),
    ]
    .into_iter()
    .map(Comparison::from_value)
    .collect()
}

fn bodies<R: Record>(records: &[R]) -> Result<Vec<Value>, DataStoreError> {
    records.iter().map(Record::to_body).collect()
}

async fn seed_collection<R: Record>(
    store: &dyn DocumentStore,
    records: &[R],
) -> Result<bool, SeedError> {
    let collection = R::COLLECTION;
    let inserted = store
        .insert_many_if_empty(collection, &bodies(records)?)
        .await?;
    if inserted {
        tracing::info!(%collection, count = records.len(), "seeded collection");
    } else {
        tracing::debug!(%collection, "collection already populated");
    }
    Ok(inserted)
}

/// Seeds every empty collection and returns the collections that were populated.
///
/// All seed records are validated before anything is written.
///
/// ```rust
/// # fn block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// use sectorguide::{Collection, InMemoryDocumentStore, seed_store};
///
/// let store = InMemoryDocumentStore::new();
/// block_on(async {
///     let first = seed_store(&store).await.unwrap();
///     assert_eq!(first, Collection::ALL.to_vec());
///     let second = seed_store(&store).await.unwrap();
///     assert!(second.is_empty());
/// });
/// ```
pub async fn seed_store(store: &dyn DocumentStore) -> Result<Vec<Collection>, SeedError> {
    let sectors = seed_sectors()?;
    let tools = seed_tools()?;
    let comparisons = seed_comparisons()?;

    let mut populated = Vec::new();
    if seed_collection(store, &sectors).await? {
        populated.push(Collection::Sector);
    }
    if seed_collection(store, &tools).await? {
        populated.push(Collection::Tool);
    }
    if seed_collection(store, &comparisons).await? {
        populated.push(Collection::Comparison);
    }
    Ok(populated)
}

/// `POST /seed`.
async fn seed(State(state): State<AppState>) -> Result<Json<SeedResponse>, ApiError> {
    let store = state.require_store()?;
    seed_store(store.as_ref()).await?;
    Ok(Json(SeedResponse {
        status: "ok".to_string(),
    }))
}

/// Routes for `/seed`.
pub fn create_seed_router() -> Router<AppState> {
    Router::new().route("/seed", post(seed))
}
