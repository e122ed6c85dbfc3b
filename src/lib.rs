//! # sectorguide: a catalogue of AI tools by sector
//!
//! sectorguide stores three kinds of records and serves them over a small REST API:
//!
//! - **Sectors**: industry or use-case categories such as Marketing or Design
//! - **Tools**: AI products, each filed under one sector by slug
//! - **Comparisons**: curated rankings of the top tools in a sector
//!
//! ## Core Concepts
//!
//! ### Records and Schemas
//! Every record shape derives [`JsonSchema`], producing a JSON schema with the constraints
//! declared on its fields (non-empty names, a rating between 0 and 5, an http(s) website).
//! [`Record::from_value`] validates untrusted JSON against that schema before deserializing,
//! so malformed data never reaches the store.
//!
//! ### Document Store
//! Records are persisted as JSON documents behind the [`DocumentStore`] trait. Two backends
//! exist: [`PgDocumentStore`] keeps documents in a PostgreSQL JSONB table, and
//! [`InMemoryDocumentStore`] keeps them in a mutex-guarded map. Seeding relies on
//! [`DocumentStore::insert_many_if_empty`], which fills a collection only while it is empty.
//!
//! ### Degraded Mode
//! The server starts even when no store is configured or reachable. Read endpoints then
//! answer with empty results and `GET /test` reports the store as unavailable.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP API Layer (Axum routes)            │
//! ├─────────────────────────────────────────┤
//! │ Records (schema-validated shapes)       │
//! ├─────────────────────────────────────────┤
//! │ Document Store (trait-based backends)   │
//! ├─────────────────────────────────────────┤
//! │ PostgreSQL (JSONB) or in-memory map     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Validating Records
//!
//! ```rust
//! use sectorguide::{Record, Tool};
//! use serde_json::json;
//!
//! let tool = Tool::from_value(json!({
//!     "name": "Gong",
//!     "sector_slug": "sales",
//!     "summary": "Revenue intelligence",
//!     "rating": 4.5
//! }))
//! .unwrap();
//! assert!(tool.strengths.is_empty());
//!
//! let too_high = Tool::from_value(json!({
//!     "name": "Gong",
//!     "sector_slug": "sales",
//!     "summary": "Revenue intelligence",
//!     "rating": 9
//! }));
//! assert!(too_high.is_err());
//! ```
//!
//! ### Serving the API
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sectorguide::{AppState, InMemoryDocumentStore, StoreSettings, create_router};
//!
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::with_store(Arc::new(InMemoryDocumentStore::new()), StoreSettings::default());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, create_router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

extern crate self as sectorguide;

mod comparison;
mod config;
mod data_store;
mod diagnostics;
mod errors;
mod json_schema;
mod record;
mod router;
mod sector;
mod seed;
#[cfg(test)]
mod test_utils;
mod tool;
mod validate;

/// Command-line interface utilities for program termination and output formatting.
///
/// Shared by the sectorguide binaries for error reporting and printing responses as JSON
/// or YAML.
pub mod cli_utils;

/// Command-line interface command handlers.
///
/// This module contains the command handlers for the sectorctl CLI application,
/// with each command group implemented in a dedicated submodule.
pub mod commands;

/// HTTP client utilities for interacting with a sectorguide server.
///
/// This module provides a client for the sectorguide HTTP API, handling requests,
/// responses, and error conditions.
pub mod http_utils;

/// PostgreSQL persistence for documents.
///
/// Low-level query functions live in [`sql::document`]; [`PgDocumentStore`] wraps them in
/// the [`DocumentStore`] interface.
pub mod sql;

pub use comparison::{Comparison, ComparisonDetail};
pub use config::{
    ConfigError, ConfigOverrides, DEFAULT_HOST, DEFAULT_PORT, ServerConfig, StoreSettings,
};
pub use data_store::{Collection, Document, DocumentStore, InMemoryDocumentStore};
pub use diagnostics::{
    MAX_ERROR_CHARS, MAX_REPORTED_COLLECTIONS, RootResponse, SchemaResponse, TestReport,
    create_diagnostics_router,
};
pub use errors::{ApiError, DataStoreError, ErrorDetail};
pub use json_schema::{JsonSchema, apply_constraints};
pub use record::Record;
pub use router::{AppState, create_router};
pub use sector::{Sector, SectorDetailResponse, SectorListItem, create_sector_router};
pub use seed::{
    SeedError, SeedResponse, create_seed_router, seed_comparisons, seed_sectors, seed_store,
    seed_tools,
};
pub use sql::PgDocumentStore;
pub use tool::{
    SEARCH_FIELDS, SearchRequest, SearchResponse, Tool, ToolDetail, ToolSummary,
    create_tool_router,
};
pub use validate::{ValidationError, is_http_url, validate_value};
