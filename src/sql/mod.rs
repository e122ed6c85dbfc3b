//! PostgreSQL backend for sectorguide.
//!
//! This module stores every collection in one JSONB `documents` table and exposes it
//! through [`PgDocumentStore`].

/// Document operations on the `documents` table.
pub mod document;

mod store;

pub use store::PgDocumentStore;
