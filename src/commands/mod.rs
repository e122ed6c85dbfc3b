//! # Command Handlers
//!
//! This module contains the command handlers for the sectorctl CLI application.
//!
//! ## Structure
//!
//! - `service` - Service-level commands (status, schema, test, seed)
//! - `sectors` - Sector commands (list, get)
//! - `search` - Tool search
//! - `shared` - Shared argument checks and the subcommand dispatcher

pub mod search;
pub mod sectors;
pub mod service;
pub mod shared;

pub use search::handle_search_command;
pub use sectors::handle_sectors_command;
pub use service::{
    handle_schema_command, handle_seed_command, handle_status_command, handle_test_command,
};
