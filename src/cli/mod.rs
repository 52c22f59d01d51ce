//! CLI module
//!
//! Command-line interface for the connectors.
//!
//! # Commands
//!
//! - `check` - Test connection to the API
//! - `fetch` - Fetch every record of an entity, optionally to a file
//! - `get` - Fetch one record by id
//! - `create` - Create a record from JSON
//! - `probe-version` - Find the store's newest answering API version
//! - `store-info` - Print the store status document

mod commands;
mod runner;

pub use commands::{Cli, Commands, EntityKind};
pub use runner::Runner;
