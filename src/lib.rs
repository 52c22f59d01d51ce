// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # vendorlink
//!
//! Typed connectors for an e-commerce platform and a messaging/CRM
//! platform, built on one resilient request pipeline.
//!
//! ## Features
//!
//! - **Uniform errors**: every failure is one of six [`ErrorKind`]s
//! - **Retries**: bounded attempts with capped backoff for transient statuses
//! - **Envelope normalization**: bare arrays, `data` wrappers, hinted keys
//!   and in-band error payloads all become a flat record list
//! - **Pagination**: offset/limit and page-number walks with progress reporting
//! - **Export**: JSON, CSV and Parquet tables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vendorlink::{crm::CrmConnector, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let crm = CrmConnector::from_env()?;
//!     for client in crm.get_clients(Some("active")).await? {
//!         println!("{} {}", client.id, client.display_name());
//!     }
//!     crm.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │          CrmConnector / ShopConnector (typed models)         │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴───────┬───────────────────────┐
//! │  Pagination  │  Envelope normalizer │  Record → model       │
//! ├──────────────┴──────────────────────┴───────────────────────┤
//! │  Transport: auth, retry with backoff, rate limit, classify  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and kinds
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credential placement
pub mod auth;

/// HTTP transport with retry, rate limiting and error classification
pub mod http;

/// Response envelope normalization
pub mod envelope;

/// Pagination strategies and the page walker
pub mod pagination;

/// Record to typed model mapping
pub mod mapping;

/// Connector configuration
pub mod config;

/// Generic connector core
pub mod connector;

/// Messaging/CRM platform connector
pub mod crm;

/// E-commerce platform connector
pub mod shop;

/// Tabular export
pub mod export;

/// Command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ConnectorConfig, Credentials};
pub use connector::{Connector, ConnectorSettings, Entity, Filters};
pub use error::{Error, ErrorKind, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
