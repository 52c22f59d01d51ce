//! CLI commands and argument parsing

use crate::export::ExportFormat;
use crate::types::Vendor;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Typed connectors for CRM and e-commerce REST APIs
#[derive(Parser, Debug)]
#[command(name = "vendorlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Platform to talk to (defaults to the configuration file's vendor, else crm)
    #[arg(long, global = true, value_enum)]
    pub vendor: Option<Vendor>,

    /// Configuration file (YAML); environment variables are used otherwise
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test connection to the API
    Check,

    /// Fetch every record of an entity
    Fetch {
        /// Entity to fetch
        #[arg(value_enum)]
        entity: EntityKind,

        /// Only records with this status
        #[arg(long)]
        status: Option<String>,

        /// Only products in this category
        #[arg(long)]
        category: Option<String>,

        /// Only orders of this client (crm)
        #[arg(long)]
        client_id: Option<i64>,

        /// Output file or directory; records are printed when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Write one file per product category (shop products)
        #[arg(long)]
        by_category: bool,
    },

    /// Fetch one record by id
    Get {
        /// Entity kind
        #[arg(value_enum)]
        entity: EntityKind,

        /// Record id
        id: i64,
    },

    /// Create a record from a JSON object
    Create {
        /// Entity kind
        #[arg(value_enum)]
        entity: EntityKind,

        /// Record fields as a JSON object
        #[arg(long)]
        json: String,
    },

    /// Find the newest API version the store answers (shop)
    ProbeVersion,

    /// Print the store status document (shop)
    StoreInfo,
}

/// Entities addressable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntityKind {
    /// CRM people
    Clients,
    Products,
    Orders,
    /// Template categories (crm) or product categories (shop)
    Categories,
    /// Shop customers
    Customers,
}

impl EntityKind {
    /// Name used in file names and messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Categories => "categories",
            Self::Customers => "customers",
        }
    }
}
