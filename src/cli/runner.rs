//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, EntityKind};
use crate::config::ConnectorConfig;
use crate::connector::{Connector, Entity};
use crate::crm::{self, CrmConnector};
use crate::error::{Error, Result};
use crate::export::{
    default_file_name, group_products_by_category, write_csv, write_json, write_parquet,
    write_tables, ExportFormat, Table,
};
use crate::http::HttpClient;
use crate::shop::{self, probe_api_version, ShopConnector};
use crate::types::{JsonValue, Vendor};
use anyhow::Context;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// An open connector for either platform
enum Session {
    Crm(CrmConnector),
    Shop(ShopConnector),
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            Commands::Check => self.check(&config).await,
            Commands::Fetch {
                entity,
                status,
                category,
                client_id,
                output,
                format,
                by_category,
            } => {
                let request = FetchRequest {
                    entity: *entity,
                    status: status.as_deref(),
                    category: category.as_deref(),
                    client_id: *client_id,
                    output: output.as_deref(),
                    format: *format,
                    by_category: *by_category,
                };
                self.fetch(&config, &request).await
            }
            Commands::Get { entity, id } => self.get(&config, *entity, *id).await,
            Commands::Create { entity, json } => self.create(&config, *entity, json).await,
            Commands::ProbeVersion => self.probe_version(&config).await,
            Commands::StoreInfo => self.store_info(&config).await,
        }
    }

    /// Load configuration from the file, else from the environment
    fn load_config(&self) -> anyhow::Result<ConnectorConfig> {
        let config = match &self.cli.config {
            Some(path) => ConnectorConfig::from_yaml_file(path)?,
            None => ConnectorConfig::from_env(self.cli.vendor.unwrap_or_default())?,
        };
        if let Some(vendor) = self.cli.vendor {
            if vendor != config.vendor {
                return Err(Error::config(format!(
                    "--vendor {vendor} does not match the configured vendor {}",
                    config.vendor
                ))
                .into());
            }
        }
        Ok(config)
    }

    fn open(config: &ConnectorConfig) -> Result<Session> {
        Ok(match config.vendor {
            Vendor::Crm => Session::Crm(CrmConnector::from_config(config)?),
            Vendor::Shop => Session::Shop(ShopConnector::from_config(config)?),
        })
    }

    /// Check connection
    async fn check(&self, config: &ConnectorConfig) -> anyhow::Result<()> {
        info!("Checking connection to {}", config.api_base_url());
        let healthy = match Self::open(config)? {
            Session::Crm(c) => c.health_check().await,
            Session::Shop(c) => c.health_check().await,
        };

        let (status, message) = if healthy {
            ("SUCCEEDED", "Connection successful")
        } else {
            ("FAILED", "Connection failed")
        };
        print_json(&json!({"status": status, "message": message, "vendor": config.vendor}))?;

        if healthy {
            Ok(())
        } else {
            Err(Error::network(format!("{} did not answer", config.api_base_url())).into())
        }
    }

    /// Fetch every record of an entity
    async fn fetch(&self, config: &ConnectorConfig, request: &FetchRequest<'_>) -> anyhow::Result<()> {
        let entity = request.entity;
        match (Self::open(config)?, entity) {
            (Session::Crm(c), EntityKind::Clients) => {
                emit(request, &c.get_clients(request.status).await?)
            }
            (Session::Crm(c), EntityKind::Products) => {
                emit(request, &c.get_products(request.category).await?)
            }
            (Session::Crm(c), EntityKind::Orders) => {
                emit(request, &c.get_orders(request.client_id, request.status).await?)
            }
            (Session::Crm(c), EntityKind::Categories) => {
                emit(request, &c.get_template_categories().await?)
            }
            (Session::Shop(c), EntityKind::Products) => {
                let products = c.get_products(request.category).await?;
                if request.by_category {
                    emit_by_category(request, &products)
                } else {
                    emit(request, &products)
                }
            }
            (Session::Shop(c), EntityKind::Categories) => emit(request, &c.get_categories().await?),
            (Session::Shop(c), EntityKind::Customers) => emit(request, &c.get_customers().await?),
            (Session::Shop(c), EntityKind::Orders) => {
                emit(request, &c.get_orders(request.status).await?)
            }
            (_, entity) => Err(unsupported(config.vendor, entity).into()),
        }
    }

    /// Fetch one record by id
    async fn get(&self, config: &ConnectorConfig, entity: EntityKind, id: i64) -> anyhow::Result<()> {
        match (Self::open(config)?, entity) {
            (Session::Crm(c), EntityKind::Clients) => print_json(&c.get_client(id).await?),
            (Session::Crm(c), EntityKind::Products) => print_json(&c.get_product(id).await?),
            (Session::Crm(c), EntityKind::Orders) => print_json(&c.get_order(id).await?),
            (Session::Shop(c), EntityKind::Products) => print_json(&c.get_product(id).await?),
            (Session::Shop(c), EntityKind::Categories) => print_json(&c.get_category(id).await?),
            (Session::Shop(c), EntityKind::Customers) => print_json(&c.get_customer(id).await?),
            (Session::Shop(c), EntityKind::Orders) => print_json(&c.get_order(id).await?),
            (_, entity) => Err(unsupported(config.vendor, entity).into()),
        }
    }

    /// Create a record from a JSON object
    async fn create(&self, config: &ConnectorConfig, entity: EntityKind, raw: &str) -> anyhow::Result<()> {
        let fields: JsonValue = serde_json::from_str(raw)
            .map_err(|e| Error::config(format!("Invalid record JSON: {e}")))?;
        if !fields.is_object() {
            return Err(Error::config("Record JSON must be an object").into());
        }

        match (Self::open(config)?, entity) {
            (Session::Crm(c), EntityKind::Clients) => {
                create_as::<crm::Client>(c.inner(), &fields).await
            }
            (Session::Crm(c), EntityKind::Products) => {
                create_as::<crm::Product>(c.inner(), &fields).await
            }
            (Session::Crm(c), EntityKind::Orders) => {
                create_as::<crm::Order>(c.inner(), &fields).await
            }
            (Session::Shop(c), EntityKind::Products) => {
                create_as::<shop::Product>(c.inner(), &fields).await
            }
            (Session::Shop(c), EntityKind::Categories) => {
                create_as::<shop::Category>(c.inner(), &fields).await
            }
            (Session::Shop(c), EntityKind::Customers) => {
                create_as::<shop::Customer>(c.inner(), &fields).await
            }
            (Session::Shop(c), EntityKind::Orders) => {
                create_as::<shop::Order>(c.inner(), &fields).await
            }
            (_, entity) => Err(unsupported(config.vendor, entity).into()),
        }
    }

    /// Print the store status document
    async fn store_info(&self, config: &ConnectorConfig) -> anyhow::Result<()> {
        let Session::Shop(shop) = Self::open(config)? else {
            return Err(Error::config("store-info is only available for the shop vendor").into());
        };
        match shop.get_store_info().await? {
            Some(info) => print_json(&info),
            None => Err(Error::not_found("Store information").into()),
        }
    }

    /// Report the newest answering API version
    async fn probe_version(&self, config: &ConnectorConfig) -> anyhow::Result<()> {
        if config.vendor != Vendor::Shop {
            return Err(Error::config("probe-version is only available for the shop vendor").into());
        }
        let version = probe_api_version(config).await?;
        print_json(&json!({ "api_version": version }))
    }
}

/// Options of one fetch command
struct FetchRequest<'a> {
    entity: EntityKind,
    status: Option<&'a str>,
    category: Option<&'a str>,
    client_id: Option<i64>,
    output: Option<&'a Path>,
    format: ExportFormat,
    by_category: bool,
}

fn unsupported(vendor: Vendor, entity: EntityKind) -> Error {
    Error::config(format!(
        "Entity '{}' is not available for the {vendor} vendor",
        entity.name()
    ))
}

async fn create_as<E: Entity + Serialize>(
    connector: &Connector<HttpClient>,
    fields: &JsonValue,
) -> anyhow::Result<()> {
    let created = connector.create(&E::from_record(fields)).await?;
    print_json(&created)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve the output file: directories get a timestamped default name
fn output_path(dir_or_file: &Path, entity: &str, format: ExportFormat) -> PathBuf {
    if dir_or_file.is_dir() {
        dir_or_file.join(default_file_name("", entity, format))
    } else {
        dir_or_file.to_path_buf()
    }
}

/// Print records, or write them in the requested format
fn emit<M: Serialize>(request: &FetchRequest<'_>, models: &[M]) -> anyhow::Result<()> {
    let Some(output) = request.output else {
        return print_json(models);
    };

    let entity = request.entity.name();
    let path = output_path(output, entity, request.format);
    let written = match request.format {
        ExportFormat::Json => write_json(&path, models)?,
        ExportFormat::Csv => write_csv(&path, &Table::from_models(entity, models)?)?,
        ExportFormat::Parquet => write_parquet(&path, &Table::from_models(entity, models)?, None)?,
    };
    eprintln!("Wrote {written} {entity} to {}", path.display());
    Ok(())
}

/// Write one file per product category into the output directory
fn emit_by_category(request: &FetchRequest<'_>, products: &[shop::Product]) -> anyhow::Result<()> {
    let dir = request
        .output
        .context("--by-category needs --output pointing to a directory")?;

    let tables = group_products_by_category(products)?;
    let paths = write_tables(dir, &tables, request.format)
        .with_context(|| format!("writing category tables to {}", dir.display()))?;
    for (table, path) in tables.iter().zip(&paths) {
        eprintln!("Wrote {} products to {}", table.len(), path.display());
    }
    Ok(())
}
