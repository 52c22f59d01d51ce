//! Shop connector

use super::models::{Category, Customer, Order, Product};
use crate::config::ConnectorConfig;
use crate::connector::{Connector, ConnectorSettings, Filters};
use crate::error::{Error, ErrorKind, Result};
use crate::http::{classify_response, HttpClient, RequestDescriptor, ResourceRef, Transport};
use crate::pagination::PageObserver;
use crate::types::{JsonValue, Vendor};
use tracing::{debug, info, warn};

/// API versions tried by [`probe_api_version`], newest first
pub const SUPPORTED_API_VERSIONS: [&str; 4] = ["wc/v3", "wc/v2", "v3", "v2"];

/// Typed access to the e-commerce platform
#[derive(Debug)]
pub struct ShopConnector<T: Transport = HttpClient> {
    inner: Connector<T>,
}

impl ShopConnector<HttpClient> {
    /// Open a connector from a shop configuration
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        if config.vendor != Vendor::Shop {
            return Err(Error::config(format!(
                "Expected a shop configuration, got {}",
                config.vendor
            )));
        }
        Ok(Self {
            inner: Connector::from_config(config)?,
        })
    }

    /// Open a connector configured from `WC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ConnectorConfig::from_env(Vendor::Shop)?)
    }
}

impl<T: Transport> ShopConnector<T> {
    /// Create a connector over any transport
    pub fn new(transport: T, settings: ConnectorSettings) -> Self {
        Self {
            inner: Connector::new(transport, settings),
        }
    }

    /// Generic operations
    pub fn inner(&self) -> &Connector<T> {
        &self.inner
    }

    /// All products, optionally filtered by category id
    pub async fn get_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        self.inner.fetch_all(&single_filter("category", category)).await
    }

    /// All products, reporting progress after each page
    pub async fn get_products_with(
        &self,
        category: Option<&str>,
        observer: &mut PageObserver<'_>,
    ) -> Result<Vec<Product>> {
        self.inner
            .fetch_all_with(&single_filter("category", category), observer)
            .await
    }

    /// One 1-based page of products
    pub async fn get_products_page(&self, page: u32, per_page: u32) -> Result<Vec<Product>> {
        self.inner.fetch_page(page, per_page, &Filters::new()).await
    }

    /// One product by id
    pub async fn get_product(&self, product_id: i64) -> Result<Product> {
        self.inner.fetch_one(&product_id.to_string()).await
    }

    /// Create a product
    pub async fn create_product(&self, product: &Product) -> Result<Product> {
        self.inner.create(product).await
    }

    /// Update a product
    pub async fn update_product(&self, product_id: i64, product: &Product) -> Result<Product> {
        self.inner.update(&product_id.to_string(), product).await
    }

    /// Delete a product
    pub async fn delete_product(&self, product_id: i64) -> Result<()> {
        self.inner.delete::<Product>(&product_id.to_string()).await
    }

    /// All product categories
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        self.inner.fetch_all(&Filters::new()).await
    }

    /// One category by id
    pub async fn get_category(&self, category_id: i64) -> Result<Category> {
        self.inner.fetch_one(&category_id.to_string()).await
    }

    /// All customers
    pub async fn get_customers(&self) -> Result<Vec<Customer>> {
        self.inner.fetch_all(&Filters::new()).await
    }

    /// One customer by id
    pub async fn get_customer(&self, customer_id: i64) -> Result<Customer> {
        self.inner.fetch_one(&customer_id.to_string()).await
    }

    /// All orders, optionally filtered by status
    pub async fn get_orders(&self, status: Option<&str>) -> Result<Vec<Order>> {
        self.inner.fetch_all(&single_filter("status", status)).await
    }

    /// One order by id
    pub async fn get_order(&self, order_id: i64) -> Result<Order> {
        self.inner.fetch_one(&order_id.to_string()).await
    }

    /// Store status document.
    ///
    /// Tries the system status endpoint, then the API root, and returns the
    /// first 200 body. `None` when neither answers 200; transport failures
    /// and undecodable bodies are errors.
    pub async fn get_store_info(&self) -> Result<Option<JsonValue>> {
        for path in &self.inner.settings().health_paths {
            let response = self
                .inner
                .transport()
                .send(&RequestDescriptor::get(path.clone()))
                .await?;
            if response.status == 200 {
                info!("Fetched store information from {path}");
                return Ok(Some(response.json()?));
            }
            debug!("Store information at {path} answered {}", response.status);
        }
        warn!("No store information endpoint answered");
        Ok(None)
    }

    /// Whether the store answers; never fails
    pub async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }

    /// Release the connection pool
    pub fn close(self) {
        self.inner.close();
    }
}

fn single_filter(key: &str, value: Option<&str>) -> Filters {
    let mut filters = Filters::new();
    if let Some(value) = value {
        filters.insert(key.to_string(), value.to_string());
    }
    filters
}

/// Find the newest API version the store answers.
///
/// Each candidate is tried once with a one-product listing. Returns the
/// first version answering 200, or `None` when none does. Only an invalid
/// configuration is an error.
pub async fn probe_api_version(config: &ConnectorConfig) -> Result<Option<String>> {
    config.validate()?;
    let probe = RequestDescriptor::get("/products").query("per_page", "1");

    for version in SUPPORTED_API_VERSIONS {
        let mut http = config.http_client_config_for(version);
        http.max_retries = 1;
        let client = HttpClient::with_auth(http, config.auth_config())?;

        match client.send(&probe).await {
            Ok(response) if response.status == 200 => {
                info!("Store answers API version {version}");
                return Ok(Some(version.to_string()));
            }
            Ok(response) => {
                let err = classify_response(&response, &ResourceRef::collection("Products endpoint"));
                if err.kind() == ErrorKind::Authentication {
                    warn!("Authentication failed for API version {version}: {err}");
                } else {
                    debug!("API version {version} unavailable: {err}");
                }
            }
            Err(e) => debug!("API version {version} unreachable: {e}"),
        }
    }

    warn!("No supported API version answered at {}", config.base_url);
    Ok(None)
}
