//! CRM connector

use super::models::{Client, Order, Product, TemplateCategory};
use crate::config::ConnectorConfig;
use crate::connector::{Connector, ConnectorSettings, Filters};
use crate::error::{Error, Result};
use crate::http::{HttpClient, Transport};
use crate::pagination::PageObserver;
use crate::types::Vendor;

/// Typed access to the CRM platform
#[derive(Debug)]
pub struct CrmConnector<T: Transport = HttpClient> {
    inner: Connector<T>,
}

impl CrmConnector<HttpClient> {
    /// Open a connector from a CRM configuration
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        if config.vendor != Vendor::Crm {
            return Err(Error::config(format!(
                "Expected a crm configuration, got {}",
                config.vendor
            )));
        }
        Ok(Self {
            inner: Connector::from_config(config)?,
        })
    }

    /// Open a connector configured from `LILU_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ConnectorConfig::from_env(Vendor::Crm)?)
    }
}

impl<T: Transport> CrmConnector<T> {
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

    /// All clients, optionally filtered by status
    pub async fn get_clients(&self, status: Option<&str>) -> Result<Vec<Client>> {
        self.inner.fetch_all(&status_filter(status)).await
    }

    /// All clients, reporting progress after each page
    pub async fn get_clients_with(
        &self,
        status: Option<&str>,
        observer: &mut PageObserver<'_>,
    ) -> Result<Vec<Client>> {
        self.inner
            .fetch_all_with(&status_filter(status), observer)
            .await
    }

    /// One client by id
    pub async fn get_client(&self, client_id: i64) -> Result<Client> {
        self.inner.fetch_one(&client_id.to_string()).await
    }

    /// Create a client
    pub async fn create_client(&self, client: &Client) -> Result<Client> {
        self.inner.create(client).await
    }

    /// Update a client
    pub async fn update_client(&self, client_id: i64, client: &Client) -> Result<Client> {
        self.inner.update(&client_id.to_string(), client).await
    }

    /// Delete a client
    pub async fn delete_client(&self, client_id: i64) -> Result<()> {
        self.inner.delete::<Client>(&client_id.to_string()).await
    }

    /// All products, optionally filtered by category
    pub async fn get_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let mut filters = Filters::new();
        if let Some(category) = category {
            filters.insert("category".into(), category.into());
        }
        self.inner.fetch_all(&filters).await
    }

    /// One product by id
    pub async fn get_product(&self, product_id: i64) -> Result<Product> {
        self.inner.fetch_one(&product_id.to_string()).await
    }

    /// All orders, optionally filtered by client and status
    pub async fn get_orders(&self, client_id: Option<i64>, status: Option<&str>) -> Result<Vec<Order>> {
        let mut filters = status_filter(status);
        if let Some(client_id) = client_id {
            filters.insert("client_id".into(), client_id.to_string());
        }
        self.inner.fetch_all(&filters).await
    }

    /// One order by id
    pub async fn get_order(&self, order_id: i64) -> Result<Order> {
        self.inner.fetch_one(&order_id.to_string()).await
    }

    /// Message template categories
    pub async fn get_template_categories(&self) -> Result<Vec<TemplateCategory>> {
        self.inner.fetch_all(&Filters::new()).await
    }

    /// Whether the API answers; never fails
    pub async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }

    /// Release the connection pool
    pub fn close(self) {
        self.inner.close();
    }
}

fn status_filter(status: Option<&str>) -> Filters {
    let mut filters = Filters::new();
    if let Some(status) = status {
        filters.insert("status".into(), status.into());
    }
    filters
}
