//! Generic connector core
//!
//! A [`Connector`] owns one [`Transport`] and exposes the typed operations
//! shared by every vendor: fetch-all with pagination, single-page and
//! single-record fetches, writes, and a health check. Each entity declares
//! where it lives through [`Entity::ENDPOINT`].

use crate::config::ConnectorConfig;
use crate::envelope::EnvelopeNormalizer;
use crate::error::{Error, Result};
use crate::http::{check_response, HttpClient, RequestDescriptor, ResourceRef, Transport};
use crate::mapping::Model;
use crate::pagination::{self, CollectionRequest, CursorStyle, PageObserver, PageProgress};
use crate::types::{JsonValue, Record};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Filter parameters passed through on every page request
pub type Filters = BTreeMap<String, String>;

/// Where an entity lives on the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Singular name used in not-found messages, e.g. "Client"
    pub resource: &'static str,
    /// Collection path
    pub collection: &'static str,
    /// Item path with an `{id}` placeholder
    pub item: &'static str,
    /// Key locating the record list inside envelopes
    pub record_hint: Option<&'static str>,
    /// How the collection is walked
    pub cursor: CursorStyle,
}

/// A typed model with a known endpoint
pub trait Entity: Model + Send {
    /// Endpoint description
    const ENDPOINT: Endpoint;
}

/// Connector behavior that does not depend on the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorSettings {
    /// Records per page
    pub page_size: u32,
    /// Reject unrecognized envelopes
    pub strict_envelopes: bool,
    /// Paths tried in order by the health check
    pub health_paths: Vec<String>,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            strict_envelopes: false,
            health_paths: vec!["/health".to_string()],
        }
    }
}

impl ConnectorSettings {
    /// Settings taken from a connector configuration
    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self {
            page_size: config.page_size(),
            strict_envelopes: config.strict_envelopes,
            health_paths: config
                .preset()
                .health_paths
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

/// Typed access to one vendor API
#[derive(Debug)]
pub struct Connector<T: Transport = HttpClient> {
    transport: T,
    normalizer: EnvelopeNormalizer,
    settings: ConnectorSettings,
}

impl Connector<HttpClient> {
    /// Validate the configuration and open an HTTP connector.
    ///
    /// Fails with `Configuration` before any network use.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_auth(config.http_client_config(), config.auth_config())?;
        info!(
            "Opened {} connector for {}",
            config.vendor,
            config.api_base_url()
        );
        Ok(Self::new(client, ConnectorSettings::from_config(config)))
    }
}

impl<T: Transport> Connector<T> {
    /// Create a connector over any transport
    pub fn new(transport: T, settings: ConnectorSettings) -> Self {
        let normalizer = EnvelopeNormalizer::with_strict(settings.strict_envelopes);
        if normalizer.is_strict() {
            debug!("Unrecognized response envelopes will be rejected");
        }
        Self {
            transport,
            normalizer,
            settings,
        }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Connector settings
    pub fn settings(&self) -> &ConnectorSettings {
        &self.settings
    }

    fn collection_request<E: Entity>(&self, filters: &Filters) -> CollectionRequest {
        let endpoint = E::ENDPOINT;
        let mut request = CollectionRequest::new(endpoint.collection, endpoint.resource, endpoint.cursor)
            .page_size(self.settings.page_size)
            .filters(filters);
        if let Some(hint) = endpoint.record_hint {
            request = request.hint(hint);
        }
        request
    }

    /// Fetch every record of an entity
    pub async fn fetch_all<E: Entity>(&self, filters: &Filters) -> Result<Vec<E>> {
        self.fetch_all_with(filters, &mut |_: &PageProgress| ControlFlow::Continue(()))
            .await
    }

    /// Fetch every record, reporting progress after each page.
    ///
    /// The observer may stop the walk between pages; the records gathered
    /// so far are then returned.
    pub async fn fetch_all_with<E: Entity>(
        &self,
        filters: &Filters,
        observer: &mut PageObserver<'_>,
    ) -> Result<Vec<E>> {
        let records = self.fetch_records::<E>(filters, observer).await?;
        Ok(E::from_records(&records))
    }

    /// Fetch every raw record of an entity
    pub async fn fetch_records<E: Entity>(
        &self,
        filters: &Filters,
        observer: &mut PageObserver<'_>,
    ) -> Result<Vec<Record>> {
        let request = self.collection_request::<E>(filters);
        pagination::fetch_all(&self.transport, &self.normalizer, &request, observer).await
    }

    /// Fetch one 1-based page of an entity
    pub async fn fetch_page<E: Entity>(
        &self,
        page: u32,
        limit: u32,
        filters: &Filters,
    ) -> Result<Vec<E>> {
        let request = self.collection_request::<E>(filters).page_size(limit);
        let records = pagination::fetch_page(&self.transport, &self.normalizer, &request, page).await?;
        Ok(E::from_records(&records))
    }

    /// Fetch one record by id; `NotFound` when absent
    pub async fn fetch_one<E: Entity>(&self, id: &str) -> Result<E> {
        let endpoint = E::ENDPOINT;
        let descriptor = RequestDescriptor::get(endpoint.item).path_param("id", id);
        let resource = ResourceRef::item(endpoint.resource, id);

        let body = self.send_checked(&descriptor, &resource).await?;
        match self.normalizer.normalize_item(body, endpoint.record_hint)? {
            Some(record) => Ok(E::from_record(&record)),
            None => Err(Error::not_found_id(endpoint.resource, id)),
        }
    }

    /// Create a record from a model's wire projection
    pub async fn create<E: Entity>(&self, model: &E) -> Result<E> {
        let endpoint = E::ENDPOINT;
        let descriptor =
            RequestDescriptor::post(endpoint.collection, JsonValue::Object(model.to_wire()));
        let record = self
            .write(&descriptor, &ResourceRef::collection(endpoint.resource), endpoint.record_hint)
            .await?;
        info!("Created {}", endpoint.resource);
        Ok(E::from_record(&record))
    }

    /// Replace a record with a model's wire projection
    pub async fn update<E: Entity>(&self, id: &str, model: &E) -> Result<E> {
        let endpoint = E::ENDPOINT;
        let descriptor =
            RequestDescriptor::put(endpoint.item, JsonValue::Object(model.to_wire())).path_param("id", id);
        let record = self
            .write(&descriptor, &ResourceRef::item(endpoint.resource, id), endpoint.record_hint)
            .await?;
        info!("Updated {} {}", endpoint.resource, id);
        Ok(E::from_record(&record))
    }

    /// Delete a record by id
    pub async fn delete<E: Entity>(&self, id: &str) -> Result<()> {
        let endpoint = E::ENDPOINT;
        let descriptor = RequestDescriptor::delete(endpoint.item).path_param("id", id);
        let response = self.transport.send(&descriptor).await?;
        check_response(response, &ResourceRef::item(endpoint.resource, id))?;
        info!("Deleted {} {}", endpoint.resource, id);
        Ok(())
    }

    /// Fetch any path and normalize it with a hint, in a single request
    pub async fn fetch_raw(&self, path: &str, resource: &str, hint: Option<&str>) -> Result<Vec<Record>> {
        let mut request = CollectionRequest::new(path, resource, CursorStyle::Single);
        if let Some(hint) = hint {
            request = request.hint(hint);
        }
        pagination::fetch_all(
            &self.transport,
            &self.normalizer,
            &request,
            &mut |_: &PageProgress| ControlFlow::Continue(()),
        )
        .await
    }

    /// Whether the API answers; never fails
    pub async fn health_check(&self) -> bool {
        for path in &self.settings.health_paths {
            match self.transport.send(&RequestDescriptor::get(path.clone())).await {
                Ok(response) if response.is_success() => {
                    info!("Health check passed ({path})");
                    return true;
                }
                Ok(response) => {
                    warn!("Health check {path} returned {}", response.status);
                }
                Err(e) => {
                    warn!("Health check {path} failed: {e}");
                }
            }
        }
        false
    }

    /// Release the connection pool
    pub fn close(self) {
        debug!("Closing connector");
        drop(self.transport);
        info!("Connector closed");
    }

    async fn send_checked(
        &self,
        descriptor: &RequestDescriptor,
        resource: &ResourceRef<'_>,
    ) -> Result<JsonValue> {
        let response = self.transport.send(descriptor).await?;
        check_response(response, resource)?.json()
    }

    async fn write(
        &self,
        descriptor: &RequestDescriptor,
        resource: &ResourceRef<'_>,
        hint: Option<&str>,
    ) -> Result<Record> {
        let response = self.transport.send(descriptor).await?;
        let response = check_response(response, resource)?;
        let status = response.status;
        let body = response.json()?;
        self.normalizer
            .normalize_item(body, hint)?
            .ok_or_else(|| {
                Error::api_response(
                    status,
                    format!("Empty response to {} {}", descriptor.method, descriptor.path),
                )
            })
    }
}
