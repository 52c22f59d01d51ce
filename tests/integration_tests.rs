//! Integration tests using mock HTTP server
//!
//! Tests the full flow: configuration → authenticated HTTP requests →
//! envelope normalization → typed models → export files

use pretty_assertions::assert_eq;
use serde_json::json;
use std::ops::ControlFlow;
use tempfile::tempdir;
use vendorlink::crm::CrmConnector;
use vendorlink::export::{group_products_by_category, write_csv};
use vendorlink::pagination::PageProgress;
use vendorlink::shop::{probe_api_version, ShopConnector};
use vendorlink::{ConnectorConfig, Credentials, Error, ErrorKind, Vendor};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crm_config(server: &MockServer) -> ConnectorConfig {
    let mut config = ConnectorConfig::new(
        Vendor::Crm,
        server.uri(),
        Credentials::key_pair("crm-key", "crm-secret"),
    );
    config.retry_backoff_ms = 1;
    config.max_backoff_ms = 5;
    config
}

fn shop_config(server: &MockServer) -> ConnectorConfig {
    let mut config = ConnectorConfig::new(
        Vendor::Shop,
        server.uri(),
        Credentials::key_pair("ck_live", "cs_live"),
    );
    config.retry_backoff_ms = 1;
    config.max_backoff_ms = 5;
    config
}

// ============================================================================
// CRM
// ============================================================================

#[tokio::test]
async fn test_crm_people_walk_with_header_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/people"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .and(header("X-API-Key", "crm-key"))
        .and(header("X-API-Secret", "crm-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"people": [
                {"id": 1, "name": "Ann", "email": "NOT_DEFINED"},
                {"id": 2, "name": "Bo", "accounts": [{"connection_status": "OK"}]}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/people"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"people": [{"id": 3, "name": "Cy"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = crm_config(&server);
    config.page_size = Some(2);
    let crm = CrmConnector::from_config(&config).unwrap();

    let mut progress = Vec::new();
    let clients = crm
        .get_clients_with(None, &mut |p: &PageProgress| {
            progress.push(p.total_so_far);
            ControlFlow::Continue(())
        })
        .await
        .unwrap();

    let names: Vec<&str> = clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bo", "Cy"]);
    assert_eq!(clients[0].email, None);
    assert!(clients[1].has_connected_account);
    assert_eq!(progress, vec![2, 3]);
}

#[tokio::test]
async fn test_crm_transient_failure_is_bounded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/products"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(3)
        .mount(&server)
        .await;

    let crm = CrmConnector::from_config(&crm_config(&server)).unwrap();
    let err = crm.get_products(None).await.unwrap_err();

    assert_eq!(err, Error::api_response(503, "Service Unavailable"));
}

#[tokio::test]
async fn test_crm_rejected_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/people/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let crm = CrmConnector::from_config(&crm_config(&server)).unwrap();
    let err = crm.get_client(7).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_crm_strict_envelopes_reject_unknown_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/categories/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"weird": true})))
        .mount(&server)
        .await;

    let mut config = crm_config(&server);
    config.strict_envelopes = true;
    let crm = CrmConnector::from_config(&config).unwrap();

    let err = crm.get_template_categories().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiResponse);
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_invalid_config_fails_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ConnectorConfig::new(Vendor::Crm, server.uri(), Credentials::default());
    let err = CrmConnector::from_config(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let shop = ShopConnector::from_config(&crm_config(&server)).unwrap_err();
    assert_eq!(shop.kind(), ErrorKind::Configuration);
}

// ============================================================================
// Shop
// ============================================================================

#[tokio::test]
async fn test_shop_products_query_auth_and_export() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .and(query_param("consumer_key", "ck_live"))
        .and(query_param("consumer_secret", "cs_live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Mug", "price": "8.00", "categories": [{"id": 3, "name": "Kitchen"}]},
            {"id": 2, "name": "Card", "price": "5", "categories": []}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "name": "Spoon", "price": "2.50", "categories": [{"id": 3, "name": "Kitchen"}]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = shop_config(&server);
    config.page_size = Some(2);
    let shop = ShopConnector::from_config(&config).unwrap();

    let products = shop.get_products(None).await.unwrap();
    assert_eq!(products.len(), 3);
    assert!((products[2].price - 2.5).abs() < f64::EPSILON);

    let tables = group_products_by_category(&products).unwrap();
    assert_eq!(tables.len(), 2);

    let dir = tempdir().unwrap();
    let path = dir.path().join("kitchen.csv");
    assert_eq!(write_csv(&path, &tables[0]).unwrap(), 2);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Mug"));
    assert!(text.contains("Spoon"));
    shop.close();
}

#[tokio::test]
async fn test_shop_health_check_falls_back_to_root() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/system_status"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"namespace": "wc/v3"})))
        .expect(1)
        .mount(&server)
        .await;

    let shop = ShopConnector::from_config(&shop_config(&server)).unwrap();
    assert!(shop.health_check().await);
}

#[tokio::test]
async fn test_shop_probe_api_version() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let version = probe_api_version(&shop_config(&server)).await.unwrap();
    assert_eq!(version.as_deref(), Some("wc/v3"));
}
