//! Tests for the shop connector

use super::*;
use crate::config::{ConnectorConfig, Credentials};
use crate::connector::ConnectorSettings;
use crate::error::{Error, ErrorKind};
use crate::http::RawResponse;
use crate::mapping::Model;
use crate::test_support::ScriptedTransport;
use crate::types::{JsonValue, Method, Vendor};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(transport: ScriptedTransport, page_size: u32) -> ShopConnector<ScriptedTransport> {
    ShopConnector::new(
        transport,
        ConnectorSettings {
            page_size,
            health_paths: vec!["/system_status".into(), "/".into()],
            ..Default::default()
        },
    )
}

fn shop_config(base_url: &str) -> ConnectorConfig {
    let mut config = ConnectorConfig::new(
        Vendor::Shop,
        base_url,
        Credentials::key_pair("ck_test", "cs_test"),
    );
    config.retry_backoff_ms = 1;
    config
}

// ============================================================================
// Models
// ============================================================================

#[test]
fn test_product_money_strings_are_coerced() {
    let product = Product::from_record(&json!({
        "id": 12,
        "name": "Mug",
        "type": "simple",
        "price": "8.00",
        "regular_price": "10.00",
        "sale_price": "8.00",
        "on_sale": true,
        "stock_status": "instock",
        "stock_quantity": null,
        "categories": [{"id": 3, "name": "Kitchen", "slug": "kitchen"}, {"id": 4, "name": "Gifts", "slug": "gifts"}]
    }));

    assert!((product.price - 8.0).abs() < f64::EPSILON);
    assert!((product.regular_price - 10.0).abs() < f64::EPSILON);
    assert_eq!(product.sale_price, Some(8.0));
    assert_eq!(product.product_type.as_deref(), Some("simple"));
    assert_eq!(product.stock_quantity, 0);
    assert!(product.is_in_stock());
    assert!(product.is_on_sale());
    assert_eq!(product.discount_percentage(), Some(20.0));
    assert_eq!(product.category_names(), vec!["Kitchen", "Gifts"]);
}

#[test]
fn test_product_without_sale_price() {
    let product = Product::from_record(&json!({
        "id": 1,
        "regular_price": "",
        "sale_price": "",
        "on_sale": true,
        "stock_status": "outofstock"
    }));
    assert_eq!(product.sale_price, None);
    assert!((product.regular_price).abs() < f64::EPSILON);
    assert!(!product.is_on_sale());
    assert!(!product.is_in_stock());
    assert_eq!(product.discount_percentage(), None);
}

#[test]
fn test_product_wire_uses_price_strings() {
    let mut product = Product::new("Mug", 10.0);
    product.categories.push(CategoryRef {
        id: 3,
        name: "Kitchen".into(),
        slug: "kitchen".into(),
    });
    assert_eq!(
        JsonValue::Object(product.to_wire()),
        json!({"name": "Mug", "regular_price": "10.00", "categories": [{"id": 3}]})
    );
}

#[test]
fn test_category_parent_zero_is_top_level() {
    let top = Category::from_record(&json!({"id": 1, "name": "All", "slug": "all", "parent": 0, "count": 4}));
    assert_eq!(top.parent, None);
    assert_eq!(top.count, 4);

    let child = Category::from_record(&json!({"id": 2, "name": "Tea", "parent": 1}));
    assert_eq!(child.parent, Some(1));
    assert_eq!(
        JsonValue::Object(child.to_wire()),
        json!({"id": 2, "name": "Tea", "parent": 1})
    );
}

#[test]
fn test_customer_names_and_address() {
    let customer = Customer::from_record(&json!({
        "id": 7,
        "email": "ann@example.com",
        "first_name": "Ann",
        "last_name": "",
        "billing": {
            "address_1": "1 Main St",
            "address_2": "",
            "city": "Tbilisi",
            "postcode": "0100",
            "country": "GE",
            "phone": "+995 555"
        }
    }));
    assert_eq!(customer.full_name(), "Ann");
    assert_eq!(customer.phone(), Some("+995 555"));
    assert_eq!(customer.billing_address(), "1 Main St, Tbilisi, 0100, GE");
    assert_eq!(customer.shipping, Address::default());

    let anonymous = Customer::from_record(&json!({"id": 8, "email": "x@example.com"}));
    assert_eq!(anonymous.full_name(), "x@example.com");
    assert_eq!(anonymous.billing_address(), "");
}

#[test]
fn test_order_line_items() {
    let order = Order::from_record(&json!({
        "id": 100,
        "status": "completed",
        "currency": "GEL",
        "total": "25.50",
        "customer_id": 7,
        "billing": {"first_name": "Ann", "last_name": "Lee", "email": "ann@example.com"},
        "line_items": [
            {"id": 1, "name": "Mug", "product_id": 12, "quantity": 2, "price": 8, "total": "16.00"},
            {"id": 2, "name": "Tea", "product_id": 13, "quantity": 1, "price": 9.5, "total": "9.50"}
        ]
    }));
    assert!((order.total - 25.5).abs() < f64::EPSILON);
    assert_eq!(order.items_count(), 2);
    assert!(order.is_completed());
    assert_eq!(order.customer_email(), Some("ann@example.com"));
    assert_eq!(order.customer_name(), "Ann Lee");
    assert!((order.line_items[0].total - 16.0).abs() < f64::EPSILON);

    let pending = Order::from_record(&json!({"id": 1}));
    assert_eq!(pending.status(), "pending");
    assert!(!pending.is_completed());
}

// ============================================================================
// Connector operations
// ============================================================================

#[tokio::test]
async fn test_get_products_walks_pages() {
    let transport = ScriptedTransport::new()
        .json(json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]))
        .json(json!([{"id": 3, "name": "C"}]));
    let shop = connector(transport, 2);

    let products = shop.get_products(None).await.unwrap();
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let requests = shop.inner().transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/products");
    assert_eq!(requests[0].query["page"], "1");
    assert_eq!(requests[0].query["per_page"], "2");
    assert_eq!(requests[1].query["page"], "2");
}

#[tokio::test]
async fn test_get_products_page() {
    let transport = ScriptedTransport::new().json(json!([{"id": 9}]));
    let shop = connector(transport, 100);

    let products = shop.get_products_page(3, 10).await.unwrap();
    assert_eq!(products.len(), 1);

    let request = &shop.inner().transport().requests()[0];
    assert_eq!(request.query["page"], "3");
    assert_eq!(request.query["per_page"], "10");
}

#[tokio::test]
async fn test_get_orders_status_filter() {
    let transport = ScriptedTransport::new().json(json!([{"id": 1, "status": "processing"}]));
    let shop = connector(transport, 100);

    let orders = shop.get_orders(Some("processing")).await.unwrap();
    assert_eq!(orders[0].status(), "processing");
    assert_eq!(shop.inner().transport().requests()[0].query["status"], "processing");
}

#[tokio::test]
async fn test_get_categories_and_customers_paths() {
    let transport = ScriptedTransport::new()
        .json(json!([{"id": 1, "name": "Tea"}]))
        .json(json!([]));
    let shop = connector(transport, 100);

    assert_eq!(shop.get_categories().await.unwrap().len(), 1);
    assert!(shop.get_customers().await.unwrap().is_empty());

    let requests = shop.inner().transport().requests();
    assert_eq!(requests[0].path, "/products/categories");
    assert_eq!(requests[1].path, "/customers");
}

#[tokio::test]
async fn test_get_product_by_id() {
    let transport = ScriptedTransport::new()
        .json(json!({"id": 12, "name": "Mug"}))
        .respond(RawResponse::json_body(
            404,
            &json!({"code": "woocommerce_rest_product_invalid_id"}),
        ));
    let shop = connector(transport, 100);

    assert_eq!(shop.get_product(12).await.unwrap().name, "Mug");
    assert_eq!(
        shop.get_product(13).await.unwrap_err(),
        Error::not_found_id("Product", "13")
    );

    let requests = shop.inner().transport().requests();
    assert_eq!(requests[0].render_path().unwrap(), "/products/12");
}

#[tokio::test]
async fn test_create_product() {
    let transport = ScriptedTransport::new().respond(RawResponse::json_body(
        201,
        &json!({"id": 50, "name": "Mug", "regular_price": "10.00"}),
    ));
    let shop = connector(transport, 100);

    let created = shop.create_product(&Product::new("Mug", 10.0)).await.unwrap();
    assert_eq!(created.id, 50);

    let request = &shop.inner().transport().requests()[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.body, Some(json!({"name": "Mug", "regular_price": "10.00"})));
}

#[tokio::test]
async fn test_unauthorized_listing() {
    let transport = ScriptedTransport::new().respond(RawResponse::json_body(
        401,
        &json!({"code": "woocommerce_rest_cannot_view"}),
    ));
    let shop = connector(transport, 100);

    let err = shop.get_customers().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_health_check_falls_back_to_root() {
    let transport = ScriptedTransport::new()
        .respond(RawResponse::new(401, ""))
        .json(json!({"namespace": "wc/v3"}));
    let shop = connector(transport, 100);

    assert!(shop.health_check().await);
    let requests = shop.inner().transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].path, "/");
}

#[tokio::test]
async fn test_get_store_info_from_system_status() {
    let transport = ScriptedTransport::new().json(json!({
        "environment": {"version": "8.5.1", "site_url": "https://shop.test"}
    }));
    let shop = connector(transport, 100);

    let info = shop.get_store_info().await.unwrap().unwrap();
    assert_eq!(info["environment"]["version"], "8.5.1");
    assert_eq!(shop.inner().transport().calls(), 1);
    assert_eq!(shop.inner().transport().requests()[0].path, "/system_status");
}

#[tokio::test]
async fn test_get_store_info_falls_back_to_root() {
    let transport = ScriptedTransport::new()
        .respond(RawResponse::new(401, ""))
        .json(json!({"namespace": "wc/v3", "routes": {}}));
    let shop = connector(transport, 100);

    let info = shop.get_store_info().await.unwrap();
    assert_eq!(info, Some(json!({"namespace": "wc/v3", "routes": {}})));
    let requests = shop.inner().transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].path, "/");
}

#[tokio::test]
async fn test_get_store_info_none_when_nothing_answers() {
    let transport = ScriptedTransport::new()
        .respond(RawResponse::new(404, ""))
        .respond(RawResponse::new(403, ""));
    let shop = connector(transport, 100);

    assert_eq!(shop.get_store_info().await.unwrap(), None);
    assert_eq!(shop.inner().transport().calls(), 2);
}

#[tokio::test]
async fn test_get_store_info_propagates_transport_failure() {
    let transport = ScriptedTransport::new().fail(Error::network("connection refused"));
    let shop = connector(transport, 100);

    let err = shop.get_store_info().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

// ============================================================================
// Version probing
// ============================================================================

#[tokio::test]
async fn test_probe_api_version_picks_first_answering() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v2/products"))
        .and(query_param("per_page", "1"))
        .and(query_param("consumer_key", "ck_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let version = probe_api_version(&shop_config(&server.uri())).await.unwrap();
    assert_eq!(version.as_deref(), Some("wc/v2"));
}

#[tokio::test]
async fn test_probe_api_version_none_when_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(4)
        .mount(&server)
        .await;

    let version = probe_api_version(&shop_config(&server.uri())).await.unwrap();
    assert_eq!(version, None);
}

#[tokio::test]
async fn test_probe_api_version_rejects_bad_config() {
    let config = ConnectorConfig::new(Vendor::Shop, "", Credentials::default());
    let err = probe_api_version(&config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
