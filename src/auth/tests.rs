//! Tests for the auth module

use super::*;
use reqwest::Client;

fn build(auth: &Authenticator) -> reqwest::Request {
    let client = Client::new();
    auth.apply(client.get("https://api.example.com/people"))
        .build()
        .unwrap()
}

#[test]
fn test_auth_config_default() {
    assert_eq!(AuthConfig::default(), AuthConfig::None);
}

#[test]
fn test_no_auth_leaves_request_untouched() {
    let req = build(&Authenticator::default());
    assert!(req.headers().is_empty());
    assert_eq!(req.url().query(), None);
}

#[test]
fn test_header_pair() {
    let auth = Authenticator::new(AuthConfig::key_pair(
        AuthPlacement::Headers,
        "key-1",
        "secret-1",
    ));
    let req = build(&auth);

    assert_eq!(req.headers()["X-API-Key"], "key-1");
    assert_eq!(req.headers()["X-API-Secret"], "secret-1");
    assert_eq!(req.url().query(), None);
}

#[test]
fn test_query_pair() {
    let auth = Authenticator::new(AuthConfig::key_pair(
        AuthPlacement::QueryString,
        "ck_abc",
        "cs_def",
    ));
    let req = build(&auth);

    let pairs: Vec<(String, String)> = req
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(pairs.contains(&("consumer_key".to_string(), "ck_abc".to_string())));
    assert!(pairs.contains(&("consumer_secret".to_string(), "cs_def".to_string())));
    assert!(req.headers().get("X-API-Key").is_none());
}

#[test]
fn test_basic() {
    let auth = Authenticator::new(AuthConfig::key_pair(
        AuthPlacement::Basic,
        "ck_abc",
        "cs_def",
    ));
    let req = build(&auth);

    let value = req.headers()["authorization"].to_str().unwrap();
    assert!(value.starts_with("Basic "));
}

#[test]
fn test_bearer() {
    let auth = Authenticator::new(AuthConfig::bearer("tok-123"));
    let req = build(&auth);

    assert_eq!(req.headers()["authorization"], "Bearer tok-123");
}

#[test]
fn test_debug_redacts_secrets() {
    let config = AuthConfig::key_pair(AuthPlacement::Headers, "key-1", "super-secret");
    let rendered = format!("{config:?}");
    assert!(rendered.contains("X-API-Key"));
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("key-1"));

    let rendered = format!("{:?}", AuthConfig::bearer("tok-123"));
    assert!(!rendered.contains("tok-123"));
}
