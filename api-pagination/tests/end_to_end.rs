//! End-to-end pagination: parameters in, items and response metadata out.
//!
//! Tests cover:
//! 1. Default headers for a 50-item collection
//! 2. Page header, custom parameter keys, and totals switched off
//! 3. Body rendering and unsupported formats
//! 4. Explicit backend selection and the global configuration

use std::collections::HashMap;

use api_pagination::backends::register_builtin;
use api_pagination::core::config_loader::apply_toml_str;
use api_pagination::core::{BackendRegistration, ParamSource, SelectorState};
use api_pagination::{
    paginate, paginate_with, BackendId, Configuration, PaginateOptions, PaginationError,
    QueryParams, PAGINATION,
};
use url::Url;

fn posts() -> Vec<String> {
    (1..=50).map(|n| format!("post-{n}")).collect()
}

fn scope_config() -> Configuration {
    let mut config = Configuration::default();
    register_builtin(&mut config);
    config.set_backend_id(BackendId::Scope);
    config
}

// ============================================================================
// 1. Defaults
// ============================================================================

#[test]
fn test_fifty_items_five_per_page() {
    let config = scope_config();
    let params = QueryParams::parse("per_page=5");
    let response = paginate_with(&config, &posts(), &params, &PaginateOptions::new()).unwrap();

    assert_eq!(response.info.total_pages, Some(10));
    assert_eq!(response.items.len(), 5);
    assert_eq!(response.items[0], "post-1");
    assert_eq!(
        response.metadata.headers(),
        &[
            ("Total".to_string(), "50".to_string()),
            ("Per-Page".to_string(), "5".to_string()),
        ]
    );
}

#[test]
fn test_every_backend_produces_identical_metadata() {
    let params = QueryParams::parse("page=4&per_page=5");
    let mut emitted = Vec::new();
    for id in BackendId::PRIORITY {
        let mut config = Configuration::default();
        register_builtin(&mut config);
        config.set_backend(id.as_str()).unwrap();
        let response = paginate_with(&config, &posts(), &params, &PaginateOptions::new()).unwrap();
        assert_eq!(response.backend, id);
        assert_eq!(response.items[0], "post-16");
        emitted.push((response.info, response.metadata));
    }
    assert!(emitted.windows(2).all(|pair| pair[0] == pair[1]));
}

// ============================================================================
// 2. Configuration knobs
// ============================================================================

#[test]
fn test_page_header_and_custom_keys() {
    let mut config = scope_config();
    config.page_header = Some("X-Page".to_string());
    config.set_page_param("p");
    config.set_per_page_param_with(|params| params.param("limit"));

    let params: HashMap<&str, &str> = HashMap::from([("p", "3"), ("limit", "5"), ("page", "9")]);
    let response = paginate_with(&config, &posts(), &params, &PaginateOptions::new()).unwrap();

    assert_eq!(response.metadata.header("X-Page"), Some("3"));
    assert_eq!(response.items[0], "post-11");
}

#[test]
fn test_include_total_false() {
    let mut config = scope_config();
    config.include_total = false;
    let params = QueryParams::parse("page=2&per_page=5");
    let response = paginate_with(&config, &posts(), &params, &PaginateOptions::new()).unwrap();

    assert_eq!(response.metadata.header("Total"), None);
    assert_eq!(response.info.total_entries, None);
    let body = response.metadata.render_body("json", &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value, serde_json::json!({"current_page": 2, "per_page": 5}));
}

#[test]
fn test_link_header_from_request_url() {
    let config = scope_config();
    let url = Url::parse("https://api.example.com/posts?page=10&per_page=5&q=x").unwrap();
    let params = QueryParams::from_url(&url);
    let options = PaginateOptions::new().url(url);
    let response = paginate_with(&config, &posts(), &params, &options).unwrap();

    let link = response.metadata.header("Link").unwrap();
    assert!(link.contains("<https://api.example.com/posts?q=x&page=9&per_page=5>; rel=\"prev\""));
    assert!(!link.contains("rel=\"next\""));
}

#[test]
fn test_configuration_from_toml() {
    let mut config = Configuration::default();
    register_builtin(&mut config);
    apply_toml_str(
        &mut config,
        r#"
backend = "collection"
page_header = "Page"
per_page_param = "size"
max_per_page = 20
"#,
    )
    .unwrap();

    let params = QueryParams::parse("page=2&size=100");
    let response = paginate_with(&config, &posts(), &params, &PaginateOptions::new()).unwrap();
    assert_eq!(response.backend, BackendId::Collection);
    assert_eq!(response.info.per_page, 20);
    assert_eq!(response.metadata.header("Page"), Some("2"));
    assert_eq!(response.items[0], "post-21");
}

// ============================================================================
// 3. Body rendering
// ============================================================================

#[test]
fn test_unsupported_format() {
    let mut config = scope_config();
    let response =
        paginate_with(&config, &posts(), &QueryParams::default(), &PaginateOptions::new())
            .unwrap();
    assert!(response.metadata.render_body("xml", &config).is_ok());

    config.set_response_formats(["json"]).unwrap();
    let err = response.metadata.render_body("xml", &config).unwrap_err();
    assert_eq!(err, PaginationError::UnsupportedFormat("xml".to_string()));
    assert_eq!(err.status_code(), 406);
}

// ============================================================================
// 4. Backend selection
// ============================================================================

#[test]
fn test_unknown_backend_keeps_previous() {
    let mut config = scope_config();
    let err = config.set_backend("unknownX").unwrap_err();
    assert_eq!(err, PaginationError::UnknownBackend("unknownX".to_string()));
    assert_eq!(config.backend(), Some(BackendId::Scope));

    let response =
        paginate_with(&config, &posts(), &QueryParams::default(), &PaginateOptions::new());
    assert_eq!(response.unwrap().backend, BackendId::Scope);
}

#[test]
fn test_ambiguous_until_selected() {
    let mut config = Configuration::default();
    config.register_backend(BackendRegistration::present(BackendId::Paginator));
    config.register_backend(BackendRegistration::present(BackendId::Collection));

    let err = paginate_with(&config, &posts(), &QueryParams::default(), &PaginateOptions::new())
        .unwrap_err();
    assert_eq!(
        err,
        PaginationError::AmbiguousBackend(vec![BackendId::Paginator, BackendId::Collection])
    );
    assert!(matches!(config.backend_state(), SelectorState::Ambiguous(_)));

    config.set_backend("collection").unwrap();
    let response =
        paginate_with(&config, &posts(), &QueryParams::default(), &PaginateOptions::new())
            .unwrap();
    assert_eq!(response.backend, BackendId::Collection);
}

#[test]
fn test_global_configuration() {
    PAGINATION.reset();
    api_pagination::init().unwrap();
    PAGINATION
        .configure(|config| config.set_backend("paginator").map(|_| ()))
        .unwrap();

    let params = QueryParams::parse("page=99&per_page=10");
    let response = paginate(&posts(), &params, &PaginateOptions::new()).unwrap();
    assert_eq!(response.backend, BackendId::Paginator);
    assert_eq!(response.info.current_page, 5);
    assert!(response.info.is_last_page);

    PAGINATION.reset();
    assert_eq!(PAGINATION.read().backends().len(), 0);
}
