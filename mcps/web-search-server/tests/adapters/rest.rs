//! OpenAPI adapter: auth, validation and error mapping

use reqwest::{header, StatusCode};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::common::{self, StubSearxng};
use web_search_server::bootstrap::{self, ServerMode};

async fn start(base_url: Option<Url>, token: Option<&str>) -> String {
    let config = common::config(base_url, token);
    let search = common::web_search(&config);
    let app = bootstrap::http_app(ServerMode::OpenApi, &config, search, CancellationToken::new())
        .expect("openapi mode serves HTTP");
    common::spawn(app).await
}

async fn post_search(base: &str, bearer: Option<&str>, body: Value) -> reqwest::Response {
    let mut request = reqwest::Client::new()
        .post(format!("{}/v1/search_searxng", base))
        .json(&body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }
    request.send().await.unwrap()
}

#[tokio::test]
async fn test_authorized_search_returns_results() {
    let stub = StubSearxng::start().await;
    let base = start(Some(stub.url.clone()), Some("secret")).await;

    let response = post_search(&base, Some("secret"), json!({ "term": "cats" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, common::expected_results());
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn test_wrong_token_is_rejected_before_search() {
    let stub = StubSearxng::start().await;
    let base = start(Some(stub.url.clone()), Some("secret")).await;

    let response = post_search(&base, Some("wrong"), json!({ "term": "cats" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "Unauthorized");
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let stub = StubSearxng::start().await;
    let base = start(Some(stub.url.clone()), Some("secret")).await;

    // Auth runs before body parsing, so even a broken body yields 401
    let response = reqwest::Client::new()
        .post(format!("{}/v1/search_searxng", base))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_no_token_configured_accepts_anyone() {
    let stub = StubSearxng::start().await;
    let base = start(Some(stub.url.clone()), None).await;

    let anonymous = post_search(&base, None, json!({ "term": "cats" })).await;
    assert_eq!(anonymous.status(), StatusCode::OK);

    let with_any_token = post_search(&base, Some("whatever"), json!({ "term": "cats" })).await;
    assert_eq!(with_any_token.status(), StatusCode::OK);
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn test_unconfigured_backend_is_service_unavailable() {
    let base = start(None, Some("secret")).await;

    let response = post_search(&base, Some("secret"), json!({ "term": "cats" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "BackendUnavailable");
    assert!(body["error"].as_str().unwrap().contains("SEARXNG_BASE_URL"));
}

#[tokio::test]
async fn test_invalid_parameters_never_reach_backend() {
    let stub = StubSearxng::start().await;
    let base = start(Some(stub.url.clone()), None).await;

    for body in [
        json!({ "term": "" }),
        json!({ "term": "   " }),
        json!({}),
        json!({ "term": "cats", "number_results": 0 }),
        json!({ "term": "cats", "number_results": "many" }),
        json!({ "term": "cats", "language": ["en", "de"] }),
        json!({ "term": "cats", "timeout": 1e30 }),
    ] {
        let response = post_search(&base, None, body.clone()).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "body: {}",
            body
        );
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["code"], "InvalidParameters");
    }

    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_non_object_body_is_invalid() {
    let base = start(None, None).await;

    let response = post_search(&base, None, json!(["cats"])).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_failing_backend_is_bad_gateway() {
    let stub = StubSearxng::failing().await;
    let base = start(Some(stub.url.clone()), None).await;

    let response = post_search(&base, None, json!({ "term": "cats" })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "BackendError");
    assert!(body["error"].as_str().unwrap().contains("500"));
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn test_tools_and_health_endpoints() {
    let stub = StubSearxng::start().await;
    let base = start(Some(stub.url.clone()), Some("secret")).await;
    let client = reqwest::Client::new();

    let tools: Value = client
        .get(format!("{}/v1/tools", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tools[0]["name"], "search_searxng");
    let params: Vec<&str> = tools[0]["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(params, ["term", "number_results", "timeout"]);

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["backend_configured"], true);
    assert_eq!(health["auth_enabled"], true);
}
