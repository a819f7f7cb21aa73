// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, Behaviour};
use axum::http::StatusCode;
use crawlgate::domain::models::crawl_config::{BrowserConfig, CacheMode, CrawlerRunConfig};
use serde_json::{json, Value};

const SECRET_HEADER: &str = "x-c4a-secret";

/// 测试无密钥时的最小请求
///
/// 未配置密钥，请求体只有 url：返回 200 且所有默认值生效
#[tokio::test]
async fn test_crawl_minimal_request_open_endpoint() {
    let app = create_test_app("", Behaviour::Success);

    let response = app
        .server
        .post("/crawl")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], "https://example.com");
    assert!(body["html"].is_string());
    assert_eq!(body["markdown"], "# Example Domain");

    assert_eq!(app.crawl_count(), 1);
    assert_eq!(app.last_run_config(), CrawlerRunConfig::default());

    let calls = app.calls.lock();
    assert_eq!(calls.launches, vec![BrowserConfig::default()]);
    assert_eq!(calls.closes, 1);
}

/// 测试 bypass 与截图
#[tokio::test]
async fn test_crawl_bypass_and_screenshot() {
    let app = create_test_app("", Behaviour::Success);

    let response = app
        .server
        .post("/crawl")
        .json(&json!({
            "url": "https://example.com",
            "config": { "cache_mode": "bypass", "screenshot": true }
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.crawl_count(), 1);

    let run = app.last_run_config();
    assert_eq!(run.cache_mode, CacheMode::Bypass);
    assert!(run.screenshot);
    assert_eq!(run.word_count_threshold, 10);
    assert!(run.css_selector.is_none());
}

/// 测试缓存模式映射
///
/// 任意大小写的 "bypass" 为 Bypass，其余值均为默认模式
#[tokio::test]
async fn test_crawl_cache_mode_mapping() {
    let cases = [
        (json!("BYPASS"), CacheMode::Bypass),
        (json!("Bypass"), CacheMode::Bypass),
        (json!("enabled"), CacheMode::Default),
        (json!("write_only"), CacheMode::Default),
        (json!(null), CacheMode::Default),
    ];

    for (cache_mode, expected) in cases {
        let app = create_test_app("", Behaviour::Success);
        let response = app
            .server
            .post("/crawl")
            .json(&json!({
                "url": "https://example.com",
                "config": { "cache_mode": cache_mode }
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(app.last_run_config().cache_mode, expected);
    }
}

/// 测试选项透传
#[tokio::test]
async fn test_crawl_passes_selector_and_threshold() {
    let app = create_test_app("", Behaviour::Success);

    let response = app
        .server
        .post("/crawl")
        .json(&json!({
            "url": "https://example.com",
            "config": {
                "css_selector": "main article",
                "word_count_threshold": 25,
                "unknown_option": { "nested": true }
            }
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let run = app.last_run_config();
    assert_eq!(run.css_selector.as_deref(), Some("main article"));
    assert_eq!(run.word_count_threshold, 25);
    assert!(!run.screenshot);
}

/// 测试错误密钥
///
/// 配置了密钥 "abc"，请求头为 "wrong"：返回 401，不启动浏览器
#[tokio::test]
async fn test_crawl_wrong_secret_unauthorized() {
    let app = create_test_app("abc", Behaviour::Success);

    let response = app
        .server
        .post("/crawl")
        .add_header(SECRET_HEADER, "wrong")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Unauthorized");
    assert_eq!(app.crawl_count(), 0);
    assert!(app.calls.lock().launches.is_empty());
}

/// 测试缺少密钥头
#[tokio::test]
async fn test_crawl_missing_secret_unauthorized() {
    let app = create_test_app("abc", Behaviour::Success);

    let response = app
        .server
        .post("/crawl")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.crawl_count(), 0);
}

/// 测试认证先于请求体校验
#[tokio::test]
async fn test_crawl_auth_checked_before_body() {
    let app = create_test_app("abc", Behaviour::Success);

    let response = app
        .server
        .post("/crawl")
        .json(&json!({ "config": {} }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

/// 测试正确密钥
#[tokio::test]
async fn test_crawl_correct_secret() {
    let app = create_test_app("abc", Behaviour::Success);

    let response = app
        .server
        .post("/crawl")
        .add_header(SECRET_HEADER, "abc")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.crawl_count(), 1);
}

/// 测试无密钥时任意请求头都被接受
#[tokio::test]
async fn test_crawl_any_header_accepted_without_secret() {
    let app = create_test_app("", Behaviour::Success);

    let response = app
        .server
        .post("/crawl")
        .add_header(SECRET_HEADER, "whatever")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

/// 测试请求体校验
///
/// 缺少 url、类型错误、非法 URL、非法选择器、非 JSON 都返回 422 且不调度
#[tokio::test]
async fn test_crawl_validation_errors() {
    let app = create_test_app("", Behaviour::Success);

    let bodies = [
        json!({}),
        json!({ "config": { "screenshot": true } }),
        json!({ "url": 42 }),
        json!({ "url": "not-a-valid-url" }),
        json!({ "url": "ftp://example.com" }),
        json!({ "url": "https://example.com", "config": { "word_count_threshold": "many" } }),
        json!({ "url": "https://example.com", "config": { "css_selector": "div[[" } }),
        json!({ "url": "https://example.com", "config": "bypass" }),
    ];

    for body in bodies {
        let response = app.server.post("/crawl").json(&body).await;
        assert_eq!(
            response.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "body: {}",
            body
        );
        let detail: Value = response.json();
        assert!(detail["detail"].is_string());
    }

    let response = app
        .server
        .post("/crawl")
        .bytes("{not json".into())
        .content_type("application/json")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.crawl_count(), 0);
}

/// 测试页面抓取失败
///
/// 会话报告失败时返回 200，success 为 false，信封字段齐全
#[tokio::test]
async fn test_crawl_reported_failure_is_ok_response() {
    let app = create_test_app(
        "",
        Behaviour::Reported("net::ERR_NAME_NOT_RESOLVED".to_string()),
    );

    let response = app
        .server
        .post("/crawl")
        .json(&json!({ "url": "https://does-not-exist.invalid" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 7);
    for key in [
        "success",
        "url",
        "html",
        "cleaned_html",
        "markdown",
        "extracted_content",
        "error_message",
    ] {
        assert!(object.contains_key(key), "missing key {}", key);
    }
    assert_eq!(body["success"], false);
    assert_eq!(body["error_message"], "net::ERR_NAME_NOT_RESOLVED");
    assert!(body["markdown"].is_null());
    assert!(body["html"].is_null());
}

/// 测试浏览器故障
///
/// 返回 500，会话依然被关闭
#[tokio::test]
async fn test_crawl_engine_fault_is_internal_error() {
    let app = create_test_app("", Behaviour::Fault);

    let response = app
        .server
        .post("/crawl")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Internal Server Error");
    assert_eq!(body["kind"], "browser_protocol");
    assert_eq!(app.calls.lock().closes, 1);
}

/// 测试浏览器启动失败
#[tokio::test]
async fn test_crawl_launch_failure_is_internal_error() {
    let app = create_test_app("", Behaviour::LaunchFailure);

    let response = app
        .server
        .post("/crawl")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["kind"], "browser_launch");
    assert_eq!(app.crawl_count(), 0);
}

/// 测试爬取 panic
///
/// panic 被捕获为 500，会话依然被关闭
#[tokio::test]
async fn test_crawl_panic_closes_session() {
    let app = create_test_app("", Behaviour::Panic);

    let response = app
        .server
        .post("/crawl")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["kind"], "panic");
    assert_eq!(app.calls.lock().closes, 1);
}

/// 测试公开端点
#[tokio::test]
async fn test_health_and_version_are_public() {
    let app = create_test_app("abc", Behaviour::Success);

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");

    let response = app.server.get("/version").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}
