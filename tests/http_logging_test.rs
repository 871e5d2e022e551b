//! HTTPトラフィックロギングの Integration Tests
//!
//! ミドルウェアを通したリクエスト/レスポンスの無干渉性と、
//! 永続化されるログ内容を検証する。

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::{middleware as axum_middleware, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use stockd::config::HttpLogConfig;
use stockd::db::stocks::NewStock;
use stockd::httplog::{http_log_middleware, HttpLogger};
use stockd::AppState;
use tower::ServiceExt;

/// テスト用のAppStateを構築する（インメモリDB + 指定のログ設定）
async fn test_state(log_file: &Path, human_format: bool, separate_files: bool) -> AppState {
    // インメモリSQLiteは接続ごとに別DBになるため1接続に固定する
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    stockd::db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let config = HttpLogConfig {
        file_path: log_file.to_path_buf(),
        human_format,
        separate_files,
        timezone: "Africa/Nairobi".to_string(),
    };
    let http_logger = HttpLogger::new(&config).expect("Failed to build logger");

    AppState {
        stocks: Arc::new(stockd::db::stocks::StockStorage::new(pool.clone())),
        comments: Arc::new(stockd::db::comments::CommentStorage::new(pool.clone())),
        db_pool: pool,
        http_logger: Arc::new(http_logger),
    }
}

fn sample_stock(symbol: &str) -> NewStock {
    NewStock {
        symbol: symbol.to_string(),
        company_name: format!("{} Inc.", symbol),
        purchase: 101.5,
        last_dividend: 0.5,
        industry: "Technology".to_string(),
        market_cap: 500_000_000,
    }
}

/// ロギングなしの比較用ルーター（同じハンドラー・同じ状態）
fn bare_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/stock", get(stockd::api::stocks::list_stocks))
        .route("/api/v1/stock/:id", get(stockd::api::stocks::get_stock))
        .with_state(state)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// 単一ファイルのJSONログを配列として読み出す
fn read_structured_entries(log_file: &Path) -> Vec<serde_json::Value> {
    let contents = std::fs::read_to_string(log_file).expect("log file exists");
    let wrapped = format!("[{}]", contents.trim_end().trim_end_matches(','));
    let parsed: serde_json::Value = serde_json::from_str(&wrapped).expect("log entries parse");
    parsed.as_array().expect("array").clone()
}

#[tokio::test]
async fn test_logged_response_matches_unlogged_response() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir.path().join("requests.log"), true, false).await;
    state.stocks.insert(&sample_stock("AAPL")).await.unwrap();
    state.stocks.insert(&sample_stock("MSFT")).await.unwrap();

    let logged = stockd::api::create_app(state.clone())
        .oneshot(get_request("/api/v1/stock"))
        .await
        .unwrap();
    let unlogged = bare_app(state)
        .oneshot(get_request("/api/v1/stock"))
        .await
        .unwrap();

    assert_eq!(logged.status(), unlogged.status());
    let logged_bytes = to_bytes(logged.into_body(), usize::MAX).await.unwrap();
    let unlogged_bytes = to_bytes(unlogged.into_body(), usize::MAX).await.unwrap();
    assert_eq!(logged_bytes, unlogged_bytes);
}

#[tokio::test]
async fn test_authorization_header_value_is_never_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("requests.log");
    let state = test_state(&log_file, false, false).await;
    state.stocks.insert(&sample_stock("AAPL")).await.unwrap();
    let app = stockd::api::create_app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/stock")
                .header("Authorization", "Bearer super-secret-value")
                .header("accept", "application/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let contents = std::fs::read_to_string(&log_file).unwrap();
    assert!(!contents.contains("super-secret-value"));

    let entries = read_structured_entries(&log_file);
    assert_eq!(entries.len(), 1);
    let headers = entries[0]["request"]["headers"].as_object().unwrap();
    assert!(!headers.contains_key("authorization"));
    assert!(headers.contains_key("accept"));
}

#[tokio::test]
async fn test_get_stock_list_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("requests.log");
    let state = test_state(&log_file, false, false).await;
    state.stocks.insert(&sample_stock("AAPL")).await.unwrap();
    let app = stockd::api::create_app(state);

    let response = app.oneshot(get_request("/api/v1/stock")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let entries = read_structured_entries(&log_file);
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];

    assert_eq!(entry["request"]["method"], "GET");
    assert_eq!(entry["request"]["path"], "/api/v1/stock");
    assert_eq!(entry["request"]["body"], "");
    assert_eq!(entry["response"]["statusCode"], 200);
    assert!(entry["response"]["elapsedMilliseconds"].as_i64().unwrap() >= 0);

    // キャプチャされたレスポンスボディはクライアントが受け取ったものと一致する
    let logged_body = entry["response"]["body"].as_str().unwrap();
    assert_eq!(logged_body.as_bytes(), &body_bytes[..]);
}

#[tokio::test]
async fn test_missing_stock_logs_404_with_description() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("requests.log");
    let state = test_state(&log_file, true, false).await;
    let app = stockd::api::create_app(state);

    let response = app.oneshot(get_request("/api/v1/stock/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body_bytes.is_empty(), "404 response has no body");

    let contents = std::fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("Status Code: 404 Not Found"));
    // ボディが空なのでレスポンスボディセクションは出力されない
    assert!(!contents.contains("📄 Response Body:"));
}

#[tokio::test]
async fn test_failing_sink_does_not_affect_response() {
    let dir = tempfile::tempdir().unwrap();
    // 親が通常ファイルなので全書き込みが失敗する
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file").unwrap();
    let state = test_state(&blocker.join("requests.log"), true, false).await;
    let id = state.stocks.insert(&sample_stock("AAPL")).await.unwrap();
    let app = stockd::api::create_app(state);

    let response = app
        .oneshot(get_request(&format!("/api/v1/stock/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed["symbol"], "AAPL");
}

#[tokio::test]
async fn test_oversized_response_body_is_not_captured() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("requests.log");
    let state = test_state(&log_file, false, false).await;

    // 閾値超過のボディを返すルートをロギング付きで構成する
    let app = Router::new()
        .route("/api/big", get(|| async { "x".repeat(10_001) }))
        .layer(axum_middleware::from_fn_with_state(
            state,
            http_log_middleware,
        ));

    let response = app.oneshot(get_request("/api/big")).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    // クライアントへは全量が届く
    assert_eq!(bytes.len(), 10_001);

    // ログ側のレスポンスボディは空
    let entries = read_structured_entries(&log_file);
    assert_eq!(entries[0]["response"]["body"], "");
}

#[tokio::test]
async fn test_threshold_sized_response_body_is_captured() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("requests.log");
    let state = test_state(&log_file, false, false).await;

    let app = Router::new()
        .route("/api/exact", get(|| async { "y".repeat(10_000) }))
        .layer(axum_middleware::from_fn_with_state(
            state,
            http_log_middleware,
        ));

    let response = app.oneshot(get_request("/api/exact")).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.len(), 10_000);

    let entries = read_structured_entries(&log_file);
    assert_eq!(
        entries[0]["response"]["body"].as_str().unwrap().len(),
        10_000
    );
}

#[tokio::test]
async fn test_separate_files_mode_writes_one_file_per_entry() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let state = test_state(&log_dir.join("requests.log"), true, true).await;
    let app = stockd::api::create_app(state);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get_request("/api/v1/stock"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let files: Vec<_> = std::fs::read_dir(&log_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 2);
    for name in &files {
        assert!(name.starts_with("http-request-"));
        assert!(name.ends_with(".log"));
    }
}

#[tokio::test]
async fn test_stock_comments_endpoint_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("requests.log");
    let state = test_state(&log_file, false, false).await;
    let id = state.stocks.insert(&sample_stock("AAPL")).await.unwrap();
    state
        .comments
        .insert(&stockd::db::comments::NewComment {
            title: "Earnings".to_string(),
            content: "Beat expectations".to_string(),
            stock_id: id,
        })
        .await
        .unwrap();
    let app = stockd::api::create_app(state);

    let response = app
        .oneshot(get_request(&format!("/api/v1/stock/{}/comments", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let entries = read_structured_entries(&log_file);
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0]["request"]["path"],
        format!("/api/v1/stock/{}/comments", id)
    );
    let logged_body = entries[0]["response"]["body"].as_str().unwrap();
    assert!(logged_body.contains("Earnings"));
}
