//! REST APIハンドラー

/// APIエラーレスポンス型
pub mod error;

/// 銘柄参照API
pub mod stocks;

use crate::httplog::http_log_middleware;
use crate::AppState;
use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

/// アプリケーションのルーターを構築する
///
/// HTTPトラフィックロギングミドルウェアは全ルートの外側に重ねる。
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/stock", get(stocks::list_stocks))
        .route("/api/v1/stock/:id", get(stocks::get_stock))
        .route("/api/v1/stock/:id/comments", get(stocks::list_stock_comments))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            http_log_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}
