//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::StockdError;
use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub StockdError);

impl From<StockdError> for AppError {
    fn from(err: StockdError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // external_message()で内部詳細を隠し、全文はサーバーログ側にだけ残す
        tracing::error!("API error: {}", self.0);
        let payload = json!({
            "error": self.0.external_message()
        });
        (self.0.status_code(), Json(payload)).into_response()
    }
}
