//! 銘柄参照API
//!
//! 単純なデータ参照エンドポイント。ロギングミドルウェアに観測対象の
//! トラフィックを与えるための薄いハンドラー群。

use crate::api::error::AppError;
use crate::db::stocks::Stock;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// GET /api/v1/stock
///
/// 全銘柄を返す。
pub async fn list_stocks(State(state): State<AppState>) -> Result<Json<Vec<Stock>>, AppError> {
    let stocks = state.stocks.list().await?;
    Ok(Json(stocks))
}

/// GET /api/v1/stock/:id
///
/// IDで銘柄を返す。存在しない場合は404（ボディなし）。
pub async fn get_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match state.stocks.get(id).await? {
        Some(stock) => Ok(Json(stock).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// GET /api/v1/stock/:id/comments
///
/// 銘柄に紐づくコメントを返す。銘柄が存在しない場合は404（ボディなし）。
pub async fn list_stock_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    if state.stocks.get(id).await?.is_none() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }
    let comments = state.comments.list_for_stock(id).await?;
    Ok(Json(comments).into_response())
}
