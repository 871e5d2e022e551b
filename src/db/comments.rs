//! 銘柄コメントのストレージ層

use crate::common::error::{StockdError, StockdResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// 銘柄に紐づくコメント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// コメントID
    pub id: i64,
    /// タイトル
    pub title: String,
    /// 本文
    pub content: String,
    /// 作成日時（UTC）
    pub created_on: DateTime<Utc>,
    /// 紐づく銘柄ID
    pub stock_id: i64,
}

/// 新規コメント（ID採番前）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// タイトル
    pub title: String,
    /// 本文
    pub content: String,
    /// 紐づく銘柄ID
    pub stock_id: i64,
}

/// コメントストレージ（SQLite）
#[derive(Clone)]
pub struct CommentStorage {
    pool: SqlitePool,
}

impl CommentStorage {
    /// 新しいストレージインスタンスを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 銘柄に紐づくコメントを作成日時順に取得
    pub async fn list_for_stock(&self, stock_id: i64) -> StockdResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, title, content, created_on, stock_id \
             FROM comments WHERE stock_id = ? ORDER BY created_on, id",
        )
        .bind(stock_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StockdError::Database(format!("Failed to list comments: {}", e)))
    }

    /// コメントを登録し、採番されたIDを返す
    pub async fn insert(&self, comment: &NewComment) -> StockdResult<i64> {
        let result = sqlx::query(
            "INSERT INTO comments (title, content, created_on, stock_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&comment.title)
        .bind(&comment.content)
        .bind(Utc::now())
        .bind(comment.stock_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StockdError::Database(format!("Failed to insert comment: {}", e)))?;

        Ok(result.last_insert_rowid())
    }
}
