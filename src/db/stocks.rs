//! 銘柄データのストレージ層

use crate::common::error::{StockdError, StockdResult};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// 銘柄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    /// 銘柄ID
    pub id: i64,
    /// ティッカーシンボル
    pub symbol: String,
    /// 会社名
    pub company_name: String,
    /// 取得単価
    pub purchase: f64,
    /// 直近配当
    pub last_dividend: f64,
    /// 業種
    pub industry: String,
    /// 時価総額
    pub market_cap: i64,
}

/// 新規銘柄（ID採番前）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStock {
    /// ティッカーシンボル
    pub symbol: String,
    /// 会社名
    pub company_name: String,
    /// 取得単価
    pub purchase: f64,
    /// 直近配当
    pub last_dividend: f64,
    /// 業種
    pub industry: String,
    /// 時価総額
    pub market_cap: i64,
}

/// 銘柄ストレージ（SQLite）
#[derive(Clone)]
pub struct StockStorage {
    pool: SqlitePool,
}

impl StockStorage {
    /// 新しいストレージインスタンスを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 全銘柄をID順に取得
    pub async fn list(&self) -> StockdResult<Vec<Stock>> {
        sqlx::query_as::<_, Stock>(
            "SELECT id, symbol, company_name, purchase, last_dividend, industry, market_cap \
             FROM stocks ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StockdError::Database(format!("Failed to list stocks: {}", e)))
    }

    /// IDで銘柄を取得
    pub async fn get(&self, id: i64) -> StockdResult<Option<Stock>> {
        sqlx::query_as::<_, Stock>(
            "SELECT id, symbol, company_name, purchase, last_dividend, industry, market_cap \
             FROM stocks WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StockdError::Database(format!("Failed to load stock: {}", e)))
    }

    /// 銘柄を登録し、採番されたIDを返す
    pub async fn insert(&self, stock: &NewStock) -> StockdResult<i64> {
        let result = sqlx::query(
            "INSERT INTO stocks (symbol, company_name, purchase, last_dividend, industry, market_cap) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&stock.symbol)
        .bind(&stock.company_name)
        .bind(stock.purchase)
        .bind(stock.last_dividend)
        .bind(&stock.industry)
        .bind(stock.market_cap)
        .execute(&self.pool)
        .await
        .map_err(|e| StockdError::Database(format!("Failed to insert stock: {}", e)))?;

        Ok(result.last_insert_rowid())
    }
}
