//! データベースマイグレーション

use crate::common::error::{StockdError, StockdResult};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

/// SQLiteデータベース接続プールを作成してマイグレーションを実行する
///
/// # Arguments
/// * `database_url` - データベースURL（例: "sqlite:data/stockd.db"）
pub async fn initialize_database(database_url: &str) -> StockdResult<SqlitePool> {
    // データベースファイルが存在しない場合は作成
    if !Sqlite::database_exists(database_url)
        .await
        .map_err(|e| StockdError::Database(format!("Failed to check database: {}", e)))?
    {
        tracing::info!("Creating database: {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| StockdError::Database(format!("Failed to create database: {}", e)))?;
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .map_err(|e| StockdError::Database(format!("Failed to connect to database: {}", e)))?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// マイグレーションを実行する（sqlx::migrate!マクロを使用）
pub async fn run_migrations(pool: &SqlitePool) -> StockdResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StockdError::Database(format!("Failed to run migrations: {}", e)))?;
    Ok(())
}
