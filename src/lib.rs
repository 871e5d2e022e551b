//! Stock data API server
//!
//! 株価データ参照APIサーバー。全HTTPトラフィックを傍受してファイルへ記録する。

#![warn(missing_docs)]

/// 共通型定義
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// HTTPトラフィックロギング
pub mod httplog;

/// ロギング初期化ユーティリティ
pub mod logging;

/// サーバー起動・シャットダウン
pub mod server;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// 銘柄ストレージ
    pub stocks: std::sync::Arc<db::stocks::StockStorage>,
    /// コメントストレージ
    pub comments: std::sync::Arc<db::comments::CommentStorage>,
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// HTTPトラフィックロガー
    pub http_logger: std::sync::Arc<httplog::HttpLogger>,
}
