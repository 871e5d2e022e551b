//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

/// コメント管理
pub mod comments;

/// データベースマイグレーション
pub mod migrations;

/// 銘柄管理
pub mod stocks;
