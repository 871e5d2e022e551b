//! stockd server entry point

use clap::Parser;
use std::sync::Arc;
use stockd::config::{self, HttpLogConfig};
use stockd::httplog::HttpLogger;
use stockd::{db, logging, server, AppState};
use tracing::info;

/// 株価データAPIサーバー
#[derive(Parser)]
#[command(name = "stockd", version, about = "Stock data API server with HTTP traffic logging")]
struct Cli {
    /// バインドホスト
    #[arg(long, env = "STOCKD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// バインドポート
    #[arg(long, env = "STOCKD_PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    // タイムゾーン解決を含むロガー構築。失敗時はフォールバックせず起動を中止する。
    let http_log_config = HttpLogConfig::from_env();
    let http_logger = HttpLogger::new(&http_log_config)?;
    info!(
        "HTTP traffic logging to {} (human_format={}, separate_files={}, timezone={})",
        http_log_config.file_path.display(),
        http_log_config.human_format,
        http_log_config.separate_files,
        http_log_config.timezone
    );

    let pool = db::migrations::initialize_database(&config::database_url()).await?;

    let state = AppState {
        stocks: Arc::new(db::stocks::StockStorage::new(pool.clone())),
        comments: Arc::new(db::comments::CommentStorage::new(pool.clone())),
        db_pool: pool,
        http_logger: Arc::new(http_logger),
    };

    server::run(state, &format!("{}:{}", cli.host, cli.port)).await
}
