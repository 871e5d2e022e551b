//! HTTPトラフィックロギング
//!
//! リクエスト/レスポンスを傍受してファイルへ記録するミドルウェア群。
//! クライアントが観測するレスポンス（ステータス・ヘッダー・ボディ）には
//! 一切影響を与えない。記録系の失敗はすべてこのモジュール内で握りつぶす。

/// キャプチャミドルウェア（オーケストレーター）
pub mod capture;

/// エントリのレンダリング
pub mod format;

/// 機密ヘッダーの除外
pub mod redact;

/// 永続化シンク
pub mod sink;

/// タイムゾーン解決
pub mod timezone;

/// スナップショット型定義
pub mod types;

pub use capture::http_log_middleware;

use crate::common::error::StockdResult;
use crate::config::HttpLogConfig;
use chrono_tz::Tz;
use format::LogFormat;
use sink::{LogSink, SinkLayout};
use tracing::error;
use types::LogEntry;

/// HTTPトラフィックロガー
///
/// 起動時に設定から一度だけ構築される不変の状態。出力フォーマット・
/// 解決済みタイムゾーン・書き込み先を保持し、ミドルウェアから
/// 1リクエストごとに呼び出される。
pub struct HttpLogger {
    format: LogFormat,
    tz: Tz,
    sink: LogSink,
}

impl HttpLogger {
    /// 設定からロガーを構築する
    ///
    /// タイムゾーンIDが解決できない場合はエラーを返す。以後の人間可読
    /// タイムスタンプがすべてこの解決結果に依存するため、呼び出し側は
    /// これを起動失敗として扱い、フォールバックしてはならない。
    pub fn new(config: &HttpLogConfig) -> StockdResult<Self> {
        let tz = timezone::resolve(&config.timezone)?;
        let format = if config.human_format {
            LogFormat::Human
        } else {
            LogFormat::Structured
        };
        let layout = if config.separate_files {
            SinkLayout::PerEntryFile
        } else {
            SinkLayout::SingleFile
        };
        let sink = LogSink::new(config.file_path.clone(), layout);
        Ok(Self { format, tz, sink })
    }

    /// 1エントリを整形して永続化する
    ///
    /// 書き込み失敗は診断ログへ記録して握りつぶす。リクエスト処理へは
    /// 決して波及させない。
    pub async fn record(&self, entry: &LogEntry) {
        let rendered = format::render(entry, self.format, self.tz);
        if let Err(e) = self
            .sink
            .write(&rendered, &entry.trace_id, entry.request.timestamp)
            .await
        {
            error!("Failed to write HTTP log to file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::httplog::types::{RequestLog, ResponseLog};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn sample_entry() -> LogEntry {
        LogEntry {
            trace_id: "test-trace".to_string(),
            request: RequestLog {
                method: "GET".to_string(),
                path: "/health".to_string(),
                query_string: String::new(),
                headers: BTreeMap::new(),
                body: String::new(),
                timestamp: Utc::now(),
                user_agent: None,
                remote_ip: None,
            },
            response: ResponseLog {
                status_code: 200,
                headers: BTreeMap::new(),
                body: "ok".to_string(),
                elapsed_milliseconds: 1,
                content_type: None,
            },
        }
    }

    #[test]
    fn test_new_rejects_unknown_timezone() {
        let config = HttpLogConfig {
            timezone: "Mars/OlympusMons".to_string(),
            ..HttpLogConfig::default()
        };
        assert!(HttpLogger::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_record_writes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let config = HttpLogConfig {
            file_path: dir.path().join("requests.log"),
            human_format: true,
            separate_files: false,
            timezone: "Africa/Nairobi".to_string(),
        };
        let logger = HttpLogger::new(&config).unwrap();

        logger.record(&sample_entry()).await;

        let contents = std::fs::read_to_string(dir.path().join("requests.log")).unwrap();
        assert!(contents.contains("Trace ID: test-trace"));
        assert!(contents.contains("Status Code: 200 OK"));
    }

    #[tokio::test]
    async fn test_record_swallows_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let config = HttpLogConfig {
            file_path: blocker.join("requests.log"),
            human_format: true,
            separate_files: false,
            timezone: "Africa/Nairobi".to_string(),
        };
        let logger = HttpLogger::new(&config).unwrap();

        // 書き込み先が壊れていてもrecordはパニックもエラーもしない
        logger.record(&sample_entry()).await;
    }
}
