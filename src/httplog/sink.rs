//! レンダリング済みエントリの永続化
//!
//! 全エントリを1ファイルへ追記する方式と、エントリごとに新規ファイルを
//! 作成する方式の2レイアウト。書き込み失敗の扱いは呼び出し側の責務
//! （診断ログへ記録して握りつぶす）。

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// 永続化レイアウト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkLayout {
    /// 全エントリを設定されたファイルへ到着順に追記する
    SingleFile,
    /// エントリごとにタイムスタンプ+相関IDを名前に持つ新規ファイルへ書き込む
    PerEntryFile,
}

/// ログ書き込み先
pub struct LogSink {
    layout: SinkLayout,
    path: PathBuf,
    /// 単一ファイルモードの追記直列化用。並行リクエストのエントリが
    /// 行単位で混ざらないことを保証する。
    append_lock: Mutex<()>,
}

impl LogSink {
    /// シンクを作成し、出力ディレクトリがなければ作成する
    ///
    /// ディレクトリ作成の失敗は後続の書き込み失敗として現れるため、
    /// ここでは診断ログに記録するだけでエラーにはしない。
    pub fn new(path: impl Into<PathBuf>, layout: SinkLayout) -> Self {
        let path = path.into();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    tracing::error!("Failed to create log directory {}: {}", dir.display(), e);
                }
            }
        }
        Self {
            layout,
            path,
            append_lock: Mutex::new(()),
        }
    }

    /// 1エントリ分のレンダリング済みテキストを書き込む
    pub async fn write(
        &self,
        rendered: &str,
        trace_id: &str,
        timestamp: DateTime<Utc>,
    ) -> io::Result<()> {
        match self.layout {
            SinkLayout::SingleFile => self.append(rendered).await,
            SinkLayout::PerEntryFile => self.write_entry_file(rendered, trace_id, timestamp).await,
        }
    }

    async fn append(&self, rendered: &str) -> io::Result<()> {
        let _guard = self.append_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;
        file.write_all(rendered.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn write_entry_file(
        &self,
        rendered: &str,
        trace_id: &str,
        timestamp: DateTime<Utc>,
    ) -> io::Result<()> {
        // 相関IDがUUIDなのでファイル名は衝突しない
        let file_name = format!(
            "http-request-{}-{}.log",
            timestamp.format("%Y-%m-%d-%H-%M-%S-%3f"),
            trace_id
        );
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        tokio::fs::write(dir.join(file_name), rendered).await
    }
}
