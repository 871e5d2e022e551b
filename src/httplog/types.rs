//! キャプチャスナップショット型定義

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// ボディキャプチャの上限バイト数
///
/// この長さを超えるボディは記録対象から外れる（空文字列として記録される）。
/// 巨大なアップロード/ダウンロードでメモリが際限なく膨らむのを防ぐための境界。
pub const BODY_CAPTURE_LIMIT: usize = 10_000;

/// 1リクエスト分の不変スナップショット
///
/// インターセプターがリクエスト受信直後に構築する。構築後は変更されず、
/// フォーマット・永続化が終わった時点で破棄される。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    /// HTTPメソッド
    pub method: String,
    /// リクエストパス
    pub path: String,
    /// クエリ文字列（先頭`?`付き。なければ空文字列）
    pub query_string: String,
    /// リクエストヘッダー（authorization系は除外済み）
    pub headers: BTreeMap<String, String>,
    /// キャプチャ済みボディ（上限超過・不明長の場合は空）
    pub body: String,
    /// キャプチャ時刻（UTC）
    pub timestamp: DateTime<Utc>,
    /// User-Agentヘッダー
    pub user_agent: Option<String>,
    /// クライアントIP
    #[serde(rename = "remoteIP")]
    pub remote_ip: Option<String>,
}

/// 1レスポンス分の不変スナップショット
///
/// 下流ハンドラー完了後、実際の出力チャネルへバイト列を返す前に構築される。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseLog {
    /// HTTPステータスコード
    pub status_code: u16,
    /// レスポンスヘッダー（無加工）
    pub headers: BTreeMap<String, String>,
    /// キャプチャ済みボディ（上限超過の場合は空）
    pub body: String,
    /// 処理時間（ミリ秒）
    pub elapsed_milliseconds: i64,
    /// Content-Typeヘッダー
    pub content_type: Option<String>,
}

/// ログの1単位
///
/// 1リクエストと1レスポンスの対に相関IDを付けたもの。フォーマッターへ渡され、
/// 1回の永続化呼び出しで書き出される。それ以上保持されることはない。
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// 相関ID（リクエストごとに一意）
    pub trace_id: String,
    /// リクエストスナップショット
    pub request: RequestLog,
    /// レスポンススナップショット
    pub response: ResponseLog,
}
