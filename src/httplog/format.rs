//! キャプチャ済みエントリのレンダリング
//!
//! JSON構造化形式と人間可読レポート形式の2モード。どちらも`LogEntry`と
//! 解決済みタイムゾーンの純粋関数であり、I/Oは行わない。

use crate::httplog::timezone;
use crate::httplog::types::{LogEntry, RequestLog, ResponseLog};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// 出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// セクション区切りの人間可読レポート
    Human,
    /// pretty-printされたJSONエンベロープ
    Structured,
}

/// エントリを指定フォーマットでレンダリングする
pub fn render(entry: &LogEntry, format: LogFormat, tz: Tz) -> String {
    match format {
        LogFormat::Human => render_human(entry, tz),
        LogFormat::Structured => render_structured(entry),
    }
}

/// JSONエンベロープ（フィールド名はlower camel case固定）
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEnvelope<'a> {
    trace_id: &'a str,
    timestamp: DateTime<Utc>,
    request: &'a RequestLog,
    response: &'a ResponseLog,
}

/// JSON構造化形式でレンダリングする
///
/// 各エントリの末尾に`,\n`を付加する。ファイル全体を`[` `]`で包むと
/// 正当なJSON配列として読める（後段で集約する消費者向けの既知の形式）。
fn render_structured(entry: &LogEntry) -> String {
    let envelope = JsonEnvelope {
        trace_id: &entry.trace_id,
        timestamp: entry.request.timestamp,
        request: &entry.request,
        response: &entry.response,
    };
    let mut rendered = serde_json::to_string_pretty(&envelope).expect("log envelope serializes");
    rendered.push_str(",\n");
    rendered
}

/// 人間可読レポート形式でレンダリングする
fn render_human(entry: &LogEntry, tz: Tz) -> String {
    let separator = "=".repeat(80);
    let sub_separator = "-".repeat(40);
    let local = timezone::to_local(entry.request.timestamp, tz);

    let mut out = String::new();

    // バナー: ローカル時刻・相関ID・処理時間
    out.push_str(&separator);
    out.push('\n');
    out.push_str("🌐 HTTP REQUEST/RESPONSE LOG WITH LOCAL TIME\n");
    out.push_str(&format!(
        "📅 Timestamp: {} ({})\n",
        local.format("%Y-%m-%d %H:%M:%S%.3f"),
        tz.name()
    ));
    out.push_str(&format!("🔍 Trace ID: {}\n", entry.trace_id));
    out.push_str(&format!(
        "⏱️  Duration: {}ms\n",
        entry.response.elapsed_milliseconds
    ));
    out.push_str(&separator);
    out.push('\n');

    // リクエストセクション
    out.push('\n');
    out.push_str("📤 REQUEST\n");
    out.push_str(&sub_separator);
    out.push('\n');
    out.push_str(&format!("Method: {}\n", entry.request.method));
    out.push_str(&format!("Path: {}\n", entry.request.path));

    if !entry.request.query_string.is_empty() {
        out.push_str(&format!("Query String: {}\n", entry.request.query_string));
    }
    if let Some(remote_ip) = entry.request.remote_ip.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("Remote IP: {}\n", remote_ip));
    }
    if let Some(user_agent) = entry.request.user_agent.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("User Agent: {}\n", user_agent));
    }

    if !entry.request.headers.is_empty() {
        out.push('\n');
        out.push_str("📋 Request Headers:\n");
        for (name, value) in &entry.request.headers {
            out.push_str(&format!("  {}: {}\n", name, value));
        }
    }

    if !entry.request.body.is_empty() {
        out.push('\n');
        out.push_str("📝 Request Body:\n");
        out.push_str(&format_json_if_possible(&entry.request.body));
        out.push('\n');
    }

    // レスポンスセクション
    out.push('\n');
    out.push_str("📥 RESPONSE\n");
    out.push_str(&sub_separator);
    out.push('\n');
    out.push_str(&format!(
        "Status Code: {} {}\n",
        entry.response.status_code,
        status_description(entry.response.status_code)
    ));

    if let Some(content_type) = entry.response.content_type.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("Content Type: {}\n", content_type));
    }

    if !entry.response.headers.is_empty() {
        out.push('\n');
        out.push_str("📋 Response Headers:\n");
        for (name, value) in &entry.response.headers {
            out.push_str(&format!("  {}: {}\n", name, value));
        }
    }

    if !entry.response.body.is_empty() {
        out.push('\n');
        out.push_str("📄 Response Body:\n");
        out.push_str(&format_json_if_possible(&entry.response.body));
        out.push('\n');
    }

    // フッター
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    out.push('\n');

    out
}

/// 既知ステータスコードの説明文を返す（未知のコードは空文字列）
pub fn status_description(status_code: u16) -> &'static str {
    match status_code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

/// ボディがJSONとして解析できればpretty-printし、できなければ原文のまま返す
fn format_json_if_possible(content: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| content.to_string()),
        Err(_) => content.to_string(),
    }
}
