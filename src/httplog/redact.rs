//! 機密ヘッダーの除外
//!
//! ヘッダー名に "authorization" を含むエントリ（大文字小文字を問わない）は
//! 記録対象から常に除外する。この規則は設定で無効化できない。

use axum::http::HeaderMap;
use std::collections::BTreeMap;

/// 除外対象と判定するヘッダー名の部分文字列
const SENSITIVE_HEADER_SUBSTRING: &str = "authorization";

/// リクエストヘッダーをマップへ収集する（機密ヘッダーを除外）
pub fn collect_request_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    collect(headers, true)
}

/// レスポンスヘッダーをマップへ収集する（除外なし）
pub fn collect_response_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    collect(headers, false)
}

/// ヘッダー名が機密扱いか判定する
fn is_sensitive(name: &str) -> bool {
    name.to_ascii_lowercase()
        .contains(SENSITIVE_HEADER_SUBSTRING)
}

fn collect(headers: &HeaderMap, redact: bool) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let key = name.as_str();
        if redact && is_sensitive(key) {
            continue;
        }
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        map.entry(key.to_string())
            .and_modify(|existing| {
                // 同名ヘッダーはカンマ区切りで連結する
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}
