//! HTTPトラフィックキャプチャミドルウェア
//!
//! 全リクエスト/レスポンスを傍受し、ボディを読み直し可能な形でバッファして
//! スナップショットを構築、整形して永続化する。下流ハンドラーの出力は
//! ステータス・ヘッダー・ボディともに無改変でクライアントへ転送する。

use crate::httplog::redact;
use crate::httplog::types::{LogEntry, RequestLog, ResponseLog, BODY_CAPTURE_LIMIT};
use crate::AppState;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{ConnectInfo, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

/// HTTPトラフィックロギングミドルウェア
///
/// リクエストごとに キャプチャ → 下流実行 → キャプチャ → 整形 → 永続化 → 転送
/// の順で処理する。永続化の失敗はリクエスト処理へ波及しない。
pub async fn http_log_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let trace_id = Uuid::new_v4().to_string();

    let (request, request_log) = capture_request(request).await;

    let response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_millis() as i64;
    let (response, response_log) = capture_response(response, elapsed_ms).await;

    let entry = LogEntry {
        trace_id,
        request: request_log,
        response: response_log,
    };
    state.http_logger.record(&entry).await;

    response
}

/// リクエストのスナップショットを構築する
///
/// Content-Lengthが判明していて上限以内のときだけボディをバッファし、
/// バッファしたバイト列からリクエストを再構成して返す。下流ハンドラーは
/// 元と同一のボディを読める。上限超過・長さ不明の場合はボディに触れない。
async fn capture_request(request: Request<Body>) -> (Request<Body>, RequestLog) {
    let timestamp = Utc::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query_string = request
        .uri()
        .query()
        .map(|q| format!("?{}", q))
        .unwrap_or_default();
    let headers = redact::collect_request_headers(request.headers());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let remote_ip = client_ip(&request);

    let content_length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok());

    let should_capture =
        matches!(content_length, Some(len) if len > 0 && len <= BODY_CAPTURE_LIMIT as i64);

    let (request, body) = if should_capture {
        let (parts, raw_body) = request.into_parts();
        match to_bytes(raw_body, BODY_CAPTURE_LIMIT).await {
            Ok(bytes) => {
                let body = String::from_utf8_lossy(&bytes).into_owned();
                (Request::from_parts(parts, Body::from(bytes)), body)
            }
            Err(e) => {
                // ストリーム異常時はキャプチャなしで続行
                warn!("Failed to buffer request body: {}", e);
                (Request::from_parts(parts, Body::empty()), String::new())
            }
        }
    } else {
        (request, String::new())
    };

    let log = RequestLog {
        method,
        path,
        query_string,
        headers,
        body,
        timestamp,
        user_agent,
        remote_ip,
    };
    (request, log)
}

/// レスポンス全体をバッファしてスナップショットを構築する
///
/// バッファしたバイト列と元のparts（ステータス・ヘッダー）から
/// レスポンスを再構成して返すため、クライアントが受け取る内容は
/// 下流ハンドラーの出力と一致する。
async fn capture_response(response: Response, elapsed_ms: i64) -> (Response, ResponseLog) {
    let (parts, raw_body) = response.into_parts();
    let bytes = match to_bytes(raw_body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to buffer response body: {}", e);
            Bytes::new()
        }
    };

    let body = if !bytes.is_empty() && bytes.len() <= BODY_CAPTURE_LIMIT {
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        String::new()
    };

    let log = ResponseLog {
        status_code: parts.status.as_u16(),
        headers: redact::collect_response_headers(&parts.headers),
        body,
        elapsed_milliseconds: elapsed_ms,
        content_type: parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };

    (Response::from_parts(parts, Body::from(bytes)), log)
}

/// クライアントIP取得（プロキシ対応）
fn client_ip(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get("x-forwarded-for")
        .or_else(|| request.headers().get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}
