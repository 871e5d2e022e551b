//! タイムゾーン解決
//!
//! 設定されたIANAゾーンIDを起動時に一度だけ解決する。解決できないIDは
//! 設定エラーであり、プロセスはフォールバックせずに起動を中止すること。

use crate::common::error::{StockdError, StockdResult};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// ゾーンIDを`Tz`へ解決する
pub fn resolve(zone_id: &str) -> StockdResult<Tz> {
    zone_id
        .parse::<Tz>()
        .map_err(|_| StockdError::Config(format!("Unknown timezone identifier: {}", zone_id)))
}

/// UTC時刻を指定ゾーンのローカル時刻へ変換する
pub fn to_local(timestamp: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    timestamp.with_timezone(&tz)
}
