//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables and the
//! immutable HTTP traffic log configuration built once at startup.

use std::path::PathBuf;

/// Get an environment variable, or a default if unset
pub fn get_env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable, parsing to a specific type
///
/// Returns the default if the variable is unset or fails to parse.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Get a boolean environment variable
///
/// `1/true/yes/on`（大文字小文字を問わない）のときtrue。未設定時はデフォルト値。
pub fn get_env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|value| {
            matches!(
                value.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

/// データベースURLを取得
///
/// 環境変数 `STOCKD_DATABASE_URL` から取得し、未設定の場合は
/// `sqlite:data/stockd.db` を使用する。
pub fn database_url() -> String {
    get_env_or("STOCKD_DATABASE_URL", "sqlite:data/stockd.db")
}

/// HTTPトラフィックログ設定
///
/// 起動時に一度だけ構築し、以後は不変のままロガーへ渡す。
/// リクエスト処理中に環境変数を参照することはない。
#[derive(Debug, Clone)]
pub struct HttpLogConfig {
    /// ログファイルパス。単一ファイルモードでは追記先、
    /// 分割ファイルモードでは親ディレクトリの基準となる。
    pub file_path: PathBuf,
    /// 人間可読フォーマットを使うか（falseでJSON構造化形式）
    pub human_format: bool,
    /// エントリごとに個別ファイルへ書き込むか
    pub separate_files: bool,
    /// 人間可読タイムスタンプ用のタイムゾーンID（IANA形式）
    pub timezone: String,
}

impl Default for HttpLogConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("logs/http-requests.log"),
            human_format: true,
            separate_files: false,
            timezone: "Africa/Nairobi".to_string(),
        }
    }
}

impl HttpLogConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            file_path: PathBuf::from(get_env_or(
                "STOCKD_HTTP_LOG_FILE",
                "logs/http-requests.log",
            )),
            human_format: get_env_bool("STOCKD_HTTP_LOG_HUMAN_FORMAT", defaults.human_format),
            separate_files: get_env_bool("STOCKD_HTTP_LOG_SEPARATE_FILES", defaults.separate_files),
            timezone: get_env_or("STOCKD_HTTP_LOG_TIMEZONE", &defaults.timezone),
        }
    }
}
