use std::env;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote spreadsheet source; `None` runs the server on bundled samples only.
    pub sheet: Option<SheetConfig>,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
}

/// Remote spreadsheet source configuration
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub base_url: String,
    /// Bearer credential, owned entirely by the source adapter.
    pub api_key: Option<String>,
    pub sheet_id: String,
}

/// Fetch-cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Numeric variables must parse when set; a typo'd value is a
    /// configuration error, not a silent fallback to the default.
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let sheet = match env::var("SHEET_BASE_URL") {
            Ok(base_url) if !base_url.trim().is_empty() => Some(SheetConfig {
                base_url,
                api_key: env::var("SHEET_API_KEY").ok().filter(|k| !k.is_empty()),
                sheet_id: env::var("SHEET_ID").unwrap_or_else(|_| "reports".to_string()),
            }),
            _ => None,
        };

        let cache = CacheConfig {
            ttl_secs: parse_env("CACHE_TTL_SECS", 3600)?,
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: parse_env("REQUEST_TIMEOUT_MS", 30000)?,
            max_retries: parse_env("MAX_RETRIES", 3)?,
            retry_delay_ms: parse_env("RETRY_DELAY_MS", 1000)?,
        };

        Ok(Config {
            sheet,
            cache,
            logging,
            request,
        })
    }
}

/// Parse a numeric environment variable, defaulting when unset and erroring
/// when set to something unparseable.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| AppError::Config {
            message: format!("{} must be a non-negative integer, got '{}'", key, raw),
        }),
        Err(_) => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet: None,
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            request: RequestConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}
