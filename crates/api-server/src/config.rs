use std::env;
use std::str::FromStr;

/// One week, the longest preset the clients offer.
pub const DEFAULT_MAX_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// When set, create routes require `Authorization: Bearer <key>`.
    pub api_key: Option<String>,
    pub max_expiration_secs: u64,
    pub max_body_bytes: usize,
    pub purge_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            api_key: None,
            max_expiration_secs: DEFAULT_MAX_EXPIRATION_SECS,
            max_body_bytes: 10 * 1024 * 1024,
            purge_interval_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var("PORT").unwrap_or(defaults.port),
            api_key: env::var("API_KEY").ok().filter(|k| !k.is_empty()),
            max_expiration_secs: parse_var("MAX_EXPIRATION_SECS")
                .unwrap_or(defaults.max_expiration_secs),
            max_body_bytes: parse_var("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            purge_interval_secs: parse_var("PURGE_INTERVAL_SECS")
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.purge_interval_secs),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}
