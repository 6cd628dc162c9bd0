//! Server configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use eb_core::config::BoardConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub geo_api_url: String,
    pub geo_timeout: Duration,
    /// Secret mixed into daily IDs. Empty keeps them a plain hash of IP and date.
    pub id_salt: String,
    pub board: BoardConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut board = BoardConfig::default();
        if let Some(secs) = parse_var::<u64>("POST_INTERVAL_SECS") {
            board.post_interval = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_var::<i64>("RECENT_LIMIT") {
            board.recent_limit = limit;
        }
        if let Ok(code) = env::var("HOME_COUNTRY") {
            board.home_country = code.to_uppercase();
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(5000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:emergency.db".to_string()),
            geo_api_url: env::var("GEO_API_URL")
                .unwrap_or_else(|_| "http://ip-api.com/json".to_string()),
            geo_timeout: Duration::from_secs(parse_var("GEO_TIMEOUT_SECS").unwrap_or(3)),
            id_salt: env::var("ID_SALT").unwrap_or_default(),
            board,
        }
    }
}

/// Reads and parses a variable. Unparseable values are logged and ignored.
fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}
