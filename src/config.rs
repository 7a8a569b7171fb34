use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, EnvVarError};

pub const DEFAULT_BASE_URL: &str = "https://sumo-api.com/api/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const BASE_URL_VAR: &str = "SUMO_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "SUMO_API_TIMEOUT_SECS";
pub const HTTP2_VAR: &str = "SUMO_API_HTTP2";

/// Settings shared by the async and blocking transports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    prefer_http2: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            prefer_http2: true,
        }
    }
}

impl ClientConfig {
    /// Overrides the API root. A trailing slash is added when missing so
    /// endpoint paths join underneath it instead of replacing its last segment.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{base_url}/")
        };
        self.base_url = Url::parse(&normalized).map_err(|source| ConfigError::BaseUrl {
            url: base_url.to_owned(),
            source,
        })?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_http2(mut self, prefer_http2: bool) -> Self {
        self.prefer_http2 = prefer_http2;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn prefer_http2(&self) -> bool {
        self.prefer_http2
    }

    /// Defaults overridden by `SUMO_API_BASE_URL`, `SUMO_API_TIMEOUT_SECS`
    /// and `SUMO_API_HTTP2` when they are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_VAR) {
            config = config.with_base_url(&url)?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| EnvVarError::new(TIMEOUT_VAR, &raw, e.to_string()))?;
            if secs == 0 {
                return Err(EnvVarError::new(TIMEOUT_VAR, raw, "timeout must be non-zero").into());
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(HTTP2_VAR) {
            config.prefer_http2 = parse_flag(&raw)
                .ok_or_else(|| EnvVarError::new(HTTP2_VAR, &raw, "expected true or false"))?;
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
