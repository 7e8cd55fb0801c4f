use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Runtime settings, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// `*` or a comma-separated origin list
    pub cors_allowed_origins: String,
}

impl Config {
    /// Reads `CALORIE_API_ADDR` and `CORS_ALLOWED_ORIGINS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("CALORIE_API_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: addr.clone(),
                source,
            })?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string());

        Ok(Self {
            bind_addr,
            cors_allowed_origins,
        })
    }

    /// CORS for the browser client. Any origin unless a list is configured.
    pub fn cors_layer(&self) -> CorsLayer {
        let configured = self.cors_allowed_origins.trim();

        let allow_origin = if configured.is_empty() || configured == "*" {
            AllowOrigin::any()
        } else {
            let origins: Vec<HeaderValue> = configured
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| HeaderValue::from_str(s).ok())
                .collect();

            if origins.is_empty() {
                AllowOrigin::any()
            } else {
                AllowOrigin::list(origins)
            }
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    }
}
