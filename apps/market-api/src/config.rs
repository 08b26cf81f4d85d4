//! Market API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use medimart_core::{TransitionPolicy, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use std::env;

/// Market API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address the HTTP server binds to
    pub bind_addr: String,

    /// Path to the SQLite database file
    pub database_path: String,

    /// JWT secret key for verifying bearer tokens
    pub jwt_secret: String,

    /// Restrict stores to single-step order transitions
    pub strict_transitions: bool,

    /// Catalog page size used when the client sends no `limit`
    pub search_limit: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            bind_addr: env::var("MARKET_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),

            database_path: env::var("MARKET_DATABASE_PATH")
                .unwrap_or_else(|_| "./medimart.db".to_string()),

            jwt_secret: env::var("MARKET_JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "medimart-dev-secret-change-in-production".to_string()
            }),

            strict_transitions: env::var("MARKET_STRICT_TRANSITIONS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),

            search_limit: env::var("MARKET_SEARCH_LIMIT")
                .unwrap_or_else(|_| DEFAULT_SEARCH_LIMIT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MARKET_SEARCH_LIMIT".to_string()))?,
        };

        if config.search_limit == 0 || config.search_limit > MAX_SEARCH_LIMIT {
            return Err(ConfigError::InvalidValue("MARKET_SEARCH_LIMIT".to_string()));
        }

        Ok(config)
    }

    /// The order transition policy selected by this configuration.
    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.strict_transitions {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::ForwardSkipping
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
