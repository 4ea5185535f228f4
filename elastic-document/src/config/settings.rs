//! Environment-driven settings.

use std::env;
use std::str::FromStr;

use crate::telemetry::LogFormat;
use crate::AppError;
use elastic_document_repository::ElasticConfig;

/// Settings loaded from the process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Elasticsearch connection and index settings.
    pub elastic: ElasticConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTICSEARCH_URL`: node URL (default: http://localhost:9200)
    /// - `ELASTICSEARCH_USERNAME` / `ELASTICSEARCH_PASSWORD`: basic auth, both required to enable it
    /// - `ELASTICSEARCH_TIMEOUT_MS`: request timeout (default: 30000)
    /// - `ELASTICSEARCH_SHARDS`: shards for created indices (default: 1)
    /// - `ELASTICSEARCH_REPLICAS`: replicas for created indices (default: 1)
    /// - `LOG_FORMAT`: `text` or `json` (default: text)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ElasticConfig::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let elastic = ElasticConfig {
            url: non_empty("ELASTICSEARCH_URL").unwrap_or(defaults.url),
            username: non_empty("ELASTICSEARCH_USERNAME"),
            password: non_empty("ELASTICSEARCH_PASSWORD"),
            request_timeout_ms: parse_or(
                "ELASTICSEARCH_TIMEOUT_MS",
                non_empty("ELASTICSEARCH_TIMEOUT_MS"),
                defaults.request_timeout_ms,
            )?,
            shards: parse_or("ELASTICSEARCH_SHARDS", non_empty("ELASTICSEARCH_SHARDS"), defaults.shards)?,
            replicas: parse_or(
                "ELASTICSEARCH_REPLICAS",
                non_empty("ELASTICSEARCH_REPLICAS"),
                defaults.replicas,
            )?,
        };

        let log_format = parse_or("LOG_FORMAT", non_empty("LOG_FORMAT"), LogFormat::Text)?;

        Ok(Self {
            elastic,
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, AppError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid value for {}: {}", key, raw))),
        None => Ok(default),
    }
}
