//! Configuration types for the elastic document facade.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Connection and index settings for Elasticsearch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticConfig {
    /// Elasticsearch node URL (e.g. `http://localhost:9200`).
    #[serde(default = "default_url")]
    pub url: String,

    /// Username for basic authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Number of primary shards for indices created through the facade.
    #[serde(default = "default_shards")]
    pub shards: u32,

    /// Number of replica shards for indices created through the facade.
    #[serde(default = "default_replicas")]
    pub replicas: u32,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30000
}

fn default_shards() -> u32 {
    1
}

fn default_replicas() -> u32 {
    1
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            request_timeout_ms: default_request_timeout_ms(),
            shards: default_shards(),
            replicas: default_replicas(),
        }
    }
}

impl ElasticConfig {
    /// Create a config pointing at `url` with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set shard and replica counts.
    pub fn with_shards(mut self, shards: u32, replicas: u32) -> Self {
        self.shards = shards;
        self.replicas = replicas;
        self
    }

    /// Index settings applied when creating an index.
    pub fn index_settings(&self) -> Value {
        json!({
            "index.number_of_shards": self.shards,
            "index.number_of_replicas": self.replicas
        })
    }
}
