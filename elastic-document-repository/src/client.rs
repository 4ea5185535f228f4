//! Elastic document facade.
//!
//! This module provides the main entry point for application code: index
//! management, document writes and searches. Each call maps to one provider
//! request; partial failures are logged and folded into a boolean.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::ElasticConfig;
use crate::elastic::{ElasticsearchProvider, DELETE_BY_QUERY_BATCH_SIZE};
use crate::errors::SearchError;
use crate::interfaces::SearchEngineProvider;
use crate::types::{BulkAction, BulkOutcome, ShardInfo};
use elastic_document_shared::{ElasticEntity, MultiSearchRequest};

/// The main facade over the search engine.
///
/// Holds the provider and the shard/replica settings used when creating indices.
/// Errors from the transport propagate; per-item and per-shard failures are
/// logged and reported through the `bool` results.
pub struct ElasticDocument {
    provider: Box<dyn SearchEngineProvider>,
    config: ElasticConfig,
}

impl ElasticDocument {
    /// Create a facade over an existing provider.
    pub fn new(provider: Box<dyn SearchEngineProvider>, config: ElasticConfig) -> Self {
        Self { provider, config }
    }

    /// Create a facade backed by Elasticsearch at `config.url`.
    pub fn connect(config: ElasticConfig) -> Result<Self, SearchError> {
        let provider = ElasticsearchProvider::new(&config)?;
        Ok(Self::new(Box::new(provider), config))
    }

    /// Shard and replica settings applied to created indices.
    pub fn index_settings(&self) -> Value {
        self.config.index_settings()
    }

    /// Create an index with the given mapping (raw JSON text).
    ///
    /// Returns `false` without calling the engine if the index already exists,
    /// otherwise the engine's acknowledgement flag.
    pub async fn create_index(&self, index: &str, mapping: &str) -> Result<bool, SearchError> {
        if self.index_exists(index).await? {
            info!(index = %index, mapping = %mapping, "Index already exists");
            return Ok(false);
        }

        let mapping: Value = serde_json::from_str(mapping)
            .map_err(|e| SearchError::serialization(format!("Invalid mapping for {}: {}", index, e)))?;

        self.provider
            .create_index(index, &self.index_settings(), &mapping)
            .await
    }

    /// Check whether an index exists.
    pub async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        self.provider.index_exists(index).await
    }

    /// Delete an index.
    ///
    /// Returns `false` without calling the engine if the index does not exist.
    pub async fn delete_index(&self, index: &str) -> Result<bool, SearchError> {
        if !self.index_exists(index).await? {
            error!(index = %index, "Index does not exist");
            return Ok(false);
        }

        self.provider.delete_index(index).await
    }

    /// Index one document, replacing any document with the same id.
    ///
    /// Shard failures are logged, not retried. Returns whether the engine
    /// answered `200 OK`, so a newly created document yields `false`.
    pub async fn insert_or_update_one<T: Serialize>(
        &self,
        index: &str,
        entity: &ElasticEntity<T>,
    ) -> Result<bool, SearchError> {
        let source = serde_json::to_value(&entity.data)?;
        info!(index = %index, id = %entity.id, entity = %source, "Indexing document");

        let outcome = self
            .provider
            .index_document(index, &entity.id, &source)
            .await?;
        log_shard_failures(index, &entity.id, &outcome.shards);

        Ok(outcome.status == 200)
    }

    /// Index many documents in one bulk request.
    ///
    /// Every failed item is logged; returns `true` only if no item failed.
    pub async fn insert_batch<T: Serialize>(
        &self,
        index: &str,
        entities: &[ElasticEntity<T>],
    ) -> Result<bool, SearchError> {
        let actions = entities
            .iter()
            .map(|entity| {
                Ok(BulkAction::Index {
                    id: entity.id.clone(),
                    source: serde_json::to_value(&entity.data)?,
                })
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        self.submit_bulk(index, &actions).await
    }

    /// Delete one document by id.
    ///
    /// Shard failures are logged. Returns whether the engine answered `200 OK`;
    /// a missing document yields `false`.
    pub async fn delete(&self, index: &str, id: &str) -> Result<bool, SearchError> {
        let outcome = self.provider.delete_document(index, id).await?;
        log_shard_failures(index, id, &outcome.shards);

        Ok(outcome.status == 200)
    }

    /// Delete many documents in one bulk request.
    ///
    /// Every failed item is logged; returns `true` only if no item failed.
    pub async fn delete_batch<I: Display>(&self, index: &str, ids: &[I]) -> Result<bool, SearchError> {
        let actions: Vec<BulkAction> = ids
            .iter()
            .map(|id| BulkAction::Delete { id: id.to_string() })
            .collect();

        self.submit_bulk(index, &actions).await
    }

    /// Run one query and deserialize every hit's source into `T`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<Vec<T>, SearchError> {
        let sources = self.provider.search(index, body).await?;
        deserialize_sources(sources)
    }

    /// Run several queries in one round trip.
    ///
    /// Hits of all responses are flattened into one list in request order.
    pub async fn msearch<T: DeserializeOwned>(
        &self,
        request: &MultiSearchRequest,
    ) -> Result<Vec<T>, SearchError> {
        if request.is_empty() {
            return Ok(vec![]);
        }

        let responses = self.provider.multi_search(request.requests()).await?;
        deserialize_sources(responses.into_iter().flatten().collect())
    }

    /// Delete every document matching `query` (a query clause, e.g. `{"term": {...}}`).
    ///
    /// Runs with a scroll batch size of 100 and proceeds past version conflicts.
    /// Every failure is logged. Only bulk failures count against the result;
    /// search-phase shard failures are logged as warnings.
    pub async fn delete_by_query(&self, index: &str, query: &Value) -> Result<bool, SearchError> {
        let outcome = self
            .provider
            .delete_by_query(index, query, DELETE_BY_QUERY_BATCH_SIZE, true)
            .await?;

        for failure in outcome.search_failures() {
            warn!(index = %index, failure = %failure, "Delete by query search failure");
        }

        let mut success = true;
        for failure in outcome.bulk_failures() {
            success = false;
            error!(index = %index, failure = %failure, "Delete by query failure");
        }

        info!(
            index = %index,
            deleted = outcome.deleted,
            version_conflicts = outcome.version_conflicts,
            "Delete by query finished"
        );
        Ok(success)
    }

    /// Check if the search engine is healthy and reachable.
    pub async fn health_check(&self) -> Result<bool, SearchError> {
        self.provider.health_check().await
    }

    /// Close the underlying client. Errors are logged, never returned.
    pub async fn destroy(&self) {
        if let Err(e) = self.provider.close().await {
            error!(error = %e, "Failed to close search engine client");
        }
    }

    async fn submit_bulk(&self, index: &str, actions: &[BulkAction]) -> Result<bool, SearchError> {
        if actions.is_empty() {
            warn!(index = %index, "Skipping empty bulk request");
            return Ok(true);
        }

        let outcome = self.provider.bulk(index, actions).await?;
        Ok(handle_bulk_outcome(index, &outcome))
    }
}

/// Log every failed bulk item; `true` only if none failed and the engine
/// reported no errors.
fn handle_bulk_outcome(index: &str, outcome: &BulkOutcome) -> bool {
    let mut success = !outcome.errors;
    for item in outcome.failures() {
        success = false;
        error!(
            index = %index,
            action = %item.action,
            id = item.id.as_deref().unwrap_or_default(),
            status = item.status,
            reason = %item.failure_message(),
            "Bulk item failed"
        );
    }
    success
}

fn log_shard_failures(index: &str, id: &str, shards: &ShardInfo) {
    if shards.failed == 0 {
        return;
    }
    for failure in &shards.failures {
        error!(
            index = %index,
            id = %id,
            shard = failure.shard.unwrap_or(-1),
            reason = %failure.reason_text(),
            "Shard failure"
        );
    }
}

fn deserialize_sources<T: DeserializeOwned>(sources: Vec<Value>) -> Result<Vec<T>, SearchError> {
    sources
        .into_iter()
        .map(|source| {
            serde_json::from_value(source).map_err(|e| SearchError::parse(e.to_string()))
        })
        .collect()
}
