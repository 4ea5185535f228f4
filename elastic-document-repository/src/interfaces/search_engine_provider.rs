//! Search engine provider trait definition.
//!
//! This module defines the abstract interface for raw search engine calls,
//! allowing for different backend implementations (Elasticsearch, mock, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{BulkAction, BulkOutcome, DeleteByQueryOutcome, WriteOutcome};
use elastic_document_shared::SearchRequest;

/// Abstracts the underlying search engine (Elasticsearch, mock, etc.).
///
/// Each method maps to exactly one engine request. Implementations translate
/// engine responses into the plain outcome types in [`crate::types`] and leave
/// interpretation (guards, failure logging, success folding) to
/// [`crate::ElasticDocument`].
///
/// Transport failures and unexpected statuses are returned as `Err(SearchError)`.
/// Partial failures (shards, bulk items) are returned inside the outcome.
#[async_trait]
pub trait SearchEngineProvider: Send + Sync {
    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Create an index with the given settings and mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The engine's acknowledgement flag
    async fn create_index(
        &self,
        index: &str,
        settings: &Value,
        mapping: &Value,
    ) -> Result<bool, SearchError>;

    /// Delete an index.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The engine's acknowledgement flag
    async fn delete_index(&self, index: &str) -> Result<bool, SearchError>;

    /// Index (create or replace) a single document under `id`.
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        source: &Value,
    ) -> Result<WriteOutcome, SearchError>;

    /// Delete a single document by id.
    ///
    /// A missing document is not an error; it is reported through the outcome status.
    async fn delete_document(&self, index: &str, id: &str) -> Result<WriteOutcome, SearchError>;

    /// Submit all actions against `index` as one bulk request.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkOutcome)` - Per-item outcomes in request order
    /// * `Err(SearchError)` - If the bulk request was rejected as a whole
    async fn bulk(&self, index: &str, actions: &[BulkAction]) -> Result<BulkOutcome, SearchError>;

    /// Execute a search and return each hit's `_source` in hit order.
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Value>, SearchError>;

    /// Execute several searches in one round trip.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Vec<Value>>)` - One list of hit sources per request, in request order
    async fn multi_search(&self, requests: &[SearchRequest]) -> Result<Vec<Vec<Value>>, SearchError>;

    /// Delete every document in `index` matching `query`.
    ///
    /// `batch_size` is the scroll batch size; `proceed_on_conflicts` keeps going
    /// past version conflicts instead of aborting.
    async fn delete_by_query(
        &self,
        index: &str,
        query: &Value,
        batch_size: i64,
        proceed_on_conflicts: bool,
    ) -> Result<DeleteByQueryOutcome, SearchError>;

    /// Check if the search engine is healthy and reachable.
    async fn health_check(&self) -> Result<bool, SearchError>;

    /// Release the underlying connection. Later calls fail with a connection error.
    async fn close(&self) -> Result<(), SearchError>;
}
