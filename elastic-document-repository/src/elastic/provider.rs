//! Elasticsearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchEngineProvider`
//! using the official Elasticsearch Rust client.

use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::{
    auth::Credentials,
    cluster::ClusterHealthParts,
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    params::Conflicts,
    BulkParts, DeleteByQueryParts, DeleteParts, Elasticsearch, IndexParts, MsearchParts,
    SearchParts,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::ElasticConfig;
use crate::elastic::requests;
use crate::elastic::responses;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineProvider;
use crate::types::{BulkAction, BulkOutcome, DeleteByQueryOutcome, WriteOutcome};
use elastic_document_shared::SearchRequest;

/// Elasticsearch provider.
///
/// Holds a single-node client until [`SearchEngineProvider::close`] is called.
///
/// # Example
///
/// ```ignore
/// use elastic_document_repository::{ElasticConfig, ElasticsearchProvider};
///
/// let config = ElasticConfig::new("http://localhost:9200").with_basic_auth("elastic", "changeme");
/// let provider = ElasticsearchProvider::new(&config)?;
/// let exists = provider.index_exists("goods").await?;
/// ```
pub struct ElasticsearchProvider {
    client: RwLock<Option<Elasticsearch>>,
    url: String,
}

impl std::fmt::Debug for ElasticsearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchProvider")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchProvider {
    /// Create a new provider connected to the node in `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(ElasticsearchProvider)` - A new provider instance
    /// * `Err(SearchError)` - If the URL is invalid or the transport cannot be built
    pub fn new(config: &ElasticConfig) -> Result<Self, SearchError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .disable_proxy();

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(
            url = %config.url,
            timeout_ms = config.request_timeout_ms,
            "Created Elasticsearch provider"
        );

        Ok(Self {
            client: RwLock::new(Some(Elasticsearch::new(transport))),
            url: config.url.clone(),
        })
    }

    /// Get a handle to the client, failing once the provider is closed.
    async fn client(&self) -> Result<Elasticsearch, SearchError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or_else(|| SearchError::connection("Elasticsearch client is closed"))
    }

    /// Read a JSON response body.
    async fn json_body(response: Response) -> Result<Value, SearchError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))
    }

    /// Log and format a failed response.
    async fn failure_message(operation: &str, response: Response) -> String {
        let status = response.status_code();
        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, "{} request failed", operation);
        format!("{} failed with status {}: {}", operation, status, error_body)
    }
}

#[async_trait]
impl SearchEngineProvider for ElasticsearchProvider {
    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client()
            .await?
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(SearchError::query(
                Self::failure_message("Index exists", response).await,
            )),
        }
    }

    #[instrument(skip(self, settings, mapping))]
    async fn create_index(
        &self,
        index: &str,
        settings: &Value,
        mapping: &Value,
    ) -> Result<bool, SearchError> {
        let response = self
            .client()
            .await?
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(requests::create_index_body(settings, mapping))
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(SearchError::index_creation(
                Self::failure_message("Create index", response).await,
            ));
        }

        let body = Self::json_body(response).await?;
        let acknowledged = responses::parse_acknowledged(&body);
        info!(acknowledged, "Index created");
        Ok(acknowledged)
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client()
            .await?
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::delete(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(SearchError::delete(
                Self::failure_message("Delete index", response).await,
            ));
        }

        let body = Self::json_body(response).await?;
        let acknowledged = responses::parse_acknowledged(&body);
        info!(acknowledged, "Index deleted");
        Ok(acknowledged)
    }

    #[instrument(skip(self, source))]
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        source: &Value,
    ) -> Result<WriteOutcome, SearchError> {
        let response = self
            .client()
            .await?
            .index(IndexParts::IndexId(index, id))
            .body(source)
            .send()
            .await
            .map_err(|e| SearchError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchError::index(
                Self::failure_message("Index document", response).await,
            ));
        }

        let body = Self::json_body(response).await?;
        let shards = responses::parse_shard_info(&body)?;

        debug!(status = status.as_u16(), "Document indexed");
        Ok(WriteOutcome {
            status: status.as_u16(),
            shards,
        })
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, index: &str, id: &str) -> Result<WriteOutcome, SearchError> {
        let response = self
            .client()
            .await?
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 is reported through the outcome: the document may not exist
        if !status.is_success() && status.as_u16() != 404 {
            return Err(SearchError::delete(
                Self::failure_message("Delete document", response).await,
            ));
        }

        let body = Self::json_body(response).await?;
        let shards = responses::parse_shard_info(&body)?;

        debug!(status = status.as_u16(), "Document deleted");
        Ok(WriteOutcome {
            status: status.as_u16(),
            shards,
        })
    }

    #[instrument(skip(self, actions), fields(action_count = actions.len()))]
    async fn bulk(&self, index: &str, actions: &[BulkAction]) -> Result<BulkOutcome, SearchError> {
        let body: Vec<JsonBody<Value>> = requests::bulk_lines(actions)
            .into_iter()
            .map(Into::into)
            .collect();

        let response = self
            .client()
            .await?
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(SearchError::bulk(
                Self::failure_message("Bulk", response).await,
            ));
        }

        let body = Self::json_body(response).await?;
        let outcome = responses::parse_bulk_response(&body)?;

        debug!(
            items = outcome.items.len(),
            errors = outcome.errors,
            "Bulk request completed"
        );
        Ok(outcome)
    }

    #[instrument(skip(self, body))]
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Value>, SearchError> {
        let response = self
            .client()
            .await?
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(SearchError::query(
                Self::failure_message("Search", response).await,
            ));
        }

        let body = Self::json_body(response).await?;
        responses::parse_hit_sources(&body)
    }

    #[instrument(skip(self, searches), fields(request_count = searches.len()))]
    async fn multi_search(&self, searches: &[SearchRequest]) -> Result<Vec<Vec<Value>>, SearchError> {
        let body: Vec<JsonBody<Value>> = requests::multi_search_lines(searches)
            .into_iter()
            .map(Into::into)
            .collect();

        let response = self
            .client()
            .await?
            .msearch(MsearchParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(SearchError::query(
                Self::failure_message("Multi-search", response).await,
            ));
        }

        let body = Self::json_body(response).await?;
        responses::parse_multi_search_response(&body)
    }

    #[instrument(skip(self, query))]
    async fn delete_by_query(
        &self,
        index: &str,
        query: &Value,
        batch_size: i64,
        proceed_on_conflicts: bool,
    ) -> Result<DeleteByQueryOutcome, SearchError> {
        let conflicts = if proceed_on_conflicts {
            Conflicts::Proceed
        } else {
            Conflicts::Abort
        };

        let response = self
            .client()
            .await?
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .scroll_size(batch_size)
            .conflicts(conflicts)
            .body(requests::delete_by_query_body(query))
            .send()
            .await
            .map_err(|e| SearchError::delete(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(SearchError::delete(
                Self::failure_message("Delete by query", response).await,
            ));
        }

        let body = Self::json_body(response).await?;
        let outcome = responses::parse_delete_by_query_response(&body)?;

        debug!(
            deleted = outcome.deleted,
            version_conflicts = outcome.version_conflicts,
            "Delete by query completed"
        );
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client()
            .await?
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            error!(status = %response.status_code(), "Cluster health check failed");
            return Ok(false);
        }

        let body = Self::json_body(response).await?;
        Ok(responses::parse_cluster_health(&body))
    }

    #[instrument(skip(self))]
    async fn close(&self) -> Result<(), SearchError> {
        match self.client.write().await.take() {
            Some(_) => {
                info!(url = %self.url, "Closed Elasticsearch provider");
                Ok(())
            }
            None => Err(SearchError::connection("Elasticsearch client already closed")),
        }
    }
}
