//! Dependency initialization and wiring.

use tracing::info;

use crate::config::Settings;
use crate::AppError;
use elastic_document_repository::ElasticDocument;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The document facade, connected and health-checked.
    pub document: ElasticDocument,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the client cannot be built or the cluster is unhealthy
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        info!(
            elasticsearch_url = %settings.elastic.url,
            shards = settings.elastic.shards,
            replicas = settings.elastic.replicas,
            "Initializing dependencies"
        );

        let document = ElasticDocument::connect(settings.elastic.clone()).map_err(|e| {
            AppError::config(format!("Failed to create Elasticsearch client: {}", e))
        })?;

        // Verify Elasticsearch is reachable
        let healthy = document.health_check().await.map_err(|e| {
            AppError::config(format!("Elasticsearch health check failed: {}", e))
        })?;

        if !healthy {
            return Err(AppError::config("Elasticsearch cluster is unhealthy"));
        }

        info!("Elasticsearch connection verified");

        Ok(Self { document })
    }
}
