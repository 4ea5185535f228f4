//! Elasticsearch implementation of the search engine provider.
//!
//! This module provides a concrete implementation of `SearchEngineProvider`
//! using Elasticsearch as the backend.

mod provider;
mod requests;
mod responses;

pub use provider::ElasticsearchProvider;
pub use requests::DELETE_BY_QUERY_BATCH_SIZE;
