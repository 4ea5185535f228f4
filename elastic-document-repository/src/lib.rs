//! # Elastic Document Repository
//!
//! This crate provides the `ElasticDocument` facade over a search engine,
//! the `SearchEngineProvider` trait it delegates to, and a concrete
//! implementation for Elasticsearch.

pub mod client;
pub mod config;
pub mod elastic;
pub mod errors;
pub mod interfaces;
pub mod types;

pub use client::ElasticDocument;
pub use config::ElasticConfig;
pub use elastic::ElasticsearchProvider;
pub use errors::SearchError;
pub use interfaces::SearchEngineProvider;
