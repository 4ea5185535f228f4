//! # Elastic Document Shared
//!
//! Plain data types passed between callers and the elastic document facade.

mod entity;
mod search;

pub use entity::ElasticEntity;
pub use search::{MultiSearchRequest, SearchRequest};
