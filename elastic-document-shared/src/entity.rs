//! Document entity type.

use serde::{Deserialize, Serialize};

/// A document to be written to an index.
///
/// The `id` becomes the document `_id`; `data` is serialized as the
/// document `_source`. No validation or versioning happens locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticEntity<T> {
    /// Document identifier.
    pub id: String,
    /// Document payload.
    pub data: T,
}

impl<T> ElasticEntity<T> {
    /// Create a new entity.
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}
