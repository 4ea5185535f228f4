//! Elasticsearch request body builders.
//!
//! This module turns provider arguments into the JSON bodies Elasticsearch
//! expects, including the newline-delimited bodies of `_bulk` and `_msearch`.

use serde_json::{json, Value};

use crate::types::BulkAction;
use elastic_document_shared::SearchRequest;

/// Scroll batch size used by delete-by-query.
pub const DELETE_BY_QUERY_BATCH_SIZE: i64 = 100;

/// Build the body of a create-index request.
pub fn create_index_body(settings: &Value, mapping: &Value) -> Value {
    json!({
        "settings": settings,
        "mappings": mapping
    })
}

/// Build the lines of a `_bulk` body.
///
/// Index actions produce an action line followed by the source line; delete
/// actions produce a single action line. The target index comes from the URL.
pub fn bulk_lines(actions: &[BulkAction]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(actions.len() * 2);

    for action in actions {
        match action {
            BulkAction::Index { id, source } => {
                lines.push(json!({ "index": { "_id": id } }));
                lines.push(source.clone());
            }
            BulkAction::Delete { id } => {
                lines.push(json!({ "delete": { "_id": id } }));
            }
        }
    }

    lines
}

/// Build the lines of a `_msearch` body: one header and one body per request.
pub fn multi_search_lines(requests: &[SearchRequest]) -> Vec<Value> {
    requests
        .iter()
        .flat_map(|request| [json!({ "index": request.index }), request.body.clone()])
        .collect()
}

/// Build the body of a delete-by-query request from a query clause.
pub fn delete_by_query_body(query: &Value) -> Value {
    json!({ "query": query })
}
