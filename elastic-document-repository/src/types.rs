//! Request and response types exchanged with a search engine provider.

use serde::Deserialize;
use serde_json::Value;

/// Shard replication summary attached to single-document write responses (`_shards`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShardInfo {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub successful: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub failures: Vec<ShardFailure>,
}

/// A single shard that failed to apply a write.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShardFailure {
    #[serde(rename = "_index", default)]
    pub index: Option<String>,
    #[serde(rename = "_shard", default)]
    pub shard: Option<i64>,
    #[serde(rename = "_node", default)]
    pub node: Option<String>,
    #[serde(default)]
    pub reason: Value,
    #[serde(default)]
    pub status: Option<String>,
}

impl ShardFailure {
    /// Human-readable failure reason.
    pub fn reason_text(&self) -> String {
        error_reason(&self.reason)
    }
}

/// Result of indexing or deleting a single document.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// HTTP status returned by the engine.
    pub status: u16,
    /// Shard replication summary.
    pub shards: ShardInfo,
}

/// One action inside a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkAction {
    /// Index (create or replace) a document.
    Index { id: String, source: Value },
    /// Delete a document.
    Delete { id: String },
}

impl BulkAction {
    pub fn id(&self) -> &str {
        match self {
            BulkAction::Index { id, .. } | BulkAction::Delete { id } => id,
        }
    }
}

/// Outcome of a single item in a bulk response.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemOutcome {
    /// Action name (`index`, `delete`, ...).
    pub action: String,
    /// Document id, if the engine reported one.
    pub id: Option<String>,
    /// Per-item HTTP status.
    pub status: u16,
    /// Error object, present only when the item failed.
    pub error: Option<Value>,
}

impl BulkItemOutcome {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Human-readable failure message, empty for successful items.
    pub fn failure_message(&self) -> String {
        self.error.as_ref().map(error_reason).unwrap_or_default()
    }
}

/// Outcome of a bulk request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkOutcome {
    /// Engine-reported `errors` flag.
    pub errors: bool,
    /// Per-item outcomes in request order.
    pub items: Vec<BulkItemOutcome>,
}

impl BulkOutcome {
    /// Items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItemOutcome> {
        self.items.iter().filter(|item| item.is_failed())
    }
}

/// Outcome of a delete-by-query request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeleteByQueryOutcome {
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub version_conflicts: u64,
    /// Bulk and search-phase failures, as reported by the engine.
    #[serde(default)]
    pub failures: Vec<Value>,
}

impl DeleteByQueryOutcome {
    /// Failures raised while deleting matched documents.
    ///
    /// Bulk failures carry the document `id` and a `cause`; search-phase
    /// failures carry `shard` and `reason` instead.
    pub fn bulk_failures(&self) -> impl Iterator<Item = &Value> {
        self.failures.iter().filter(|failure| is_bulk_failure(failure))
    }

    /// Shard failures from the search phase.
    pub fn search_failures(&self) -> impl Iterator<Item = &Value> {
        self.failures.iter().filter(|failure| !is_bulk_failure(failure))
    }
}

fn is_bulk_failure(failure: &Value) -> bool {
    failure.get("id").is_some() || failure.get("cause").is_some()
}

/// Extract the most useful message from an engine error object.
///
/// Engine errors look like `{"type": "...", "reason": "...", "caused_by": {...}}`.
pub(crate) fn error_reason(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => {
            let reason = other
                .get("reason")
                .or_else(|| other.get("cause").and_then(|cause| cause.get("reason")))
                .and_then(Value::as_str);
            let kind = other
                .get("type")
                .or_else(|| other.get("cause").and_then(|cause| cause.get("type")))
                .and_then(Value::as_str);
            match (kind, reason) {
                (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
                (None, Some(reason)) => reason.to_string(),
                _ => other.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shard_info_deserialize() {
        let shards: ShardInfo = serde_json::from_value(json!({
            "total": 2,
            "successful": 1,
            "failed": 1,
            "failures": [{
                "_index": "goods",
                "_shard": 0,
                "_node": "n1",
                "reason": { "type": "node_disconnected_exception", "reason": "node left" },
                "status": "INTERNAL_SERVER_ERROR"
            }]
        }))
        .unwrap();

        assert_eq!(shards.failed, 1);
        assert_eq!(shards.failures.len(), 1);
        assert_eq!(
            shards.failures[0].reason_text(),
            "node_disconnected_exception: node left"
        );
    }

    #[test]
    fn test_error_reason_variants() {
        assert_eq!(error_reason(&json!("plain")), "plain");
        assert_eq!(error_reason(&json!({ "reason": "only reason" })), "only reason");
        assert_eq!(
            error_reason(&json!({ "cause": { "type": "version_conflict", "reason": "conflict" } })),
            "version_conflict: conflict"
        );
        assert_eq!(error_reason(&json!({ "code": 7 })), "{\"code\":7}");
    }

    #[test]
    fn test_bulk_outcome_failures() {
        let outcome = BulkOutcome {
            errors: true,
            items: vec![
                BulkItemOutcome {
                    action: "index".to_string(),
                    id: Some("1".to_string()),
                    status: 201,
                    error: None,
                },
                BulkItemOutcome {
                    action: "index".to_string(),
                    id: Some("2".to_string()),
                    status: 400,
                    error: Some(json!({ "type": "mapper_parsing_exception", "reason": "bad field" })),
                },
            ],
        };

        let failures: Vec<_> = outcome.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].id.as_deref(), Some("2"));
        assert_eq!(failures[0].failure_message(), "mapper_parsing_exception: bad field");
    }

    #[test]
    fn test_delete_by_query_outcome_splits_failures() {
        let outcome = DeleteByQueryOutcome {
            deleted: 1,
            version_conflicts: 0,
            failures: vec![
                json!({ "index": "goods", "id": "7", "cause": { "type": "es_rejected_execution_exception", "reason": "rejected" }, "status": 429 }),
                json!({ "index": "goods", "shard": 0, "node": "n1", "reason": { "type": "query_shard_exception", "reason": "bad" } }),
            ],
        };

        let bulk: Vec<_> = outcome.bulk_failures().collect();
        assert_eq!(bulk.len(), 1);
        assert_eq!(bulk[0]["id"], "7");
        assert_eq!(outcome.search_failures().count(), 1);
    }
}
