//! Elasticsearch response parsing.
//!
//! Pure functions that pull the fields the facade needs out of response bodies.

use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{error_reason, BulkItemOutcome, BulkOutcome, DeleteByQueryOutcome, ShardInfo};

/// Read the `acknowledged` flag of an index-management response.
pub fn parse_acknowledged(body: &Value) -> bool {
    body.get("acknowledged")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Read the `_shards` block of a single-document write response.
pub fn parse_shard_info(body: &Value) -> Result<ShardInfo, SearchError> {
    match body.get("_shards") {
        Some(shards) => serde_json::from_value(shards.clone())
            .map_err(|e| SearchError::parse(format!("Invalid _shards block: {}", e))),
        None => Ok(ShardInfo::default()),
    }
}

/// Read the per-item outcomes of a `_bulk` response.
///
/// Each item is keyed by its action name: `{"index": {"_id": "1", "status": 201}}`.
pub fn parse_bulk_response(body: &Value) -> Result<BulkOutcome, SearchError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::parse("Bulk response has no items"))?;

    let items = items
        .iter()
        .map(parse_bulk_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BulkOutcome {
        errors: body.get("errors").and_then(Value::as_bool).unwrap_or(false),
        items,
    })
}

fn parse_bulk_item(item: &Value) -> Result<BulkItemOutcome, SearchError> {
    let (action, result) = item
        .as_object()
        .and_then(|obj| obj.iter().next())
        .ok_or_else(|| SearchError::parse(format!("Malformed bulk item: {}", item)))?;

    Ok(BulkItemOutcome {
        action: action.clone(),
        id: result.get("_id").and_then(Value::as_str).map(str::to_string),
        status: result
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|status| u16::try_from(status).ok())
            .unwrap_or_default(),
        error: result.get("error").filter(|e| !e.is_null()).cloned(),
    })
}

/// Read the `_source` of every hit of a search response, in hit order.
///
/// Hits without a source (e.g. `"_source": false` queries) yield `Value::Null`.
pub fn parse_hit_sources(body: &Value) -> Result<Vec<Value>, SearchError> {
    let hits = body
        .get("hits")
        .and_then(|hits| hits.get("hits"))
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::parse("Search response has no hits"))?;

    Ok(hits
        .iter()
        .map(|hit| hit.get("_source").cloned().unwrap_or(Value::Null))
        .collect())
}

/// Read the hit sources of every sub-response of a `_msearch` response.
///
/// A failed sub-response fails the whole call.
pub fn parse_multi_search_response(body: &Value) -> Result<Vec<Vec<Value>>, SearchError> {
    let responses = body
        .get("responses")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::parse("Multi-search response has no responses"))?;

    responses
        .iter()
        .enumerate()
        .map(|(position, response)| match response.get("error") {
            Some(error) => Err(SearchError::query(format!(
                "Multi-search request {} failed: {}",
                position,
                error_reason(error)
            ))),
            None => parse_hit_sources(response),
        })
        .collect()
}

/// Read the counters and bulk failures of a `_delete_by_query` response.
pub fn parse_delete_by_query_response(body: &Value) -> Result<DeleteByQueryOutcome, SearchError> {
    serde_json::from_value(body.clone())
        .map_err(|e| SearchError::parse(format!("Invalid delete-by-query response: {}", e)))
}

/// A cluster is healthy unless it reports `red`.
pub fn parse_cluster_health(body: &Value) -> bool {
    matches!(
        body.get("status").and_then(Value::as_str),
        Some("green") | Some("yellow")
    )
}
