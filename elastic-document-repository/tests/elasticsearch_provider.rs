//! Drives `ElasticDocument` over the real Elasticsearch provider against a simulated engine.

use elastic_document_repository::{ElasticConfig, ElasticDocument, SearchError};
use elastic_document_shared::{ElasticEntity, MultiSearchRequest};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Goods {
    name: String,
}

fn document(server: &MockServer) -> ElasticDocument {
    let config = ElasticConfig::new(server.uri()).with_shards(2, 0);
    ElasticDocument::connect(config).unwrap()
}

#[tokio::test]
async fn test_create_existing_index_skips_create() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/goods"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/goods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(0)
        .mount(&server)
        .await;

    let created = document(&server)
        .create_index("goods", r#"{"properties":{"name":{"type":"text"}}}"#)
        .await
        .unwrap();

    assert!(!created);
}

#[tokio::test]
async fn test_create_index_sends_settings_and_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/goods"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/goods"))
        .and(body_partial_json(json!({
            "settings": { "index.number_of_shards": 2, "index.number_of_replicas": 0 },
            "mappings": { "properties": { "name": { "type": "text" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "acknowledged": true,
            "shards_acknowledged": true,
            "index": "goods"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = document(&server)
        .create_index("goods", r#"{"properties":{"name":{"type":"text"}}}"#)
        .await
        .unwrap();

    assert!(created);
}

#[tokio::test]
async fn test_create_index_rejected_by_engine() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/goods"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/goods"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "mapper_parsing_exception", "reason": "bad mapping" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let result = document(&server).create_index("goods", r#"{"properties":{}}"#).await;

    assert!(matches!(result, Err(SearchError::IndexCreationError(_))));
}

#[tokio::test]
async fn test_delete_missing_index_skips_delete() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/goods"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/goods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(0)
        .mount(&server)
        .await;

    let deleted = document(&server).delete_index("goods").await.unwrap();

    assert!(!deleted);
}

#[tokio::test]
async fn test_insert_or_update_one_created() {
    let server = MockServer::start().await;

    Mock::given(path("/goods/_doc/1"))
        .and(body_partial_json(json!({ "name": "apple" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_index": "goods",
            "_id": "1",
            "result": "created",
            "_shards": { "total": 2, "successful": 1, "failed": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entity = ElasticEntity::new("1", json!({ "name": "apple" }));
    let result = document(&server)
        .insert_or_update_one("goods", &entity)
        .await
        .unwrap();

    assert!(!result);
}

#[tokio::test]
async fn test_insert_or_update_one_updated() {
    let server = MockServer::start().await;

    Mock::given(path("/goods/_doc/1"))
        .and(body_partial_json(json!({ "name": "pear" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "goods",
            "_id": "1",
            "result": "updated",
            "_shards": { "total": 2, "successful": 1, "failed": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entity = ElasticEntity::new("1", json!({ "name": "pear" }));
    let result = document(&server)
        .insert_or_update_one("goods", &entity)
        .await
        .unwrap();

    assert!(result);
}

#[tokio::test]
async fn test_delete_missing_document_returns_false() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/goods/_doc/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": "goods",
            "_id": "9",
            "result": "not_found",
            "_shards": { "total": 2, "successful": 1, "failed": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = document(&server).delete("goods", "9").await.unwrap();

    assert!(!result);
}

#[tokio::test]
async fn test_insert_batch_partial_failure_still_submits_all() {
    let server = MockServer::start().await;

    Mock::given(path("/goods/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 5,
            "errors": true,
            "items": [
                { "index": { "_index": "goods", "_id": "1", "status": 201 } },
                { "index": { "_index": "goods", "_id": "2", "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "failed to parse" } } },
                { "index": { "_index": "goods", "_id": "3", "status": 201 } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entities: Vec<ElasticEntity<serde_json::Value>> = (1..=3)
        .map(|i| ElasticEntity::new(i.to_string(), json!({ "name": format!("goods {}", i) })))
        .collect();

    let result = document(&server).insert_batch("goods", &entities).await.unwrap();

    assert!(!result);

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    let lines: Vec<serde_json::Value> = body
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], json!({ "index": { "_id": "1" } }));
    assert_eq!(lines[5], json!({ "name": "goods 3" }));
}

#[tokio::test]
async fn test_delete_batch_all_succeed() {
    let server = MockServer::start().await;

    Mock::given(path("/goods/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 2,
            "errors": false,
            "items": [
                { "delete": { "_index": "goods", "_id": "1", "status": 200 } },
                { "delete": { "_index": "goods", "_id": "2", "status": 404 } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = document(&server).delete_batch("goods", &[1, 2]).await.unwrap();

    assert!(result);
}

#[tokio::test]
async fn test_search_returns_sources() {
    let server = MockServer::start().await;

    Mock::given(path("/goods/_search"))
        .and(body_partial_json(json!({ "query": { "match": { "name": "apple" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 1,
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_id": "1", "_score": 2.0, "_source": { "name": "apple" } },
                    { "_id": "2", "_score": 1.0, "_source": { "name": "apple pie" } }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let goods: Vec<Goods> = document(&server)
        .search("goods", &json!({ "query": { "match": { "name": "apple" } } }))
        .await
        .unwrap();

    assert_eq!(
        goods,
        vec![
            Goods { name: "apple".to_string() },
            Goods { name: "apple pie".to_string() },
        ]
    );
}

#[tokio::test]
async fn test_msearch_flattens_responses() {
    let server = MockServer::start().await;

    Mock::given(path("/_msearch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 3,
            "responses": [
                { "hits": { "hits": [ { "_source": { "name": "a" } } ] }, "status": 200 },
                { "hits": { "hits": [ { "_source": { "name": "b" } }, { "_source": { "name": "c" } } ] }, "status": 200 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = MultiSearchRequest::new()
        .with_query("goods", json!({ "query": { "match_all": {} } }))
        .with_query("archive", json!({ "query": { "match_all": {} } }));

    let goods: Vec<Goods> = document(&server).msearch(&request).await.unwrap();

    let names: Vec<&str> = goods.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_delete_by_query_sends_fixed_policy() {
    let server = MockServer::start().await;

    Mock::given(path("/goods/_delete_by_query"))
        .and(query_param("scroll_size", "100"))
        .and(query_param("conflicts", "proceed"))
        .and(body_partial_json(json!({ "query": { "term": { "status": 0 } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 10,
            "timed_out": false,
            "total": 4,
            "deleted": 3,
            "version_conflicts": 1,
            "failures": [
                { "index": "goods", "id": "4", "cause": { "type": "es_rejected_execution_exception", "reason": "rejected" }, "status": 429 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = document(&server)
        .delete_by_query("goods", &json!({ "term": { "status": 0 } }))
        .await
        .unwrap();

    assert!(!result);
}

#[tokio::test]
async fn test_destroy_then_calls_fail() {
    let server = MockServer::start().await;
    let document = document(&server);

    document.destroy().await;
    // A second close fails inside the provider and is only logged
    document.destroy().await;

    let result = document.index_exists("goods").await;
    assert!(matches!(result, Err(SearchError::ConnectionError(_))));
}
