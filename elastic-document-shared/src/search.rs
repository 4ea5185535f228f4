//! Search request types.

use serde_json::Value;

/// A single query against one index.
///
/// `body` is a full search source, e.g. `{"query": {...}, "size": 10}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Index to search.
    pub index: String,
    /// Search source body.
    pub body: Value,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(index: impl Into<String>, body: Value) -> Self {
        Self {
            index: index.into(),
            body,
        }
    }
}

/// A set of independent queries executed in one round trip.
///
/// Results come back in the order requests were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSearchRequest {
    requests: Vec<SearchRequest>,
}

impl MultiSearchRequest {
    /// Create an empty multi-search request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query.
    pub fn add(mut self, request: SearchRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Append a query against `index` with the given body.
    pub fn with_query(self, index: impl Into<String>, body: Value) -> Self {
        self.add(SearchRequest::new(index, body))
    }

    /// The queries in submission order.
    pub fn requests(&self) -> &[SearchRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl FromIterator<SearchRequest> for MultiSearchRequest {
    fn from_iter<I: IntoIterator<Item = SearchRequest>>(iter: I) -> Self {
        Self {
            requests: iter.into_iter().collect(),
        }
    }
}
