//! Error types for the elastic document repository.

mod search_error;

pub use search_error::SearchError;
