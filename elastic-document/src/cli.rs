//! Command-line surface over the document facade.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::AppError;
use elastic_document_repository::ElasticDocument;
use elastic_document_shared::{ElasticEntity, MultiSearchRequest, SearchRequest};

#[derive(Debug, Parser)]
#[command(name = "elastic-document")]
#[command(about = "Index management and document operations against Elasticsearch", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether an index exists
    Exists { index: String },
    /// Create an index from a mapping file
    CreateIndex {
        index: String,
        /// Path to the mapping JSON
        #[arg(long)]
        mapping: PathBuf,
    },
    /// Delete an index
    DeleteIndex { index: String },
    /// Index one document
    Put {
        index: String,
        id: String,
        /// Document source as JSON
        #[arg(long)]
        data: String,
    },
    /// Index every entity in a JSON file of `[{"id": ..., "data": {...}}]`
    Load {
        index: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete one or more documents by id
    Delete {
        index: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Run a search body against an index
    Search {
        index: String,
        /// Search source as JSON
        #[arg(long)]
        query: String,
    },
    /// Run several searches in one round trip; each query is `index:{json}`
    Msearch {
        #[arg(long = "query", required = true)]
        queries: Vec<String>,
    },
    /// Delete every document matching a query clause
    DeleteByQuery {
        index: String,
        /// Query clause as JSON
        #[arg(long)]
        query: String,
    },
}

/// Execute a command and print its result to stdout.
pub async fn run(command: Command, document: &ElasticDocument) -> Result<(), AppError> {
    match command {
        Command::Exists { index } => {
            println!("{}", document.index_exists(&index).await?);
        }
        Command::CreateIndex { index, mapping } => {
            let mapping = fs::read_to_string(&mapping)?;
            println!("{}", document.create_index(&index, &mapping).await?);
        }
        Command::DeleteIndex { index } => {
            println!("{}", document.delete_index(&index).await?);
        }
        Command::Put { index, id, data } => {
            let entity = ElasticEntity::new(id, parse_json("--data", &data)?);
            println!("{}", document.insert_or_update_one(&index, &entity).await?);
        }
        Command::Load { index, file } => {
            let raw = fs::read_to_string(&file)?;
            let entities: Vec<ElasticEntity<Value>> = serde_json::from_str(&raw)
                .map_err(|e| AppError::config(format!("Invalid entity file {}: {}", file.display(), e)))?;
            info!(index = %index, count = entities.len(), "Loading entities");
            println!("{}", document.insert_batch(&index, &entities).await?);
        }
        Command::Delete { index, ids } => {
            let deleted = match ids.as_slice() {
                [id] => document.delete(&index, id).await?,
                _ => document.delete_batch(&index, ids.as_slice()).await?,
            };
            println!("{}", deleted);
        }
        Command::Search { index, query } => {
            let body = parse_json("--query", &query)?;
            let hits: Vec<Value> = document.search(&index, &body).await?;
            print_hits(&hits);
        }
        Command::Msearch { queries } => {
            let request = queries
                .iter()
                .map(|query| parse_search_arg(query))
                .collect::<Result<MultiSearchRequest, _>>()?;
            let hits: Vec<Value> = document.msearch(&request).await?;
            print_hits(&hits);
        }
        Command::DeleteByQuery { index, query } => {
            let query = parse_json("--query", &query)?;
            println!("{}", document.delete_by_query(&index, &query).await?);
        }
    }

    Ok(())
}

fn print_hits(hits: &[Value]) {
    for hit in hits {
        println!("{}", hit);
    }
}

fn parse_json(arg: &str, raw: &str) -> Result<Value, AppError> {
    serde_json::from_str(raw).map_err(|e| AppError::config(format!("Invalid JSON for {}: {}", arg, e)))
}

/// Parse an `index:{json}` multi-search argument.
pub fn parse_search_arg(raw: &str) -> Result<SearchRequest, AppError> {
    let (index, body) = raw
        .split_once(':')
        .filter(|(index, _)| !index.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("Expected index:{{json}}, got {}", raw)))?;

    Ok(SearchRequest::new(index.trim(), parse_json("--query", body)?))
}
