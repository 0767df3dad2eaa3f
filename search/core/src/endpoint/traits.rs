//! Search Endpoint Traits
//!
//! The contract the dispatcher relies on: one request in, one atomic response
//! (or failure) out. Transport and authentication are implementation details.
//!
//! # Wire shape
//!
//! Request: `{ "query": string }`
//!
//! Response: `{ "results": [ { "title", "type", "url" } ] }`. A missing or
//! `null` `results` field means "no results", not an error. Extra fields are
//! ignored.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::turn::Document;

/// Request body sent to the search endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query exactly as the user typed it
    pub query: String,
}

impl SearchRequest {
    /// Create a request for a query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Response body returned by the search endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<Document>>,
}

impl SearchResponse {
    /// Create a response carrying these results
    #[must_use]
    pub fn new(results: Vec<Document>) -> Self {
        Self {
            results: Some(results),
        }
    }

    /// The result list, empty when the field was absent
    #[must_use]
    pub fn results(&self) -> &[Document] {
        self.results.as_deref().unwrap_or_default()
    }

    /// Take ownership of the result list
    #[must_use]
    pub fn into_results(self) -> Vec<Document> {
        self.results.unwrap_or_default()
    }
}

/// Ways a search call can fail
///
/// The dispatcher collapses all of these into one generic transcript entry;
/// the detail only reaches the logs.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// Connection, TLS, timeout or other transport failure
    #[error("Search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Search endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body could not be decoded
    #[error("Malformed search response: {0}")]
    Decode(String),

    /// The endpoint was configured incorrectly
    #[error("Invalid search endpoint configuration: {0}")]
    Config(String),

    /// No async runtime was available to run the request on
    #[error("No runtime to run the search on: {0}")]
    Runtime(String),
}

/// Search backend trait
///
/// Implement this to point the dispatcher at a different backend.
#[async_trait]
pub trait SearchEndpoint: Send + Sync {
    /// Backend name for logs (e.g. "http")
    fn name(&self) -> &str;

    /// Run one search
    ///
    /// Must settle exactly once, with either a response or an error.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, EndpointError>;
}
