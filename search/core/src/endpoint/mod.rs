//! Search Endpoint Integration
//!
//! Abstracted access to the search backend through a common trait, so the
//! dispatcher can run against the real HTTP service or a test double.
//!
//! # Usage
//!
//! ```ignore
//! use neurosearch_core::endpoint::{HttpSearchEndpoint, SearchEndpoint, SearchRequest};
//!
//! let endpoint = HttpSearchEndpoint::new("http://localhost:5000", DEFAULT_TIMEOUT)?;
//! let response = endpoint.search(&SearchRequest::new("cats")).await?;
//! ```

mod http;
mod traits;

pub use http::{HttpSearchEndpoint, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use traits::{EndpointError, SearchEndpoint, SearchRequest, SearchResponse};
