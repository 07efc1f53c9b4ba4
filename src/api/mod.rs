//! Clients for the external REST APIs.
//!
//! Each client wraps one public API behind a typed interface and shares
//! the process-wide `reqwest::Client`. Base URLs are overridable so
//! tests can point a client at a local mock server.

mod cat_facts;
mod github;
mod stapi;

pub use cat_facts::CatFactsClient;
pub use github::{CommitAuthor, CommitDetail, CommitInfo, GithubClient};
pub use stapi::{Movie, Person, StapiClient};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to an external API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(StatusCode),

    #[error("Malformed response body: {0}")]
    Decode(#[source] reqwest::Error),
}
