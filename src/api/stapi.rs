//! Client for the Star Trek API (stapi.co).

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::ApiError;

const STAPI_BASE_URL: &str = "https://stapi.co/api/v1/rest";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A movie record from the search endpoint.
///
/// Only the rendered fields are modelled; all of them are optional
/// because the API omits or nulls values it does not know.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub uid: Option<String>,
    pub title: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub us_release_date: Option<String>,
    pub main_director: Option<Person>,
}

/// A person reference embedded in a movie record.
#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieSearchResponse {
    #[serde(default)]
    movies: Vec<Movie>,
}

/// Client for searching Star Trek movies.
#[derive(Debug, Clone)]
pub struct StapiClient {
    http: reqwest::Client,
    base_url: String,
}

impl StapiClient {
    /// Creates a new client on top of the shared HTTP client.
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: STAPI_BASE_URL.to_owned(),
        }
    }

    /// Overrides the API base URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Searches movies by title.
    ///
    /// An empty result list is not an error; the caller decides how to
    /// present it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the body cannot be decoded.
    pub async fn search_movies(&self, title: &str) -> Result<Vec<Movie>, ApiError> {
        let url = format!("{}/movie/search", self.base_url);

        debug!("Searching Star Trek movies for title '{}'", title);

        let response = self
            .http
            .get(&url)
            .query(&[("title", title)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body: MovieSearchResponse = response.json().await.map_err(ApiError::Decode)?;
        Ok(body.movies)
    }
}
