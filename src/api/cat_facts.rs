//! Client for the Cat Facts API (catfact.ninja).

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::ApiError;

/// Endpoint returning one random fact per request.
const CAT_FACT_URL: &str = "https://catfact.ninja/fact";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Response body of the fact endpoint.
#[derive(Debug, Deserialize)]
struct CatFactResponse {
    fact: String,
}

/// Client for fetching random cat facts.
#[derive(Debug, Clone)]
pub struct CatFactsClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatFactsClient {
    /// Creates a new client on top of the shared HTTP client.
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: CAT_FACT_URL.to_owned(),
        }
    }

    /// Overrides the endpoint URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches one random cat fact.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the body cannot be decoded.
    pub async fn random_fact(&self) -> Result<String, ApiError> {
        debug!("Fetching a random cat fact");

        let response = self
            .http
            .get(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body: CatFactResponse = response.json().await.map_err(ApiError::Decode)?;
        Ok(body.fact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> CatFactsClient {
        CatFactsClient::new(reqwest::Client::new())
            .with_base_url(format!("http://{}/fact", server.address()))
    }

    #[tokio::test]
    async fn random_fact_returns_fact_field() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/fact");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"fact":"Cats sleep 70% of their lives.","length":30}"#);
        });

        let fact = client(&server).random_fact().await.unwrap();
        assert_eq!(fact, "Cats sleep 70% of their lives.");
        mock.assert();
    }

    #[tokio::test]
    async fn random_fact_maps_server_error_to_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/fact");
            then.status(503);
        });

        let err = client(&server).random_fact().await.unwrap_err();
        assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 503));
    }

    #[tokio::test]
    async fn random_fact_rejects_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/fact");
            then.status(200).body("not json");
        });

        let err = client(&server).random_fact().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
