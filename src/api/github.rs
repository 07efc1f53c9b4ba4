//! Client for the GitHub commits API.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::ApiError;
use crate::config::GithubConfig;

const GITHUB_API_URL: &str = "https://api.github.com";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Commit metadata as returned by `GET /repos/{owner}/{repo}/commits/{ref}`.
///
/// Only the rendered subset of the response is modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    /// Full commit SHA.
    pub sha: String,

    /// Web URL of the commit, if present.
    pub html_url: Option<String>,

    /// The Git-level commit data.
    pub commit: CommitDetail,
}

/// The Git-level part of a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    /// Full commit message.
    pub message: String,

    /// Author signature, if present.
    pub author: Option<CommitAuthor>,
}

/// Author signature of a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub name: String,

    /// ISO-8601 timestamp, e.g. `2024-05-01T12:34:56Z`.
    pub date: String,
}

/// Client for fetching the latest commit of one tracked repository.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    config: GithubConfig,
}

impl GithubClient {
    /// Creates a new client for the repository named in `config`.
    #[must_use]
    pub fn new(http: reqwest::Client, config: GithubConfig) -> Self {
        Self {
            http,
            base_url: GITHUB_API_URL.to_owned(),
            config,
        }
    }

    /// Overrides the API base URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the `owner/repo` slug of the tracked repository.
    #[must_use]
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.config.owner, self.config.repo)
    }

    /// Returns the tracked branch.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.config.branch
    }

    /// Fetches the latest commit of the tracked branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the body cannot be decoded.
    pub async fn latest_commit(&self) -> Result<CommitInfo, ApiError> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}",
            self.base_url, self.config.owner, self.config.repo, self.config.branch
        );

        debug!("Fetching latest commit from {}", url);

        let mut request = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .timeout(REQUEST_TIMEOUT);

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        response.json().await.map_err(ApiError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn commit_body() -> serde_json::Value {
        serde_json::json!({
            "sha": "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678",
            "html_url": "https://github.com/IHVH/system-integration-bot-2/commit/a1b2c3d",
            "commit": {
                "message": "Fix dispatcher wiring\n\nLonger body here.",
                "author": { "name": "IHVH", "date": "2024-05-01T12:34:56Z" }
            }
        })
    }

    fn client(server: &MockServer, token: Option<&str>) -> GithubClient {
        let config = GithubConfig {
            token: token.map(str::to_owned),
            ..GithubConfig::default()
        };
        GithubClient::new(reqwest::Client::new(), config)
            .with_base_url(format!("http://{}", server.address()))
    }

    #[tokio::test]
    async fn latest_commit_parses_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/IHVH/system-integration-bot-2/commits/master");
            then.status(200).json_body(commit_body());
        });

        let commit = client(&server, None).latest_commit().await.unwrap();
        assert!(commit.sha.starts_with("a1b2c3d"));
        assert_eq!(commit.commit.author.unwrap().name, "IHVH");
        mock.assert();
    }

    #[tokio::test]
    async fn latest_commit_sends_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/IHVH/system-integration-bot-2/commits/master")
                .header("authorization", "Bearer ghp_secret");
            then.status(200).json_body(commit_body());
        });

        client(&server, Some("ghp_secret"))
            .latest_commit()
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn latest_commit_maps_not_found_to_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/repos/IHVH/system-integration-bot-2/commits/master");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"message":"Not Found"}"#);
        });

        let err = client(&server, None).latest_commit().await.unwrap_err();
        assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 404));
    }
}
