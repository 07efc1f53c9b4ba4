//! Application settings and Telegram configuration.

use serde::{Deserialize, Serialize};

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token (obtain from `@BotFather`).
    pub bot_token: String,
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub fn new(bot_token: String) -> Self {
        Self { bot_token }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `TELOXIDE_TOKEN` to be set.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = std::env::var("TELOXIDE_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("TELOXIDE_TOKEN"))?;

        if bot_token.trim().is_empty() {
            return Err(ConfigError::EmptyBotToken);
        }

        Ok(Self { bot_token })
    }
}

/// Settings for the GitHub commit lookup integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Bearer token for the GitHub API. Unauthenticated requests work
    /// for public repositories but hit much stricter rate limits.
    #[serde(default)]
    pub token: Option<String>,

    /// Repository owner.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Repository name.
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Branch whose latest commit is reported.
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_owner() -> String {
    "IHVH".to_owned()
}

fn default_repo() -> String {
    "system-integration-bot-2".to_owned()
}

fn default_branch() -> String {
    "master".to_owned()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            owner: default_owner(),
            repo: default_repo(),
            branch: default_branch(),
        }
    }
}

impl GithubConfig {
    /// Creates GitHub settings from environment variables with defaults.
    ///
    /// Reads `GITHUBTOKEN` for the bearer token and `GITHUB_OWNER`,
    /// `GITHUB_REPO` and `GITHUB_BRANCH` to override the tracked
    /// repository.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            token: std::env::var("GITHUBTOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            owner: std::env::var("GITHUB_OWNER").unwrap_or_else(|_| default_owner()),
            repo: std::env::var("GITHUB_REPO").unwrap_or_else(|_| default_repo()),
            branch: std::env::var("GITHUB_BRANCH").unwrap_or_else(|_| default_branch()),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Bot token must not be empty")]
    EmptyBotToken,
}
