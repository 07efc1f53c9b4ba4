//! GitHub commit lookup command handler.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::api::{CommitInfo, GithubClient};

/// Reply used when the lookup fails for any reason.
const LOOKUP_FAILED: &str = "Failed to fetch the latest commit. Please try again later.";

/// Abbreviated SHA length, matching the `git log --abbrev-commit` default.
const SHORT_SHA_LEN: usize = 7;

/// Handler for the `/github` command.
#[derive(Debug, Clone)]
pub struct GithubHandler {
    client: GithubClient,
}

impl GithubHandler {
    /// Creates a new handler.
    #[must_use]
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }

    /// Fetches and formats the latest commit of the tracked repository.
    ///
    /// Any failure degrades to a user-facing fallback message; errors
    /// are never propagated to the dispatcher.
    pub async fn handle(&self) -> String {
        match self.client.latest_commit().await {
            Ok(commit) => format_commit(&self.client.repo_slug(), self.client.branch(), &commit),
            Err(e) => {
                warn!("GitHub commit lookup failed: {}", e);
                LOOKUP_FAILED.to_owned()
            }
        }
    }
}

/// Formats commit metadata into a short human-readable summary.
fn format_commit(repo_slug: &str, branch: &str, commit: &CommitInfo) -> String {
    let short_sha = &commit.sha[..commit.sha.len().min(SHORT_SHA_LEN)];
    let subject = commit.commit.message.lines().next().unwrap_or("");

    let mut lines = vec![
        format!("📦 {repo_slug} ({branch})"),
        format!("Latest commit: {short_sha}"),
        format!("Message: {subject}"),
    ];

    if let Some(author) = &commit.commit.author {
        lines.push(format!("Author: {}", author.name));
        lines.push(format!("Date: {}", format_commit_date(&author.date)));
    }

    if let Some(url) = &commit.html_url {
        lines.push(url.clone());
    }

    lines.join("\n")
}

/// Reformats an ISO-8601 commit timestamp into a readable phrase,
/// falling back to the raw string if parsing fails.
fn format_commit_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_owned(),
        |date| {
            date.with_timezone(&Utc)
                .format("%-d %B %Y, %H:%M UTC")
                .to_string()
        },
    )
}
