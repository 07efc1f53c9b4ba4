//! Cat facts command handler.

use tracing::warn;

use crate::api::CatFactsClient;

/// Smallest number of facts served per command.
const MIN_FACTS: i64 = 1;

/// Largest number of facts served per command.
const MAX_FACTS: i64 = 10;

/// Fallback line for one failed fetch.
const FACT_FAILED: &str = "Failed to fetch a cat fact.";

/// Reply used when not a single fact could be produced.
const NO_FACTS: &str = "Could not fetch any cat facts.";

/// Handler for the `/catfacts [n]` command.
#[derive(Debug, Clone)]
pub struct CatFactsHandler {
    client: CatFactsClient,
}

impl CatFactsHandler {
    /// Creates a new handler.
    #[must_use]
    pub fn new(client: CatFactsClient) -> Self {
        Self { client }
    }

    /// Fetches the requested number of facts and joins them into one
    /// message.
    ///
    /// Each fact is fetched independently; a failed fetch degrades to
    /// a fallback line instead of failing the whole batch.
    pub async fn handle(&self, arg: Option<&str>) -> String {
        let count = parse_count(arg);

        let mut facts = Vec::with_capacity(count);
        for _ in 0..count {
            match self.client.random_fact().await {
                Ok(fact) => facts.push(fact),
                Err(e) => {
                    warn!("Failed to fetch a cat fact: {}", e);
                    facts.push(FACT_FAILED.to_owned());
                }
            }
        }

        if facts.is_empty() {
            NO_FACTS.to_owned()
        } else {
            facts.join("\n\n")
        }
    }
}

/// Parses the requested fact count from the command argument.
///
/// Missing or non-numeric input defaults to one fact; numeric input is
/// clamped to `[1, 10]`.
fn parse_count(arg: Option<&str>) -> usize {
    let requested = arg
        .and_then(|s| s.split_whitespace().next())
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(MIN_FACTS);

    usize::try_from(requested.clamp(MIN_FACTS, MAX_FACTS)).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn handler(server: &MockServer) -> CatFactsHandler {
        CatFactsHandler::new(
            CatFactsClient::new(reqwest::Client::new())
                .with_base_url(format!("http://{}/fact", server.address())),
        )
    }

    #[test]
    fn test_parse_count_defaults_to_one() {
        assert_eq!(parse_count(None), 1);
        assert_eq!(parse_count(Some("")), 1);
        assert_eq!(parse_count(Some("abc")), 1);
    }

    #[test]
    fn test_parse_count_clamps_to_range() {
        assert_eq!(parse_count(Some("15")), 10);
        assert_eq!(parse_count(Some("0")), 1);
        assert_eq!(parse_count(Some("-3")), 1);
        assert_eq!(parse_count(Some("7")), 7);
    }

    #[test]
    fn test_parse_count_uses_first_token() {
        assert_eq!(parse_count(Some("5 extra words")), 5);
    }

    #[tokio::test]
    async fn handle_fetches_clamped_number_of_facts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/fact");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"fact":"Cats purr.","length":10}"#);
        });

        let text = handler(&server).handle(Some("15")).await;
        assert_eq!(text.split("\n\n").count(), 10);
        mock.assert_hits(10);
    }

    #[tokio::test]
    async fn handle_defaults_to_one_fact() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/fact");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"fact":"Cats purr.","length":10}"#);
        });

        let text = handler(&server).handle(None).await;
        assert_eq!(text, "Cats purr.");
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn handle_isolates_failures_per_fact() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/fact");
            then.status(500);
        });

        let text = handler(&server).handle(Some("3")).await;
        let lines: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| *line == FACT_FAILED));
    }
}
