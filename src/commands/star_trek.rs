//! Star Trek movie search with paginated results.
//!
//! The only stateful feature: `/startrek` opens a small action menu,
//! the "list" action fetches the full result set once and pages
//! through it in memory, and the "info" action runs a one-shot title
//! search independent of pagination.

use tracing::warn;

use super::types::{Button, CallbackAction, Reply};
use crate::api::{Movie, StapiClient};
use crate::session::{PageView, SessionStore};

/// Namespace prefix for this feature's callback data.
pub const CALLBACK_NAMESPACE: &str = "startrek";

/// Title query used for the full movie list.
const LIST_QUERY: &str = "Star Trek";

/// Placeholder shown for absent optional fields.
const UNKNOWN: &str = "N/A";

const MENU_TEXT: &str = "Choose an action:";
const NO_MOVIES: &str = "No movies found.";
const FETCH_FAILED: &str = "⚠️ Failed to fetch movie information.";

/// Handler for the `/startrek` command and its callbacks.
#[derive(Debug, Clone)]
pub struct StarTrekHandler {
    client: StapiClient,
    sessions: SessionStore<Movie>,
}

impl StarTrekHandler {
    /// Prompt asking the user for a movie title.
    pub const INFO_PROMPT: &'static str = "Enter the title of a Star Trek movie:";

    /// Toast shown when a pagination button refers to a lost session.
    pub const STALE_SESSION: &'static str = "The data is stale, please repeat the request.";

    /// Creates a new handler.
    #[must_use]
    pub fn new(client: StapiClient, sessions: SessionStore<Movie>) -> Self {
        Self { client, sessions }
    }

    /// Builds the entry menu shown for `/startrek`.
    #[must_use]
    pub fn menu(&self) -> Reply {
        Reply::with_keyboard(
            MENU_TEXT,
            vec![vec![
                Button::new("📃 Movie list", CALLBACK_NAMESPACE, &CallbackAction::List),
                Button::new("ℹ️ Movie info", CALLBACK_NAMESPACE, &CallbackAction::Info),
            ]],
        )
    }

    /// Fetches the full movie list and renders the first page.
    ///
    /// An empty or failed fetch drops any previous session for the
    /// chat, so superseded results cannot resurface through pagination
    /// buttons on an earlier message.
    pub async fn list(&self, chat_id: i64) -> Reply {
        let movies = match self.client.search_movies(LIST_QUERY).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!("Star Trek movie search failed: {}", e);
                self.sessions.clear(chat_id).await;
                return Reply::text(FETCH_FAILED);
            }
        };

        match self.sessions.start(chat_id, movies).await {
            Some(view) => render_page(&view),
            None => Reply::text(NO_MOVIES),
        }
    }

    /// Moves the chat's session to the requested page.
    ///
    /// Returns `None` when the chat has no session; the caller answers
    /// with [`Self::STALE_SESSION`] in that case.
    pub async fn change_page(&self, chat_id: i64, page: usize) -> Option<Reply> {
        let view = self.sessions.change_page(chat_id, page).await?;
        Some(render_page(&view))
    }

    /// One-shot title search independent of pagination.
    ///
    /// Strips a trailing parenthesized year from the input, then
    /// prefers an exact case-insensitive title match over the first
    /// result.
    pub async fn movie_info(&self, title: &str) -> String {
        let query = strip_year_suffix(title.trim());

        let movies = match self.client.search_movies(query).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!("Star Trek movie info lookup failed: {}", e);
                return FETCH_FAILED.to_owned();
            }
        };

        match pick_best_match(&movies, query) {
            Some(movie) => format_movie_details(movie),
            None => format!("❌ Movie '{query}' not found."),
        }
    }
}

/// Picks the record whose title matches `query` case-insensitively,
/// falling back to the first result.
fn pick_best_match<'a>(movies: &'a [Movie], query: &str) -> Option<&'a Movie> {
    movies
        .iter()
        .find(|movie| {
            movie
                .title
                .as_deref()
                .is_some_and(|title| title.eq_ignore_ascii_case(query))
        })
        .or_else(|| movies.first())
}

/// Renders one page of the movie list with pagination controls.
fn render_page(view: &PageView<Movie>) -> Reply {
    let mut text = String::from("🎬 Star Trek movies:\n\n");
    for movie in &view.items {
        text.push_str(&format_movie_line(movie));
        text.push('\n');
    }
    text.push_str(&format!("\nPage {} of {}", view.page + 1, view.total_pages));

    let mut controls = Vec::new();
    if view.has_prev {
        controls.push(Button::new(
            "⬅️ Back",
            CALLBACK_NAMESPACE,
            &CallbackAction::Page(view.page - 1),
        ));
    }
    if view.has_next {
        controls.push(Button::new(
            "➡️ Next",
            CALLBACK_NAMESPACE,
            &CallbackAction::Page(view.page + 1),
        ));
    }

    if controls.is_empty() {
        Reply::text(text)
    } else {
        Reply::with_keyboard(text, vec![controls])
    }
}

/// Formats one list entry: title, first year and director.
fn format_movie_line(movie: &Movie) -> String {
    let title = movie.title.as_deref().unwrap_or(UNKNOWN);
    let year = movie
        .year_from
        .map_or_else(|| UNKNOWN.to_owned(), |year| year.to_string());
    let director = movie
        .main_director
        .as_ref()
        .and_then(|director| director.name.as_deref())
        .unwrap_or(UNKNOWN);

    format!("• {title} ({year}), dir. {director}")
}

/// Formats the detail card for one movie.
fn format_movie_details(movie: &Movie) -> String {
    let mut lines = vec![format!("🎬 {}", movie.title.as_deref().unwrap_or(UNKNOWN))];

    match (movie.year_from, movie.year_to) {
        (Some(from), Some(to)) if to != from => lines.push(format!("Years: {from} - {to}")),
        (Some(from), _) => lines.push(format!("Years: {from}")),
        (None, Some(to)) => lines.push(format!("Years: {to}")),
        (None, None) => {}
    }

    if let Some(name) = movie
        .main_director
        .as_ref()
        .and_then(|director| director.name.as_deref())
    {
        lines.push(format!("Director: {name}"));
    }

    if let Some(date) = movie.us_release_date.as_deref() {
        lines.push(format!("US release: {}", format_release_date(date)));
    }

    lines.join("\n")
}

/// Reformats an ISO `YYYY-MM-DD` date into a day-month-year phrase,
/// falling back to the raw string if parsing fails.
fn format_release_date(raw: &str) -> String {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_or_else(|_| raw.to_owned(), |date| date.format("%-d %B %Y").to_string())
}

/// Strips a trailing parenthesized year, e.g. `"First Contact (1996)"`.
fn strip_year_suffix(title: &str) -> &str {
    if let Some(rest) = title.strip_suffix(')')
        && let Some((head, year)) = rest.rsplit_once('(')
        && year.len() == 4
        && year.chars().all(|c| c.is_ascii_digit())
    {
        return head.trim_end();
    }
    title
}
