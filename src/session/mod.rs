//! Per-chat pagination sessions for search results.
//!
//! The store maps a chat identifier to the full result set fetched by
//! the last search plus the page currently being viewed. Everything is
//! process-memory-resident: nothing is persisted, and entries live
//! until they are replaced by a new search or explicitly cleared.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Number of records shown per rendered page.
pub const PAGE_SIZE: usize = 5;

/// Pagination state for one chat.
#[derive(Debug, Clone)]
struct SearchSession<T> {
    /// Full result set, fixed once fetched.
    results: Vec<T>,

    /// Zero-based page currently shown.
    page: usize,
}

impl<T: Clone> SearchSession<T> {
    /// Computes the rendering of the current page.
    fn view(&self) -> PageView<T> {
        let total = self.results.len();
        let start = self.page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(total);

        PageView {
            items: self.results[start..end].to_vec(),
            page: self.page,
            total_pages: total.div_ceil(PAGE_SIZE),
            total,
            has_prev: self.page > 0,
            has_next: end < total,
        }
    }

    /// Index of the last valid page.
    fn last_page(&self) -> usize {
        self.results.len().div_ceil(PAGE_SIZE).saturating_sub(1)
    }
}

/// One rendered page of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<T> {
    /// Records visible on this page.
    pub items: Vec<T>,

    /// Zero-based page index, clamped to the valid range.
    pub page: usize,

    /// Total number of pages.
    pub total_pages: usize,

    /// Total number of records in the session.
    pub total: usize,

    /// Whether a "previous" control applies.
    pub has_prev: bool,

    /// Whether a "next" control applies.
    pub has_next: bool,
}

/// Shared store of pagination sessions, keyed by chat identifier.
///
/// Cloning the store is cheap; all clones share the same map. There is
/// no eviction: a chat's entry stays until it is replaced or cleared.
#[derive(Debug)]
pub struct SessionStore<T> {
    sessions: Arc<RwLock<HashMap<i64, SearchSession<T>>>>,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<T: Clone> SessionStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Starts a session with a freshly fetched result set and returns
    /// the first page.
    ///
    /// Returns `None` for an empty result set: no session is created
    /// and any previous session of the chat is dropped, so superseded
    /// results cannot resurface through old pagination buttons.
    pub async fn start(&self, chat_id: i64, results: Vec<T>) -> Option<PageView<T>> {
        if results.is_empty() {
            self.sessions.write().await.remove(&chat_id);
            return None;
        }

        let session = SearchSession { results, page: 0 };
        let view = session.view();
        self.sessions.write().await.insert(chat_id, session);
        Some(view)
    }

    /// Moves the chat's session to the requested page and returns the
    /// new view.
    ///
    /// The requested page is clamped to `[0, last_page]`; a delayed or
    /// crafted callback can therefore never render an empty slice.
    /// Returns `None` if the chat has no session (e.g. after a process
    /// restart).
    pub async fn change_page(&self, chat_id: i64, requested: usize) -> Option<PageView<T>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&chat_id)?;
        session.page = requested.min(session.last_page());
        Some(session.view())
    }

    /// Returns the current page of the chat's session, if any.
    pub async fn current(&self, chat_id: i64) -> Option<PageView<T>> {
        self.sessions.read().await.get(&chat_id).map(SearchSession::view)
    }

    /// Drops the session of the given chat.
    pub async fn clear(&self, chat_id: i64) {
        self.sessions.write().await.remove(&chat_id);
    }
}

impl<T: Clone> Default for SessionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: i64 = 42;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[tokio::test]
    async fn start_with_empty_results_creates_no_session() {
        let store = SessionStore::new();
        assert!(store.start(CHAT, Vec::<usize>::new()).await.is_none());
        assert!(store.current(CHAT).await.is_none());
    }

    #[tokio::test]
    async fn start_with_empty_results_drops_previous_session() {
        let store = SessionStore::new();
        store.start(CHAT, numbers(7)).await.unwrap();

        assert!(store.start(CHAT, Vec::new()).await.is_none());
        assert!(store.change_page(CHAT, 0).await.is_none());
    }

    #[tokio::test]
    async fn start_renders_first_page() {
        let store = SessionStore::new();
        let view = store.start(CHAT, numbers(12)).await.unwrap();

        assert_eq!(view.items, vec![0, 1, 2, 3, 4]);
        assert_eq!(view.page, 0);
        assert_eq!(view.total_pages, 3);
        assert!(!view.has_prev);
        assert!(view.has_next);
    }

    #[tokio::test]
    async fn change_page_slices_correctly() {
        let store = SessionStore::new();
        store.start(CHAT, numbers(12)).await.unwrap();

        let middle = store.change_page(CHAT, 1).await.unwrap();
        assert_eq!(middle.items, vec![5, 6, 7, 8, 9]);
        assert!(middle.has_prev);
        assert!(middle.has_next);

        let last = store.change_page(CHAT, 2).await.unwrap();
        assert_eq!(last.items, vec![10, 11]);
        assert!(last.has_prev);
        assert!(!last.has_next);
    }

    #[tokio::test]
    async fn change_page_without_session_returns_none() {
        let store = SessionStore::<usize>::new();
        assert!(store.change_page(CHAT, 1).await.is_none());
    }

    #[tokio::test]
    async fn change_page_clamps_out_of_range_requests() {
        let store = SessionStore::new();
        store.start(CHAT, numbers(12)).await.unwrap();

        let view = store.change_page(CHAT, 99).await.unwrap();
        assert_eq!(view.page, 2);
        assert_eq!(view.items, vec![10, 11]);
    }

    #[tokio::test]
    async fn change_page_is_idempotent() {
        let store = SessionStore::new();
        store.start(CHAT, numbers(12)).await.unwrap();

        let first = store.change_page(CHAT, 1).await.unwrap();
        let second = store.change_page(CHAT, 1).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn exact_page_boundary_has_no_next() {
        let store = SessionStore::new();
        let view = store.start(CHAT, numbers(5)).await.unwrap();

        assert_eq!(view.total_pages, 1);
        assert!(!view.has_next);
        assert!(!view.has_prev);
    }

    #[tokio::test]
    async fn sessions_are_independent_per_chat() {
        let store = SessionStore::new();
        store.start(1, numbers(12)).await.unwrap();
        store.start(2, numbers(12)).await.unwrap();

        store.change_page(1, 2).await.unwrap();
        let other = store.current(2).await.unwrap();
        assert_eq!(other.page, 0);
    }

    #[tokio::test]
    async fn clear_drops_the_session() {
        let store = SessionStore::new();
        store.start(CHAT, numbers(12)).await.unwrap();

        store.clear(CHAT).await;
        assert!(store.current(CHAT).await.is_none());
    }
}
