//! Search debouncer
//!
//! Turns a rapidly changing text input into at most one forward search per
//! quiet period. Short inputs never reach the provider, and search failures
//! only ever empty the result list.

use crate::error::Result;
use crate::geo::GeoBackend;
use crate::location::SearchResult;
use crate::picker::sequence::{Sequencer, Ticket};
use crate::picker::session::Shared;
use crate::picker::timer::DebounceTimer;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// True if `text` is long enough to be sent to the provider
pub fn is_searchable(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() >= min_chars
}

/// Query text, result list and the machinery that keeps them in step
#[derive(Debug)]
pub struct QueryState {
    text: String,
    searching: bool,
    results: Vec<SearchResult>,
    timer: DebounceTimer,
    sequence: Sequencer,
}

impl QueryState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            text: String::new(),
            searching: false,
            results: Vec::new(),
            timer: DebounceTimer::new(debounce),
            sequence: Sequencer::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True while a search request is outstanding
    pub fn searching(&self) -> bool {
        self.searching
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// True while a search is scheduled but has not fired yet
    pub fn is_scheduled(&self) -> bool {
        self.timer.is_armed()
    }

    /// Record a keystroke
    ///
    /// Cancels the pending timer. Returns true when a new search should be
    /// scheduled; too-short input clears the results and stops any
    /// outstanding search instead.
    pub fn update(&mut self, text: &str, min_chars: usize) -> bool {
        self.text = text.to_string();
        self.timer.cancel();

        if is_searchable(text, min_chars) {
            return true;
        }

        self.results.clear();
        self.searching = false;
        self.sequence.invalidate();
        false
    }

    /// Arm the debounce timer
    pub fn schedule<F>(&mut self, on_fire: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.timer.arm(on_fire);
    }

    /// Start a search for the text as it is now
    ///
    /// Returns None if the text is no longer searchable.
    pub fn begin_search(&mut self, min_chars: usize) -> Option<(Ticket, String)> {
        let query = self.text.trim();
        if !is_searchable(query, min_chars) {
            return None;
        }
        let query = query.to_string();
        let ticket = self.sequence.issue();
        self.searching = true;
        Some((ticket, query))
    }

    pub fn attach(&mut self, ticket: Ticket, handle: AbortHandle) {
        self.sequence.attach(ticket, handle);
    }

    /// Apply a search completion
    ///
    /// Stale completions are dropped. Returns true if the result list changed
    /// hands to this completion.
    pub fn finish_search(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<SearchResult>>,
        limit: usize,
    ) -> bool {
        if !self.sequence.accept(ticket) {
            return false;
        }
        self.searching = false;

        match outcome {
            Ok(mut results) => {
                results.truncate(limit);
                debug!(count = results.len(), "Search results received");
                self.results = results;
            }
            Err(e) => {
                warn!(error = %e, "Search failed; clearing results");
                self.results.clear();
            }
        }
        true
    }

    /// Clear text and results, cancel the timer and any outstanding search
    pub fn reset(&mut self) {
        self.text.clear();
        self.results.clear();
        self.searching = false;
        self.timer.cancel();
        self.sequence.invalidate();
    }

    /// Stop pending work without touching text or results
    pub fn halt(&mut self) {
        self.timer.cancel();
        self.sequence.invalidate();
        self.searching = false;
    }
}

/// Arm the debounce timer of a session to search when input goes quiet
pub(crate) fn schedule_search<B: GeoBackend>(shared: &Arc<Shared<B>>, query: &mut QueryState) {
    let weak = Arc::downgrade(shared);
    query.schedule(fire_search(weak));
}

/// Timer callback: issue exactly one search for the text at fire time
async fn fire_search<B: GeoBackend>(weak: Weak<Shared<B>>) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let mut state = shared.state.lock().await;

    let Some((ticket, query)) = state.query.begin_search(shared.settings.min_query_chars) else {
        return;
    };
    debug!(query = %query, ticket = ticket.seq(), "Issuing search");

    let backend = Arc::clone(&shared.backend);
    let weak = Arc::downgrade(&shared);
    let task = tokio::spawn(async move {
        let outcome = backend.search(&query).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let limit = shared.settings.result_limit;
        shared
            .state
            .lock()
            .await
            .query
            .finish_search(ticket, outcome, limit);
    });
    state.query.attach(ticket, task.abort_handle());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::location::AddressParts;

    fn candidate(name: &str) -> SearchResult {
        SearchResult {
            display_name: name.to_string(),
            lat: "19.0".to_string(),
            lon: "72.8".to_string(),
            address: AddressParts::default(),
        }
    }

    #[test]
    fn test_is_searchable() {
        assert!(!is_searchable("", 3));
        assert!(!is_searchable("ab", 3));
        assert!(!is_searchable("  ab  ", 3));
        assert!(is_searchable("abc", 3));
        assert!(is_searchable(" Mumbai ", 3));
        // characters, not bytes
        assert!(!is_searchable("मुं", 4));
        assert!(is_searchable("पुणे", 4));
    }

    #[tokio::test]
    async fn test_short_update_clears_results() {
        let mut query = QueryState::new(Duration::from_millis(500));
        let (ticket, _) = {
            query.update("Mumbai", 3);
            query.begin_search(3).unwrap()
        };
        assert!(query.finish_search(ticket, Ok(vec![candidate("Mumbai")]), 5));
        assert_eq!(query.results().len(), 1);

        assert!(!query.update("Mu", 3));
        assert!(query.results().is_empty());
        assert!(!query.searching());
        assert_eq!(query.text(), "Mu");
    }

    #[tokio::test]
    async fn test_short_update_drops_outstanding_search() {
        let mut query = QueryState::new(Duration::from_millis(500));
        query.update("Mumbai", 3);
        let (ticket, text) = query.begin_search(3).unwrap();
        assert_eq!(text, "Mumbai");
        assert!(query.searching());

        query.update("M", 3);
        assert!(!query.finish_search(ticket, Ok(vec![candidate("Mumbai")]), 5));
        assert!(query.results().is_empty());
    }

    #[tokio::test]
    async fn test_begin_search_uses_trimmed_current_text() {
        let mut query = QueryState::new(Duration::from_millis(500));
        query.update("Pun", 3);
        query.update("  Pune ", 3);

        let (_, text) = query.begin_search(3).unwrap();
        assert_eq!(text, "Pune");
    }

    #[tokio::test]
    async fn test_finish_search_truncates_and_replaces() {
        let mut query = QueryState::new(Duration::from_millis(500));
        query.update("Nagar", 3);
        let (ticket, _) = query.begin_search(3).unwrap();

        let many: Vec<_> = (0..8).map(|i| candidate(&format!("Nagar {}", i))).collect();
        assert!(query.finish_search(ticket, Ok(many), 5));

        assert_eq!(query.results().len(), 5);
        assert_eq!(query.results()[0].display_name, "Nagar 0");
        assert!(!query.searching());
    }

    #[tokio::test]
    async fn test_failed_search_clears_results() {
        let mut query = QueryState::new(Duration::from_millis(500));
        query.update("Mumbai", 3);
        let (first, _) = query.begin_search(3).unwrap();
        query.finish_search(first, Ok(vec![candidate("Mumbai")]), 5);

        let (second, _) = query.begin_search(3).unwrap();
        let failed = Err(Error::Network("timeout".to_string()));
        assert!(query.finish_search(second, failed, 5));

        assert!(query.results().is_empty());
        assert!(!query.searching());
    }

    #[tokio::test]
    async fn test_superseded_search_is_dropped() {
        let mut query = QueryState::new(Duration::from_millis(500));
        query.update("Thane", 3);
        let (a, _) = query.begin_search(3).unwrap();
        query.update("Thane West", 3);
        let (b, _) = query.begin_search(3).unwrap();

        assert!(query.finish_search(b, Ok(vec![candidate("Thane West")]), 5));
        assert!(!query.finish_search(a, Ok(vec![candidate("Thane")]), 5));

        assert_eq!(query.results()[0].display_name, "Thane West");
    }

    #[tokio::test]
    async fn test_reset() {
        let mut query = QueryState::new(Duration::from_millis(500));
        query.update("Mumbai", 3);
        query.schedule(async {});
        assert!(query.is_scheduled());

        query.reset();
        assert_eq!(query.text(), "");
        assert!(query.results().is_empty());
        assert!(!query.is_scheduled());
    }
}
