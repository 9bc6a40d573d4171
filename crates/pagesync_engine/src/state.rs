//! Load-state machine for incremental page fetching.

use pagesync_protocol::PageCursor;

/// The current state of incremental loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// More pages may exist; a fetch is permitted.
    Idle,
    /// A page fetch is in flight.
    Fetching,
    /// The collection has been read to its end. Terminal.
    Exhausted,
    /// The last fetch failed; holds the failure reason.
    Errored(String),
}

impl LoadState {
    /// Returns true if a new fetch may start.
    pub fn can_fetch(&self) -> bool {
        matches!(self, LoadState::Idle)
    }

    /// Returns true if no further pages remain.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, LoadState::Exhausted)
    }

    /// Returns true if a fetch is currently in flight.
    pub fn is_fetching(&self) -> bool {
        matches!(self, LoadState::Fetching)
    }

    /// Returns the failure reason, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Errored(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Tracks how much of the remote collection has been fetched.
///
/// The tracker is the sole concurrency guard for page reads:
/// [`LoadTracker::begin_fetch`] is the only way to obtain a cursor, and it
/// hands one out only from `Idle`. Overlapping load requests therefore
/// collapse into a single outbound fetch.
#[derive(Debug)]
pub struct LoadTracker {
    state: LoadState,
    cursor: PageCursor,
}

impl LoadTracker {
    /// Creates a tracker positioned at page 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            state: LoadState::Idle,
            cursor: PageCursor::first(page_size),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Returns the cursor the next fetch would use.
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Requests permission to fetch the next page.
    ///
    /// Returns the cursor to fetch and moves to `Fetching`. From any state
    /// other than `Idle` this is a silent no-op returning `None` — the
    /// caller is expected to skip the fetch, not to fail.
    pub fn begin_fetch(&mut self) -> Option<PageCursor> {
        if !self.state.can_fetch() {
            return None;
        }
        self.state = LoadState::Fetching;
        Some(self.cursor)
    }

    /// Records a successful fetch of `fetched` records.
    ///
    /// A short page means the collection is exhausted (terminal); a full
    /// page returns to `Idle` with the cursor advanced. Returns true when
    /// the tracker is now exhausted. Ignored unless a fetch was in flight.
    pub fn complete_fetch(&mut self, fetched: usize) -> bool {
        if self.state.is_fetching() {
            if fetched < self.cursor.page_size as usize {
                self.state = LoadState::Exhausted;
            } else {
                self.state = LoadState::Idle;
                self.cursor = self.cursor.advanced();
            }
        }
        self.state.is_exhausted()
    }

    /// Records a failed fetch. The cursor is not advanced, so a later
    /// [`LoadTracker::retry`] re-requests the same page.
    pub fn fail_fetch(&mut self, reason: impl Into<String>) {
        if self.state.is_fetching() {
            self.state = LoadState::Errored(reason.into());
        }
    }

    /// Returns from `Errored` to `Idle` without advancing the cursor.
    ///
    /// Returns true if the tracker was in fact errored.
    pub fn retry(&mut self) -> bool {
        if matches!(self.state, LoadState::Errored(_)) {
            self.state = LoadState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let tracker = LoadTracker::new(10);
        assert_eq!(*tracker.state(), LoadState::Idle);
        assert_eq!(tracker.cursor(), PageCursor::first(10));
    }

    #[test]
    fn begin_fetch_only_from_idle() {
        let mut tracker = LoadTracker::new(10);

        let cursor = tracker.begin_fetch().unwrap();
        assert_eq!(cursor.page, 1);
        assert!(tracker.state().is_fetching());

        // A second request while fetching is a silent no-op
        assert!(tracker.begin_fetch().is_none());
        assert!(tracker.state().is_fetching());
    }

    #[test]
    fn full_page_advances_cursor() {
        let mut tracker = LoadTracker::new(10);
        tracker.begin_fetch().unwrap();

        let exhausted = tracker.complete_fetch(10);
        assert!(!exhausted);
        assert_eq!(*tracker.state(), LoadState::Idle);
        assert_eq!(tracker.cursor().page, 2);
    }

    #[test]
    fn short_page_exhausts() {
        let mut tracker = LoadTracker::new(10);
        tracker.begin_fetch().unwrap();

        let exhausted = tracker.complete_fetch(7);
        assert!(exhausted);
        assert!(tracker.state().is_exhausted());

        // Exhaustion is terminal
        assert!(tracker.begin_fetch().is_none());
        assert!(!tracker.retry());
    }

    #[test]
    fn empty_page_exhausts() {
        let mut tracker = LoadTracker::new(10);
        tracker.begin_fetch().unwrap();
        assert!(tracker.complete_fetch(0));
    }

    #[test]
    fn failure_keeps_cursor_for_retry() {
        let mut tracker = LoadTracker::new(10);
        tracker.begin_fetch().unwrap();
        tracker.complete_fetch(10);

        tracker.begin_fetch().unwrap();
        tracker.fail_fetch("connection reset");
        assert_eq!(tracker.state().error(), Some("connection reset"));

        // Errored blocks further fetches until retry()
        assert!(tracker.begin_fetch().is_none());

        assert!(tracker.retry());
        assert_eq!(*tracker.state(), LoadState::Idle);
        // Same page is re-requested
        assert_eq!(tracker.begin_fetch().unwrap().page, 2);
    }

    #[test]
    fn complete_without_fetch_is_ignored() {
        let mut tracker = LoadTracker::new(10);
        assert!(!tracker.complete_fetch(3));
        assert_eq!(*tracker.state(), LoadState::Idle);
        assert_eq!(tracker.cursor().page, 1);

        tracker.fail_fetch("late failure");
        assert_eq!(*tracker.state(), LoadState::Idle);
    }
}
