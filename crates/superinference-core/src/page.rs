//! Pages of raw records and the bounded page stream that walks them.

use std::future::Future;

use crate::sentinel::{Sentinel, Stop};

/// One page of records returned by an upstream listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    /// Cursor for the following page; `None` when the listing is exhausted.
    pub next: Option<String>,
    /// The upstream refused the request or reported a spent quota.
    pub rate_limited: bool,
    /// The request itself was refused; no records were served.
    pub refused: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(records: Vec<T>, next: Option<String>, rate_limited: bool) -> Self {
        Self {
            records,
            next,
            rate_limited,
            refused: false,
        }
    }

    /// A request the upstream refused with a rate-limit response.
    ///
    /// The refused cursor is kept as `next`: data logically remains there.
    #[must_use]
    pub fn refused(cursor: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            next: Some(cursor.into()),
            rate_limited: true,
            refused: true,
        }
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    #[must_use]
    pub fn is_refused(&self) -> bool {
        self.refused
    }

    /// Replaces the continuation cursor unless the page was refused.
    ///
    /// A served page reporting a spent quota still takes `next`, even when
    /// it carried no records.
    #[must_use]
    pub fn continue_at(mut self, next: Option<String>) -> Self {
        if !self.is_refused() {
            self.next = next;
        }
        self
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            next: self.next,
            rate_limited: self.rate_limited,
            refused: self.refused,
        }
    }
}

/// A lazy, finite, non-restartable stream of pages under [`Sentinel`] control.
///
/// `fetch` receives `None` for the first page and the previous page's `next`
/// cursor afterwards. Once the sentinel stops the stream, or a fetch fails,
/// [`Pages::next_page`] returns `None` forever.
pub struct Pages<F> {
    fetch: F,
    sentinel: Sentinel,
    cursor: Option<String>,
    stop: Option<Stop>,
    failed: bool,
}

impl<F> Pages<F> {
    pub fn new(fetch: F, hard_cap: Option<usize>) -> Self {
        Self {
            fetch,
            sentinel: Sentinel::new(hard_cap),
            cursor: None,
            stop: None,
            failed: false,
        }
    }

    /// The stop decision, once the stream has ended normally.
    #[must_use]
    pub fn stop(&self) -> Option<Stop> {
        self.stop
    }

    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.sentinel.pages_fetched()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stop.is_some() || self.failed
    }

    /// Fetches the next page, returning its records.
    ///
    /// Returns `None` once the stream has ended. A fetch error is yielded
    /// once and ends the stream.
    pub async fn next_page<T, E, Fut>(&mut self) -> Option<Result<Vec<T>, E>>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>, E>>,
    {
        if self.is_finished() {
            return None;
        }

        match (self.fetch)(self.cursor.take()).await {
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
            Ok(page) => {
                self.stop = self.sentinel.observe(page.rate_limited, page.has_more());
                if let Some(stop) = self.stop {
                    tracing::debug!(
                        reason = %stop.reason,
                        truncated = stop.truncated,
                        pages = self.sentinel.pages_fetched(),
                        "page stream stopped"
                    );
                }
                self.cursor = page.next;
                Some(Ok(page.records))
            }
        }
    }
}
