//! Multi-page fold loops for `GithubClient`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use superinference_core::{Completion, Page, Pages, Stop, StopReason};

use crate::error::GithubError;

use super::GithubClient;

/// How a paginated pass ended.
#[derive(Debug)]
pub struct ListingOutcome {
    /// Sentinel decision; `None` when the pass was aborted by `error`.
    pub stop: Option<Stop>,
    /// Records folded into the caller's accumulators.
    pub folded: usize,
    pub error: Option<GithubError>,
}

impl ListingOutcome {
    /// A pass that was never started because an earlier pass spent the quota.
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            stop: Some(Stop {
                reason: StopReason::RateLimited,
                truncated: true,
            }),
            folded: 0,
            error: None,
        }
    }

    fn exhausted() -> Self {
        Self {
            stop: Some(Stop {
                reason: StopReason::Exhausted,
                truncated: false,
            }),
            folded: 0,
            error: None,
        }
    }

    #[must_use]
    pub fn completion(&self) -> Completion {
        Completion::from_stop(self.stop, self.folded)
    }

    /// `true` when the upstream quota stopped the pass; later passes skip.
    #[must_use]
    pub fn rate_limited(&self) -> bool {
        self.stop.is_some_and(|s| s.reason == StopReason::RateLimited)
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// Logs how the pass ended and hands the outcome back.
    #[must_use]
    pub fn logged(self, source: &str) -> Self {
        self.log(source);
        self
    }

    fn log(&self, source: &str) {
        match (&self.error, self.stop) {
            (Some(e), _) => {
                tracing::warn!(source, folded = self.folded, error = %e, "pass aborted; section degraded");
            }
            (None, Some(stop)) if stop.truncated => {
                tracing::warn!(source, folded = self.folded, reason = %stop.reason, "pass truncated");
            }
            (None, _) => {
                tracing::debug!(source, folded = self.folded, "pass complete");
            }
        }
    }
}

impl GithubClient {
    /// Walks a `Link`-paginated listing from `first_url`, decoding each record
    /// as `T` and handing it to `fold`.
    ///
    /// Malformed records are skipped with a warning. The walk stops on
    /// exhaustion, a rate limit, `hard_cap` pages, or the first transport
    /// error, which is returned in the outcome rather than propagated.
    pub async fn fold_listing<T, F>(&self, first_url: &str, hard_cap: usize, mut fold: F) -> ListingOutcome
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        let mut pages = Pages::new(
            |cursor: Option<String>| {
                let url = cursor.unwrap_or_else(|| first_url.to_owned());
                async move { self.fetch_page(&url).await }
            },
            Some(hard_cap),
        );

        let mut folded = 0;
        let mut error = None;
        while let Some(batch) = pages.next_page().await {
            match batch {
                Ok(records) => {
                    for raw in records {
                        match serde_json::from_value::<T>(raw) {
                            Ok(record) => {
                                fold(record);
                                folded += 1;
                            }
                            Err(e) => {
                                tracing::warn!(url = first_url, error = %e, "skipping malformed record");
                            }
                        }
                    }
                }
                Err(e) => error = Some(e),
            }
        }

        ListingOutcome {
            stop: pages.stop(),
            folded,
            error,
        }
        .logged(first_url)
    }

    /// Fetches the first page of each URL in turn, handing every raw record
    /// to `fold` together with the index of the URL it came from.
    ///
    /// The URLs form one page stream: a rate limit on any of them stops the
    /// walk and leaves the rest unfetched.
    pub async fn fold_each<F>(&self, source: &str, urls: &[String], mut fold: F) -> ListingOutcome
    where
        F: FnMut(usize, Value),
    {
        if urls.is_empty() {
            return ListingOutcome::exhausted().logged(source);
        }

        let mut pages = Pages::new(
            |cursor: Option<String>| {
                let index = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
                let next = (index + 1 < urls.len()).then(|| (index + 1).to_string());
                let url = urls.get(index).cloned();
                async move {
                    let Some(url) = url else {
                        return Ok(Page::new(Vec::new(), None, false));
                    };
                    self.fetch_page(&url)
                        .await
                        .map(|page| page.continue_at(next).map(|raw| (index, raw)))
                }
            },
            None,
        );

        let mut folded = 0;
        let mut error = None;
        while let Some(batch) = pages.next_page().await {
            match batch {
                Ok(records) => {
                    for (index, raw) in records {
                        fold(index, raw);
                        folded += 1;
                    }
                }
                Err(e) => error = Some(e),
            }
        }

        ListingOutcome {
            stop: pages.stop(),
            folded,
            error,
        }
        .logged(source)
    }
}
