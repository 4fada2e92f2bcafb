//! Completion flags attached to sections fed by truncatable pagination.

use crate::sentinel::Stop;

/// Whether a section's source pagination was cut short, and how many records
/// the section was inferred from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    pub incomplete: bool,
    pub count: usize,
}

impl Completion {
    #[must_use]
    pub fn complete(count: usize) -> Self {
        Self {
            incomplete: false,
            count,
        }
    }

    #[must_use]
    pub fn truncated(count: usize) -> Self {
        Self {
            incomplete: true,
            count,
        }
    }

    /// Completion of a pass that stopped with `stop` after folding `count` records.
    ///
    /// A pass that never reached a stop condition (aborted by an error) is
    /// reported as incomplete.
    #[must_use]
    pub fn from_stop(stop: Option<Stop>, count: usize) -> Self {
        match stop {
            Some(stop) if !stop.truncated => Self::complete(count),
            _ => Self::truncated(count),
        }
    }
}

/// Output sections that may carry a completion flag.
///
/// Sections with no paginated source return `None`.
pub trait CompletionFlagged {
    fn completion(&self) -> Option<Completion>;
}

/// Access-gated sections are `None` for public calls and carry no flag then.
impl<S: CompletionFlagged> CompletionFlagged for Option<S> {
    fn completion(&self) -> Option<Completion> {
        self.as_ref().and_then(CompletionFlagged::completion)
    }
}
