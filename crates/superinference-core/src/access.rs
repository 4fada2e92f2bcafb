//! Access level computed once per inference call.

use serde::Serialize;

/// Whether an inference call runs with an access token.
///
/// Fields that need elevated access are produced through [`AccessLevel::gate`]
/// so that public calls emit `null` for them instead of dropping the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Public,
    Authenticated,
}

impl AccessLevel {
    /// Derives the access level from an optional token. Blank tokens count as absent.
    #[must_use]
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if !t.trim().is_empty() => Self::Authenticated,
            _ => Self::Public,
        }
    }

    #[must_use]
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Produces `value()` only for authenticated calls.
    pub fn gate<T>(self, value: impl FnOnce() -> T) -> Option<T> {
        match self {
            Self::Authenticated => Some(value()),
            Self::Public => None,
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessLevel::Public => write!(f, "public"),
            AccessLevel::Authenticated => write!(f, "authenticated"),
        }
    }
}
