use thiserror::Error;

/// Errors returned by the Dev.to client and inference passes.
#[derive(Debug, Error)]
pub enum DevtoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// `GET /users/by_username` answered 404.
    #[error("invalid Dev.to username: {username}")]
    InvalidUsername { username: String },

    /// The profile request was refused by the upstream rate limiter.
    #[error("Dev.to rate limit exceeded for {url}; try again later")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
