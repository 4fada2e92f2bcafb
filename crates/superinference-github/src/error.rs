use thiserror::Error;

/// Errors returned by the GitHub client and inference passes.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required request was refused by the upstream rate limiter.
    #[error("API rate limit exceeded for {url}; supply an access token or try again later")]
    RateLimited { url: String },

    #[error("requested data is unavailable: {url}")]
    NotFound { url: String },

    /// The access token was rejected.
    #[error("access token rejected by {url}")]
    Unauthorized { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The GraphQL endpoint requires an access token.
    #[error("GraphQL queries require an access token")]
    TokenRequired,

    #[error("GraphQL API query error: {0}")]
    Graphql(String),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
