//! GitHub profile and repository inference.
//!
//! [`GithubClient`] wraps the REST and GraphQL APIs with rate-limit aware
//! pagination; [`GithubProfile`] and [`GithubRepo`] run the inference passes
//! on top of it.

pub mod client;
pub mod error;
pub mod pagination;
pub mod profile;
pub mod rate_limit;
pub mod repo;
pub mod types;

pub use client::{GithubClient, ListingOutcome, EVENTS_PAGE_CAP, PER_PAGE, SEARCH_PAGE_CAP};
pub use error::GithubError;
pub use profile::{GithubProfile, InferenceParams, InferredProfile};
pub use repo::{ContributorShare, GithubRepo, RepoInference};
