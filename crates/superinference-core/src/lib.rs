//! Platform-independent building blocks for profile inference.
//!
//! Holds the environment-driven configuration, the [`AccessLevel`] threaded
//! through every pass, the page stream and its stop policy ([`Sentinel`]),
//! and the accumulators that fold raw records into summary statistics.

pub mod access;
pub mod aggregate;
pub mod app_config;
pub mod completion;
pub mod config;
pub mod error;
pub mod page;
pub mod ranked;
pub mod sentinel;

pub use access::AccessLevel;
pub use aggregate::{
    round3, DayMonthHistogram, DualWindow, OwnerAttribution, OwnerKind, Tally, TopN,
};
pub use app_config::{AppConfig, DEFAULT_KEYWORDS_URL};
pub use completion::{Completion, CompletionFlagged};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use page::{Page, Pages};
pub use ranked::Ranked;
pub use sentinel::{should_stop, Sentinel, Stop, StopReason};
