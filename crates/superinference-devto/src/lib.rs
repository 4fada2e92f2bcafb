//! Dev.to profile and article inference.

pub mod client;
pub mod error;
pub mod profile;
pub mod types;

pub use client::{DevtoClient, ARTICLES_PER_PAGE};
pub use error::DevtoError;
pub use profile::{
    ArticleHighlight, DevtoInferredProfile, DevtoParams, DevtoProfile, DevtoProfileSection,
    DevtoSkillSection, DevtoStatsSection, Engagement,
};
