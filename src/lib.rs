//! Mindful Onboarding — first-run flow for the mindfulness companion app.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod store;
