//! Onboarding system — the first-run flow.
//!
//! A new user walks through five fixed steps: welcome, account
//! authentication, a short emotional assessment, a memory-retention choice
//! and privacy consent. The coordinator validates each step before moving
//! on; once consent is given the collected profile is handed to the store.

pub mod assessment;
pub mod coordinator;
pub mod manager;
pub mod model;
pub mod routes;
pub mod state;

pub use assessment::{AssessmentQuestion, AssessmentResponses, QUESTIONS, QUESTION_COUNT};
pub use coordinator::{Advance, OnboardingCoordinator};
pub use manager::{CredentialsUpdate, OnboardingManager, OnboardingStatus};
pub use model::{MemoryPreference, OnboardingProfile};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use state::{AuthMode, OnboardingState, OnboardingStep};
