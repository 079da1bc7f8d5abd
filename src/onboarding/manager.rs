//! OnboardingManager — shares one coordinator with the HTTP layer and hands
//! the finished profile to the store.

use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::DesignVariant;
use crate::error::{DatabaseError, StepError};
use crate::store::Database;

use super::assessment::QUESTION_COUNT;
use super::coordinator::{Advance, OnboardingCoordinator};
use super::model::{MemoryPreference, OnboardingProfile, settings_keys};
use super::state::{AuthMode, OnboardingStep};

/// Serializes access to a single [`OnboardingCoordinator`].
pub struct OnboardingManager {
    db: Arc<dyn Database>,
    coordinator: RwLock<OnboardingCoordinator>,
    design: DesignVariant,
}

/// Partial credential update; absent fields are left untouched.
#[derive(Debug, Default)]
pub struct CredentialsUpdate {
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub password_confirmation: Option<SecretString>,
    pub mode: Option<AuthMode>,
}

impl OnboardingManager {
    pub fn new(db: Arc<dyn Database>, design: DesignVariant) -> Self {
        Self {
            db,
            coordinator: RwLock::new(OnboardingCoordinator::new()),
            design,
        }
    }

    pub async fn current_step(&self) -> OnboardingStep {
        self.coordinator.read().await.current_step()
    }

    pub async fn update_credentials(&self, update: CredentialsUpdate) -> Result<(), StepError> {
        let mut c = self.coordinator.write().await;
        if let Some(email) = update.email {
            c.set_email(email.trim())?;
        }
        if let Some(password) = update.password {
            c.set_password(password)?;
        }
        if let Some(confirmation) = update.password_confirmation {
            c.set_password_confirmation(confirmation)?;
        }
        if let Some(mode) = update.mode {
            c.set_auth_mode(mode)?;
        }
        Ok(())
    }

    pub async fn set_response(&self, question: usize, rating: u8) -> Result<(), StepError> {
        self.coordinator.write().await.set_response(question, rating)
    }

    pub async fn skip_question(&self) -> Result<(), StepError> {
        self.coordinator.write().await.skip_question()
    }

    pub async fn next_question(&self) -> Result<(), StepError> {
        self.coordinator.write().await.next_question()
    }

    pub async fn set_memory_preference(&self, preference: MemoryPreference) -> Result<(), StepError> {
        self.coordinator.write().await.set_memory_preference(preference)
    }

    pub async fn update_consent(
        &self,
        privacy_accepted: Option<bool>,
        notifications: Option<bool>,
    ) -> Result<(), StepError> {
        let mut c = self.coordinator.write().await;
        if let Some(accepted) = privacy_accepted {
            c.set_privacy_accepted(accepted)?;
        }
        if let Some(allows) = notifications {
            c.set_allows_notifications(allows)?;
        }
        Ok(())
    }

    /// Advance the flow. On completion the profile is persisted; a store
    /// failure is logged and does not undo completion.
    pub async fn advance(&self) -> Result<Advance, StepError> {
        let (outcome, profile) = {
            let mut c = self.coordinator.write().await;
            let outcome = c.advance()?;
            (outcome, c.profile())
        };

        if let (Advance::Completed, Some(profile)) = (outcome, profile) {
            if let Err(e) = self.persist_profile(&profile).await {
                tracing::warn!(email = %profile.email, error = %e, "Failed to persist onboarding profile");
            }
        }

        Ok(outcome)
    }

    pub async fn reset(&self) {
        self.coordinator.write().await.reset();
    }

    /// Read back a profile handed off by an earlier session.
    pub async fn stored_profile(&self, email: &str) -> crate::error::Result<Option<OnboardingProfile>> {
        let Some(value) = self
            .db
            .get_setting(email, settings_keys::ONBOARDING_PROFILE)
            .await?
        else {
            return Ok(None);
        };
        let profile = serde_json::from_value(value)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        Ok(Some(profile))
    }

    async fn persist_profile(&self, profile: &OnboardingProfile) -> Result<(), DatabaseError> {
        let value = serde_json::to_value(profile)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        self.db
            .set_setting(&profile.email, settings_keys::ONBOARDING_PROFILE, &value)
            .await?;
        tracing::info!(email = %profile.email, "Onboarding profile stored");
        Ok(())
    }

    /// Snapshot for the presentation layer.
    pub async fn status(&self) -> OnboardingStatus {
        let c = self.coordinator.read().await;
        let state = c.state();
        OnboardingStatus {
            step: state.current_step,
            step_index: state.current_step.index(),
            step_count: OnboardingStep::ALL.len(),
            is_complete: state.is_complete,
            pending: c
                .check_step()
                .err()
                .filter(|_| !state.is_complete)
                .map(|e| e.code()),
            design: self.design,
            auth_mode: state.auth_mode,
            email: state.user_email.clone(),
            assessment: AssessmentStatus {
                current_question: state.assessment.current_question(),
                question_count: QUESTION_COUNT,
                responses: *state.assessment.responses(),
                all_answered: state.assessment.all_answered(),
                all_visited: state.assessment.all_visited(),
            },
            memory_preference: state.memory_preference,
            has_accepted_privacy_policy: state.has_accepted_privacy_policy,
            allows_notifications: state.allows_notifications,
        }
    }
}

/// Onboarding status returned by the REST endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    pub step: OnboardingStep,
    pub step_index: usize,
    pub step_count: usize,
    pub is_complete: bool,
    /// Code of the first unmet requirement of the current step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<&'static str>,
    pub design: DesignVariant,
    pub auth_mode: AuthMode,
    pub email: String,
    pub assessment: AssessmentStatus,
    pub memory_preference: MemoryPreference,
    pub has_accepted_privacy_policy: bool,
    pub allows_notifications: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatus {
    pub current_question: usize,
    pub question_count: usize,
    pub responses: [Option<u8>; QUESTION_COUNT],
    pub all_answered: bool,
    pub all_visited: bool,
}
