//! Onboarding state machine — tracks which step the user is on and the
//! input collected so far.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::assessment::AssessmentResponses;
use super::model::MemoryPreference;

/// The screens of the first-run flow.
///
/// Progresses linearly: Welcome → Authentication → EmotionalAssessment →
/// MemoryPreference → PrivacyConsent. Completion is a flag on the state,
/// not a further step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    Welcome,
    Authentication,
    EmotionalAssessment,
    MemoryPreference,
    PrivacyConsent,
}

impl OnboardingStep {
    /// All steps in flow order.
    pub const ALL: [OnboardingStep; 5] = [
        Self::Welcome,
        Self::Authentication,
        Self::EmotionalAssessment,
        Self::MemoryPreference,
        Self::PrivacyConsent,
    ];

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        use OnboardingStep::*;
        matches!(
            (self, target),
            (Welcome, Authentication)
                | (Authentication, EmotionalAssessment)
                | (EmotionalAssessment, MemoryPreference)
                | (MemoryPreference, PrivacyConsent)
        )
    }

    /// Whether this is the last step (its completion finishes onboarding).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PrivacyConsent)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Welcome => Some(Authentication),
            Authentication => Some(EmotionalAssessment),
            EmotionalAssessment => Some(MemoryPreference),
            MemoryPreference => Some(PrivacyConsent),
            PrivacyConsent => None,
        }
    }

    /// 0-based position in the flow.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::Authentication => "authentication",
            Self::EmotionalAssessment => "emotional_assessment",
            Self::MemoryPreference => "memory_preference",
            Self::PrivacyConsent => "privacy_consent",
        };
        write!(f, "{s}")
    }
}

/// Whether the authentication form creates an account or signs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    SignUp,
    SignIn,
}

/// Everything collected during one onboarding session.
///
/// Passwords are held as [`SecretString`] so they never show up in debug
/// output; this type is not `Serialize`.
#[derive(Debug)]
pub struct OnboardingState {
    pub current_step: OnboardingStep,
    pub auth_mode: AuthMode,
    pub user_email: String,
    pub user_password: SecretString,
    pub password_confirmation: SecretString,
    pub assessment: AssessmentResponses,
    pub memory_preference: MemoryPreference,
    pub has_accepted_privacy_policy: bool,
    pub allows_notifications: bool,
    pub is_complete: bool,
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self {
            current_step: OnboardingStep::default(),
            auth_mode: AuthMode::default(),
            user_email: String::new(),
            user_password: SecretString::from(""),
            password_confirmation: SecretString::from(""),
            assessment: AssessmentResponses::default(),
            memory_preference: MemoryPreference::default(),
            has_accepted_privacy_policy: false,
            allows_notifications: false,
            is_complete: false,
        }
    }
}
