//! OnboardingCoordinator — owns the onboarding state, validates each step
//! and moves the flow forward.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::error::StepError;

use super::model::{MemoryPreference, OnboardingProfile};
use super::state::{AuthMode, OnboardingState, OnboardingStep};

/// Outcome of a successful [`OnboardingCoordinator::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The flow moved to this step.
    Moved(OnboardingStep),
    /// The terminal step was accepted; onboarding is finished.
    Completed,
}

/// Drives one onboarding session.
///
/// All mutation goes through this type. It does no I/O and holds no locks;
/// callers that share it across tasks wrap it themselves.
#[derive(Debug, Default)]
pub struct OnboardingCoordinator {
    state: OnboardingState,
    /// Captured when the last step is accepted.
    completed: Option<OnboardingProfile>,
}

impl OnboardingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> OnboardingStep {
        self.state.current_step
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    // ── Inputs ──────────────────────────────────────────────────────
    //
    // Every input is refused with `AlreadyComplete` once onboarding has
    // finished, so the handed-off profile always matches what was validated.

    fn ensure_open(&self) -> Result<(), StepError> {
        if self.state.is_complete {
            debug!("Onboarding input rejected after completion");
            return Err(StepError::AlreadyComplete);
        }
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.user_email = email.into();
        Ok(())
    }

    pub fn set_password(&mut self, password: SecretString) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.user_password = password;
        Ok(())
    }

    pub fn set_password_confirmation(&mut self, confirmation: SecretString) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.password_confirmation = confirmation;
        Ok(())
    }

    pub fn set_auth_mode(&mut self, mode: AuthMode) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.auth_mode = mode;
        Ok(())
    }

    pub fn set_response(&mut self, question: usize, rating: u8) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.assessment.set_response(question, rating)
    }

    pub fn skip_question(&mut self) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.assessment.skip();
        Ok(())
    }

    pub fn next_question(&mut self) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.assessment.next_question();
        Ok(())
    }

    pub fn set_memory_preference(&mut self, preference: MemoryPreference) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.memory_preference = preference;
        Ok(())
    }

    pub fn set_privacy_accepted(&mut self, accepted: bool) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.has_accepted_privacy_policy = accepted;
        Ok(())
    }

    pub fn set_allows_notifications(&mut self, allows: bool) -> Result<(), StepError> {
        self.ensure_open()?;
        self.state.allows_notifications = allows;
        Ok(())
    }

    // ── Flow ────────────────────────────────────────────────────────

    /// Report the first unmet requirement of the current step, if any.
    pub fn check_step(&self) -> Result<(), StepError> {
        if self.state.is_complete {
            return Err(StepError::AlreadyComplete);
        }

        let state = &self.state;
        match state.current_step {
            OnboardingStep::Welcome | OnboardingStep::MemoryPreference => Ok(()),
            OnboardingStep::Authentication => {
                if state.user_email.is_empty() {
                    return Err(StepError::EmptyEmail);
                }
                let password = state.user_password.expose_secret();
                if password.is_empty() {
                    return Err(StepError::EmptyPassword);
                }
                if state.auth_mode == AuthMode::SignUp
                    && password != state.password_confirmation.expose_secret()
                {
                    return Err(StepError::PasswordMismatch);
                }
                Ok(())
            }
            OnboardingStep::EmotionalAssessment => {
                if state.assessment.all_visited() {
                    Ok(())
                } else {
                    Err(StepError::AssessmentIncomplete {
                        remaining: state.assessment.remaining(),
                    })
                }
            }
            OnboardingStep::PrivacyConsent => {
                if state.has_accepted_privacy_policy {
                    Ok(())
                } else {
                    Err(StepError::PrivacyNotAccepted)
                }
            }
        }
    }

    /// Move to the next step, or finish onboarding from the last one.
    ///
    /// On error nothing changes; the caller fixes the input and retries.
    pub fn advance(&mut self) -> Result<Advance, StepError> {
        let from = self.state.current_step;
        if let Err(e) = self.check_step() {
            debug!(step = %from, reason = e.code(), "Onboarding advance rejected");
            return Err(e);
        }

        match from.next() {
            Some(next) => {
                debug_assert!(from.can_transition_to(next));
                self.state.current_step = next;
                debug!(from = %from, to = %next, "Onboarding step advanced");
                Ok(Advance::Moved(next))
            }
            None => {
                self.state.is_complete = true;
                self.completed = Some(self.snapshot(Utc::now()));
                info!(
                    memory_preference = %self.state.memory_preference,
                    answered = self.state.assessment.answered_count(),
                    "Onboarding complete"
                );
                Ok(Advance::Completed)
            }
        }
    }

    /// Discard everything collected and start over at `Welcome`.
    pub fn reset(&mut self) {
        debug!(step = %self.state.current_step, "Onboarding reset");
        *self = Self::default();
    }

    /// The hand-off record, available once onboarding is complete.
    pub fn profile(&self) -> Option<OnboardingProfile> {
        self.completed.clone()
    }

    fn snapshot(&self, completed_at: DateTime<Utc>) -> OnboardingProfile {
        OnboardingProfile {
            email: self.state.user_email.clone(),
            auth_mode: self.state.auth_mode,
            assessment: *self.state.assessment.responses(),
            memory_preference: self.state.memory_preference,
            allows_notifications: self.state.allows_notifications,
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::onboarding::assessment::QUESTION_COUNT;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    fn at_authentication() -> OnboardingCoordinator {
        let mut c = OnboardingCoordinator::new();
        assert_eq!(c.advance(), Ok(Advance::Moved(OnboardingStep::Authentication)));
        c
    }

    fn with_credentials(c: &mut OnboardingCoordinator) {
        c.set_email("a@b.com").unwrap();
        c.set_password(secret("x")).unwrap();
        c.set_password_confirmation(secret("x")).unwrap();
    }

    fn at_privacy_consent() -> OnboardingCoordinator {
        let mut c = at_authentication();
        with_credentials(&mut c);
        c.advance().unwrap();
        for i in 0..QUESTION_COUNT {
            c.set_response(i, 3).unwrap();
        }
        c.advance().unwrap();
        c.advance().unwrap();
        assert_eq!(c.current_step(), OnboardingStep::PrivacyConsent);
        c
    }

    #[test]
    fn welcome_advances_unconditionally() {
        let c = at_authentication();
        assert_eq!(c.current_step(), OnboardingStep::Authentication);
        assert!(!c.is_complete());
    }

    #[test]
    fn empty_email_blocks_repeatedly() {
        let mut c = at_authentication();
        c.set_password(secret("pw")).unwrap();
        c.set_password_confirmation(secret("pw")).unwrap();
        for _ in 0..3 {
            assert_eq!(c.advance(), Err(StepError::EmptyEmail));
            assert_eq!(c.current_step(), OnboardingStep::Authentication);
        }
    }

    #[test]
    fn empty_password_blocks() {
        let mut c = at_authentication();
        c.set_email("a@b.com").unwrap();
        assert_eq!(c.advance(), Err(StepError::EmptyPassword));
        assert_eq!(c.current_step(), OnboardingStep::Authentication);
    }

    #[test]
    fn mismatched_confirmation_blocks_then_matching_succeeds() {
        let mut c = at_authentication();
        c.set_email("a@b.com").unwrap();
        c.set_password(secret("abc123")).unwrap();
        c.set_password_confirmation(secret("abc124")).unwrap();
        assert_eq!(c.advance(), Err(StepError::PasswordMismatch));
        assert_eq!(c.current_step(), OnboardingStep::Authentication);

        c.set_password_confirmation(secret("abc123")).unwrap();
        assert_eq!(
            c.advance(),
            Ok(Advance::Moved(OnboardingStep::EmotionalAssessment))
        );
    }

    #[test]
    fn sign_in_ignores_confirmation() {
        let mut c = at_authentication();
        c.set_auth_mode(AuthMode::SignIn).unwrap();
        c.set_email("a@b.com").unwrap();
        c.set_password(secret("abc123")).unwrap();
        assert_eq!(
            c.advance(),
            Ok(Advance::Moved(OnboardingStep::EmotionalAssessment))
        );
    }

    #[test]
    fn assessment_requires_every_question_visited() {
        let mut c = at_authentication();
        with_credentials(&mut c);
        c.advance().unwrap();

        c.set_response(0, 4).unwrap();
        c.set_response(1, 2).unwrap();
        assert_eq!(
            c.advance(),
            Err(StepError::AssessmentIncomplete { remaining: 3 })
        );
        assert_eq!(c.current_step(), OnboardingStep::EmotionalAssessment);
    }

    #[test]
    fn fully_skipped_assessment_may_leave_step() {
        let mut c = at_authentication();
        with_credentials(&mut c);
        c.advance().unwrap();

        for _ in 0..QUESTION_COUNT {
            c.skip_question().unwrap();
        }
        assert!(!c.state().assessment.all_answered());
        assert_eq!(
            c.advance(),
            Ok(Advance::Moved(OnboardingStep::MemoryPreference))
        );
    }

    #[test]
    fn memory_preference_has_no_gate() {
        let mut c = at_authentication();
        with_credentials(&mut c);
        c.advance().unwrap();
        for _ in 0..QUESTION_COUNT {
            c.skip_question().unwrap();
        }
        c.advance().unwrap();
        c.set_memory_preference(MemoryPreference::SessionOnly).unwrap();
        assert_eq!(
            c.advance(),
            Ok(Advance::Moved(OnboardingStep::PrivacyConsent))
        );
        assert_eq!(c.state().memory_preference, MemoryPreference::SessionOnly);
    }

    #[test]
    fn privacy_consent_gates_completion() {
        let mut c = at_privacy_consent();
        assert_eq!(c.advance(), Err(StepError::PrivacyNotAccepted));
        assert!(!c.is_complete());
        assert_eq!(c.current_step(), OnboardingStep::PrivacyConsent);
        assert!(c.profile().is_none());

        c.set_privacy_accepted(true).unwrap();
        assert_eq!(c.advance(), Ok(Advance::Completed));
        assert!(c.is_complete());
        assert_eq!(c.current_step(), OnboardingStep::PrivacyConsent);
    }

    #[test]
    fn notifications_do_not_gate() {
        let mut c = at_privacy_consent();
        c.set_privacy_accepted(true).unwrap();
        c.set_allows_notifications(false).unwrap();
        assert_eq!(c.advance(), Ok(Advance::Completed));
    }

    #[test]
    fn completion_is_absorbing() {
        let mut c = at_privacy_consent();
        c.set_privacy_accepted(true).unwrap();
        c.advance().unwrap();
        let completed_at = c.profile().unwrap().completed_at;

        assert_eq!(c.advance(), Err(StepError::AlreadyComplete));
        assert!(c.is_complete());
        assert_eq!(c.current_step(), OnboardingStep::PrivacyConsent);
        assert_eq!(c.profile().unwrap().completed_at, completed_at);
    }

    #[test]
    fn inputs_are_refused_after_completion() {
        let mut c = at_privacy_consent();
        c.set_privacy_accepted(true).unwrap();
        c.advance().unwrap();
        let before = c.profile().unwrap();

        assert_eq!(c.set_email("other@x.com"), Err(StepError::AlreadyComplete));
        assert_eq!(c.set_password(secret("y")), Err(StepError::AlreadyComplete));
        assert_eq!(c.set_auth_mode(AuthMode::SignIn), Err(StepError::AlreadyComplete));
        assert_eq!(c.set_response(0, 1), Err(StepError::AlreadyComplete));
        assert_eq!(c.skip_question(), Err(StepError::AlreadyComplete));
        assert_eq!(c.next_question(), Err(StepError::AlreadyComplete));
        assert_eq!(
            c.set_memory_preference(MemoryPreference::SessionOnly),
            Err(StepError::AlreadyComplete)
        );
        assert_eq!(c.set_privacy_accepted(false), Err(StepError::AlreadyComplete));
        assert_eq!(c.set_allows_notifications(true), Err(StepError::AlreadyComplete));

        let state = c.state();
        assert_eq!(state.user_email, "a@b.com");
        assert!(state.has_accepted_privacy_policy);
        assert_eq!(state.assessment.responses(), &[Some(3); QUESTION_COUNT]);
        assert_eq!(c.profile(), Some(before));
    }

    #[test]
    fn inputs_are_accepted_again_after_reset() {
        let mut c = at_privacy_consent();
        c.set_privacy_accepted(true).unwrap();
        c.advance().unwrap();

        c.reset();
        assert_eq!(c.set_email("next@x.com"), Ok(()));
        assert_eq!(c.state().user_email, "next@x.com");
    }

    #[test]
    fn visits_steps_in_fixed_order() {
        let mut c = OnboardingCoordinator::new();
        let mut visited = vec![c.current_step()];
        with_credentials(&mut c);
        for i in 0..QUESTION_COUNT {
            c.set_response(i, 1).unwrap();
        }
        c.set_privacy_accepted(true).unwrap();

        loop {
            match c.advance().unwrap() {
                Advance::Moved(step) => visited.push(step),
                Advance::Completed => break,
            }
        }
        assert_eq!(visited, OnboardingStep::ALL.to_vec());
    }

    #[test]
    fn check_step_does_not_mutate() {
        let mut c = at_authentication();
        assert_eq!(c.check_step(), Err(StepError::EmptyEmail));
        with_credentials(&mut c);
        assert_eq!(c.check_step(), Ok(()));
        assert_eq!(c.current_step(), OnboardingStep::Authentication);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut c = at_privacy_consent();
        c.set_memory_preference(MemoryPreference::SevenDays).unwrap();
        c.set_allows_notifications(true).unwrap();
        c.set_privacy_accepted(true).unwrap();
        c.advance().unwrap();

        c.reset();
        let state = c.state();
        assert_eq!(c.current_step(), OnboardingStep::Welcome);
        assert!(!c.is_complete());
        assert!(state.user_email.is_empty());
        assert!(state.user_password.expose_secret().is_empty());
        assert!(state.password_confirmation.expose_secret().is_empty());
        assert_eq!(state.memory_preference, MemoryPreference::ThirtyDays);
        assert!(!state.has_accepted_privacy_policy);
        assert!(!state.allows_notifications);
        assert_eq!(state.assessment.responses(), &[None; QUESTION_COUNT]);
        assert!(c.profile().is_none());
    }

    #[test]
    fn end_to_end_scenario() {
        let mut c = OnboardingCoordinator::new();
        assert_eq!(c.current_step(), OnboardingStep::Welcome);

        assert_eq!(c.advance(), Ok(Advance::Moved(OnboardingStep::Authentication)));

        c.set_email("a@b.com").unwrap();
        c.set_password(secret("x")).unwrap();
        c.set_password_confirmation(secret("x")).unwrap();
        assert_eq!(
            c.advance(),
            Ok(Advance::Moved(OnboardingStep::EmotionalAssessment))
        );

        for i in 0..QUESTION_COUNT {
            c.set_response(i, 3).unwrap();
        }
        assert!(c.state().assessment.all_answered());
        assert_eq!(
            c.advance(),
            Ok(Advance::Moved(OnboardingStep::MemoryPreference))
        );

        assert_eq!(
            c.advance(),
            Ok(Advance::Moved(OnboardingStep::PrivacyConsent))
        );

        c.set_privacy_accepted(true).unwrap();
        assert_eq!(c.advance(), Ok(Advance::Completed));
        assert!(c.is_complete());

        let profile = c.profile().unwrap();
        assert_eq!(profile.email, "a@b.com");
        assert_eq!(profile.assessment, [Some(3); QUESTION_COUNT]);
        assert_eq!(profile.memory_preference, MemoryPreference::ThirtyDays);
        assert!(!profile.allows_notifications);
    }
}
