//! Memory preference and the profile handed off after onboarding.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::assessment::QUESTION_COUNT;
use super::state::AuthMode;

/// How long conversation and session data is retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPreference {
    #[serde(rename = "session_only")]
    SessionOnly,
    #[serde(rename = "7_days")]
    SevenDays,
    #[default]
    #[serde(rename = "30_days")]
    ThirtyDays,
}

impl MemoryPreference {
    pub const ALL: [MemoryPreference; 3] = [Self::SessionOnly, Self::SevenDays, Self::ThirtyDays];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SessionOnly => "Session Only",
            Self::SevenDays => "7 Days",
            Self::ThirtyDays => "30 Days",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SessionOnly => "Data is cleared after each session",
            Self::SevenDays => "Data is kept for 7 days",
            Self::ThirtyDays => "Data is kept for 30 days",
        }
    }

    /// Retention window, or `None` when data only lives for the session.
    pub fn retention(&self) -> Option<Duration> {
        match self {
            Self::SessionOnly => None,
            Self::SevenDays => Some(Duration::days(7)),
            Self::ThirtyDays => Some(Duration::days(30)),
        }
    }
}

impl std::fmt::Display for MemoryPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionOnly => write!(f, "session_only"),
            Self::SevenDays => write!(f, "7_days"),
            Self::ThirtyDays => write!(f, "30_days"),
        }
    }
}

/// Result of a finished onboarding session, handed to the profile store.
///
/// Stored in the `settings` table as JSON under key `"onboarding_profile"`.
/// Credentials are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingProfile {
    pub email: String,
    pub auth_mode: AuthMode,
    /// One entry per assessment question; `None` when skipped.
    pub assessment: [Option<u8>; QUESTION_COUNT],
    pub memory_preference: MemoryPreference,
    pub allows_notifications: bool,
    pub completed_at: DateTime<Utc>,
}

/// Settings keys used for onboarding persistence.
pub mod settings_keys {
    /// Key for the OnboardingProfile JSON blob in the settings table.
    pub const ONBOARDING_PROFILE: &str = "onboarding_profile";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_thirty_days() {
        assert_eq!(MemoryPreference::default(), MemoryPreference::ThirtyDays);
    }

    #[test]
    fn memory_preference_serde() {
        let session: MemoryPreference = serde_json::from_str("\"session_only\"").unwrap();
        assert_eq!(session, MemoryPreference::SessionOnly);

        let week: MemoryPreference = serde_json::from_str("\"7_days\"").unwrap();
        assert_eq!(week, MemoryPreference::SevenDays);

        let month: MemoryPreference = serde_json::from_str("\"30_days\"").unwrap();
        assert_eq!(month, MemoryPreference::ThirtyDays);

        assert!(serde_json::from_str::<MemoryPreference>("\"forever\"").is_err());
    }

    #[test]
    fn display_matches_serde() {
        for pref in MemoryPreference::ALL {
            let json = serde_json::to_string(&pref).unwrap();
            assert_eq!(format!("\"{pref}\""), json);
        }
    }

    #[test]
    fn retention_windows() {
        assert!(MemoryPreference::SessionOnly.retention().is_none());
        assert_eq!(MemoryPreference::SevenDays.retention(), Some(Duration::days(7)));
        assert_eq!(MemoryPreference::ThirtyDays.retention(), Some(Duration::days(30)));
    }

    #[test]
    fn profile_json_shape() {
        let profile = OnboardingProfile {
            email: "a@b.com".to_string(),
            auth_mode: AuthMode::SignUp,
            assessment: [Some(3), None, Some(1), Some(5), None],
            memory_preference: MemoryPreference::SevenDays,
            allows_notifications: true,
            completed_at: Utc::now(),
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["auth_mode"], "sign_up");
        assert_eq!(value["memory_preference"], "7_days");
        assert_eq!(value["assessment"], serde_json::json!([3, null, 1, 5, null]));
        assert!(value.get("password").is_none());
    }
}
