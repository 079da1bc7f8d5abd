//! Error types for the onboarding service.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Onboarding step error: {0}")]
    Step(#[from] StepError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Validation failures raised while driving the onboarding flow.
///
/// Every variant is recoverable: the caller corrects the offending input
/// and tries again. The coordinator never changes state when it returns one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("Email address is required")]
    EmptyEmail,

    #[error("Password is required")]
    EmptyPassword,

    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Assessment has {remaining} question(s) not yet answered or skipped")]
    AssessmentIncomplete { remaining: usize },

    #[error("Privacy policy must be accepted to finish onboarding")]
    PrivacyNotAccepted,

    #[error("Onboarding is already complete")]
    AlreadyComplete,

    #[error("Question index {index} out of range (0..{count})")]
    QuestionOutOfRange { index: usize, count: usize },

    #[error("Rating {rating} out of range (1..=5)")]
    RatingOutOfRange { rating: i64 },
}

impl StepError {
    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::EmptyPassword => "empty_password",
            Self::PasswordMismatch => "password_mismatch",
            Self::AssessmentIncomplete { .. } => "assessment_incomplete",
            Self::PrivacyNotAccepted => "privacy_not_accepted",
            Self::AlreadyComplete => "already_complete",
            Self::QuestionOutOfRange { .. } => "question_out_of_range",
            Self::RatingOutOfRange { .. } => "rating_out_of_range",
        }
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
