//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Visual design variant the presentation layer should render.
///
/// The flow logic is identical for every variant; the value is only handed
/// through to clients so they can pick a theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignVariant {
    #[default]
    PerfectBlend,
    SoftSupportive,
    CleanFocused,
}

impl DesignVariant {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PerfectBlend => "Perfect Blend",
            Self::SoftSupportive => "Soft & Supportive",
            Self::CleanFocused => "Clean & Focused",
        }
    }
}

impl std::fmt::Display for DesignVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PerfectBlend => "perfect_blend",
            Self::SoftSupportive => "soft_supportive",
            Self::CleanFocused => "clean_focused",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DesignVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perfect_blend" => Ok(Self::PerfectBlend),
            "soft_supportive" => Ok(Self::SoftSupportive),
            "clean_focused" => Ok(Self::CleanFocused),
            other => Err(ConfigError::InvalidValue {
                key: "MINDFUL_DESIGN".to_string(),
                message: format!(
                    "unknown design '{other}' (expected perfect_blend, soft_supportive or clean_focused)"
                ),
            }),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Path of the libSQL database file holding handed-off profiles.
    pub db_path: PathBuf,
    /// Design variant advertised to clients.
    pub design: DesignVariant,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db_path: PathBuf::from("./data/mindful.db"),
            design: DesignVariant::default(),
        }
    }
}

impl ServiceConfig {
    /// Build the config from `MINDFUL_*` environment variables.
    ///
    /// Unset variables keep their defaults. A variable that is set but
    /// cannot be parsed is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = lookup("MINDFUL_PORT") {
            config.port = port.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "MINDFUL_PORT".to_string(),
                message: format!("{e}"),
            })?;
        }

        if let Some(path) = lookup("MINDFUL_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Some(design) = lookup("MINDFUL_DESIGN") {
            config.design = design.parse()?;
        }

        Ok(config)
    }
}
