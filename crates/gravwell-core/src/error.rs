//! Error types. Only construction and configuration can fail; everything the
//! simulation does per tick degrades to "nothing to do" instead.

use std::fmt;

/// Rejected body parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyError {
    NonPositiveRadius { radius: f64 },
    NonPositiveMass { mass: f64 },
    NonFinite { field: &'static str },
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveRadius { radius } => {
                write!(f, "body radius must be positive, got {radius}")
            }
            Self::NonPositiveMass { mass } => write!(f, "body mass must be positive, got {mass}"),
            Self::NonFinite { field } => write!(f, "body {field} must be finite"),
        }
    }
}

impl std::error::Error for BodyError {}

/// Rejected simulation configuration.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid config {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Engine-level failure.
#[derive(Debug)]
pub enum SimError {
    Body(BodyError),
    Config(ConfigError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Body(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<BodyError> for SimError {
    fn from(e: BodyError) -> Self {
        Self::Body(e)
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
