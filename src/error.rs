//! Error types for the navigation core

use thiserror::Error;

/// Navigation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    /// The heading sensor returned a degenerate (zero or non-finite) sample
    #[error("Heading unavailable: degenerate heading sample")]
    HeadingUnavailable,

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    /// A sensor or actuator could not be reached
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error("Navigation timed out after {0} ticks")]
    Timeout(u64),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
