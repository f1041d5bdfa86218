//! Error types for period-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// Malformed input: time-of-day string, weekday, or instant.
    #[error("Invalid input: {reason}: '{input}'")]
    Validation { reason: &'static str, input: String },

    #[error("Invalid timezone: {reason}: '{name}'")]
    Timezone { reason: &'static str, name: String },

    /// A "current window" query was made when its precondition does not hold.
    #[error("Invalid state: {reason}")]
    State { reason: String },

    #[error("No period occurrence within the search horizon for days {days}")]
    NoOccurrence { days: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PeriodError {
    pub(crate) fn validation(reason: &'static str, input: impl Into<String>) -> Self {
        PeriodError::Validation {
            reason,
            input: input.into(),
        }
    }

    pub(crate) fn state(reason: impl Into<String>) -> Self {
        PeriodError::State {
            reason: reason.into(),
        }
    }

    /// The short machine-readable reason carried by validation and timezone errors.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            PeriodError::Validation { reason, .. } | PeriodError::Timezone { reason, .. } => {
                Some(reason)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PeriodError>;
