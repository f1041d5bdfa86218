//! Serializable schedule configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PeriodError, Result};
use crate::schedule::PeriodSchedule;

/// The raw, serializable description of a [`PeriodSchedule`].
///
/// ```json
/// {
///   "start": "09:30:00",
///   "end": "16:00:00",
///   "days": [1, 2, 3, 4, 5],
///   "timezone": "America/New_York"
/// }
/// ```
///
/// `days` defaults to every day and `timezone` (alias `tz`) to UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodScheduleConfig {
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<i64>>,
    #[serde(default, alias = "tz", skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl TryFrom<PeriodScheduleConfig> for PeriodSchedule {
    type Error = PeriodError;

    fn try_from(config: PeriodScheduleConfig) -> Result<Self> {
        let mut builder = PeriodSchedule::builder(&config.start, &config.end);
        if let Some(days) = config.days {
            builder = builder.days(days);
        }
        if let Some(tz) = config.timezone {
            builder = builder.timezone(tz);
        }
        builder.build()
    }
}

impl PeriodSchedule {
    /// Parse a JSON [`PeriodScheduleConfig`] and build the schedule.
    ///
    /// # Errors
    ///
    /// [`PeriodError::Config`] for malformed JSON, otherwise whatever
    /// validation of the fields reports.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PeriodScheduleConfig =
            serde_json::from_str(json).map_err(|e| PeriodError::Config(e.to_string()))?;
        PeriodSchedule::try_from(config)
    }

    /// The configuration that rebuilds this schedule.
    pub fn to_config(&self) -> PeriodScheduleConfig {
        PeriodScheduleConfig {
            start: self.start_time().to_string(),
            end: self.end_time().to_string(),
            days: Some(self.valid_days().iter().map(i64::from).collect()),
            timezone: Some(self.timezone().name()),
        }
    }
}
