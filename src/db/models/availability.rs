use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

use crate::scheduling::{AvailabilityCandidate, ScheduleError, TimeOfDay};

/// Teaching days. Sunday is not a teaching day; the declaration order
/// matches the `weekday` enum in the database, so `ORDER BY day_of_week`
/// sorts Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "weekday", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "availability_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Unavailable,
}

/// A professor's declared open/closed window for one day of a teaching
/// period. `[start_time, end_time)` is half-open and always matches a
/// contiguous run of configured slots.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AvailabilityRecord {
    pub id: Uuid,
    pub professor_id: Uuid,
    pub period_id: Uuid,
    pub day_of_week: Weekday,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: AvailabilityStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAvailabilityRequest {
    pub professor_id: Uuid,
    pub period_id: Uuid,
    pub day_of_week: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub status: Option<AvailabilityStatus>,
}

impl CreateAvailabilityRequest {
    pub fn parse(&self) -> Result<(AvailabilityCandidate, AvailabilityStatus), ScheduleError> {
        let candidate = AvailabilityCandidate {
            professor_id: self.professor_id,
            period_id: self.period_id,
            day_of_week: self.day_of_week,
            start_time: self.start_time.parse()?,
            end_time: self.end_time.parse()?,
        };
        Ok((candidate, self.status.unwrap_or_default()))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAvailabilityRequest {
    pub day_of_week: Option<Weekday>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<AvailabilityStatus>,
}

/// Parsed form of the update payload.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityChanges {
    pub day_of_week: Option<Weekday>,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub status: Option<AvailabilityStatus>,
}

impl UpdateAvailabilityRequest {
    pub fn parse(&self) -> Result<AvailabilityChanges, ScheduleError> {
        let parse = |value: &Option<String>| -> Result<Option<TimeOfDay>, ScheduleError> {
            value.as_deref().map(str::parse).transpose()
        };

        Ok(AvailabilityChanges {
            day_of_week: self.day_of_week,
            start_time: parse(&self.start_time)?,
            end_time: parse(&self.end_time)?,
            status: self.status,
        })
    }
}

/// Query-string filters accepted by the list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AvailabilityFilter {
    pub professor_id: Option<Uuid>,
    pub period_id: Option<Uuid>,
    pub day_of_week: Option<Weekday>,
    pub status: Option<AvailabilityStatus>,
}
