use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

use crate::scheduling::{ScheduleError, TimeOfDay};

/// The single institution-wide shift configuration row. Slot boundaries
/// for every weekday are derived from it; it is fetched once per request
/// and passed into the slot computer explicitly.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ShiftConfiguration {
    pub id: Uuid,
    pub lesson_duration_minutes: i32,
    pub lessons_per_shift: i32,
    pub morning_start: TimeOfDay,
    pub afternoon_start: TimeOfDay,
    pub evening_start: TimeOfDay,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Upsert payload. Every field is optional: on update only the supplied
/// fields change, on first creation all of them are required.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertShiftConfigurationRequest {
    #[validate(range(min = 1, message = "lesson duration must be at least 1 minute"))]
    pub lesson_duration_minutes: Option<i32>,
    #[validate(range(min = 1, message = "lessons per shift must be at least 1"))]
    pub lessons_per_shift: Option<i32>,
    pub morning_start: Option<String>,
    pub afternoon_start: Option<String>,
    pub evening_start: Option<String>,
}

/// Parsed form of the upsert payload, with shift starts as `TimeOfDay`.
#[derive(Debug, Clone)]
pub struct ShiftConfigurationChanges {
    pub lesson_duration_minutes: Option<i32>,
    pub lessons_per_shift: Option<i32>,
    pub morning_start: Option<TimeOfDay>,
    pub afternoon_start: Option<TimeOfDay>,
    pub evening_start: Option<TimeOfDay>,
}

impl UpsertShiftConfigurationRequest {
    /// Parses the supplied `HH:mm` strings. Any malformed value fails the
    /// whole call before anything is written.
    pub fn parse(&self) -> Result<ShiftConfigurationChanges, ScheduleError> {
        let parse = |value: &Option<String>| -> Result<Option<TimeOfDay>, ScheduleError> {
            value.as_deref().map(str::parse).transpose()
        };

        Ok(ShiftConfigurationChanges {
            lesson_duration_minutes: self.lesson_duration_minutes,
            lessons_per_shift: self.lessons_per_shift,
            morning_start: parse(&self.morning_start)?,
            afternoon_start: parse(&self.afternoon_start)?,
            evening_start: parse(&self.evening_start)?,
        })
    }
}

impl ShiftConfiguration {
    /// Applies a partial update, leaving unsupplied fields untouched.
    /// Timestamps are the repository's concern.
    pub fn merged_with(&self, changes: &ShiftConfigurationChanges) -> ShiftConfiguration {
        ShiftConfiguration {
            id: self.id,
            lesson_duration_minutes: changes
                .lesson_duration_minutes
                .unwrap_or(self.lesson_duration_minutes),
            lessons_per_shift: changes.lessons_per_shift.unwrap_or(self.lessons_per_shift),
            morning_start: changes.morning_start.unwrap_or(self.morning_start),
            afternoon_start: changes.afternoon_start.unwrap_or(self.afternoon_start),
            evening_start: changes.evening_start.unwrap_or(self.evening_start),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
