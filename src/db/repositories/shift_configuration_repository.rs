use sqlx::types::Uuid;
use sqlx::{PgExecutor, PgPool};
use tracing::info;

use crate::db::models::{ShiftConfiguration, ShiftConfigurationChanges};
use crate::error::AppResult;
use crate::scheduling::ScheduleError;

const CONFIG_COLUMNS: &str = "id, lesson_duration_minutes, lessons_per_shift, \
     morning_start, afternoon_start, evening_start, created_at, updated_at";

pub struct ShiftConfigurationRepository;

impl ShiftConfigurationRepository {
    /// The single institution-wide configuration, if one has been set.
    pub async fn get(executor: impl PgExecutor<'_>) -> AppResult<Option<ShiftConfiguration>> {
        let config = sqlx::query_as::<_, ShiftConfiguration>(&format!(
            "SELECT {CONFIG_COLUMNS} FROM shift_configuration LIMIT 1"
        ))
        .fetch_optional(executor)
        .await?;
        Ok(config)
    }

    /// Creates the configuration row if absent, otherwise updates only
    /// the supplied fields. The existing row is locked so concurrent
    /// upserts serialize instead of interleaving their merges.
    pub async fn upsert(
        pool: &PgPool,
        changes: &ShiftConfigurationChanges,
    ) -> AppResult<ShiftConfiguration> {
        if let Some(duration) = changes.lesson_duration_minutes {
            if duration <= 0 {
                return Err(ScheduleError::Configuration(format!(
                    "lesson duration must be positive, got {duration}"
                ))
                .into());
            }
        }
        if let Some(lessons) = changes.lessons_per_shift {
            if lessons <= 0 {
                return Err(ScheduleError::Configuration(format!(
                    "lessons per shift must be positive, got {lessons}"
                ))
                .into());
            }
        }

        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, ShiftConfiguration>(&format!(
            "SELECT {CONFIG_COLUMNS} FROM shift_configuration LIMIT 1 FOR UPDATE"
        ))
        .fetch_optional(&mut *tx)
        .await?;

        let saved = match existing {
            Some(current) => {
                let merged = current.merged_with(changes);
                sqlx::query_as::<_, ShiftConfiguration>(&format!(
                    "UPDATE shift_configuration \
                     SET lesson_duration_minutes = $2, lessons_per_shift = $3, \
                         morning_start = $4, afternoon_start = $5, evening_start = $6, \
                         updated_at = NOW() \
                     WHERE id = $1 \
                     RETURNING {CONFIG_COLUMNS}"
                ))
                .bind(merged.id)
                .bind(merged.lesson_duration_minutes)
                .bind(merged.lessons_per_shift)
                .bind(merged.morning_start)
                .bind(merged.afternoon_start)
                .bind(merged.evening_start)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                let (Some(duration), Some(lessons), Some(morning), Some(afternoon), Some(evening)) = (
                    changes.lesson_duration_minutes,
                    changes.lessons_per_shift,
                    changes.morning_start,
                    changes.afternoon_start,
                    changes.evening_start,
                ) else {
                    return Err(ScheduleError::Configuration(
                        "initial configuration requires lesson duration, lessons per shift \
                         and all three shift start times"
                            .to_string(),
                    )
                    .into());
                };

                sqlx::query_as::<_, ShiftConfiguration>(&format!(
                    "INSERT INTO shift_configuration \
                         (id, lesson_duration_minutes, lessons_per_shift, \
                          morning_start, afternoon_start, evening_start) \
                     VALUES ($1, $2, $3, $4, $5, $6) \
                     RETURNING {CONFIG_COLUMNS}"
                ))
                .bind(Uuid::now_v7())
                .bind(duration)
                .bind(lessons)
                .bind(morning)
                .bind(afternoon)
                .bind(evening)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        info!(config_id = %saved.id, "shift configuration saved");
        Ok(saved)
    }
}
