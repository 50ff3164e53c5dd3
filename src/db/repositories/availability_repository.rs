use sqlx::types::Uuid;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::info;

use crate::db::models::{
    AvailabilityChanges, AvailabilityFilter, AvailabilityRecord, AvailabilityStatus, Weekday,
};
use crate::error::{AppError, AppResult};
use crate::scheduling::{validate, AvailabilityCandidate, ScheduleError};

use super::directory_repository::DirectoryRepository;
use super::shift_configuration_repository::ShiftConfigurationRepository;

const RECORD_COLUMNS: &str = "id, professor_id, period_id, day_of_week, \
     start_minutes AS start_time, end_minutes AS end_time, \
     status, created_at, updated_at";

/// Postgres error code for an exclusion constraint violation. Raised by
/// `professor_availability_no_overlap` when a concurrent submission won
/// the race for an overlapping window.
const EXCLUSION_VIOLATION: &str = "23P01";

pub struct AvailabilityRepository;

impl AvailabilityRepository {
    /// Validates and stores a new availability window. The whole
    /// check-then-write sequence runs in one transaction, and the
    /// table's exclusion constraint backstops the conflict check
    /// against concurrent writers.
    pub async fn create(
        pool: &PgPool,
        candidate: &AvailabilityCandidate,
        status: AvailabilityStatus,
    ) -> AppResult<AvailabilityRecord> {
        let mut tx = pool.begin().await?;

        Self::run_validation(&mut tx, candidate, None).await?;

        let record = sqlx::query_as::<_, AvailabilityRecord>(&format!(
            "INSERT INTO professor_availability \
                 (id, professor_id, period_id, day_of_week, start_minutes, end_minutes, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(candidate.professor_id)
        .bind(candidate.period_id)
        .bind(candidate.day_of_week)
        .bind(candidate.start_time)
        .bind(candidate.end_time)
        .bind(status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| Self::map_write_error(err, candidate))?;

        tx.commit().await?;

        info!(
            record_id = %record.id,
            professor_id = %record.professor_id,
            day = %record.day_of_week,
            window = %format!("{}-{}", record.start_time, record.end_time),
            "availability created"
        );
        Ok(record)
    }

    /// Applies a partial update. Unsupplied fields keep their stored
    /// values; the merged window goes through full validation with the
    /// record itself excluded from the conflict scan.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &AvailabilityChanges,
    ) -> AppResult<AvailabilityRecord> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, AvailabilityRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM professor_availability WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ScheduleError::NotFound("availability record".to_string()))?;

        let candidate = AvailabilityCandidate {
            professor_id: existing.professor_id,
            period_id: existing.period_id,
            day_of_week: changes.day_of_week.unwrap_or(existing.day_of_week),
            start_time: changes.start_time.unwrap_or(existing.start_time),
            end_time: changes.end_time.unwrap_or(existing.end_time),
        };
        Self::run_validation(&mut tx, &candidate, Some(existing.id)).await?;

        let record = sqlx::query_as::<_, AvailabilityRecord>(&format!(
            "UPDATE professor_availability \
             SET day_of_week = $2, start_minutes = $3, end_minutes = $4, status = $5, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(existing.id)
        .bind(candidate.day_of_week)
        .bind(candidate.start_time)
        .bind(candidate.end_time)
        .bind(changes.status.unwrap_or(existing.status))
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| Self::map_write_error(err, &candidate))?;

        tx.commit().await?;

        info!(record_id = %record.id, "availability updated");
        Ok(record)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> AppResult<AvailabilityRecord> {
        let deleted = sqlx::query_as::<_, AvailabilityRecord>(&format!(
            "DELETE FROM professor_availability WHERE id = $1 RETURNING {RECORD_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ScheduleError::NotFound("availability record".to_string()))?;

        info!(
            record_id = %deleted.id,
            professor_id = %deleted.professor_id,
            "availability deleted"
        );
        Ok(deleted)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<AvailabilityRecord> {
        sqlx::query_as::<_, AvailabilityRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM professor_availability WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ScheduleError::NotFound("availability record".to_string()).into())
    }

    /// Lists records matching the filter, ordered by day-of-week then
    /// start time.
    pub async fn list(pool: &PgPool, filter: &AvailabilityFilter) -> AppResult<Vec<AvailabilityRecord>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {RECORD_COLUMNS} FROM professor_availability WHERE TRUE"
        ));
        if let Some(professor_id) = filter.professor_id {
            query.push(" AND professor_id = ").push_bind(professor_id);
        }
        if let Some(period_id) = filter.period_id {
            query.push(" AND period_id = ").push_bind(period_id);
        }
        if let Some(day) = filter.day_of_week {
            query.push(" AND day_of_week = ").push_bind(day);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        query.push(" ORDER BY day_of_week, start_minutes");

        let records = query
            .build_query_as::<AvailabilityRecord>()
            .fetch_all(pool)
            .await?;
        Ok(records)
    }

    /// Loads everything the validator needs and runs it inside the
    /// caller's transaction.
    async fn run_validation(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        candidate: &AvailabilityCandidate,
        exclude_id: Option<Uuid>,
    ) -> AppResult<()> {
        let config = ShiftConfigurationRepository::get(&mut **tx).await?;
        let period = DirectoryRepository::find_period(&mut **tx, candidate.period_id).await?;
        let professor = DirectoryRepository::find_user(&mut **tx, candidate.professor_id).await?;
        let existing = Self::window_peers(
            &mut **tx,
            candidate.professor_id,
            candidate.period_id,
            candidate.day_of_week,
        )
        .await?;

        validate(
            candidate,
            period.as_ref(),
            professor.as_ref(),
            config.as_ref(),
            &existing,
            exclude_id,
        )?;
        Ok(())
    }

    /// Stored windows sharing the candidate's professor/period/day.
    async fn window_peers(
        executor: impl PgExecutor<'_>,
        professor_id: Uuid,
        period_id: Uuid,
        day: Weekday,
    ) -> AppResult<Vec<AvailabilityRecord>> {
        let records = sqlx::query_as::<_, AvailabilityRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM professor_availability \
             WHERE professor_id = $1 AND period_id = $2 AND day_of_week = $3 \
             ORDER BY start_minutes"
        ))
        .bind(professor_id)
        .bind(period_id)
        .bind(day)
        .fetch_all(executor)
        .await?;
        Ok(records)
    }

    fn map_write_error(err: sqlx::Error, candidate: &AvailabilityCandidate) -> AppError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) {
                return ScheduleError::ScheduleConflict {
                    day: candidate.day_of_week.to_string(),
                    start: candidate.start_time.to_string(),
                    end: candidate.end_time.to_string(),
                }
                .into();
            }
        }
        err.into()
    }
}
