use sqlx::types::Uuid;
use sqlx::PgExecutor;

use crate::db::models::{DirectoryUser, TeachingPeriod};
use crate::error::AppResult;

/// Read-only lookups against the identity/period data this service
/// mirrors but never mutates.
pub struct DirectoryRepository;

impl DirectoryRepository {
    pub async fn find_user(
        executor: impl PgExecutor<'_>,
        user_id: Uuid,
    ) -> AppResult<Option<DirectoryUser>> {
        let user = sqlx::query_as::<_, DirectoryUser>(
            "SELECT id, name, email, role, is_active, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    pub async fn find_period(
        executor: impl PgExecutor<'_>,
        period_id: Uuid,
    ) -> AppResult<Option<TeachingPeriod>> {
        let period = sqlx::query_as::<_, TeachingPeriod>(
            "SELECT id, year, semester, status, created_at, updated_at \
             FROM teaching_periods WHERE id = $1",
        )
        .bind(period_id)
        .fetch_optional(executor)
        .await?;
        Ok(period)
    }
}
