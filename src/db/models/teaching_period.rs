use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "period_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    Active,
    Inactive,
}

/// An academic term (e.g. 2025/1). Owned by the period service; this
/// backend only reads it to scope and validate availability.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TeachingPeriod {
    pub id: Uuid,
    pub year: i32,
    pub semester: i32,
    pub status: PeriodStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TeachingPeriod {
    /// Human-readable term label used in validation messages.
    pub fn label(&self) -> String {
        format!("{}/{}", self.year, self.semester)
    }

    pub fn is_active(&self) -> bool {
        self.status == PeriodStatus::Active
    }
}
