use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{ShiftConfiguration, UpsertShiftConfigurationRequest};
use crate::db::{DirectoryRepository, ShiftConfigurationRepository};
use crate::error::{AppError, AppResult};
use crate::scheduling::{
    authorize, compute_day_slots, Action, AuthContext, ScheduleError, Shift, TimeOfDay,
};

pub async fn get_schedule_config(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> AppResult<Json<ShiftConfiguration>> {
    authorize(&ctx, Action::ReadShiftConfiguration, None)?;

    let config = ShiftConfigurationRepository::get(&state.db)
        .await?
        .ok_or_else(|| ScheduleError::NotFound("shift configuration".to_string()))?;
    Ok(Json(config))
}

pub async fn upsert_schedule_config(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<UpsertShiftConfigurationRequest>,
) -> AppResult<Json<ShiftConfiguration>> {
    authorize(&ctx, Action::ManageShiftConfiguration, None)?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let changes = payload.parse()?;
    let config = ShiftConfigurationRepository::upsert(&state.db, &changes).await?;
    Ok(Json(config))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub period_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SlotEntry {
    pub shift: Shift,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// The bookable windows for any day of the given period, in shift order.
/// Clients use this to render the selectable options behind
/// availability submissions.
pub async fn list_valid_slots(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<Vec<SlotEntry>>> {
    authorize(&ctx, Action::ListSlots, None)?;

    DirectoryRepository::find_period(&state.db, query.period_id)
        .await?
        .ok_or_else(|| ScheduleError::NotFound("teaching period".to_string()))?;

    let config = ShiftConfigurationRepository::get(&state.db).await?.ok_or_else(|| {
        ScheduleError::Configuration("no shift configuration has been set".to_string())
    })?;

    let entries = compute_day_slots(&config)?
        .into_iter()
        .flat_map(|shift_slots| {
            let shift = shift_slots.shift;
            shift_slots.slots.into_iter().map(move |slot| SlotEntry {
                shift,
                start: slot.start,
                end: slot.end,
            })
        })
        .collect();
    Ok(Json(entries))
}
