use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use sqlx::types::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{
    AvailabilityFilter, AvailabilityRecord, CreateAvailabilityRequest, UpdateAvailabilityRequest,
    UserRole,
};
use crate::db::AvailabilityRepository;
use crate::error::{AppError, AppResult};
use crate::scheduling::{authorize, resolve_target_professor, Action, AuthContext};

pub async fn create_availability(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<CreateAvailabilityRequest>,
) -> AppResult<(StatusCode, Json<AvailabilityRecord>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (mut candidate, status) = payload.parse()?;
    candidate.professor_id = resolve_target_professor(&ctx, candidate.professor_id);
    authorize(&ctx, Action::SubmitAvailability, Some(candidate.professor_id))?;

    let record = AvailabilityRepository::create(&state.db, &candidate, status).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// General filtered listing. Professors only ever see their own
/// records, whatever filter they send.
pub async fn list_availability(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(mut filter): Query<AvailabilityFilter>,
) -> AppResult<Json<Vec<AvailabilityRecord>>> {
    if ctx.role == UserRole::Professor {
        filter.professor_id = Some(ctx.user_id);
    }
    authorize(&ctx, Action::ReadAvailability, filter.professor_id)?;

    let records = AvailabilityRepository::list(&state.db, &filter).await?;
    Ok(Json(records))
}

pub async fn get_availability(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AvailabilityRecord>> {
    let record = AvailabilityRepository::find_by_id(&state.db, id).await?;
    authorize(&ctx, Action::ReadAvailability, Some(record.professor_id))?;
    Ok(Json(record))
}

pub async fn list_availability_by_professor(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(professor_id): Path<Uuid>,
    Query(filter): Query<AvailabilityFilter>,
) -> AppResult<Json<Vec<AvailabilityRecord>>> {
    authorize(&ctx, Action::ReadAvailability, Some(professor_id))?;

    let filter = AvailabilityFilter {
        professor_id: Some(professor_id),
        ..filter
    };
    let records = AvailabilityRepository::list(&state.db, &filter).await?;
    Ok(Json(records))
}

pub async fn list_availability_by_period(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(period_id): Path<Uuid>,
    Query(filter): Query<AvailabilityFilter>,
) -> AppResult<Json<Vec<AvailabilityRecord>>> {
    authorize(&ctx, Action::ReadPeriodAvailability, None)?;

    let filter = AvailabilityFilter {
        period_id: Some(period_id),
        ..filter
    };
    let records = AvailabilityRepository::list(&state.db, &filter).await?;
    Ok(Json(records))
}

pub async fn update_availability(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> AppResult<Json<AvailabilityRecord>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let changes = payload.parse()?;

    let existing = AvailabilityRepository::find_by_id(&state.db, id).await?;
    authorize(&ctx, Action::SubmitAvailability, Some(existing.professor_id))?;

    let record = AvailabilityRepository::update(&state.db, id, &changes).await?;
    Ok(Json(record))
}

pub async fn delete_availability(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let existing = AvailabilityRepository::find_by_id(&state.db, id).await?;
    authorize(&ctx, Action::SubmitAvailability, Some(existing.professor_id))?;

    AvailabilityRepository::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
