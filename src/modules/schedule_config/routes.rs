use axum::{routing::get, Router};

use crate::app_state::AppState;

use super::handlers::{get_schedule_config, list_valid_slots, upsert_schedule_config};

pub fn schedule_config_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_schedule_config).put(upsert_schedule_config))
        .route("/slots", get(list_valid_slots))
}
