use axum::{middleware, routing::get, Json, Router};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::{
    app_state::AppState,
    middleware::auth::auth_context_middleware,
    middleware::tracing::request_tracing_middleware,
    modules::availability::availability_routes,
    modules::schedule_config::schedule_config_routes,
};

pub fn create_router(state: AppState) -> Router {
    // Everything except the health probe sits behind the gateway's
    // identity headers.
    let api = Router::new()
        .nest("/availability", availability_routes())
        .nest("/schedule-config", schedule_config_routes())
        .layer(middleware::from_fn(auth_context_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(middleware::from_fn(request_tracing_middleware))
        .with_state(state)
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
