use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{
    create_availability, delete_availability, get_availability, list_availability,
    list_availability_by_period, list_availability_by_professor, update_availability,
};

pub fn availability_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_availability).get(list_availability))
        .route(
            "/{id}",
            get(get_availability)
                .put(update_availability)
                .delete(delete_availability),
        )
        .route("/professor/{professor_id}", get(list_availability_by_professor))
        .route("/period/{period_id}", get(list_availability_by_period))
}
