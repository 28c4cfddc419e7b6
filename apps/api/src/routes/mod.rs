pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::diary::handlers as diary;
use crate::patients::handlers as patients;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Diary API
        .route(
            "/api/v1/entries",
            post(diary::handle_create_entry).get(diary::handle_list_entries),
        )
        .route(
            "/api/v1/entries/:id",
            get(diary::handle_get_entry).delete(diary::handle_delete_entry),
        )
        // Patient API
        .route("/api/v1/patients/:id", get(patients::handle_get_patient))
        .route(
            "/api/v1/patients/:id/clinician",
            get(patients::handle_get_clinician),
        )
        .with_state(state)
}
