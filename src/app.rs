use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/select", post(handlers::select_date))
        .route("/api/draft", patch(handlers::update_draft))
        .route("/api/draft/meals", post(handlers::add_meal))
        .route("/api/draft/meals/:index", delete(handlers::remove_meal))
        .route("/api/draft/meds/:id", post(handlers::set_med_taken))
        .route("/api/save", post(handlers::save))
        .route("/api/records", get(handlers::get_records))
        .route(
            "/api/medications",
            get(handlers::list_medications).post(handlers::add_medication),
        )
        .route(
            "/api/medications/:id",
            put(handlers::edit_medication).delete(handlers::delete_medication),
        )
        .route("/api/home", get(handlers::get_home))
        .route("/api/history", get(handlers::get_history))
        .route("/api/insights", get(handlers::get_insights))
        .with_state(state)
}
