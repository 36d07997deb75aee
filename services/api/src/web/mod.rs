pub mod rest;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub use rest::ApiDoc;
pub use state::AppState;

/// Assembles the API router. Shared by the server binary and by tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommendations", post(rest::recommend_handler))
        .route("/fitness", post(rest::fitness_handler))
        .route(
            "/preferences",
            get(rest::get_preferences_handler).patch(rest::update_preferences_handler),
        )
        .route("/preferences/reset", post(rest::reset_preferences_handler))
        .route("/onboarding", get(rest::onboarding_status_handler))
        .route("/onboarding/answer", post(rest::onboarding_answer_handler))
        .route(
            "/selections",
            get(rest::list_selections_handler).post(rest::record_selection_handler),
        )
        .route(
            "/meals",
            get(rest::list_meals_handler).post(rest::save_meal_handler),
        )
        .route("/meals/{id}", delete(rest::delete_meal_handler))
        .route("/session", get(rest::session_status_handler))
        .route("/session/submit", post(rest::session_submit_handler))
        .route("/session/select", post(rest::session_select_handler))
        .route("/session/save", post(rest::session_save_handler))
        .route("/session/reset", post(rest::session_reset_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
