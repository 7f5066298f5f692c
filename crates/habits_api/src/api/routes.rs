//! Route table. Every path maps straight to a named handler.

use axum::routing::get;
use axum::Router;

use super::handlers::{self, AppState};

/// Builds the application router over shared state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping/", get(handlers::ping))
        .route(
            "/habits/",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route(
            "/habits/:id/",
            get(handlers::get_habit)
                .put(handlers::put_habit)
                .patch(handlers::patch_habit)
                .delete(handlers::delete_habit),
        )
        .route(
            "/habit-logs/",
            get(handlers::list_logs).post(handlers::create_log),
        )
        .route(
            "/habit-logs/:id/",
            get(handlers::get_log)
                .put(handlers::put_log)
                .patch(handlers::patch_log)
                .delete(handlers::delete_log),
        )
        .with_state(state)
}
