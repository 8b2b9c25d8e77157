use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/student", get(handlers::student_page))
        .route("/student/mood", post(handlers::log_mood))
        .route("/student/points", post(handlers::add_points))
        .route("/student/booking", post(handlers::book_student_session))
        .route("/parent", get(handlers::parent_page))
        .route("/parent/booking", post(handlers::book_parent_session))
        .route("/teacher", get(handlers::teacher_page))
        .route("/api/mood-log", get(handlers::get_mood_log).post(handlers::post_mood_log))
        .route(
            "/api/leaderboard",
            get(handlers::get_leaderboard).post(handlers::post_leaderboard),
        )
        .route("/api/bookings", get(handlers::get_bookings).post(handlers::post_booking))
        .with_state(state)
}
