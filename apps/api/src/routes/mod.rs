pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers as feedback;
use crate::interview::handlers as interview;
use crate::research::handlers as research;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Intake
        .route("/users/upload_resume", post(resumes::handle_upload_resume))
        .route("/tools/crawl", post(research::handle_crawl))
        // Interview flow
        .route("/interview/init", post(interview::handle_init))
        .route("/interview/next", post(interview::handle_next))
        .route("/interview/save", post(interview::handle_save))
        .route(
            "/interview/sessions/:id",
            get(interview::handle_session_status),
        )
        .route(
            "/interview/records",
            get(interview::handle_list_records).delete(interview::handle_delete_records),
        )
        // Feedback
        .route("/interview/analyze", post(feedback::handle_analyze))
        .route("/interview/reports", get(feedback::handle_list_reports))
        .with_state(state)
}
