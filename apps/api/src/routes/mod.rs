pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{analytics, applications, discovery, letters, mailer, profile};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Job discovery
        .route("/api/jobs/search", post(discovery::handlers::handle_search_jobs))
        .route(
            "/api/jobs/search/:search_id",
            get(discovery::handlers::handle_get_search),
        )
        .route(
            "/api/jobs",
            get(discovery::handlers::handle_list_jobs)
                .post(discovery::handlers::handle_create_job),
        )
        .route(
            "/api/jobs/:id",
            get(discovery::handlers::handle_get_job)
                .delete(discovery::handlers::handle_delete_job),
        )
        // Cover letters
        .route(
            "/api/cover-letters/generate",
            post(letters::handlers::handle_generate_letter),
        )
        .route("/api/cover-letters", get(letters::handlers::handle_list_letters))
        .route("/api/cover-letters/:id", get(letters::handlers::handle_get_letter))
        // Applications
        .route(
            "/api/applications",
            get(applications::handlers::handle_list_applications)
                .post(applications::handlers::handle_create_application),
        )
        .route(
            "/api/applications/:id/status",
            put(applications::handlers::handle_update_status),
        )
        // Outreach email
        .route(
            "/api/emails/send-application",
            post(mailer::handlers::handle_send_application),
        )
        .route(
            "/api/emails/send-follow-up",
            post(mailer::handlers::handle_send_follow_up),
        )
        .route("/api/emails/logs", get(mailer::handlers::handle_list_logs))
        // Profile
        .route(
            "/api/profile",
            get(profile::handlers::handle_get_profile)
                .put(profile::handlers::handle_update_profile),
        )
        // Analytics
        .route(
            "/api/analytics/dashboard",
            get(analytics::handlers::handle_dashboard),
        )
        .with_state(state)
}
