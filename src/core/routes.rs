// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{admin, fallback, health, registration, session, users};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/health", get(health::health_handler))
        .route(
            "/accounts/register",
            get(registration::registration_status_handler).post(registration::register_handler),
        )
        .route("/accounts/login", post(session::login_handler))
        .route("/accounts/logout", post(session::logout_handler))
        .route("/accounts/me", get(session::me_handler))
        .route("/users/{email}/", get(users::profile_handler))

        // Admin endpoints (require API key)
        .route("/admin/superuser/add", post(admin::superuser_add_handler))
        .route("/admin/user/add", post(admin::user_add_handler))
        .route("/admin/user/email", post(admin::email_user_handler))
        .route("/admin/group/add", post(admin::group_add_handler))
        .route("/admin/group/join", post(admin::group_join_handler))

        .fallback(fallback::fallback_handler)

        .with_state(state)
}
