use crate::core::error::RegistrationError;
use crate::core::state::AppState;
use crate::handlers::session::session_cookie;
use crate::validation::forms::RegistrationForm;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationStatus {
    pub registration_open: bool,
}

/// Whether the registration form is accepting submissions
///
/// GET /accounts/register
pub async fn registration_status_handler(
    State(state): State<Arc<AppState>>,
) -> Json<RegistrationStatus> {
    Json(RegistrationStatus {
        registration_open: state.registration.registration_allowed(),
    })
}

/// Register a new account and log it in
///
/// POST /accounts/register (form: email, password1, password2)
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, RegistrationError> {
    let registered = state.registration.register(&form)?;

    let location = state.registration.success_url(&registered.user);
    let cookie = session_cookie(&state.config.session.cookie_name, &registered.session.token);

    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location), (header::SET_COOKIE, cookie)],
    )
        .into_response())
}
