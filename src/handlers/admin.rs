use crate::auth::manager::ExtraFields;
use crate::core::error::AdminError;
use crate::core::state::AppState;
use crate::mail::email_user;
use crate::models::admin::{
    AdminUserForm, ApiKeyQuery, EmailUserQuery, GroupAddQuery, GroupJoinQuery, SuccessResponse,
};
use crate::models::user::UserProfile;
use crate::utils::auth::verify_api_key;
use crate::utils::email::normalize_email;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Form,
};
use std::sync::Arc;
use tracing::{info, warn};

fn check_api_key(state: &AppState, provided: &str, action: &str) -> Result<(), AdminError> {
    if !verify_api_key(provided, &state.config.admin.api_key) {
        warn!(action = action, "Unauthorized admin attempt");
        return Err(AdminError::InvalidApiKey);
    }
    Ok(())
}

fn extra_fields(form: &AdminUserForm) -> ExtraFields {
    ExtraFields {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
    }
}

/// Create a superuser
///
/// POST /admin/superuser/add?api_key=<key> (form: email, password, first_name, last_name)
pub async fn superuser_add_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
    Form(form): Form<AdminUserForm>,
) -> Result<Response, AdminError> {
    check_api_key(&state, &params.api_key, "superuser add")?;

    let user = state.manager.create_superuser(
        &form.email,
        form.password.as_deref(),
        extra_fields(&form),
    )?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(user.as_ref()))).into_response())
}

/// Create a regular user, optionally placing it in a group
///
/// POST /admin/user/add?api_key=<key> (form: email, password, group, first_name, last_name)
pub async fn user_add_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
    Form(form): Form<AdminUserForm>,
) -> Result<Response, AdminError> {
    check_api_key(&state, &params.api_key, "user add")?;

    let user = state.manager.create_user(
        &form.email,
        form.password.as_deref(),
        form.group.as_deref(),
        extra_fields(&form),
    )?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(user.as_ref()))).into_response())
}

/// Create a group
///
/// POST /admin/group/add?api_key=<key>&name=<name>
pub async fn group_add_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupAddQuery>,
) -> Result<Response, AdminError> {
    check_api_key(&state, &params.api_key, "group add")?;

    let name = params.name.trim();
    if name.is_empty() {
        return Err(AdminError::InvalidParameter("group name must not be empty".to_string()));
    }

    let group = state.manager.create_group(name)?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            success: true,
            message: format!("Group '{}' created", group.name),
        }),
    )
        .into_response())
}

/// Add an existing user to an existing group
///
/// POST /admin/group/join?api_key=<key>&email=<email>&group=<name>
pub async fn group_join_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupJoinQuery>,
) -> Result<Response, AdminError> {
    check_api_key(&state, &params.api_key, "group join")?;

    let user = state.manager.join_group(&params.email, &params.group)?;

    Ok((StatusCode::OK, Json(UserProfile::from(user.as_ref()))).into_response())
}

/// Send an email to one user through the configured mailer
///
/// POST /admin/user/email?api_key=<key>&email=<email>&subject=<subject>&message=<message>
pub async fn email_user_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EmailUserQuery>,
) -> Result<Response, AdminError> {
    check_api_key(&state, &params.api_key, "email user")?;

    let email = normalize_email(&params.email);
    let user = state
        .users
        .get(&email)
        .ok_or_else(|| AdminError::NotFound(format!("user {}", email)))?;

    email_user(
        state.mailer.as_ref(),
        &user,
        &params.subject,
        &params.message,
        params.from_email.as_deref(),
        &state.config.mail.default_from_email,
    )
    .map_err(|e| AdminError::Mail(e.to_string()))?;

    info!(email = %user.email, subject = %params.subject, "Email handed to mailer");

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: format!("Email sent to {}", user.nice_email()),
        }),
    )
        .into_response())
}
