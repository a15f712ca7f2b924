use crate::core::error::StoreError;
use crate::core::state::AppState;
use crate::models::user::UserProfile;
use crate::utils::email::normalize_email;
use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;

/// Public profile of a user
///
/// GET /users/{email}/
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<UserProfile>, StoreError> {
    let email = normalize_email(&email);

    let user = state
        .users
        .get(&email)
        .ok_or(StoreError::UserNotFound(email))?;

    Ok(Json(UserProfile::from(user.as_ref())))
}
