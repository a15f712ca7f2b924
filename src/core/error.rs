// Centralized error handling for the account service

use crate::models::admin::ErrorResponse;
use crate::validation::forms::FormErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Constraint violations and lookup failures raised by the in-memory stores
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("A group named '{0}' already exists")]
    DuplicateGroup(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),
}

/// Errors raised while constructing users
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("The given email must be set")]
    EmptyEmail,

    #[error("Field '{field}' is too long: {actual} > {max} characters")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by the registration view
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Registration is closed")]
    Closed,

    #[error("Invalid registration form")]
    InvalidForm(FormErrors),

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error("Newly registered user could not be authenticated")]
    AuthenticationFailed,
}

/// Errors raised by the login/session endpoints
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Invalid login form")]
    InvalidForm(FormErrors),
}

/// Errors raised by the administrative endpoints
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to send email: {0}")]
    Mail(String),
}

/// Error body carrying per-field validation messages
#[derive(Serialize)]
struct FormErrorResponse<'a> {
    success: bool,
    error: String,
    fields: &'a FormErrors,
}

fn json_error(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
        }),
    )
        .into_response()
}

fn form_error(message: String, fields: &FormErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(FormErrorResponse {
            success: false,
            error: message,
            fields,
        }),
    )
        .into_response()
}

impl StoreError {
    fn status(&self) -> StatusCode {
        match self {
            StoreError::DuplicateEmail(_) | StoreError::DuplicateGroup(_) => StatusCode::CONFLICT,
            StoreError::UserNotFound(_) | StoreError::GroupNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl ManagerError {
    fn status(&self) -> StatusCode {
        match self {
            ManagerError::EmptyEmail | ManagerError::FieldTooLong { .. } => StatusCode::BAD_REQUEST,
            ManagerError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ManagerError::Store(e) => e.status(),
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.to_string())
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        match &self {
            RegistrationError::Closed => json_error(StatusCode::FORBIDDEN, self.to_string()),
            RegistrationError::InvalidForm(fields) => form_error(self.to_string(), fields),
            RegistrationError::Manager(e) => json_error(e.status(), self.to_string()),
            RegistrationError::AuthenticationFailed => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => {
                json_error(StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::InvalidForm(fields) => form_error(self.to_string(), fields),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AdminError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Manager(e) => e.status(),
            AdminError::Store(e) => e.status(),
            AdminError::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        json_error(status, self.to_string())
    }
}
