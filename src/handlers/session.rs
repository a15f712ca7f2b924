use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::models::admin::SuccessResponse;
use crate::models::user::UserProfile;
use crate::validation::forms::LoginForm;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    Form,
};
use std::sync::Arc;
use tracing::warn;

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(name: &str, token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, token)
}

fn expired_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

/// Extract the session token from the request's `Cookie` headers
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Log in with email and password
///
/// POST /accounts/login (form: email, password)
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AuthError> {
    form.validate().map_err(AuthError::InvalidForm)?;

    let user = state
        .backend
        .authenticate(&form.email, &form.password)
        .ok_or_else(|| {
            warn!(email = %form.email, "Failed login attempt");
            AuthError::InvalidCredentials
        })?;

    let (user, session) = state
        .backend
        .login(&user)
        .map_err(|_| AuthError::InvalidCredentials)?;

    let cookie = session_cookie(&state.config.session.cookie_name, &session.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserProfile::from(user.as_ref())),
    )
        .into_response())
}

/// Drop the current session
///
/// POST /accounts/logout
pub async fn logout_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let cookie_name = &state.config.session.cookie_name;

    if let Some(token) = session_token(&headers, cookie_name) {
        state.backend.logout(&token);
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, expired_cookie(cookie_name))],
        Json(SuccessResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
        .into_response()
}

/// Profile of the logged-in user
///
/// GET /accounts/me
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, AuthError> {
    let token = session_token(&headers, &state.config.session.cookie_name)
        .ok_or(AuthError::NotAuthenticated)?;

    let user = state
        .backend
        .current_user(&token)
        .ok_or(AuthError::NotAuthenticated)?;

    Ok(Json(UserProfile::from(user.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::manager::ExtraFields;
    use crate::core::state::test_support::create_test_state;
    use axum::http::HeaderValue;

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_session_token_parsing() {
        let headers = cookie_headers("theme=dark; sessionid=abc123; other=1");
        assert_eq!(session_token(&headers, "sessionid"), Some("abc123".to_string()));
        assert_eq!(session_token(&headers, "missing"), None);

        let headers = cookie_headers("sessionid=");
        assert_eq!(session_token(&headers, "sessionid"), None);
    }

    #[test]
    fn test_session_cookie_format() {
        assert_eq!(
            session_cookie("sessionid", "abc"),
            "sessionid=abc; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let test = create_test_state();
        let state = test.state.clone();
        state
            .manager
            .create_user("user@example.com", Some("user123"), None, ExtraFields::default())
            .unwrap();

        let response = login_handler(
            State(state.clone()),
            Form(login_form("user@example.com", "user123")),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let pair = set_cookie.split(';').next().unwrap();

        let Json(profile) = me_handler(State(state.clone()), cookie_headers(pair))
            .await
            .unwrap();
        assert_eq!(profile.email, "user@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let test = create_test_state();
        test.state
            .manager
            .create_user("user@example.com", Some("user123"), None, ExtraFields::default())
            .unwrap();

        let result = login_handler(
            State(test.state.clone()),
            Form(login_form("user@example.com", "wrong")),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(test.state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_login_empty_form() {
        let test = create_test_state();
        let result = login_handler(State(test.state.clone()), Form(LoginForm::default())).await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_without_session() {
        let test = create_test_state();
        let result = me_handler(State(test.state.clone()), HeaderMap::new()).await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));

        let result = me_handler(State(test.state.clone()), cookie_headers("sessionid=bogus")).await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_logout_drops_session() {
        let test = create_test_state();
        let state = test.state.clone();
        let user = state
            .manager
            .create_user("user@example.com", Some("user123"), None, ExtraFields::default())
            .unwrap();
        let (_, session) = state.backend.login(&user).unwrap();

        let headers = cookie_headers(&format!("sessionid={}", session.token));
        let response = logout_handler(State(state.clone()), headers).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.sessions.get(&session.token).is_none());
    }
}
