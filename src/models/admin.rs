use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ApiKeyQuery {
    pub api_key: String,
}

/// Form body for provisioning a user from the admin surface
#[derive(Deserialize, Serialize, Default)]
pub struct AdminUserForm {
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
    pub group: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct GroupAddQuery {
    pub api_key: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct GroupJoinQuery {
    pub api_key: String,
    pub email: String,
    pub group: String,
}

#[derive(Deserialize)]
pub struct EmailUserQuery {
    pub api_key: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub from_email: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
