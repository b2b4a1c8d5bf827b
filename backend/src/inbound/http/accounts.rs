//! Account endpoints: registration, password login and the current user.
//!
//! ```text
//! POST /auth/register {"username":"rider","email":"rider@example.com","password":"secret1"}
//! POST /auth/login {"email":"admin@example.com","password":"admin123"}
//! GET /auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CredentialsValidationError, Error, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = CredentialsValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
    }
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    Error::invalid_field(err.field(), err.to_string())
}

/// Public view of a user; the password hash never leaves the domain.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub email: String,
    pub username: String,
    #[schema(example = "user")]
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.into(),
            username: user.username.to_string(),
            role: user.role.as_str().to_owned(),
            google_id: user.google_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    /// `Bearer <jwt>`, ready for the `Authorization` header.
    #[schema(example = "Bearer eyJhbGciOiJIUzI1NiJ9...")]
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub role: String,
}

/// Create a password account with the `user` role.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Invalid input or user exists", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    state.auth.register(&registration).await?;
    Ok(HttpResponse::Created().json(MessageResponse {
        message: "User registered successfully!".to_owned(),
    }))
}

/// Exchange e-mail and password for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid email or password", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let signed = state.auth.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        message: "Login successful!".to_owned(),
        token: signed.token.bearer(),
        user_id: signed.user.id.to_string(),
        username: signed.user.username.to_string(),
        role: signed.user.role.as_str().to_owned(),
    }))
}

/// Profile of the user the bearer token belongs to.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing token", body = ErrorSchema),
        (status = 403, description = "Invalid token", body = ErrorSchema),
        (status = 404, description = "User no longer exists", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    Authenticated(claims): Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.auth.current_user(claims.user_id).await?;
    Ok(web::Json(user.into()))
}

#[cfg(test)]
#[path = "accounts/tests.rs"]
mod tests;
