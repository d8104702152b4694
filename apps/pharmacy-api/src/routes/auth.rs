//! Registration, login and the caller's own profile.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pharmacy_core::validation::{
    required, required_text, validate_email, validate_password, validate_username,
};
use pharmacy_core::{Role, User};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Token plus the account it was issued for.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

impl AuthResponse {
    fn issue(state: &AppState, user: User) -> ApiResult<Self> {
        Ok(AuthResponse {
            token: state.jwt.generate_access_token(&user)?,
            token_type: "Bearer",
            expires_in: state.jwt.lifetime_secs(),
            user,
        })
    }
}

/// `POST /api/auth/register`
///
/// Open to anonymous callers for the `user` role. Creating an `admin`
/// account requires an admin bearer token.
pub async fn register(
    State(state): State<Arc<AppState>>,
    caller: Option<AuthUser>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let username = required_text("username", body.username)?;
    let email = required_text("email", body.email)?;
    let password = required("password", body.password)?;

    validate_username(&username)?;
    validate_email("email", &email)?;
    validate_password(&password)?;

    let role = match body.role.as_deref().map(str::trim) {
        None | Some("") => Role::default(),
        Some(raw) => raw.parse::<Role>()?,
    };

    if role == Role::Admin {
        let caller = caller.ok_or_else(|| {
            warn!(username = %username, "Anonymous attempt to register an admin");
            ApiError::forbidden("Only an admin can create admin accounts")
        })?;
        caller.require_role(Role::Admin)?;
    }

    let hash = hash_password(&password).await?;
    let user = state.db.users().create(&username, &email, &hash, role).await?;

    let response = AuthResponse::issue(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let username = required_text("username", body.username)?;
    let password = required("password", body.password)?;

    let Some(user) = state.db.users().find_by_username(&username).await? else {
        warn!(username = %username, "Login for unknown user");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&password, &user.password_hash).await {
        warn!(username = %username, "Login with wrong password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, username = %user.username, "User logged in");
    Ok(Json(AuthResponse::issue(&state, user)?))
}

/// `GET /api/profile`
pub async fn profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<User>> {
    let user = state.db.users().get_by_id(&auth.user_id).await?;
    Ok(Json(user))
}
