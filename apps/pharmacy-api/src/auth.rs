//! Authentication: JWT access tokens, argon2 password hashing and the
//! [`AuthUser`] request extractor.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pharmacy_core::validation::{validate_email, validate_password, validate_username};
use pharmacy_core::{Role, User};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub username: String,

    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// Issues and checks HS256 access tokens.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        JwtManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user: &User) -> ApiResult<String> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            iat: now,
            exp: now + self.lifetime_secs,
            jti: Uuid::new_v4().to_string(),
        };

        self.encode(&claims)
    }

    pub(crate) fn encode(&self, claims: &Claims) -> ApiResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign access token: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::unauthorized("Token has expired"),
                _ => {
                    debug!(error = %e, "Rejected access token");
                    ApiError::unauthorized("Invalid token")
                }
            })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("Bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

// =============================================================================
// Passwords
// =============================================================================

/// Hash a password with argon2 and a fresh random salt.
///
/// Runs on the blocking pool.
pub async fn hash_password(password: &str) -> ApiResult<String> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| ApiError::internal(format!("Password hashing task failed: {}", e)))?
    .map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to hash password")
    })
}

/// Check a password against a stored PHC hash string.
///
/// An unparseable hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || match PasswordHash::new(&hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            false
        }
    })
    .await
    .unwrap_or(false)
}

// =============================================================================
// Extractor
// =============================================================================

/// The authenticated caller, taken from a valid bearer token.
///
/// Adding this as a handler argument makes the route require authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    /// Fails with 403 unless the caller holds `role`.
    pub fn require_role(&self, role: Role) -> ApiResult<()> {
        if self.role == role {
            Ok(())
        } else {
            warn!(user = %self.username, required = %role, actual = %self.role, "Role check failed");
            Err(ApiError::forbidden(format!("Requires {} role", role)))
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let value = header
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid Authorization header"))?;

        let token = extract_bearer_token(value)
            .ok_or_else(|| ApiError::unauthorized("Expected a Bearer token"))?;

        let claims = state.jwt.validate_token(token)?;
        Ok(claims.into())
    }
}

/// An absent `Authorization` header yields `None`; a present but invalid one
/// is still rejected with 401.
impl OptionalFromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(None);
        }

        <AuthUser as FromRequestParts<Arc<AppState>>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

// =============================================================================
// Admin Bootstrap
// =============================================================================

/// Creates the configured admin account (`ADMIN_USERNAME` / `ADMIN_PASSWORD`)
/// unless a user with that name already exists.
///
/// Public registration cannot grant the admin role, so this is how the first
/// admin comes to exist. Returns the created user, or `None` when nothing was
/// configured or the account is already there.
pub async fn ensure_admin(state: &AppState) -> ApiResult<Option<User>> {
    let (Some(username), Some(password)) = (
        state.config.admin_username.as_deref(),
        state.config.admin_password.as_deref(),
    ) else {
        return Ok(None);
    };

    if state.db.users().find_by_username(username).await?.is_some() {
        debug!(username = %username, "Admin account already present");
        return Ok(None);
    }

    let email = state
        .config
        .admin_email
        .clone()
        .unwrap_or_else(|| format!("{username}@pharmacy.local"));

    validate_username(username)?;
    validate_email("ADMIN_EMAIL", &email)?;
    validate_password(password)?;

    let hash = hash_password(password).await?;
    let user = state
        .db
        .users()
        .create(username, &email, &hash, Role::Admin)
        .await?;

    info!(user_id = %user.id, username = %user.username, "Bootstrapped admin account");
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4().to_string(),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);
        let user = user(Role::Admin);

        let token = manager.generate_access_token(&user).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "ana");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtManager::new("one", 3600)
            .generate_access_token(&user(Role::User))
            .unwrap();

        let err = JwtManager::new("two", 3600).validate_token(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new("test-secret", 3600);
        let now = Utc::now().timestamp();
        let token = manager
            .encode(&Claims {
                sub: "u-1".to_string(),
                username: "ana".to_string(),
                role: Role::User,
                iat: now - 7200,
                exp: now - 3600,
                jti: Uuid::new_v4().to_string(),
            })
            .unwrap();

        let err = manager.validate_token(&token).unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
    }

    #[test]
    fn test_require_role() {
        let admin = AuthUser::from(Claims {
            sub: "u-1".to_string(),
            username: "root".to_string(),
            role: Role::Admin,
            iat: 0,
            exp: 0,
            jti: String::new(),
        });
        let clerk = AuthUser {
            role: Role::User,
            ..admin.clone()
        };

        assert!(admin.require_role(Role::Admin).is_ok());
        assert_eq!(
            clerk.require_role(Role::Admin).unwrap_err().code,
            ErrorCode::Forbidden
        );
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("hunter22").await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash).await);
        assert!(!verify_password("hunter23", &hash).await);
        assert!(!verify_password("hunter22", "not-a-hash").await);
    }
}
