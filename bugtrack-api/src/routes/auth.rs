/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login (mints the access token and sets the `access_token` cookie)
/// - Logout (clears the cookie)
/// - Current user lookup
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login, set cookie, return token
/// - `POST /v1/auth/logout` - Clear the cookie
/// - `GET  /v1/auth/me` - The authenticated user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::AppendHeaders,
    Extension, Json,
};
use bugtrack_shared::{
    auth::{
        jwt,
        middleware::{CurrentUser, AUTH_COOKIE},
        password,
    },
    models::user::{CreateUser, User, UserRole},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display handle
    #[validate(length(
        min = 3,
        max = 100,
        message = "Username must be between 3 and 100 characters"
    ))]
    pub username: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role to assign (PM, Developer, Designer)
    pub role: UserRole,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
///
/// The token is also set as the `access_token` cookie; the body copy exists
/// for non-browser clients.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed access token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Confirmation message
    pub message: String,
}

/// Public view of a user, without the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display handle
    pub username: String,

    /// Role
    pub role: UserRole,

    /// Whether the account is active
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Builds the `Set-Cookie` value carrying the access token
fn auth_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        AUTH_COOKIE, token, max_age_seconds
    )
}

/// Builds the `Set-Cookie` value that clears the access token
fn clear_auth_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", AUTH_COOKIE)
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "pm@example.com",
///   "username": "pm",
///   "password": "SecureP@ss123",
///   "role": "PM"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed (also for an
///   out-of-vocabulary role, rejected at deserialization)
/// - `409 Conflict`: email or username already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    // Unique constraints remain the backstop under concurrent registration
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }
    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            username: req.username,
            password_hash,
            role: req.role,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login endpoint
///
/// Verifies the password, mints a signed access token with the user's email
/// as subject, and sets it as the `access_token` cookie.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "pm@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password; the message does
///   not distinguish the two
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(
    AppendHeaders<[(header::HeaderName, String); 1]>,
    Json<LoginResponse>,
)> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let ttl = state.token_ttl();
    let claims = jwt::Claims::new(user.email.clone(), ttl);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    let cookie = auth_cookie(&token, ttl.num_seconds());

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    ))
}

/// Logout endpoint
///
/// Tokens are stateless, so logout just clears the cookie.
pub async fn logout() -> (
    AppendHeaders<[(header::HeaderName, String); 1]>,
    Json<LogoutResponse>,
) {
    (
        AppendHeaders([(header::SET_COOKIE, clear_auth_cookie())]),
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Current user endpoint
///
/// Returns the authenticated caller resolved by the credential verifier.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("tok123", 86400);
        assert!(cookie.starts_with("access_token=tok123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[test]
    fn test_clear_auth_cookie_expires_immediately() {
        let cookie = clear_auth_cookie();
        assert!(cookie.starts_with("access_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            email: "pm@example.com".to_string(),
            username: "pm-user".to_string(),
            password: "longenough".to_string(),
            role: UserRole::ProjectManager,
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..registration("pm-user", "longenough")
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..registration("pm-user", "short")
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let json = serde_json::json!({
            "email": "pm@example.com",
            "username": "pm",
            "password": "longenough",
            "role": "Admin",
        });
        assert!(serde_json::from_value::<RegisterRequest>(json).is_err());
    }

    #[test]
    fn test_user_response_has_no_password_hash() {
        let body = serde_json::to_value(UserResponse {
            id: Uuid::new_v4(),
            email: "pm@example.com".to_string(),
            username: "pm".to_string(),
            role: UserRole::ProjectManager,
            is_active: true,
            created_at: Utc::now(),
        })
        .unwrap();

        assert!(body.get("password_hash").is_none());
        assert_eq!(body["role"], "PM");
    }

    fn registration(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: "pm@example.com".to_string(),
            username: username.to_string(),
            password: password.to_string(),
            role: UserRole::ProjectManager,
        }
    }
}
