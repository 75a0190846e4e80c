/// User model and database operations
///
/// This module provides the User model, the closed role vocabulary, and the
/// database operations the rest of the system resolves identities through.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('PM', 'Developer', 'Designer');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     username VARCHAR(100) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use bugtrack_shared::models::user::{CreateUser, User, UserRole};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "pm@example.com".to_string(),
///     username: "pm".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::ProjectManager,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "pm@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed role vocabulary
///
/// Exactly one role per user, compared by exhaustive matching. The wire and
/// database strings are `PM`, `Developer`, `Designer` and must round-trip
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    /// Project Manager: owns projects, assigns issues
    #[serde(rename = "PM")]
    #[sqlx(rename = "PM")]
    ProjectManager,

    /// Developer: works on assigned issues
    #[serde(rename = "Developer")]
    #[sqlx(rename = "Developer")]
    Developer,

    /// Designer: works on assigned issues
    #[serde(rename = "Designer")]
    #[sqlx(rename = "Designer")]
    Designer,
}

impl UserRole {
    /// Wire string for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::ProjectManager => "PM",
            UserRole::Developer => "Developer",
            UserRole::Designer => "Designer",
        }
    }

    /// Human-readable role name for error messages
    pub fn long_name(&self) -> &'static str {
        match self {
            UserRole::ProjectManager => "Project Manager",
            UserRole::Developer => "Developer",
            UserRole::Designer => "Designer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PM" => Ok(UserRole::ProjectManager),
            "Developer" => Ok(UserRole::Developer),
            "Designer" => Ok(UserRole::Designer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    ///
    /// Also the token subject: the credential verifier resolves the JWT
    /// `sub` claim against this column.
    pub email: String,

    /// Display handle, unique across all users
    pub username: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// The user's single role
    pub role: UserRole,

    /// Whether the account is active
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Display handle
    pub username: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Role to assign
    pub role: UserRole,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email or username already exists (unique
    /// constraint violation) or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, password_hash, role, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, role, is_active,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// This is the identity lookup the credential verifier performs after
    /// decoding a token's subject claim.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, role, is_active,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, role, is_active,
                   created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::ProjectManager.as_str(), "PM");
        assert_eq!(UserRole::Developer.as_str(), "Developer");
        assert_eq!(UserRole::Designer.as_str(), "Designer");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("PM".parse::<UserRole>().unwrap(), UserRole::ProjectManager);
        assert_eq!("Developer".parse::<UserRole>().unwrap(), UserRole::Developer);
        assert_eq!("Designer".parse::<UserRole>().unwrap(), UserRole::Designer);
        assert!("Admin".parse::<UserRole>().is_err());
        assert!("pm".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serde_round_trip() {
        for (role, wire) in [
            (UserRole::ProjectManager, "\"PM\""),
            (UserRole::Developer, "\"Developer\""),
            (UserRole::Designer, "\"Designer\""),
        ] {
            assert_eq!(serde_json::to_string(&role).unwrap(), wire);
            assert_eq!(serde_json::from_str::<UserRole>(wire).unwrap(), role);
        }
    }

    #[test]
    fn test_role_rejects_unknown_wire_value() {
        assert!(serde_json::from_str::<UserRole>("\"Manager\"").is_err());
    }

    // Integration coverage for the queries requires a live Postgres and runs
    // in deployment environments, not in this suite.
}
