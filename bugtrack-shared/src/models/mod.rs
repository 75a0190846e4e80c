/// Database models for BugTrack
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with the closed role vocabulary
/// - `project`: Projects owned by a Project Manager
/// - `issue`: Issues with status/priority/type vocabularies and transitions
///
/// # Example
///
/// ```no_run
/// use bugtrack_shared::models::user::{CreateUser, User, UserRole};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "dev@example.com".to_string(),
///     username: "dev".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Developer,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod issue;
pub mod project;
pub mod user;
