/// Role gate and ownership checks
///
/// Authorization layers on top of the credential verifier: it takes an
/// already-authenticated [`User`] and decides whether that user may perform
/// the requested operation. Failures here are HTTP 403, deliberately
/// distinct from the verifier's 401, so unauthenticated and
/// authenticated-but-unprivileged stay distinguishable to callers.
///
/// # Example
///
/// ```
/// use bugtrack_shared::auth::authorization::require_role;
/// use bugtrack_shared::models::user::{User, UserRole};
///
/// fn create_project(caller: &User) -> Result<(), Box<dyn std::error::Error>> {
///     require_role(caller, UserRole::ProjectManager)?;
///     // ... caller is a PM
///     Ok(())
/// }
/// ```

use crate::models::project::Project;
use crate::models::user::{User, UserRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role does not match the required role
    #[error("Only {}s can perform this action", .required.long_name())]
    RoleMismatch {
        required: UserRole,
        actual: UserRole,
    },

    /// Caller is not the owning Project Manager of the project
    #[error("Only the project's Project Manager can perform this action")]
    NotProjectOwner,
}

/// Requires the caller to hold exactly the given role
///
/// Pure equality on the closed role vocabulary: no hierarchy, no multi-role
/// membership. Works for any single required role without touching the
/// verifier.
///
/// # Errors
///
/// Returns `AuthzError::RoleMismatch` on mismatch.
pub fn require_role(user: &User, required: UserRole) -> Result<(), AuthzError> {
    if user.role != required {
        return Err(AuthzError::RoleMismatch {
            required,
            actual: user.role,
        });
    }

    Ok(())
}

/// Requires the caller to be a Project Manager
pub fn require_project_manager(user: &User) -> Result<(), AuthzError> {
    require_role(user, UserRole::ProjectManager)
}

/// Requires the caller to be the owning Project Manager of a project
///
/// Combines the role gate with ownership: the caller must be a PM and the
/// project's `pm_id` must be the caller.
///
/// # Errors
///
/// Returns `AuthzError::RoleMismatch` if the caller is not a PM at all and
/// `AuthzError::NotProjectOwner` if they are a PM of some other project.
pub fn require_project_owner(user: &User, project: &Project) -> Result<(), AuthzError> {
    require_project_manager(user)?;

    if project.pm_id != user.id {
        return Err(AuthzError::NotProjectOwner);
    }

    Ok(())
}
