use crate::error::AppError;
use crate::models::user::Role;

/// Checks that `role` is in the allow-set for an endpoint.
///
/// Allow-sets are enumerated per route; there is no hierarchy, so an ADMIN is
/// rejected from a MANAGER-only route unless listed.
pub fn authorize_roles(role: Role, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_denied_on_admin_manager_routes() {
        assert!(authorize_roles(Role::User, &[Role::Admin, Role::Manager]).is_err());
    }

    #[test]
    fn test_admin_and_manager_permitted_identically() {
        let allowed = [Role::Admin, Role::Manager];
        assert!(authorize_roles(Role::Admin, &allowed).is_ok());
        assert!(authorize_roles(Role::Manager, &allowed).is_ok());
    }

    #[test]
    fn test_no_role_hierarchy() {
        // ADMIN is not implicitly granted MANAGER-only access
        assert!(authorize_roles(Role::Admin, &[Role::Manager]).is_err());
    }

    #[test]
    fn test_empty_allow_set_denies_everyone() {
        assert!(authorize_roles(Role::Admin, &[]).is_err());
        assert!(authorize_roles(Role::Manager, &[]).is_err());
        assert!(authorize_roles(Role::User, &[]).is_err());
    }
}
