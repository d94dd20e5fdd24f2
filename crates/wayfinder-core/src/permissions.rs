//! Permission checks used to filter the quick-action catalog

use wayfinder_api::Role;

/// Answers whether the current user holds a permission
pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, permission: &str) -> bool;
}

impl PermissionOracle for Role {
    fn has_permission(&self, permission: &str) -> bool {
        self.grants(permission)
    }
}

impl<F> PermissionOracle for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn has_permission(&self, permission: &str) -> bool {
        self(permission)
    }
}

/// Whether an action guarded by `required` is visible. Guarded actions
/// are hidden when no oracle is available.
pub fn is_permitted(required: Option<&str>, oracle: Option<&dyn PermissionOracle>) -> bool {
    match (required, oracle) {
        (None, _) => true,
        (Some(permission), Some(oracle)) => oracle.has_permission(permission),
        (Some(_), None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_api::{PERM_ANALYTICS_EXPORT, PERM_ANALYTICS_VIEW};

    #[test]
    fn test_unguarded_always_permitted() {
        assert!(is_permitted(None, None));
        assert!(is_permitted(None, Some(&Role::Viewer)));
    }

    #[test]
    fn test_guarded_without_oracle_is_hidden() {
        assert!(!is_permitted(Some(PERM_ANALYTICS_VIEW), None));
    }

    #[test]
    fn test_role_oracle() {
        assert!(is_permitted(Some(PERM_ANALYTICS_EXPORT), Some(&Role::Admin)));
        assert!(!is_permitted(Some(PERM_ANALYTICS_EXPORT), Some(&Role::Viewer)));
    }

    #[test]
    fn test_closure_oracle() {
        let only_view = |p: &str| p == PERM_ANALYTICS_VIEW;
        assert!(is_permitted(Some(PERM_ANALYTICS_VIEW), Some(&only_view)));
        assert!(!is_permitted(Some(PERM_ANALYTICS_EXPORT), Some(&only_view)));
    }
}
