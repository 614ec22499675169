//! RBAC enforcement and company scoping.

use uuid::Uuid;

use wellness_core::error::AppError;
use wellness_entity::user::AppRole;

use super::policies::{RbacPolicies, SystemPermission};

/// Checks role permissions and company boundaries.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Enforcer with the default policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with an authorization error unless `role` holds `permission`.
    pub fn require_permission(
        &self,
        role: AppRole,
        permission: SystemPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' does not have permission '{permission:?}'"
            )))
        }
    }

    /// Whether `role` holds `permission`.
    pub fn has_permission(&self, role: AppRole, permission: SystemPermission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Fail unless the caller may act on `target_company`.
    ///
    /// The platform admin may act on any company; everybody else only on
    /// the company they belong to.
    pub fn require_company_scope(
        &self,
        role: AppRole,
        actor_company: Option<Uuid>,
        target_company: Uuid,
    ) -> Result<(), AppError> {
        if role.is_admin() || actor_company == Some(target_company) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You can only manage your own company",
            ))
        }
    }
}
