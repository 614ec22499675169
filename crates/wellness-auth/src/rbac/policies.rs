//! Role-to-permission mapping.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use wellness_entity::user::AppRole;

/// A platform operation a role may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    // Companies
    /// Create companies and list all of them.
    CompanyManageAll,
    /// View a company and its seat usage.
    CompanyView,
    /// Change the seat limit.
    CompanySeatManage,
    /// Resize the company-wide session pool.
    CompanyPoolManage,

    // Employees
    /// List employees and their balances.
    EmployeeView,
    /// Activate, deactivate and allocate sessions.
    EmployeeManage,

    // Invites
    /// Issue invite codes.
    InviteCreate,
    /// List invite codes.
    InviteView,
    /// Revoke invite codes.
    InviteRevoke,

    // Providers
    /// List providers and their counters.
    ProviderView,
    /// Register, approve and configure providers.
    ProviderManage,
    /// Trigger a round-robin assignment outside a booking.
    ProviderAssign,

    // Bookings
    /// Book sessions and manage one's own bookings.
    BookingCreate,
    /// Record completion or no-show.
    BookingRecordOutcome,
    /// Cancel any booking.
    BookingManageAll,

    // Users
    /// Create user accounts directly.
    UserCreate,

    // System
    /// Access health endpoints.
    SystemHealth,
}

impl SystemPermission {
    /// Every permission.
    pub const ALL: [SystemPermission; 17] = [
        Self::CompanyManageAll,
        Self::CompanyView,
        Self::CompanySeatManage,
        Self::CompanyPoolManage,
        Self::EmployeeView,
        Self::EmployeeManage,
        Self::InviteCreate,
        Self::InviteView,
        Self::InviteRevoke,
        Self::ProviderView,
        Self::ProviderManage,
        Self::ProviderAssign,
        Self::BookingCreate,
        Self::BookingRecordOutcome,
        Self::BookingManageAll,
        Self::UserCreate,
        Self::SystemHealth,
    ];
}

/// Maps each role to its set of permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<AppRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// The default policy set.
    pub fn new() -> Self {
        use SystemPermission::*;

        let mut policies = HashMap::new();

        policies.insert(
            AppRole::User,
            HashSet::from([BookingCreate, SystemHealth]),
        );

        policies.insert(
            AppRole::Hr,
            HashSet::from([
                CompanyView,
                CompanySeatManage,
                EmployeeView,
                EmployeeManage,
                InviteCreate,
                InviteView,
                InviteRevoke,
                SystemHealth,
            ]),
        );

        policies.insert(
            AppRole::Prestador,
            HashSet::from([ProviderView, BookingRecordOutcome, SystemHealth]),
        );

        policies.insert(
            AppRole::Specialist,
            HashSet::from([ProviderView, ProviderAssign, BookingRecordOutcome, SystemHealth]),
        );

        policies.insert(AppRole::Admin, SystemPermission::ALL.into_iter().collect());

        Self { policies }
    }

    /// Whether the role holds the permission.
    pub fn has_permission(&self, role: AppRole, permission: SystemPermission) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|perms| perms.contains(&permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
