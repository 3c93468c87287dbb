//! Role-based module visibility.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Module, ModulePermission, Role};
use crate::office::BackOffice;

use super::{ServiceError, ServiceResult};

/// Module names each non-admin role sees by default. Admins see everything.
const SUPERVISOR_MODULES: &[&str] = &[
    "dashboard",
    "articles",
    "clients",
    "sales",
    "my-sales",
    "stock-movements",
    "stock-import",
    "missing-stock",
    "sizes-colors",
    "product-variants",
    "groups",
    "employees",
    "payrolls",
    "till",
    "employee-expenses",
    "debts",
    "debt-payments",
    "payments",
    "running-accounts",
    "reports",
];

const VENDOR_MODULES: &[&str] = &[
    "dashboard",
    "articles",
    "clients",
    "sales",
    "my-sales",
    "stock-movements",
    "stock-import",
    "missing-stock",
    "sizes-colors",
    "product-variants",
    "groups",
    "reports",
];

const COLLECTOR_MODULES: &[&str] = &[
    "dashboard",
    "sales",
    "my-sales",
    "payments",
    "running-accounts",
    "till",
    "reports",
];

pub struct PermissionService;

impl PermissionService {
    /// Active modules in navigation order.
    pub fn modules(office: &BackOffice) -> Vec<&Module> {
        let mut modules: Vec<&Module> = office
            .modules
            .iter()
            .filter(|module| module.active)
            .collect();
        modules.sort_by_key(|module| module.order);
        modules
    }

    pub fn create_module(office: &mut BackOffice, module: Module) -> ServiceResult<Uuid> {
        if module.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Module name is required".into()));
        }
        let id = module.id;
        office.modules.push(module);
        office.touch();
        Ok(id)
    }

    /// A user's grants joined with their module, in navigation order.
    pub fn permissions_for_user(office: &BackOffice, user_id: Uuid) -> Vec<&ModulePermission> {
        let mut grants: Vec<&ModulePermission> = office
            .permissions
            .iter()
            .filter(|perm| perm.user_id == user_id)
            .collect();
        grants.sort_by_key(|perm| {
            office
                .module(perm.module_id)
                .map(|module| module.order)
                .unwrap_or(0)
        });
        grants
    }

    pub fn can_view(office: &BackOffice, user_id: Uuid, module_id: Uuid) -> bool {
        office
            .permissions
            .iter()
            .find(|perm| perm.user_id == user_id && perm.module_id == module_id)
            .map(|perm| perm.can_view)
            .unwrap_or(false)
    }

    /// Upserts a batch of grants for one user.
    pub fn set_for_user(
        office: &mut BackOffice,
        user_id: Uuid,
        grants: &[(Uuid, bool)],
    ) -> ServiceResult<()> {
        if office.user(user_id).is_none() {
            return Err(ServiceError::NotFound { entity: "user" });
        }
        for &(module_id, can_view) in grants {
            if office.module(module_id).is_none() {
                return Err(ServiceError::NotFound { entity: "module" });
            }
            match office
                .permissions
                .iter_mut()
                .find(|perm| perm.user_id == user_id && perm.module_id == module_id)
            {
                Some(existing) => {
                    existing.can_view = can_view;
                    existing.updated_at = Utc::now();
                }
                None => office
                    .permissions
                    .push(ModulePermission::new(user_id, module_id, can_view)),
            }
        }
        office.touch();
        Ok(())
    }

    /// Creates missing grants for a user from the role default table,
    /// leaving any existing grant untouched.
    pub fn seed_defaults(office: &mut BackOffice, user_id: Uuid, role: Role) -> ServiceResult<()> {
        if office.user(user_id).is_none() {
            return Err(ServiceError::NotFound { entity: "user" });
        }
        let missing: Vec<(Uuid, bool)> = office
            .modules
            .iter()
            .filter(|module| module.active)
            .filter(|module| {
                !office
                    .permissions
                    .iter()
                    .any(|perm| perm.user_id == user_id && perm.module_id == module.id)
            })
            .map(|module| (module.id, Self::default_can_view(role, &module.name)))
            .collect();
        for (module_id, can_view) in missing {
            office
                .permissions
                .push(ModulePermission::new(user_id, module_id, can_view));
        }
        office.touch();
        Ok(())
    }

    fn default_can_view(role: Role, module_name: &str) -> bool {
        match role {
            Role::Admin => true,
            Role::Supervisor => SUPERVISOR_MODULES.contains(&module_name),
            Role::Vendor => VENDOR_MODULES.contains(&module_name),
            Role::Collector => COLLECTOR_MODULES.contains(&module_name),
        }
    }
}
