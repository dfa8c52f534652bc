use gatehouse_core::{DomainResult, TenantId};
use gatehouse_identity::{Role, RoleRepository};

use crate::store::{InMemoryTenantStore, TenantStore};

#[derive(Debug)]
pub struct InMemoryRoleRepository {
    store: InMemoryTenantStore<String, Role>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self {
            store: InMemoryTenantStore::new("role"),
        }
    }
}

impl Default for InMemoryRoleRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleRepository for InMemoryRoleRepository {
    fn add(&self, role: &Role) -> DomainResult<()> {
        self.store
            .insert(role.tenant_id(), role.name().to_string(), role.clone())
    }

    fn update(&self, role: &Role) -> DomainResult<()> {
        self.store
            .replace(role.tenant_id(), role.name().to_string(), role.clone())
    }

    fn remove(&self, tenant_id: TenantId, name: &str) -> DomainResult<()> {
        self.store.remove(tenant_id, &name.to_string())?;
        Ok(())
    }

    fn role_named(&self, tenant_id: TenantId, name: &str) -> DomainResult<Option<Role>> {
        self.store.get(tenant_id, &name.to_string())
    }

    fn all_roles(&self, tenant_id: TenantId) -> DomainResult<Vec<Role>> {
        self.store.list(tenant_id)
    }
}
