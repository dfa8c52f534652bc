use gatehouse_core::{DomainError, DomainResult, TenantId};
use gatehouse_identity::{Group, GroupKind, GroupRepository};

use crate::store::{InMemoryTenantStore, TenantStore};

/// Stores standard groups only; role-backing groups live inside their role.
#[derive(Debug)]
pub struct InMemoryGroupRepository {
    store: InMemoryTenantStore<String, Group>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self {
            store: InMemoryTenantStore::new("group"),
        }
    }
}

impl Default for InMemoryGroupRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupRepository for InMemoryGroupRepository {
    fn add(&self, group: &Group) -> DomainResult<()> {
        if group.kind() == GroupKind::RoleBacking {
            return Err(DomainError::invariant(format!(
                "group {} backs a role and cannot be stored on its own",
                group.name()
            )));
        }
        self.store
            .insert(group.tenant_id(), group.name().to_string(), group.clone())
    }

    fn update(&self, group: &Group) -> DomainResult<()> {
        self.store
            .replace(group.tenant_id(), group.name().to_string(), group.clone())
    }

    fn remove(&self, tenant_id: TenantId, name: &str) -> DomainResult<()> {
        self.store.remove(tenant_id, &name.to_string())?;
        Ok(())
    }

    fn group_named(&self, tenant_id: TenantId, name: &str) -> DomainResult<Option<Group>> {
        self.store.get(tenant_id, &name.to_string())
    }

    fn all_groups(&self, tenant_id: TenantId) -> DomainResult<Vec<Group>> {
        self.store.list(tenant_id)
    }
}
