use gatehouse_core::{DomainError, DomainResult, TenantId};
use gatehouse_identity::{Tenant, TenantRepository};

use crate::store::{InMemoryTenantStore, TenantStore};

/// Tenants are their own partition; names are unique across the store.
#[derive(Debug)]
pub struct InMemoryTenantRepository {
    store: InMemoryTenantStore<TenantId, Tenant>,
}

impl InMemoryTenantRepository {
    pub fn new() -> Self {
        Self {
            store: InMemoryTenantStore::new("tenant"),
        }
    }
}

impl Default for InMemoryTenantRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantRepository for InMemoryTenantRepository {
    fn add(&self, tenant: &Tenant) -> DomainResult<()> {
        if self.tenant_named(tenant.name())?.is_some() {
            return Err(DomainError::conflict(format!(
                "tenant named {} already exists",
                tenant.name()
            )));
        }
        self.store.insert(tenant.id(), tenant.id(), tenant.clone())
    }

    fn update(&self, tenant: &Tenant) -> DomainResult<()> {
        self.store.replace(tenant.id(), tenant.id(), tenant.clone())
    }

    fn remove(&self, tenant_id: TenantId) -> DomainResult<()> {
        if self.store.remove(tenant_id, &tenant_id)? {
            tracing::debug!(tenant_id = %tenant_id, "tenant removed");
        }
        Ok(())
    }

    fn tenant_with_id(&self, tenant_id: TenantId) -> DomainResult<Option<Tenant>> {
        self.store.get(tenant_id, &tenant_id)
    }

    fn tenant_named(&self, name: &str) -> DomainResult<Option<Tenant>> {
        Ok(self
            .store
            .list_all()?
            .into_iter()
            .find(|t| t.name() == name))
    }

    fn all_tenants(&self) -> DomainResult<Vec<Tenant>> {
        self.store.list_all()
    }
}
