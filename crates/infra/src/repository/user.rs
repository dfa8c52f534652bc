use gatehouse_core::{DomainResult, TenantId};
use gatehouse_identity::{PasswordHash, User, UserRepository};

use crate::store::{InMemoryTenantStore, TenantStore};

#[derive(Debug)]
pub struct InMemoryUserRepository {
    store: InMemoryTenantStore<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: InMemoryTenantStore::new("user"),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn add(&self, user: &User) -> DomainResult<()> {
        self.store
            .insert(user.tenant_id(), user.username().to_string(), user.clone())
    }

    fn update(&self, user: &User) -> DomainResult<()> {
        self.store
            .replace(user.tenant_id(), user.username().to_string(), user.clone())
    }

    fn remove(&self, tenant_id: TenantId, username: &str) -> DomainResult<()> {
        self.store.remove(tenant_id, &username.to_string())?;
        Ok(())
    }

    fn user_with_username(&self, tenant_id: TenantId, username: &str) -> DomainResult<Option<User>> {
        self.store.get(tenant_id, &username.to_string())
    }

    fn user_with_credentials(
        &self,
        tenant_id: TenantId,
        username: &str,
        password: &PasswordHash,
    ) -> DomainResult<Option<User>> {
        Ok(self
            .user_with_username(tenant_id, username)?
            .filter(|u| u.password() == password))
    }

    fn all_users(&self, tenant_id: TenantId) -> DomainResult<Vec<User>> {
        self.store.list(tenant_id)
    }
}
