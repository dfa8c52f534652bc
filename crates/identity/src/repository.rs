//! Persistence ports, one per aggregate kind.
//!
//! Lookups return `Ok(None)` for absence; callers decide whether absence is an
//! error (application services), a negative answer (authentication) or a
//! dangling reference to skip (membership resolution). `Err` is reserved for
//! storage failures and for writes that contradict stored state.

use gatehouse_core::{DomainResult, TenantId};

use crate::group::Group;
use crate::password::PasswordHash;
use crate::role::Role;
use crate::tenant::Tenant;
use crate::user::User;

pub trait TenantRepository: Send + Sync {
    fn add(&self, tenant: &Tenant) -> DomainResult<()>;

    fn update(&self, tenant: &Tenant) -> DomainResult<()>;

    /// Removing an absent tenant is not an error.
    fn remove(&self, tenant_id: TenantId) -> DomainResult<()>;

    fn tenant_with_id(&self, tenant_id: TenantId) -> DomainResult<Option<Tenant>>;

    fn tenant_named(&self, name: &str) -> DomainResult<Option<Tenant>>;

    fn all_tenants(&self) -> DomainResult<Vec<Tenant>>;
}

pub trait UserRepository: Send + Sync {
    fn add(&self, user: &User) -> DomainResult<()>;

    fn update(&self, user: &User) -> DomainResult<()>;

    fn remove(&self, tenant_id: TenantId, username: &str) -> DomainResult<()>;

    fn user_with_username(&self, tenant_id: TenantId, username: &str) -> DomainResult<Option<User>>;

    /// Single lookup by identity and stored credential, so a wrong password
    /// is indistinguishable from an unknown user.
    fn user_with_credentials(
        &self,
        tenant_id: TenantId,
        username: &str,
        password: &PasswordHash,
    ) -> DomainResult<Option<User>>;

    fn all_users(&self, tenant_id: TenantId) -> DomainResult<Vec<User>>;
}

/// Holds standard groups only; role-backing groups live inside their role.
pub trait GroupRepository: Send + Sync {
    fn add(&self, group: &Group) -> DomainResult<()>;

    fn update(&self, group: &Group) -> DomainResult<()>;

    fn remove(&self, tenant_id: TenantId, name: &str) -> DomainResult<()>;

    fn group_named(&self, tenant_id: TenantId, name: &str) -> DomainResult<Option<Group>>;

    fn all_groups(&self, tenant_id: TenantId) -> DomainResult<Vec<Group>>;
}

pub trait RoleRepository: Send + Sync {
    fn add(&self, role: &Role) -> DomainResult<()>;

    fn update(&self, role: &Role) -> DomainResult<()>;

    fn remove(&self, tenant_id: TenantId, name: &str) -> DomainResult<()>;

    fn role_named(&self, tenant_id: TenantId, name: &str) -> DomainResult<Option<Role>>;

    fn all_roles(&self, tenant_id: TenantId) -> DomainResult<Vec<Role>>;
}
