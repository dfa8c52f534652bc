//! Role-based authorization decisions.

use std::sync::Arc;

use gatehouse_core::{DomainResult, TenantId};

use crate::membership::MembershipResolver;
use crate::repository::{GroupRepository, RoleRepository, UserRepository};
use crate::user::User;

/// Answers "is this user in that role".
#[derive(Clone)]
pub struct AuthorizationService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl AuthorizationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        roles: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            roles,
        }
    }

    /// A disabled user is never in a role; the role is not even looked up.
    pub fn is_user_in_role(&self, user: &User, role_name: &str) -> DomainResult<bool> {
        if !user.is_enabled() {
            tracing::debug!(
                tenant_id = %user.tenant_id(),
                username = user.username(),
                role = role_name,
                "user disabled, role check denied"
            );
            return Ok(false);
        }

        let Some(role) = self.roles.role_named(user.tenant_id(), role_name)? else {
            tracing::debug!(tenant_id = %user.tenant_id(), role = role_name, "role not found");
            return Ok(false);
        };

        let authorized = role.is_in_role(user, &self.resolver())?;
        tracing::debug!(
            tenant_id = %user.tenant_id(),
            username = user.username(),
            role = role_name,
            authorized,
            "role check"
        );
        Ok(authorized)
    }

    pub fn is_user_of_tenant_in_role(
        &self,
        tenant_id: TenantId,
        username: &str,
        role_name: &str,
    ) -> DomainResult<bool> {
        match self.users.user_with_username(tenant_id, username)? {
            Some(user) => self.is_user_in_role(&user, role_name),
            None => Ok(false),
        }
    }

    fn resolver(&self) -> MembershipResolver {
        MembershipResolver::new(self.users.clone(), self.groups.clone())
    }
}
