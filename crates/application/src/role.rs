//! Role use cases.

use std::sync::Arc;

use gatehouse_core::{AggregateRoot, DomainResult};
use gatehouse_identity::{
    AuthorizationService, EventPublisher, GroupRepository, MembershipResolver, Role, RoleRepository,
    TenantRepository, UserRepository,
};

use crate::commands::{AssignGroupToRole, AssignUserToRole, ProvisionRole, UnassignGroupFromRole, UnassignUserFromRole};
use crate::common::{load_group, load_role, load_tenant, load_user, publish, tenant_id};

#[derive(Clone)]
pub struct RoleApplicationService {
    tenants: Arc<dyn TenantRepository>,
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    roles: Arc<dyn RoleRepository>,
    authorization: AuthorizationService,
    publisher: Arc<dyn EventPublisher>,
}

impl RoleApplicationService {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        roles: Arc<dyn RoleRepository>,
        authorization: AuthorizationService,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            tenants,
            users,
            groups,
            roles,
            authorization,
            publisher,
        }
    }

    pub fn provision_role(&self, cmd: ProvisionRole) -> DomainResult<()> {
        let tenant = load_tenant(self.tenants.as_ref(), &cmd.tenant_id)?;
        let mut role = tenant.provision_role(&cmd.role_name, &cmd.description, cmd.supports_nesting)?;
        let events = role.take_events();
        self.roles.add(&role)?;
        publish(self.publisher.as_ref(), events)?;
        tracing::info!(tenant_id = %tenant.id(), role = role.name(), "role provisioned");
        Ok(())
    }

    pub fn assign_user_to_role(&self, cmd: AssignUserToRole) -> DomainResult<bool> {
        let tenant_id = tenant_id(&cmd.tenant_id)?;
        let mut role = load_role(self.roles.as_ref(), tenant_id, &cmd.role_name)?;
        let user = load_user(self.users.as_ref(), tenant_id, &cmd.username)?;
        let assigned = role.assign_user(&user)?;
        self.save(&mut role)?;
        Ok(assigned)
    }

    pub fn unassign_user_from_role(&self, cmd: UnassignUserFromRole) -> DomainResult<bool> {
        let tenant_id = tenant_id(&cmd.tenant_id)?;
        let mut role = load_role(self.roles.as_ref(), tenant_id, &cmd.role_name)?;
        let user = load_user(self.users.as_ref(), tenant_id, &cmd.username)?;
        let unassigned = role.unassign_user(&user)?;
        self.save(&mut role)?;
        Ok(unassigned)
    }

    /// Fails unless the role supports nesting.
    pub fn assign_group_to_role(&self, cmd: AssignGroupToRole) -> DomainResult<bool> {
        let tenant_id = tenant_id(&cmd.tenant_id)?;
        let mut role = load_role(self.roles.as_ref(), tenant_id, &cmd.role_name)?;
        let group = load_group(self.groups.as_ref(), tenant_id, &cmd.group_name)?;
        let resolver = MembershipResolver::new(self.users.clone(), self.groups.clone());
        let assigned = role.assign_group(&group, &resolver)?;
        self.save(&mut role)?;
        Ok(assigned)
    }

    pub fn unassign_group_from_role(&self, cmd: UnassignGroupFromRole) -> DomainResult<bool> {
        let tenant_id = tenant_id(&cmd.tenant_id)?;
        let mut role = load_role(self.roles.as_ref(), tenant_id, &cmd.role_name)?;
        let group = load_group(self.groups.as_ref(), tenant_id, &cmd.group_name)?;
        let unassigned = role.unassign_group(&group)?;
        self.save(&mut role)?;
        Ok(unassigned)
    }

    /// Unknown users and roles are simply not in the role.
    pub fn is_user_in_role(&self, raw_tenant_id: &str, username: &str, role_name: &str) -> DomainResult<bool> {
        self.authorization
            .is_user_of_tenant_in_role(tenant_id(raw_tenant_id)?, username, role_name)
    }

    fn save(&self, role: &mut Role) -> DomainResult<()> {
        let events = role.take_events();
        if events.is_empty() {
            return Ok(());
        }
        self.roles.update(role)?;
        publish(self.publisher.as_ref(), events)
    }
}
