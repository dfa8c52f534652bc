//! Group use cases.

use std::sync::Arc;

use gatehouse_core::{AggregateRoot, DomainResult};
use gatehouse_identity::{
    EventPublisher, Group, GroupRepository, MembershipResolver, TenantRepository, UserRepository,
};

use crate::commands::{AddGroupToGroup, AddUserToGroup, ProvisionGroup, RemoveGroupFromGroup, RemoveUserFromGroup};
use crate::common::{load_group, load_tenant, load_user, publish, tenant_id};

#[derive(Clone)]
pub struct GroupApplicationService {
    tenants: Arc<dyn TenantRepository>,
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl GroupApplicationService {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            tenants,
            users,
            groups,
            publisher,
        }
    }

    pub fn provision_group(&self, cmd: ProvisionGroup) -> DomainResult<()> {
        let tenant = load_tenant(self.tenants.as_ref(), &cmd.tenant_id)?;
        let mut group = tenant.provision_group(&cmd.name, &cmd.description)?;
        let events = group.take_events();
        self.groups.add(&group)?;
        publish(self.publisher.as_ref(), events)?;
        tracing::info!(tenant_id = %tenant.id(), group = group.name(), "group provisioned");
        Ok(())
    }

    /// Returns whether the child was newly added.
    pub fn add_group_to_group(&self, cmd: AddGroupToGroup) -> DomainResult<bool> {
        let tenant_id = tenant_id(&cmd.tenant_id)?;
        let mut group = load_group(self.groups.as_ref(), tenant_id, &cmd.group_name)?;
        let child = load_group(self.groups.as_ref(), tenant_id, &cmd.child_group_name)?;
        let added = group.add_group(&child, &self.resolver())?;
        self.save(&mut group)?;
        Ok(added)
    }

    pub fn add_user_to_group(&self, cmd: AddUserToGroup) -> DomainResult<bool> {
        let tenant_id = tenant_id(&cmd.tenant_id)?;
        let mut group = load_group(self.groups.as_ref(), tenant_id, &cmd.group_name)?;
        let user = load_user(self.users.as_ref(), tenant_id, &cmd.username)?;
        let added = group.add_user(&user)?;
        self.save(&mut group)?;
        Ok(added)
    }

    pub fn remove_group_from_group(&self, cmd: RemoveGroupFromGroup) -> DomainResult<bool> {
        let tenant_id = tenant_id(&cmd.tenant_id)?;
        let mut group = load_group(self.groups.as_ref(), tenant_id, &cmd.group_name)?;
        let child = load_group(self.groups.as_ref(), tenant_id, &cmd.child_group_name)?;
        let removed = group.remove_group(&child)?;
        self.save(&mut group)?;
        Ok(removed)
    }

    pub fn remove_user_from_group(&self, cmd: RemoveUserFromGroup) -> DomainResult<bool> {
        let tenant_id = tenant_id(&cmd.tenant_id)?;
        let mut group = load_group(self.groups.as_ref(), tenant_id, &cmd.group_name)?;
        let user = load_user(self.users.as_ref(), tenant_id, &cmd.username)?;
        let removed = group.remove_user(&user)?;
        self.save(&mut group)?;
        Ok(removed)
    }

    /// Direct or nested membership. A disabled user is in no group.
    pub fn is_user_in_group(&self, raw_tenant_id: &str, group_name: &str, username: &str) -> DomainResult<bool> {
        let tenant_id = tenant_id(raw_tenant_id)?;
        let group = load_group(self.groups.as_ref(), tenant_id, group_name)?;
        let user = load_user(self.users.as_ref(), tenant_id, username)?;
        if !user.is_enabled() {
            return Ok(false);
        }
        group.is_member(&user, &self.resolver())
    }

    fn resolver(&self) -> MembershipResolver {
        MembershipResolver::new(self.users.clone(), self.groups.clone())
    }

    /// Unchanged groups are neither written nor announced.
    fn save(&self, group: &mut Group) -> DomainResult<()> {
        let events = group.take_events();
        if events.is_empty() {
            return Ok(());
        }
        self.groups.update(group)?;
        publish(self.publisher.as_ref(), events)
    }
}
