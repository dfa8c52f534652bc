//! Role aggregate: a named grant whose assignees live in a private group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_core::{
    AggregateRoot, DomainError, DomainResult, EventRecorder, TenantId, ensure_not_blank,
};
use gatehouse_events::{AggregateEvent, Event, TenantScoped};

use crate::group::{Group, GroupMember};
use crate::membership::MembershipResolver;
use crate::user::User;

// ─────────────────────────────────────────────────────────────────────────────
// Role Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Role aggregate.
///
/// # Invariants
/// - Assignees are held by a role-backing group that no other aggregate can
///   see or reference.
/// - Groups can only be assigned when the role supports nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    tenant_id: TenantId,
    name: String,
    description: String,
    supports_nesting: bool,
    assignees: Group,
    events: EventRecorder<RoleEvent>,
}

impl Role {
    /// Only reachable through `Tenant::provision_role`.
    pub(crate) fn provision(
        tenant_id: TenantId,
        name: &str,
        description: &str,
        supports_nesting: bool,
    ) -> DomainResult<Self> {
        ensure_not_blank(name, "role name")?;
        let mut role = Self {
            tenant_id,
            name: name.to_string(),
            description: description.to_string(),
            supports_nesting,
            assignees: Group::backing(tenant_id, name),
            events: EventRecorder::new(),
        };
        role.events.record(RoleEvent::Provisioned(RoleProvisioned {
            tenant_id,
            name: role.name.clone(),
            supports_nesting,
            occurred_at: Utc::now(),
        }));
        Ok(role)
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn supports_nesting(&self) -> bool {
        self.supports_nesting
    }

    /// Directly assigned users and groups, in assignment order.
    pub fn assignees(&self) -> &[GroupMember] {
        self.assignees.members()
    }

    /// The role-backing group holding the assignees. It can neither be nested
    /// nor stored as a group of its own.
    pub fn assignee_group(&self) -> &Group {
        &self.assignees
    }

    pub fn assign_group(&mut self, group: &Group, resolver: &MembershipResolver) -> DomainResult<bool> {
        self.ensure_supports_nesting()?;
        self.ensure_same_tenant(group.tenant_id())?;
        if !self.assignees.add_group(group, resolver)? {
            return Ok(false);
        }
        self.events.record(RoleEvent::GroupAssigned(GroupAssignedToRole {
            tenant_id: self.tenant_id,
            role_name: self.name.clone(),
            group_name: group.name().to_string(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    pub fn assign_user(&mut self, user: &User) -> DomainResult<bool> {
        self.ensure_same_tenant(user.tenant_id())?;
        if !self.assignees.add_user(user)? {
            return Ok(false);
        }
        self.events.record(RoleEvent::UserAssigned(UserAssignedToRole {
            tenant_id: self.tenant_id,
            role_name: self.name.clone(),
            username: user.username().to_string(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    pub fn unassign_group(&mut self, group: &Group) -> DomainResult<bool> {
        self.ensure_supports_nesting()?;
        if !self.assignees.remove_group(group)? {
            return Ok(false);
        }
        self.events.record(RoleEvent::GroupUnassigned(GroupUnassignedFromRole {
            tenant_id: self.tenant_id,
            role_name: self.name.clone(),
            group_name: group.name().to_string(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    pub fn unassign_user(&mut self, user: &User) -> DomainResult<bool> {
        if !self.assignees.remove_user(user)? {
            return Ok(false);
        }
        self.events.record(RoleEvent::UserUnassigned(UserUnassignedFromRole {
            tenant_id: self.tenant_id,
            role_name: self.name.clone(),
            username: user.username().to_string(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    pub fn is_in_role(&self, user: &User, resolver: &MembershipResolver) -> DomainResult<bool> {
        self.assignees.is_member(user, resolver)
    }

    fn ensure_supports_nesting(&self) -> DomainResult<()> {
        if !self.supports_nesting {
            return Err(DomainError::invariant(format!(
                "role {} does not support group nesting",
                self.name
            )));
        }
        Ok(())
    }

    fn ensure_same_tenant(&self, tenant_id: TenantId) -> DomainResult<()> {
        if tenant_id != self.tenant_id {
            return Err(DomainError::invariant(format!(
                "tenant mismatch: role {} belongs to another tenant",
                self.name
            )));
        }
        Ok(())
    }
}

impl AggregateRoot for Role {
    type Id = (TenantId, String);
    type Event = RoleEvent;

    fn id(&self) -> Self::Id {
        (self.tenant_id, self.name.clone())
    }

    fn pending_events(&self) -> &[Self::Event] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<Self::Event> {
        self.events.take()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Event emitted when a tenant provisions a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProvisioned {
    pub tenant_id: TenantId,
    pub name: String,
    pub supports_nesting: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAssignedToRole {
    pub tenant_id: TenantId,
    pub role_name: String,
    pub username: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUnassignedFromRole {
    pub tenant_id: TenantId,
    pub role_name: String,
    pub username: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignedToRole {
    pub tenant_id: TenantId,
    pub role_name: String,
    pub group_name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUnassignedFromRole {
    pub tenant_id: TenantId,
    pub role_name: String,
    pub group_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// All role events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleEvent {
    Provisioned(RoleProvisioned),
    UserAssigned(UserAssignedToRole),
    UserUnassigned(UserUnassignedFromRole),
    GroupAssigned(GroupAssignedToRole),
    GroupUnassigned(GroupUnassignedFromRole),
}

impl RoleEvent {
    pub fn role_name(&self) -> &str {
        match self {
            RoleEvent::Provisioned(e) => &e.name,
            RoleEvent::UserAssigned(e) => &e.role_name,
            RoleEvent::UserUnassigned(e) => &e.role_name,
            RoleEvent::GroupAssigned(e) => &e.role_name,
            RoleEvent::GroupUnassigned(e) => &e.role_name,
        }
    }
}

impl Event for RoleEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RoleEvent::Provisioned(_) => "identity.role.provisioned",
            RoleEvent::UserAssigned(_) => "identity.role.user_assigned",
            RoleEvent::UserUnassigned(_) => "identity.role.user_unassigned",
            RoleEvent::GroupAssigned(_) => "identity.role.group_assigned",
            RoleEvent::GroupUnassigned(_) => "identity.role.group_unassigned",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RoleEvent::Provisioned(e) => e.occurred_at,
            RoleEvent::UserAssigned(e) => e.occurred_at,
            RoleEvent::UserUnassigned(e) => e.occurred_at,
            RoleEvent::GroupAssigned(e) => e.occurred_at,
            RoleEvent::GroupUnassigned(e) => e.occurred_at,
        }
    }
}

impl TenantScoped for RoleEvent {
    fn tenant_id(&self) -> TenantId {
        match self {
            RoleEvent::Provisioned(e) => e.tenant_id,
            RoleEvent::UserAssigned(e) => e.tenant_id,
            RoleEvent::UserUnassigned(e) => e.tenant_id,
            RoleEvent::GroupAssigned(e) => e.tenant_id,
            RoleEvent::GroupUnassigned(e) => e.tenant_id,
        }
    }
}

impl AggregateEvent for RoleEvent {
    fn aggregate_type(&self) -> &'static str {
        "role"
    }

    fn aggregate_key(&self) -> String {
        self.role_name().to_string()
    }
}
