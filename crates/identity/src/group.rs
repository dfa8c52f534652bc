//! Group aggregate: a tenant-scoped set of user and group references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_core::{
    AggregateRoot, DomainError, DomainResult, EventRecorder, TenantId, ensure_not_blank,
};
use gatehouse_events::{AggregateEvent, Event, TenantScoped};

use crate::membership::MembershipResolver;
use crate::user::User;

// ─────────────────────────────────────────────────────────────────────────────
// Members
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupMemberType {
    User,
    Group,
}

impl core::fmt::Display for GroupMemberType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GroupMemberType::User => write!(f, "User"),
            GroupMemberType::Group => write!(f, "Group"),
        }
    }
}

/// Reference to a member by kind and name, resolved through a repository
/// when needed. Not an ownership edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMember {
    member_type: GroupMemberType,
    name: String,
}

impl GroupMember {
    pub fn user(username: &str) -> Self {
        Self {
            member_type: GroupMemberType::User,
            name: username.to_string(),
        }
    }

    pub fn group(name: &str) -> Self {
        Self {
            member_type: GroupMemberType::Group,
            name: name.to_string(),
        }
    }

    pub fn member_type(&self) -> GroupMemberType {
        self.member_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_user(&self) -> bool {
        self.member_type == GroupMemberType::User
    }

    pub fn is_group(&self) -> bool {
        self.member_type == GroupMemberType::Group
    }
}

/// Who owns a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    /// Provisioned by a tenant and stored in the group repository.
    Standard,
    /// Holds the assignees of exactly one role; lives inside that role only.
    RoleBacking,
}

// ─────────────────────────────────────────────────────────────────────────────
// Group Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Group aggregate.
///
/// # Invariants
/// - Every member belongs to the group's tenant.
/// - Users are enabled at the moment they are added.
/// - Nesting never forms a cycle and a group never contains itself.
/// - Members are unique and keep insertion order.
/// - Role-backing groups are never members of anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    tenant_id: TenantId,
    name: String,
    description: String,
    kind: GroupKind,
    members: Vec<GroupMember>,
    events: EventRecorder<GroupEvent>,
}

impl Group {
    /// Only reachable through `Tenant::provision_group`.
    pub(crate) fn provision(tenant_id: TenantId, name: &str, description: &str) -> DomainResult<Self> {
        ensure_not_blank(name, "group name")?;
        let mut group = Self {
            tenant_id,
            name: name.to_string(),
            description: description.to_string(),
            kind: GroupKind::Standard,
            members: Vec::new(),
            events: EventRecorder::new(),
        };
        group.events.record(GroupEvent::Provisioned(GroupProvisioned {
            tenant_id,
            name: group.name.clone(),
            occurred_at: Utc::now(),
        }));
        Ok(group)
    }

    pub(crate) fn backing(tenant_id: TenantId, role_name: &str) -> Self {
        Self {
            tenant_id,
            name: role_name.to_string(),
            description: String::new(),
            kind: GroupKind::RoleBacking,
            members: Vec::new(),
            events: EventRecorder::new(),
        }
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

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    pub fn has_member(&self, member: &GroupMember) -> bool {
        self.members.contains(member)
    }

    /// Direct group-typed members, in insertion order.
    pub fn group_members(&self) -> impl DoubleEndedIterator<Item = &GroupMember> {
        self.members.iter().filter(|m| m.is_group())
    }

    pub fn as_member(&self) -> GroupMember {
        GroupMember::group(&self.name)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Membership changes
    // ─────────────────────────────────────────────────────────────────────────

    /// Nest `other` inside this group. Returns `false` if it already was a member.
    pub fn add_group(&mut self, other: &Group, resolver: &MembershipResolver) -> DomainResult<bool> {
        self.ensure_same_tenant(other.tenant_id)?;
        if other.kind == GroupKind::RoleBacking {
            return Err(DomainError::invariant(format!(
                "role group {} cannot be nested",
                other.name
            )));
        }

        // A role-backing group is never a member, so it can never close a loop.
        if self.kind == GroupKind::Standard {
            if other.name == self.name {
                return Err(DomainError::conflict(format!(
                    "group {} cannot contain itself",
                    self.name
                )));
            }
            if resolver.is_member_group(other, &self.as_member())? {
                return Err(DomainError::conflict(format!(
                    "group recursion detected: {} already contains {}",
                    other.name, self.name
                )));
            }
        }

        let member = other.as_member();
        if self.has_member(&member) {
            return Ok(false);
        }
        self.members.push(member);
        self.record(GroupEvent::GroupAdded(GroupGroupAdded {
            tenant_id: self.tenant_id,
            group_name: self.name.clone(),
            nested_group_name: other.name.clone(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    /// Add `user` as a direct member. Returns `false` if it already was one.
    pub fn add_user(&mut self, user: &User) -> DomainResult<bool> {
        self.ensure_same_tenant(user.tenant_id())?;
        if !user.is_enabled() {
            return Err(DomainError::invariant(format!(
                "user {} is not enabled",
                user.username()
            )));
        }

        let member = user.as_group_member();
        if self.has_member(&member) {
            return Ok(false);
        }
        self.members.push(member);
        self.record(GroupEvent::UserAdded(GroupUserAdded {
            tenant_id: self.tenant_id,
            group_name: self.name.clone(),
            username: user.username().to_string(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    /// Whether `user` belongs to this group, directly or through nested groups.
    pub fn is_member(&self, user: &User, resolver: &MembershipResolver) -> DomainResult<bool> {
        self.ensure_same_tenant(user.tenant_id())?;
        if !user.is_enabled() {
            return Err(DomainError::invariant(format!(
                "user {} is not enabled",
                user.username()
            )));
        }

        if self.has_member(&user.as_group_member()) {
            return resolver.confirm_user(self, user);
        }
        resolver.is_user_in_nested_group(self, user)
    }

    pub fn remove_group(&mut self, other: &Group) -> DomainResult<bool> {
        self.ensure_same_tenant(other.tenant_id)?;
        if !self.remove_member(&other.as_member()) {
            return Ok(false);
        }
        self.record(GroupEvent::GroupRemoved(GroupGroupRemoved {
            tenant_id: self.tenant_id,
            group_name: self.name.clone(),
            nested_group_name: other.name.clone(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    pub fn remove_user(&mut self, user: &User) -> DomainResult<bool> {
        self.ensure_same_tenant(user.tenant_id())?;
        if !self.remove_member(&user.as_group_member()) {
            return Ok(false);
        }
        self.record(GroupEvent::UserRemoved(GroupUserRemoved {
            tenant_id: self.tenant_id,
            group_name: self.name.clone(),
            username: user.username().to_string(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    fn remove_member(&mut self, member: &GroupMember) -> bool {
        match self.members.iter().position(|m| m == member) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }

    fn ensure_same_tenant(&self, tenant_id: TenantId) -> DomainResult<()> {
        if tenant_id != self.tenant_id {
            return Err(DomainError::invariant(format!(
                "tenant mismatch: group {} belongs to another tenant",
                self.name
            )));
        }
        Ok(())
    }

    /// Role-backing groups report through their role instead.
    fn record(&mut self, event: GroupEvent) {
        if self.kind == GroupKind::Standard {
            self.events.record(event);
        }
    }
}

impl AggregateRoot for Group {
    type Id = (TenantId, String);
    type Event = GroupEvent;

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

/// Event emitted when a tenant provisions a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProvisioned {
    pub tenant_id: TenantId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted when a group is nested inside another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupGroupAdded {
    pub tenant_id: TenantId,
    pub group_name: String,
    pub nested_group_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted when a nested group is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupGroupRemoved {
    pub tenant_id: TenantId,
    pub group_name: String,
    pub nested_group_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted when a user joins a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUserAdded {
    pub tenant_id: TenantId,
    pub group_name: String,
    pub username: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted when a user leaves a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUserRemoved {
    pub tenant_id: TenantId,
    pub group_name: String,
    pub username: String,
    pub occurred_at: DateTime<Utc>,
}

/// All group events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupEvent {
    Provisioned(GroupProvisioned),
    GroupAdded(GroupGroupAdded),
    GroupRemoved(GroupGroupRemoved),
    UserAdded(GroupUserAdded),
    UserRemoved(GroupUserRemoved),
}

impl GroupEvent {
    pub fn group_name(&self) -> &str {
        match self {
            GroupEvent::Provisioned(e) => &e.name,
            GroupEvent::GroupAdded(e) => &e.group_name,
            GroupEvent::GroupRemoved(e) => &e.group_name,
            GroupEvent::UserAdded(e) => &e.group_name,
            GroupEvent::UserRemoved(e) => &e.group_name,
        }
    }
}

impl Event for GroupEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GroupEvent::Provisioned(_) => "identity.group.provisioned",
            GroupEvent::GroupAdded(_) => "identity.group.group_added",
            GroupEvent::GroupRemoved(_) => "identity.group.group_removed",
            GroupEvent::UserAdded(_) => "identity.group.user_added",
            GroupEvent::UserRemoved(_) => "identity.group.user_removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            GroupEvent::Provisioned(e) => e.occurred_at,
            GroupEvent::GroupAdded(e) => e.occurred_at,
            GroupEvent::GroupRemoved(e) => e.occurred_at,
            GroupEvent::UserAdded(e) => e.occurred_at,
            GroupEvent::UserRemoved(e) => e.occurred_at,
        }
    }
}

impl TenantScoped for GroupEvent {
    fn tenant_id(&self) -> TenantId {
        match self {
            GroupEvent::Provisioned(e) => e.tenant_id,
            GroupEvent::GroupAdded(e) => e.tenant_id,
            GroupEvent::GroupRemoved(e) => e.tenant_id,
            GroupEvent::UserAdded(e) => e.tenant_id,
            GroupEvent::UserRemoved(e) => e.tenant_id,
        }
    }
}

impl AggregateEvent for GroupEvent {
    fn aggregate_type(&self) -> &'static str {
        "group"
    }

    fn aggregate_key(&self) -> String {
        self.group_name().to_string()
    }
}
