//! Membership resolution across the nested group graph.
//!
//! Groups reference their members by name, so answering "is X (transitively)
//! in G" means loading nested groups one by one from the repository. Both
//! searches are iterative depth-first walks in member insertion order with a
//! per-call visited set, so they terminate even on cyclic data that was
//! stored before the cycle check existed.

use std::collections::HashSet;
use std::sync::Arc;

use gatehouse_core::{DomainError, DomainResult, TenantId};

use crate::group::{Group, GroupKind, GroupMember};
use crate::repository::{GroupRepository, UserRepository};
use crate::user::User;

/// Stateless domain service answering membership questions.
#[derive(Clone)]
pub struct MembershipResolver {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl MembershipResolver {
    pub fn new(users: Arc<dyn UserRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { users, groups }
    }

    /// Re-check a direct member against current state: the user must still
    /// exist under the group's tenant and be enabled right now.
    pub fn confirm_user(&self, group: &Group, user: &User) -> DomainResult<bool> {
        let current = self
            .users
            .user_with_username(group.tenant_id(), user.username())?;
        Ok(current.is_some_and(|u| u.is_enabled()))
    }

    /// Whether `candidate` is reachable from `group` through group members.
    pub fn is_member_group(&self, group: &Group, candidate: &GroupMember) -> DomainResult<bool> {
        let mut visited = Self::visited_from(group);
        let mut pending: Vec<GroupMember> = group.group_members().rev().cloned().collect();

        while let Some(member) = pending.pop() {
            if &member == candidate {
                return Ok(true);
            }
            if !visited.insert(member.name().to_string()) {
                continue;
            }
            if let Some(nested) = self.nested_group(group.tenant_id(), member.name())? {
                pending.extend(nested.group_members().rev().cloned());
            }
        }
        Ok(false)
    }

    /// Whether `user` is a confirmed member of any group nested under `group`.
    ///
    /// A nested group listing the user directly settles its own branch through
    /// [`confirm_user`](Self::confirm_user); other branches keep descending.
    pub fn is_user_in_nested_group(&self, group: &Group, user: &User) -> DomainResult<bool> {
        let user_member = user.as_group_member();
        let mut visited = Self::visited_from(group);
        let mut pending: Vec<GroupMember> = group.group_members().rev().cloned().collect();

        while let Some(member) = pending.pop() {
            if !visited.insert(member.name().to_string()) {
                continue;
            }
            let Some(nested) = self.nested_group(group.tenant_id(), member.name())? else {
                continue;
            };
            if nested.has_member(&user_member) {
                if self.confirm_user(&nested, user)? {
                    return Ok(true);
                }
                continue;
            }
            pending.extend(nested.group_members().rev().cloned());
        }
        Ok(false)
    }

    fn visited_from(root: &Group) -> HashSet<String> {
        let mut visited = HashSet::new();
        // A role-backing group shares its role's name, which may also be the
        // name of an ordinary group reachable from it.
        if root.kind() == GroupKind::Standard {
            visited.insert(root.name().to_string());
        }
        visited
    }

    fn nested_group(&self, tenant_id: TenantId, name: &str) -> DomainResult<Option<Group>> {
        let Some(nested) = self.groups.group_named(tenant_id, name)? else {
            tracing::warn!(tenant_id = %tenant_id, group = %name, "skipping dangling group member");
            return Ok(None);
        };
        if nested.tenant_id() != tenant_id {
            return Err(DomainError::invariant(format!(
                "tenant mismatch: nested group {name} belongs to another tenant"
            )));
        }
        Ok(Some(nested))
    }
}

impl core::fmt::Debug for MembershipResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MembershipResolver").finish_non_exhaustive()
    }
}
