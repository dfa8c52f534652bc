//! Registration invitations offered by a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_core::{DomainError, DomainResult, Entity, InvitationId, TenantId, ensure_not_blank};

/// Single-use token gating user registration, optionally limited in time.
///
/// An invitation is identified either by its token (textual id) or by its
/// description; both keys are unique within a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    id: InvitationId,
    description: String,
    starting_on: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl Invitation {
    pub(crate) fn new(description: &str) -> DomainResult<Self> {
        ensure_not_blank(description, "invitation description")?;
        Ok(Self {
            id: InvitationId::random(),
            description: description.to_string(),
            starting_on: None,
            until: None,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn starting_on(&self) -> Option<DateTime<Utc>> {
        self.starting_on
    }

    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    pub fn is_available(&self) -> bool {
        self.is_available_at(Utc::now())
    }

    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        match (self.starting_on, self.until) {
            (Some(starting_on), Some(until)) => starting_on <= now && now <= until,
            _ => true,
        }
    }

    pub fn is_identified_by(&self, identifier: &str) -> bool {
        self.id.to_string() == identifier || self.description == identifier
    }

    /// Restrict availability to `[starting_on, until]`.
    pub(crate) fn redefine_as(
        &mut self,
        starting_on: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<()> {
        if starting_on >= until {
            return Err(DomainError::validation(
                "invitation must start before it ends",
            ));
        }
        self.starting_on = Some(starting_on);
        self.until = Some(until);
        Ok(())
    }

    pub(crate) fn redefine_as_open_ended(&mut self) {
        self.starting_on = None;
        self.until = None;
    }

    pub fn to_descriptor(&self, tenant_id: TenantId) -> InvitationDescriptor {
        InvitationDescriptor {
            tenant_id,
            invitation_id: self.id,
            description: self.description.clone(),
            starting_on: self.starting_on,
            until: self.until,
        }
    }
}

impl Entity for Invitation {
    type Id = InvitationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Read-only view of an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationDescriptor {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub description: String,
    pub starting_on: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}
