//! Tenant aggregate: the isolation boundary, invitation lifecycle and the
//! factory for users, groups and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_core::{
    AggregateRoot, DomainError, DomainResult, Entity, EventRecorder, InvitationId, TenantId,
    ensure_not_blank,
};
use gatehouse_events::{AggregateEvent, Event, TenantScoped};

use crate::contact::{EmailAddress, FullName, Person};
use crate::enablement::Enablement;
use crate::group::Group;
use crate::invitation::{Invitation, InvitationDescriptor};
use crate::password::{CredentialHasher, PlainPassword};
use crate::role::Role;
use crate::user::User;

pub const MAX_TENANT_NAME_LENGTH: usize = 70;

// ─────────────────────────────────────────────────────────────────────────────
// Tenant Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Tenant aggregate.
///
/// # Invariants
/// - Name is non-empty and at most 70 characters; description is non-empty.
/// - An inactive tenant refuses every invitation, registration and
///   provisioning operation.
/// - No two invitations share a token or a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    id: TenantId,
    name: String,
    description: String,
    active: bool,
    invitations: Vec<Invitation>,
    events: EventRecorder<TenantEvent>,
}

impl Tenant {
    pub fn provision(id: TenantId, name: &str, description: &str, active: bool) -> DomainResult<Self> {
        ensure_not_blank(name, "tenant name")?;
        if name.chars().count() > MAX_TENANT_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "tenant name must be at most {MAX_TENANT_NAME_LENGTH} characters"
            )));
        }
        ensure_not_blank(description, "tenant description")?;

        let mut tenant = Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            active,
            invitations: Vec::new(),
            events: EventRecorder::new(),
        };
        tenant.events.record(TenantEvent::Provisioned(TenantProvisioned {
            tenant_id: id,
            name: tenant.name.clone(),
            description: tenant.description.clone(),
            active,
            occurred_at: Utc::now(),
        }));
        Ok(tenant)
    }

    pub fn id(&self) -> TenantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn invitations(&self) -> &[Invitation] {
        &self.invitations
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Activation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.events.record(TenantEvent::Activated(TenantActivated {
            tenant_id: self.id,
            occurred_at: Utc::now(),
        }));
    }

    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.events.record(TenantEvent::Deactivated(TenantDeactivated {
            tenant_id: self.id,
            occurred_at: Utc::now(),
        }));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Invitations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn offer_invitation(&mut self, description: &str) -> DomainResult<InvitationDescriptor> {
        self.ensure_active()?;
        if self.invitation_for(description).is_some() {
            return Err(DomainError::conflict(format!(
                "invitation {description} already exists"
            )));
        }

        let invitation = Invitation::new(description)?;
        let descriptor = invitation.to_descriptor(self.id);
        self.invitations.push(invitation);
        self.events.record(TenantEvent::InvitationOffered(InvitationOffered {
            tenant_id: self.id,
            invitation_id: descriptor.invitation_id,
            description: descriptor.description.clone(),
            occurred_at: Utc::now(),
        }));
        Ok(descriptor)
    }

    /// Limit an invitation to `[starting_on, until]`. Unknown identifiers are ignored.
    pub fn redefine_invitation_as(
        &mut self,
        identifier: &str,
        starting_on: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_active()?;
        match self.invitations.iter_mut().find(|i| i.is_identified_by(identifier)) {
            Some(invitation) => invitation.redefine_as(starting_on, until),
            None => Ok(()),
        }
    }

    /// Drop any time limit of an invitation. Unknown identifiers are ignored.
    pub fn redefine_invitation_as_open_ended(&mut self, identifier: &str) -> DomainResult<()> {
        self.ensure_active()?;
        if let Some(invitation) = self.invitations.iter_mut().find(|i| i.is_identified_by(identifier)) {
            invitation.redefine_as_open_ended();
        }
        Ok(())
    }

    /// Remove the invitation matching `identifier`. Returns whether one was removed.
    pub fn withdraw_invitation(&mut self, identifier: &str) -> DomainResult<bool> {
        self.ensure_active()?;
        let Some(index) = self.invitations.iter().position(|i| i.is_identified_by(identifier)) else {
            return Ok(false);
        };

        let invitation = self.invitations.remove(index);
        self.events.record(TenantEvent::InvitationWithdrawn(InvitationWithdrawn {
            tenant_id: self.id,
            invitation_id: *invitation.id(),
            description: invitation.description().to_string(),
            occurred_at: Utc::now(),
        }));
        Ok(true)
    }

    /// Whether a matching invitation exists and can be redeemed right now.
    pub fn is_invitation_available_through(&self, identifier: &str) -> DomainResult<bool> {
        self.ensure_active()?;
        Ok(self
            .invitation_for(identifier)
            .is_some_and(Invitation::is_available))
    }

    pub fn invitation(&self, identifier: &str) -> DomainResult<Option<InvitationDescriptor>> {
        self.ensure_active()?;
        Ok(self
            .invitation_for(identifier)
            .map(|i| i.to_descriptor(self.id)))
    }

    pub fn all_available_invitations(&self) -> DomainResult<Vec<InvitationDescriptor>> {
        self.invitations_where(true)
    }

    pub fn all_unavailable_invitations(&self) -> DomainResult<Vec<InvitationDescriptor>> {
        self.invitations_where(false)
    }

    fn invitations_where(&self, available: bool) -> DomainResult<Vec<InvitationDescriptor>> {
        self.ensure_active()?;
        let now = Utc::now();
        Ok(self
            .invitations
            .iter()
            .filter(|i| i.is_available_at(now) == available)
            .map(|i| i.to_descriptor(self.id))
            .collect())
    }

    fn invitation_for(&self, identifier: &str) -> Option<&Invitation> {
        self.invitations.iter().find(|i| i.is_identified_by(identifier))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Factories
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a user through an available invitation, consuming it.
    ///
    /// The user is built before the invitation is withdrawn, so a rejected
    /// registration (weak password, blank username, ...) leaves the tenant as it was.
    pub fn register_user(
        &mut self,
        invitation_identifier: &str,
        username: &str,
        password: &PlainPassword,
        enablement: Enablement,
        person: Person,
        hasher: &dyn CredentialHasher,
    ) -> DomainResult<User> {
        if !self.is_invitation_available_through(invitation_identifier)? {
            return Err(DomainError::invariant(format!(
                "no available invitation for {invitation_identifier}"
            )));
        }

        let user = User::register(self.id, username, password, enablement, person, hasher)?;
        self.withdraw_invitation(invitation_identifier)?;
        Ok(user)
    }

    pub fn provision_group(&self, name: &str, description: &str) -> DomainResult<Group> {
        self.ensure_active()?;
        Group::provision(self.id, name, description)
    }

    pub fn provision_role(&self, name: &str, description: &str, supports_nesting: bool) -> DomainResult<Role> {
        self.ensure_active()?;
        Role::provision(self.id, name, description, supports_nesting)
    }

    /// Announce the bootstrap administrator and its one-time password.
    pub(crate) fn record_administrator_registered(&mut self, administrator: &User, password: &PlainPassword) {
        let person = administrator.person();
        self.events.record(TenantEvent::AdministratorRegistered(AdministratorRegistered {
            tenant_id: self.id,
            tenant_name: self.name.clone(),
            administrator_name: person.name().clone(),
            email_address: person.email_address().clone(),
            username: administrator.username().to_string(),
            temporary_password: password.clone(),
            occurred_at: Utc::now(),
        }));
    }

    fn ensure_active(&self) -> DomainResult<()> {
        if !self.active {
            return Err(DomainError::invariant(format!("tenant {} is not active", self.name)));
        }
        Ok(())
    }
}

impl AggregateRoot for Tenant {
    type Id = TenantId;
    type Event = TenantEvent;

    fn id(&self) -> Self::Id {
        self.id
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

/// Event emitted when a tenant is provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProvisioned {
    pub tenant_id: TenantId,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantActivated {
    pub tenant_id: TenantId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantDeactivated {
    pub tenant_id: TenantId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationOffered {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationWithdrawn {
    pub tenant_id: TenantId,
    pub invitation_id: InvitationId,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted once the bootstrap administrator of a new tenant exists.
///
/// Carries the generated password so it can be delivered out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorRegistered {
    pub tenant_id: TenantId,
    pub tenant_name: String,
    pub administrator_name: FullName,
    pub email_address: EmailAddress,
    pub username: String,
    pub temporary_password: PlainPassword,
    pub occurred_at: DateTime<Utc>,
}

/// All tenant events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantEvent {
    Provisioned(TenantProvisioned),
    Activated(TenantActivated),
    Deactivated(TenantDeactivated),
    InvitationOffered(InvitationOffered),
    InvitationWithdrawn(InvitationWithdrawn),
    AdministratorRegistered(AdministratorRegistered),
}

impl Event for TenantEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TenantEvent::Provisioned(_) => "identity.tenant.provisioned",
            TenantEvent::Activated(_) => "identity.tenant.activated",
            TenantEvent::Deactivated(_) => "identity.tenant.deactivated",
            TenantEvent::InvitationOffered(_) => "identity.tenant.invitation_offered",
            TenantEvent::InvitationWithdrawn(_) => "identity.tenant.invitation_withdrawn",
            TenantEvent::AdministratorRegistered(_) => "identity.tenant.administrator_registered",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            TenantEvent::Provisioned(e) => e.occurred_at,
            TenantEvent::Activated(e) => e.occurred_at,
            TenantEvent::Deactivated(e) => e.occurred_at,
            TenantEvent::InvitationOffered(e) => e.occurred_at,
            TenantEvent::InvitationWithdrawn(e) => e.occurred_at,
            TenantEvent::AdministratorRegistered(e) => e.occurred_at,
        }
    }
}

impl TenantScoped for TenantEvent {
    fn tenant_id(&self) -> TenantId {
        match self {
            TenantEvent::Provisioned(e) => e.tenant_id,
            TenantEvent::Activated(e) => e.tenant_id,
            TenantEvent::Deactivated(e) => e.tenant_id,
            TenantEvent::InvitationOffered(e) => e.tenant_id,
            TenantEvent::InvitationWithdrawn(e) => e.tenant_id,
            TenantEvent::AdministratorRegistered(e) => e.tenant_id,
        }
    }
}

impl AggregateEvent for TenantEvent {
    fn aggregate_type(&self) -> &'static str {
        "tenant"
    }

    fn aggregate_key(&self) -> String {
        self.tenant_id().to_string()
    }
}
