//! User aggregate: credentials, enablement and personal data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_core::{
    AggregateRoot, DomainError, DomainResult, EventRecorder, TenantId, ensure_not_blank,
};
use gatehouse_events::{AggregateEvent, Event, TenantScoped};

use crate::contact::{ContactInformation, EmailAddress, FullName, Person};
use crate::enablement::Enablement;
use crate::group::GroupMember;
use crate::password::{CredentialHasher, PasswordHash, PlainPassword};

// ─────────────────────────────────────────────────────────────────────────────
// User Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// A person allowed to authenticate against a tenant.
///
/// # Invariants
/// - `(tenant_id, username)` is the identity; neither changes after registration.
/// - The password is only ever held as a [`PasswordHash`].
/// - A password is never weak and never equal to the username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    tenant_id: TenantId,
    username: String,
    password: PasswordHash,
    enablement: Enablement,
    person: Person,
    events: EventRecorder<UserEvent>,
}

impl User {
    /// Only reachable through `Tenant::register_user`.
    pub(crate) fn register(
        tenant_id: TenantId,
        username: &str,
        password: &PlainPassword,
        enablement: Enablement,
        person: Person,
        hasher: &dyn CredentialHasher,
    ) -> DomainResult<Self> {
        ensure_not_blank(username, "username")?;
        let password = protect_password(username, None, password, hasher)?;

        let mut user = Self {
            tenant_id,
            username: username.to_string(),
            password,
            enablement,
            person,
            events: EventRecorder::new(),
        };
        user.events.record(UserEvent::Registered(UserRegistered {
            tenant_id,
            username: user.username.clone(),
            name: user.person.name().clone(),
            email_address: user.person.email_address().clone(),
            occurred_at: Utc::now(),
        }));
        Ok(user)
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    pub fn enablement(&self) -> &Enablement {
        &self.enablement
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn is_enabled(&self) -> bool {
        self.enablement.is_enabled()
    }

    pub fn is_enabled_at(&self, now: DateTime<Utc>) -> bool {
        self.enablement.is_enabled_at(now)
    }

    pub fn as_group_member(&self) -> GroupMember {
        GroupMember::user(&self.username)
    }

    pub fn to_descriptor(&self) -> UserDescriptor {
        UserDescriptor {
            tenant_id: self.tenant_id,
            username: self.username.clone(),
            name: self.person.name().formatted_name(),
            email_address: self.person.email_address().clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutators
    // ─────────────────────────────────────────────────────────────────────────

    pub fn change_password(
        &mut self,
        current: &PlainPassword,
        changed: &PlainPassword,
        hasher: &dyn CredentialHasher,
    ) -> DomainResult<()> {
        if hasher.hash(current)? != self.password {
            return Err(DomainError::validation("current password not confirmed"));
        }
        self.password = protect_password(&self.username, Some(&self.password), changed, hasher)?;
        self.events.record(UserEvent::PasswordChanged(UserPasswordChanged {
            tenant_id: self.tenant_id,
            username: self.username.clone(),
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Returns whether anything changed; an unchanged value records no event.
    pub fn change_personal_contact_information(&mut self, contact_information: ContactInformation) -> bool {
        if !self.person.change_contact_information(contact_information.clone()) {
            return false;
        }
        self.events
            .record(UserEvent::ContactInformationChanged(PersonContactInformationChanged {
                tenant_id: self.tenant_id,
                username: self.username.clone(),
                contact_information,
                occurred_at: Utc::now(),
            }));
        true
    }

    /// Returns whether anything changed; an unchanged value records no event.
    pub fn change_personal_name(&mut self, name: FullName) -> bool {
        if !self.person.change_name(name.clone()) {
            return false;
        }
        self.events.record(UserEvent::NameChanged(PersonNameChanged {
            tenant_id: self.tenant_id,
            username: self.username.clone(),
            name,
            occurred_at: Utc::now(),
        }));
        true
    }

    pub fn define_enablement(&mut self, enablement: Enablement) {
        self.enablement = enablement;
        self.events.record(UserEvent::EnablementChanged(UserEnablementChanged {
            tenant_id: self.tenant_id,
            username: self.username.clone(),
            enablement,
            occurred_at: Utc::now(),
        }));
    }
}

impl AggregateRoot for User {
    type Id = (TenantId, String);
    type Event = UserEvent;

    fn id(&self) -> Self::Id {
        (self.tenant_id, self.username.clone())
    }

    fn pending_events(&self) -> &[Self::Event] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<Self::Event> {
        self.events.take()
    }
}

fn protect_password(
    username: &str,
    current: Option<&PasswordHash>,
    changed: &PlainPassword,
    hasher: &dyn CredentialHasher,
) -> DomainResult<PasswordHash> {
    if changed.as_str() == username {
        return Err(DomainError::validation("password must be different from username"));
    }
    if changed.is_weak() {
        return Err(DomainError::validation("password is too weak"));
    }
    let protected = hasher.hash(changed)?;
    if current == Some(&protected) {
        return Err(DomainError::validation(
            "password must be different from the current one",
        ));
    }
    Ok(protected)
}

// ─────────────────────────────────────────────────────────────────────────────
// Descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only view of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDescriptor {
    pub tenant_id: TenantId,
    pub username: String,
    pub name: String,
    pub email_address: EmailAddress,
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Event emitted when a user registers through an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub tenant_id: TenantId,
    pub username: String,
    pub name: FullName,
    pub email_address: EmailAddress,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted when a user's password changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPasswordChanged {
    pub tenant_id: TenantId,
    pub username: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted when a user's enablement is (re)defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnablementChanged {
    pub tenant_id: TenantId,
    pub username: String,
    pub enablement: Enablement,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted when a user's contact information changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonContactInformationChanged {
    pub tenant_id: TenantId,
    pub username: String,
    pub contact_information: ContactInformation,
    pub occurred_at: DateTime<Utc>,
}

/// Event emitted when a user's name changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonNameChanged {
    pub tenant_id: TenantId,
    pub username: String,
    pub name: FullName,
    pub occurred_at: DateTime<Utc>,
}

/// All user events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserEvent {
    Registered(UserRegistered),
    PasswordChanged(UserPasswordChanged),
    EnablementChanged(UserEnablementChanged),
    ContactInformationChanged(PersonContactInformationChanged),
    NameChanged(PersonNameChanged),
}

impl UserEvent {
    pub fn username(&self) -> &str {
        match self {
            UserEvent::Registered(e) => &e.username,
            UserEvent::PasswordChanged(e) => &e.username,
            UserEvent::EnablementChanged(e) => &e.username,
            UserEvent::ContactInformationChanged(e) => &e.username,
            UserEvent::NameChanged(e) => &e.username,
        }
    }
}

impl Event for UserEvent {
    fn event_type(&self) -> &'static str {
        match self {
            UserEvent::Registered(_) => "identity.user.registered",
            UserEvent::PasswordChanged(_) => "identity.user.password_changed",
            UserEvent::EnablementChanged(_) => "identity.user.enablement_changed",
            UserEvent::ContactInformationChanged(_) => "identity.user.contact_information_changed",
            UserEvent::NameChanged(_) => "identity.user.name_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            UserEvent::Registered(e) => e.occurred_at,
            UserEvent::PasswordChanged(e) => e.occurred_at,
            UserEvent::EnablementChanged(e) => e.occurred_at,
            UserEvent::ContactInformationChanged(e) => e.occurred_at,
            UserEvent::NameChanged(e) => e.occurred_at,
        }
    }
}

impl TenantScoped for UserEvent {
    fn tenant_id(&self) -> TenantId {
        match self {
            UserEvent::Registered(e) => e.tenant_id,
            UserEvent::PasswordChanged(e) => e.tenant_id,
            UserEvent::EnablementChanged(e) => e.tenant_id,
            UserEvent::ContactInformationChanged(e) => e.tenant_id,
            UserEvent::NameChanged(e) => e.tenant_id,
        }
    }
}

impl AggregateEvent for UserEvent {
    fn aggregate_type(&self) -> &'static str {
        "user"
    }

    fn aggregate_key(&self) -> String {
        self.username().to_string()
    }
}
