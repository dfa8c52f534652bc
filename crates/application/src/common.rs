//! Loading and conversion helpers shared by the application services.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use gatehouse_core::{DomainError, DomainResult, TenantId};
use gatehouse_identity::{
    ContactInformation, EmailAddress, Enablement, EventPublisher, Group, GroupRepository,
    IdentityEvent, PostalAddress, Role, RoleRepository, Telephone, Tenant, TenantRepository, User,
    UserRepository,
};

use crate::commands::{AddressFields, ContactFields};

pub(crate) fn tenant_id(raw: &str) -> DomainResult<TenantId> {
    TenantId::from_str(raw)
}

pub(crate) fn load_tenant(repo: &dyn TenantRepository, raw_id: &str) -> DomainResult<Tenant> {
    let id = tenant_id(raw_id)?;
    repo.tenant_with_id(id)?
        .ok_or_else(|| DomainError::not_found("tenant", id.to_string()))
}

pub(crate) fn load_user(repo: &dyn UserRepository, tenant_id: TenantId, username: &str) -> DomainResult<User> {
    repo.user_with_username(tenant_id, username)?
        .ok_or_else(|| DomainError::not_found("user", username))
}

pub(crate) fn load_group(repo: &dyn GroupRepository, tenant_id: TenantId, name: &str) -> DomainResult<Group> {
    repo.group_named(tenant_id, name)?
        .ok_or_else(|| DomainError::not_found("group", name))
}

pub(crate) fn load_role(repo: &dyn RoleRepository, tenant_id: TenantId, name: &str) -> DomainResult<Role> {
    repo.role_named(tenant_id, name)?
        .ok_or_else(|| DomainError::not_found("role", name))
}

pub(crate) fn enablement(
    enabled: bool,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
) -> DomainResult<Enablement> {
    Enablement::new(enabled, start_date, end_date)
}

/// Forward drained aggregate events, in order.
pub(crate) fn publish<E: Into<IdentityEvent>>(publisher: &dyn EventPublisher, events: Vec<E>) -> DomainResult<()> {
    publisher.publish_all(IdentityEvent::batch(events))
}

impl AddressFields {
    pub fn to_postal_address(&self) -> DomainResult<PostalAddress> {
        PostalAddress::new(
            &self.street_name,
            &self.building_number,
            &self.postal_code,
            &self.town,
            &self.state_province,
            &self.country_code,
        )
    }
}

impl ContactFields {
    pub fn to_contact_information(&self) -> DomainResult<ContactInformation> {
        Ok(ContactInformation::new(
            self.address.to_postal_address()?,
            EmailAddress::new(&self.email_address)?,
            Telephone::new(&self.primary_telephone)?,
            Telephone::optional(&self.secondary_telephone)?,
        ))
    }
}
