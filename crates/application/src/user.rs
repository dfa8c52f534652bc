//! User use cases: registration, authentication and personal data.

use std::sync::Arc;

use gatehouse_core::{AggregateRoot, DomainResult};
use gatehouse_identity::{
    AuthenticationService, CredentialHasher, EmailAddress, EventPublisher, FullName, IdentityEvent,
    Person, Telephone, TenantRepository, User, UserDescriptor, UserRepository,
};

use crate::commands::{
    AuthenticateUser, ChangeContactInformation, ChangeEmailAddress, ChangePostalAddress,
    ChangePrimaryTelephone, ChangeSecondaryTelephone, ChangeUserPassword, ChangeUserPersonalName,
    DefineUserEnablement, RegisterUser,
};
use crate::common::{enablement, load_tenant, load_user, tenant_id};

#[derive(Clone)]
pub struct UserApplicationService {
    tenants: Arc<dyn TenantRepository>,
    users: Arc<dyn UserRepository>,
    authentication: AuthenticationService,
    hasher: Arc<dyn CredentialHasher>,
    publisher: Arc<dyn EventPublisher>,
}

impl UserApplicationService {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        users: Arc<dyn UserRepository>,
        authentication: AuthenticationService,
        hasher: Arc<dyn CredentialHasher>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            tenants,
            users,
            authentication,
            hasher,
            publisher,
        }
    }

    /// Registers through an invitation; the invitation is consumed.
    pub fn register_user(&self, cmd: RegisterUser) -> DomainResult<UserDescriptor> {
        let mut tenant = load_tenant(self.tenants.as_ref(), &cmd.tenant_id)?;
        let person = Person::new(
            FullName::new(&cmd.first_name, &cmd.last_name)?,
            cmd.contact.to_contact_information()?,
        );
        let mut user = tenant.register_user(
            &cmd.invitation_identifier,
            &cmd.username,
            &cmd.password,
            enablement(cmd.enabled, cmd.start_date, cmd.end_date)?,
            person,
            self.hasher.as_ref(),
        )?;

        let user_events = user.take_events();
        let tenant_events = tenant.take_events();
        self.users.add(&user)?;
        self.tenants.update(&tenant)?;

        let mut events = IdentityEvent::batch(tenant_events);
        events.extend(IdentityEvent::batch(user_events));
        self.publisher.publish_all(events)?;

        tracing::info!(tenant_id = %tenant.id(), username = user.username(), "user registered");
        Ok(user.to_descriptor())
    }

    /// `None` for any failed attempt; see [`AuthenticationService`].
    pub fn authenticate_user(&self, cmd: AuthenticateUser) -> DomainResult<Option<UserDescriptor>> {
        self.authentication
            .authenticate(tenant_id(&cmd.tenant_id)?, &cmd.username, &cmd.password)
    }

    pub fn change_contact_information(&self, cmd: ChangeContactInformation) -> DomainResult<()> {
        let contact_information = cmd.contact.to_contact_information()?;
        self.modify(&cmd.tenant_id, &cmd.username, |user| {
            user.change_personal_contact_information(contact_information);
            Ok(())
        })
    }

    pub fn change_email_address(&self, cmd: ChangeEmailAddress) -> DomainResult<()> {
        let email_address = EmailAddress::new(&cmd.email_address)?;
        self.modify(&cmd.tenant_id, &cmd.username, |user| {
            let changed = user
                .person()
                .contact_information()
                .with_email_address(email_address);
            user.change_personal_contact_information(changed);
            Ok(())
        })
    }

    pub fn change_postal_address(&self, cmd: ChangePostalAddress) -> DomainResult<()> {
        let postal_address = cmd.address.to_postal_address()?;
        self.modify(&cmd.tenant_id, &cmd.username, |user| {
            let changed = user
                .person()
                .contact_information()
                .with_postal_address(postal_address);
            user.change_personal_contact_information(changed);
            Ok(())
        })
    }

    pub fn change_primary_telephone(&self, cmd: ChangePrimaryTelephone) -> DomainResult<()> {
        let telephone = Telephone::new(&cmd.primary_telephone)?;
        self.modify(&cmd.tenant_id, &cmd.username, |user| {
            let changed = user
                .person()
                .contact_information()
                .with_primary_telephone(telephone);
            user.change_personal_contact_information(changed);
            Ok(())
        })
    }

    /// A blank number removes the secondary telephone.
    pub fn change_secondary_telephone(&self, cmd: ChangeSecondaryTelephone) -> DomainResult<()> {
        let telephone = Telephone::optional(&cmd.secondary_telephone)?;
        self.modify(&cmd.tenant_id, &cmd.username, |user| {
            let changed = user
                .person()
                .contact_information()
                .with_secondary_telephone(telephone);
            user.change_personal_contact_information(changed);
            Ok(())
        })
    }

    pub fn change_user_password(&self, cmd: ChangeUserPassword) -> DomainResult<()> {
        self.modify(&cmd.tenant_id, &cmd.username, |user| {
            user.change_password(&cmd.current_password, &cmd.changed_password, self.hasher.as_ref())
        })
    }

    pub fn change_user_personal_name(&self, cmd: ChangeUserPersonalName) -> DomainResult<()> {
        let name = FullName::new(&cmd.first_name, &cmd.last_name)?;
        self.modify(&cmd.tenant_id, &cmd.username, |user| {
            user.change_personal_name(name);
            Ok(())
        })
    }

    pub fn define_user_enablement(&self, cmd: DefineUserEnablement) -> DomainResult<()> {
        let enablement = enablement(cmd.enabled, cmd.start_date, cmd.end_date)?;
        self.modify(&cmd.tenant_id, &cmd.username, |user| {
            user.define_enablement(enablement);
            Ok(())
        })
    }

    /// Load, mutate, persist, publish. Nothing is written when `change` fails.
    fn modify(
        &self,
        raw_tenant_id: &str,
        username: &str,
        change: impl FnOnce(&mut User) -> DomainResult<()>,
    ) -> DomainResult<()> {
        let mut user = load_user(self.users.as_ref(), tenant_id(raw_tenant_id)?, username)?;
        change(&mut user)?;

        let events = user.take_events();
        if events.is_empty() {
            return Ok(());
        }
        self.users.update(&user)?;
        self.publisher.publish_all(IdentityEvent::batch(events))
    }
}
