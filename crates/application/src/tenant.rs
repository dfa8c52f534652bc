//! Tenant use cases: provisioning, activation and invitations.

use std::sync::Arc;

use gatehouse_core::{AggregateRoot, DomainError, DomainResult};
use gatehouse_identity::{
    AdministratorProfile, EmailAddress, EventPublisher, FullName, InvitationDescriptor, Telephone,
    Tenant, TenantProvisioningService, TenantRepository,
};

use crate::commands::{ActivateTenant, DeactivateTenant, OfferInvitation, ProvisionTenant, WithdrawInvitation};
use crate::common::{load_tenant, publish};

#[derive(Clone)]
pub struct TenantApplicationService {
    tenants: Arc<dyn TenantRepository>,
    provisioning: TenantProvisioningService,
    publisher: Arc<dyn EventPublisher>,
}

impl TenantApplicationService {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        provisioning: TenantProvisioningService,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            tenants,
            provisioning,
            publisher,
        }
    }

    /// Returns the new tenant id.
    pub fn provision_tenant(&self, cmd: ProvisionTenant) -> DomainResult<String> {
        let administrator = AdministratorProfile {
            name: FullName::new(&cmd.administrator_first_name, &cmd.administrator_last_name)?,
            email_address: EmailAddress::new(&cmd.contact.email_address)?,
            postal_address: cmd.contact.address.to_postal_address()?,
            primary_telephone: Telephone::new(&cmd.contact.primary_telephone)?,
            secondary_telephone: Telephone::optional(&cmd.contact.secondary_telephone)?,
        };
        let tenant = self
            .provisioning
            .provision_tenant(&cmd.tenant_name, &cmd.tenant_description, &administrator)?;
        Ok(tenant.id().to_string())
    }

    pub fn activate_tenant(&self, cmd: ActivateTenant) -> DomainResult<()> {
        let mut tenant = load_tenant(self.tenants.as_ref(), &cmd.tenant_id)?;
        tenant.activate();
        self.save(&mut tenant)?;
        tracing::info!(tenant_id = %tenant.id(), "tenant activated");
        Ok(())
    }

    pub fn deactivate_tenant(&self, cmd: DeactivateTenant) -> DomainResult<()> {
        let mut tenant = load_tenant(self.tenants.as_ref(), &cmd.tenant_id)?;
        tenant.deactivate();
        self.save(&mut tenant)?;
        tracing::info!(tenant_id = %tenant.id(), "tenant deactivated");
        Ok(())
    }

    /// Offers an invitation, optionally limited to `[valid_from, valid_to]`.
    ///
    /// Returns the invitation id. A window that cannot be applied withdraws
    /// the invitation again and nothing is stored.
    pub fn offer_invitation(&self, cmd: OfferInvitation) -> DomainResult<String> {
        let mut tenant = load_tenant(self.tenants.as_ref(), &cmd.tenant_id)?;
        let invitation = tenant.offer_invitation(&cmd.description)?;
        let invitation_id = invitation.invitation_id.to_string();

        let window = match (cmd.valid_from, cmd.valid_to) {
            (Some(from), Some(to)) => tenant.redefine_invitation_as(&invitation_id, from, to),
            (None, None) => Ok(()),
            _ => Err(DomainError::validation(
                "invitation window needs both a start and an end, or neither",
            )),
        };
        if let Err(err) = window {
            tenant.withdraw_invitation(&invitation_id)?;
            return Err(err);
        }

        self.save(&mut tenant)?;
        Ok(invitation_id)
    }

    /// Returns whether an invitation matched.
    pub fn withdraw_invitation(&self, cmd: WithdrawInvitation) -> DomainResult<bool> {
        let mut tenant = load_tenant(self.tenants.as_ref(), &cmd.tenant_id)?;
        let withdrawn = tenant.withdraw_invitation(&cmd.invitation_identifier)?;
        if withdrawn {
            self.save(&mut tenant)?;
        }
        Ok(withdrawn)
    }

    pub fn available_invitations(&self, tenant_id: &str) -> DomainResult<Vec<InvitationDescriptor>> {
        load_tenant(self.tenants.as_ref(), tenant_id)?.all_available_invitations()
    }

    fn save(&self, tenant: &mut Tenant) -> DomainResult<()> {
        let events = tenant.take_events();
        self.tenants.update(tenant)?;
        publish(self.publisher.as_ref(), events)
    }
}
