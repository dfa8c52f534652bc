//! Shared setup for the application integration tests.

#![allow(dead_code)]

use gatehouse_application::Application;
use gatehouse_application::commands::{
    AddressFields, ContactFields, OfferInvitation, ProvisionTenant, RegisterUser,
};
use gatehouse_events::{EventEnvelope, Subscription};
use gatehouse_identity::{IdentityEvent, PlainPassword, TenantEvent};
use gatehouse_infra::IamConfig;

pub const PASSWORD: &str = "Str0ng!Pass";

pub struct TestSystem {
    pub app: Application,
    pub events: Subscription<EventEnvelope<IdentityEvent>>,
    pub tenant_id: String,
    pub admin_password: PlainPassword,
}

impl TestSystem {
    /// One provisioned tenant "Acme"; the subscription is drained afterwards.
    pub fn new() -> anyhow::Result<Self> {
        let app = Application::in_memory(&IamConfig::default());
        let events = app.subscribe();
        let tenant_id = app.tenants.provision_tenant(provision_tenant("Acme"))?;

        let admin_password = events
            .drain()
            .into_iter()
            .find_map(|envelope| match envelope.into_payload() {
                IdentityEvent::Tenant(TenantEvent::AdministratorRegistered(e)) => Some(e.temporary_password),
                _ => None,
            })
            .ok_or_else(|| anyhow::anyhow!("administrator was not announced"))?;

        Ok(Self {
            app,
            events,
            tenant_id,
            admin_password,
        })
    }

    pub fn invite(&self, description: &str) -> anyhow::Result<String> {
        Ok(self.app.tenants.offer_invitation(OfferInvitation {
            tenant_id: self.tenant_id.clone(),
            description: description.to_string(),
            valid_from: None,
            valid_to: None,
        })?)
    }

    /// Invite and register an enabled user with [`PASSWORD`].
    pub fn register(&self, username: &str) -> anyhow::Result<()> {
        let invitation = format!("invite {username}");
        self.invite(&invitation)?;
        self.app
            .users
            .register_user(register_user(&self.tenant_id, &invitation, username))?;
        Ok(())
    }

    /// Event types published since the last call.
    pub fn published(&self) -> Vec<String> {
        self.events
            .drain()
            .iter()
            .map(|e| e.event_type().to_string())
            .collect()
    }
}

pub fn contact(email: &str) -> ContactFields {
    ContactFields {
        email_address: email.to_string(),
        primary_telephone: "555-123-4567".to_string(),
        secondary_telephone: String::new(),
        address: address("Main St"),
    }
}

pub fn address(street: &str) -> AddressFields {
    AddressFields {
        street_name: street.to_string(),
        building_number: "1".to_string(),
        postal_code: "12345".to_string(),
        town: "Springfield".to_string(),
        state_province: "IL".to_string(),
        country_code: "US".to_string(),
    }
}

pub fn provision_tenant(name: &str) -> ProvisionTenant {
    ProvisionTenant {
        tenant_name: name.to_string(),
        tenant_description: format!("{name} Corp"),
        administrator_first_name: "Grace".to_string(),
        administrator_last_name: "Hopper".to_string(),
        contact: contact("grace@example.com"),
    }
}

pub fn register_user(tenant_id: &str, invitation: &str, username: &str) -> RegisterUser {
    RegisterUser {
        tenant_id: tenant_id.to_string(),
        invitation_identifier: invitation.to_string(),
        username: username.to_string(),
        password: PlainPassword::new(PASSWORD),
        first_name: username.to_string(),
        last_name: "Example".to_string(),
        enabled: true,
        start_date: None,
        end_date: None,
        contact: contact(&format!("{username}@example.com")),
    }
}
