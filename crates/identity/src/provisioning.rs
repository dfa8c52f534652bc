//! Tenant provisioning: a new tenant together with its bootstrap administrator.

use std::sync::Arc;

use gatehouse_core::{AggregateRoot, DomainError, DomainResult, TenantId};

use crate::contact::{ContactInformation, EmailAddress, FullName, Person, PostalAddress, Telephone};
use crate::enablement::Enablement;
use crate::events::{EventPublisher, IdentityEvent};
use crate::password::{CredentialHasher, generate_strong_password};
use crate::repository::{RoleRepository, TenantRepository, UserRepository};
use crate::tenant::{Tenant, TenantEvent};

pub const DEFAULT_ADMINISTRATOR_USERNAME: &str = "admin";
pub const DEFAULT_ADMINISTRATOR_ROLE: &str = "Administrator";

/// Names given to the bootstrap administrator and its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningSettings {
    pub administrator_username: String,
    pub administrator_role: String,
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            administrator_username: DEFAULT_ADMINISTRATOR_USERNAME.to_string(),
            administrator_role: DEFAULT_ADMINISTRATOR_ROLE.to_string(),
        }
    }
}

/// Personal data of the bootstrap administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdministratorProfile {
    pub name: FullName,
    pub email_address: EmailAddress,
    pub postal_address: PostalAddress,
    pub primary_telephone: Telephone,
    pub secondary_telephone: Option<Telephone>,
}

impl AdministratorProfile {
    fn to_person(&self) -> Person {
        Person::new(
            self.name.clone(),
            ContactInformation::new(
                self.postal_address.clone(),
                self.email_address.clone(),
                self.primary_telephone.clone(),
                self.secondary_telephone.clone(),
            ),
        )
    }
}

/// Creates a tenant, its administrator user and administrator role.
///
/// Not a transaction: once the tenant is stored, any failure removes the
/// tenant record again (best effort). User and role records already written
/// by the failed attempt are left in place.
#[derive(Clone)]
pub struct TenantProvisioningService {
    tenants: Arc<dyn TenantRepository>,
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    hasher: Arc<dyn CredentialHasher>,
    publisher: Arc<dyn EventPublisher>,
    settings: ProvisioningSettings,
}

impl TenantProvisioningService {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        hasher: Arc<dyn CredentialHasher>,
        publisher: Arc<dyn EventPublisher>,
        settings: ProvisioningSettings,
    ) -> Self {
        Self {
            tenants,
            users,
            roles,
            hasher,
            publisher,
            settings,
        }
    }

    pub fn provision_tenant(
        &self,
        name: &str,
        description: &str,
        administrator: &AdministratorProfile,
    ) -> DomainResult<Tenant> {
        let mut tenant = Tenant::provision(TenantId::new(), name, description, true)?;
        let mut events = IdentityEvent::batch(tenant.take_events());
        self.tenants.add(&tenant)?;

        if let Err(err) = self.bootstrap(&mut tenant, administrator, &mut events) {
            self.compensate(&tenant, &err);
            return Err(err);
        }

        tracing::info!(tenant_id = %tenant.id(), tenant = tenant.name(), "tenant provisioned");
        Ok(tenant)
    }

    fn bootstrap(
        &self,
        tenant: &mut Tenant,
        administrator: &AdministratorProfile,
        events: &mut Vec<IdentityEvent>,
    ) -> DomainResult<()> {
        let invitation = tenant.offer_invitation(&format!(
            "Administrator invitation for {}",
            tenant.name()
        ))?;
        let password = generate_strong_password();

        let mut user = tenant.register_user(
            &invitation.invitation_id.to_string(),
            &self.settings.administrator_username,
            &password,
            Enablement::indefinite(),
            administrator.to_person(),
            self.hasher.as_ref(),
        )?;
        let user_events = user.take_events();
        self.users.add(&user)?;

        let mut role = tenant.provision_role(
            &self.settings.administrator_role,
            &format!("Default {} administrator", tenant.name()),
            false,
        )?;
        role.assign_user(&user)?;
        let role_events = role.take_events();
        self.roles.add(&role)?;

        tenant.record_administrator_registered(&user, &password);
        let tenant_events = tenant.take_events();
        self.tenants.update(tenant)?;

        // AdministratorRegistered goes out last, after everything it announces.
        let (announcement, tenant_events): (Vec<_>, Vec<_>) = tenant_events
            .into_iter()
            .partition(|e| matches!(e, TenantEvent::AdministratorRegistered(_)));
        events.extend(IdentityEvent::batch(tenant_events));
        events.extend(IdentityEvent::batch(user_events));
        events.extend(IdentityEvent::batch(role_events));
        events.extend(IdentityEvent::batch(announcement));

        self.publisher.publish_all(std::mem::take(events))
    }

    fn compensate(&self, tenant: &Tenant, cause: &DomainError) {
        tracing::warn!(
            tenant_id = %tenant.id(),
            error = %cause,
            "tenant provisioning failed, removing tenant"
        );
        if let Err(err) = self.tenants.remove(tenant.id()) {
            tracing::error!(
                tenant_id = %tenant.id(),
                error = %err,
                cause = %cause,
                "tenant compensation failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingRoleRepository, FakeRepositories, PlainHasher, RecordingPublisher};
    use gatehouse_events::Event;

    fn profile() -> AdministratorProfile {
        AdministratorProfile {
            name: FullName::new("Grace", "Hopper").unwrap(),
            email_address: EmailAddress::new("grace@example.com").unwrap(),
            postal_address: PostalAddress::new("Main St", "1", "12345", "Arlington", "VA", "US").unwrap(),
            primary_telephone: Telephone::new("555-123-4567").unwrap(),
            secondary_telephone: None,
        }
    }

    fn service(
        repos: &FakeRepositories,
        roles: Arc<dyn RoleRepository>,
        publisher: Arc<RecordingPublisher>,
    ) -> TenantProvisioningService {
        TenantProvisioningService::new(
            repos.tenants.clone(),
            repos.users.clone(),
            roles,
            Arc::new(PlainHasher),
            publisher,
            ProvisioningSettings::default(),
        )
    }

    #[test]
    fn provisioning_creates_tenant_admin_and_role() {
        let repos = FakeRepositories::default();
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(&repos, repos.roles.clone(), publisher.clone());

        let tenant = service.provision_tenant("Acme", "Acme Corp", &profile()).unwrap();

        let stored = repos.tenants.tenant_with_id(tenant.id()).unwrap().unwrap();
        assert!(stored.is_active());
        assert!(stored.invitations().is_empty());

        let admin = repos.users.user_with_username(tenant.id(), "admin").unwrap().unwrap();
        assert!(admin.is_enabled());
        let role = repos.roles.role_named(tenant.id(), "Administrator").unwrap().unwrap();
        assert!(!role.supports_nesting());
        assert_eq!(role.assignees(), &[admin.as_group_member()]);

        let published = publisher.events();
        let types: Vec<&str> = published.iter().map(|e| e.event_type()).collect();
        assert_eq!(types.first(), Some(&"identity.tenant.provisioned"));
        assert_eq!(types.last(), Some(&"identity.tenant.administrator_registered"));
        assert!(types.contains(&"identity.user.registered"));
        assert!(types.contains(&"identity.role.user_assigned"));
    }

    #[test]
    fn announced_password_authenticates_administrator() {
        let repos = FakeRepositories::default();
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(&repos, repos.roles.clone(), publisher.clone());
        let tenant = service.provision_tenant("Acme", "Acme Corp", &profile()).unwrap();

        let password = publisher
            .events()
            .into_iter()
            .find_map(|e| match e {
                IdentityEvent::Tenant(TenantEvent::AdministratorRegistered(e)) => Some(e.temporary_password),
                _ => None,
            })
            .unwrap();

        let hashed = PlainHasher.hash(&password).unwrap();
        assert!(repos.users.user_with_credentials(tenant.id(), "admin", &hashed).unwrap().is_some());
    }

    #[test]
    fn failure_after_tenant_persisted_removes_tenant() {
        let repos = FakeRepositories::default();
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(&repos, Arc::new(FailingRoleRepository), publisher.clone());

        let err = service.provision_tenant("Acme", "Acme Corp", &profile()).unwrap_err();

        assert!(matches!(err, DomainError::Internal(_)));
        assert!(repos.tenants.all_tenants().unwrap().is_empty());
        assert!(publisher.events().is_empty());
    }

    #[test]
    fn invalid_tenant_name_stores_nothing() {
        let repos = FakeRepositories::default();
        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(&repos, repos.roles.clone(), publisher);

        assert!(service.provision_tenant("", "Acme Corp", &profile()).is_err());
        assert!(repos.tenants.all_tenants().unwrap().is_empty());
    }
}
