//! Explicit wiring of the whole system.

use std::sync::Arc;

use gatehouse_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use gatehouse_identity::{
    AuthenticationService, AuthorizationService, BusPublisher, CredentialHasher, EventPublisher,
    GroupRepository, IdentityEvent, RoleRepository, TenantProvisioningService, TenantRepository,
    UserRepository,
};
use gatehouse_infra::{
    IamConfig, InMemoryGroupRepository, InMemoryRoleRepository, InMemoryTenantRepository,
    InMemoryUserRepository, Sha256CredentialHasher,
};

use crate::group::GroupApplicationService;
use crate::role::RoleApplicationService;
use crate::tenant::TenantApplicationService;
use crate::user::UserApplicationService;

pub type IdentityBus = InMemoryEventBus<EventEnvelope<IdentityEvent>>;

/// Every application service, sharing one set of repositories and one bus.
#[derive(Clone)]
pub struct Application {
    pub tenants: TenantApplicationService,
    pub users: UserApplicationService,
    pub groups: GroupApplicationService,
    pub roles: RoleApplicationService,
    bus: Arc<IdentityBus>,
}

impl Application {
    /// In-memory repositories, the SHA-256 hasher and an in-memory bus.
    pub fn in_memory(config: &IamConfig) -> Self {
        let tenants: Arc<dyn TenantRepository> = Arc::new(InMemoryTenantRepository::new());
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let groups: Arc<dyn GroupRepository> = Arc::new(InMemoryGroupRepository::new());
        let roles: Arc<dyn RoleRepository> = Arc::new(InMemoryRoleRepository::new());
        let hasher: Arc<dyn CredentialHasher> =
            Arc::new(Sha256CredentialHasher::new(config.credential_pepper.clone()));
        let bus = Arc::new(IdentityBus::new());
        let publisher: Arc<dyn EventPublisher> = Arc::new(BusPublisher::new(bus.clone()));

        let provisioning = TenantProvisioningService::new(
            tenants.clone(),
            users.clone(),
            roles.clone(),
            hasher.clone(),
            publisher.clone(),
            config.provisioning_settings(),
        );
        let authentication = AuthenticationService::new(tenants.clone(), users.clone(), hasher.clone());
        let authorization = AuthorizationService::new(users.clone(), groups.clone(), roles.clone());

        Self {
            tenants: TenantApplicationService::new(tenants.clone(), provisioning, publisher.clone()),
            users: UserApplicationService::new(
                tenants.clone(),
                users.clone(),
                authentication,
                hasher,
                publisher.clone(),
            ),
            groups: GroupApplicationService::new(
                tenants.clone(),
                users.clone(),
                groups.clone(),
                publisher.clone(),
            ),
            roles: RoleApplicationService::new(tenants, users, groups, roles, authorization, publisher),
            bus,
        }
    }

    /// Receive every identity event published from now on.
    pub fn subscribe(&self) -> Subscription<EventEnvelope<IdentityEvent>> {
        self.bus.subscribe()
    }
}

/// Install tracing from `config` and wire the in-memory system.
pub fn bootstrap(config: &IamConfig) -> Application {
    gatehouse_observability::init_with(config.log_filter.as_deref());
    let app = Application::in_memory(config);
    tracing::info!(
        administrator_role = %config.administrator_role,
        administrator_username = %config.administrator_username,
        "gatehouse ready"
    );
    app
}
