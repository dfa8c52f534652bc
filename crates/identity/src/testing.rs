//! Fakes and fixtures shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gatehouse_core::{AggregateRoot, DomainError, DomainResult, TenantId};

use crate::authentication::AuthenticationService;
use crate::authorization::AuthorizationService;
use crate::contact::{ContactInformation, EmailAddress, FullName, Person, PostalAddress, Telephone};
use crate::enablement::Enablement;
use crate::events::{EventPublisher, IdentityEvent};
use crate::group::Group;
use crate::membership::MembershipResolver;
use crate::password::{CredentialHasher, PasswordHash, PlainPassword};
use crate::repository::{GroupRepository, RoleRepository, TenantRepository, UserRepository};
use crate::role::Role;
use crate::tenant::Tenant;
use crate::user::User;

/// Transparent "hash" so tests can predict stored credentials.
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, plaintext: &PlainPassword) -> DomainResult<PasswordHash> {
        Ok(PasswordHash::new(format!("hashed:{}", plaintext.as_str())))
    }
}

pub fn sample_person(first: &str, last: &str) -> Person {
    Person::new(
        FullName::new(first, last).unwrap(),
        ContactInformation::new(
            PostalAddress::new("Main St", "1", "12345", "Springfield", "IL", "US").unwrap(),
            EmailAddress::new(&format!("{}@example.com", first.to_lowercase())).unwrap(),
            Telephone::new("555-123-4567").unwrap(),
            None,
        ),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Repositories
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeTenantRepository {
    tenants: Mutex<HashMap<TenantId, Tenant>>,
}

impl TenantRepository for FakeTenantRepository {
    fn add(&self, tenant: &Tenant) -> DomainResult<()> {
        self.tenants.lock().unwrap().insert(tenant.id(), tenant.clone());
        Ok(())
    }

    fn update(&self, tenant: &Tenant) -> DomainResult<()> {
        self.add(tenant)
    }

    fn remove(&self, tenant_id: TenantId) -> DomainResult<()> {
        self.tenants.lock().unwrap().remove(&tenant_id);
        Ok(())
    }

    fn tenant_with_id(&self, tenant_id: TenantId) -> DomainResult<Option<Tenant>> {
        Ok(self.tenants.lock().unwrap().get(&tenant_id).cloned())
    }

    fn tenant_named(&self, name: &str) -> DomainResult<Option<Tenant>> {
        Ok(self.tenants.lock().unwrap().values().find(|t| t.name() == name).cloned())
    }

    fn all_tenants(&self) -> DomainResult<Vec<Tenant>> {
        Ok(self.tenants.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<HashMap<(TenantId, String), User>>,
}

impl UserRepository for FakeUserRepository {
    fn add(&self, user: &User) -> DomainResult<()> {
        self.users.lock().unwrap().insert(user.id(), user.clone());
        Ok(())
    }

    fn update(&self, user: &User) -> DomainResult<()> {
        self.add(user)
    }

    fn remove(&self, tenant_id: TenantId, username: &str) -> DomainResult<()> {
        self.users.lock().unwrap().remove(&(tenant_id, username.to_string()));
        Ok(())
    }

    fn user_with_username(&self, tenant_id: TenantId, username: &str) -> DomainResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&(tenant_id, username.to_string())).cloned())
    }

    fn user_with_credentials(
        &self,
        tenant_id: TenantId,
        username: &str,
        password: &PasswordHash,
    ) -> DomainResult<Option<User>> {
        Ok(self
            .user_with_username(tenant_id, username)?
            .filter(|u| u.password() == password))
    }

    fn all_users(&self, tenant_id: TenantId) -> DomainResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.tenant_id() == tenant_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeGroupRepository {
    groups: Mutex<HashMap<(TenantId, String), Group>>,
}

impl GroupRepository for FakeGroupRepository {
    fn add(&self, group: &Group) -> DomainResult<()> {
        self.groups.lock().unwrap().insert(group.id(), group.clone());
        Ok(())
    }

    fn update(&self, group: &Group) -> DomainResult<()> {
        self.add(group)
    }

    fn remove(&self, tenant_id: TenantId, name: &str) -> DomainResult<()> {
        self.groups.lock().unwrap().remove(&(tenant_id, name.to_string()));
        Ok(())
    }

    fn group_named(&self, tenant_id: TenantId, name: &str) -> DomainResult<Option<Group>> {
        Ok(self.groups.lock().unwrap().get(&(tenant_id, name.to_string())).cloned())
    }

    fn all_groups(&self, tenant_id: TenantId) -> DomainResult<Vec<Group>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|g| g.tenant_id() == tenant_id)
            .cloned()
            .collect())
    }
}

/// Role store that counts lookups by name.
#[derive(Default)]
pub struct FakeRoleRepository {
    roles: Mutex<HashMap<(TenantId, String), Role>>,
    lookups: AtomicUsize,
}

impl FakeRoleRepository {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl RoleRepository for FakeRoleRepository {
    fn add(&self, role: &Role) -> DomainResult<()> {
        self.roles.lock().unwrap().insert(role.id(), role.clone());
        Ok(())
    }

    fn update(&self, role: &Role) -> DomainResult<()> {
        self.add(role)
    }

    fn remove(&self, tenant_id: TenantId, name: &str) -> DomainResult<()> {
        self.roles.lock().unwrap().remove(&(tenant_id, name.to_string()));
        Ok(())
    }

    fn role_named(&self, tenant_id: TenantId, name: &str) -> DomainResult<Option<Role>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.roles.lock().unwrap().get(&(tenant_id, name.to_string())).cloned())
    }

    fn all_roles(&self, tenant_id: TenantId) -> DomainResult<Vec<Role>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.tenant_id() == tenant_id)
            .cloned()
            .collect())
    }
}

/// Role store whose every call fails.
pub struct FailingRoleRepository;

impl RoleRepository for FailingRoleRepository {
    fn add(&self, _role: &Role) -> DomainResult<()> {
        Err(DomainError::internal("role store unavailable"))
    }

    fn update(&self, _role: &Role) -> DomainResult<()> {
        Err(DomainError::internal("role store unavailable"))
    }

    fn remove(&self, _tenant_id: TenantId, _name: &str) -> DomainResult<()> {
        Err(DomainError::internal("role store unavailable"))
    }

    fn role_named(&self, _tenant_id: TenantId, _name: &str) -> DomainResult<Option<Role>> {
        Err(DomainError::internal("role store unavailable"))
    }

    fn all_roles(&self, _tenant_id: TenantId) -> DomainResult<Vec<Role>> {
        Err(DomainError::internal("role store unavailable"))
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<IdentityEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<IdentityEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: IdentityEvent) -> DomainResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeRepositories {
    pub tenants: Arc<FakeTenantRepository>,
    pub users: Arc<FakeUserRepository>,
    pub groups: Arc<FakeGroupRepository>,
    pub roles: Arc<FakeRoleRepository>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixture
// ─────────────────────────────────────────────────────────────────────────────

/// One active tenant plus fake repositories.
pub struct Fixture {
    repos: FakeRepositories,
    tenant: Mutex<Tenant>,
}

impl Fixture {
    pub fn new() -> Self {
        let repos = FakeRepositories::default();
        let mut tenant = Tenant::provision(TenantId::new(), "Acme", "Acme Corp", true).unwrap();
        tenant.take_events();
        repos.tenants.add(&tenant).unwrap();
        Self {
            repos,
            tenant: Mutex::new(tenant),
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant.lock().unwrap().id()
    }

    pub fn deactivate_tenant(&self) {
        let mut tenant = self.tenant.lock().unwrap();
        tenant.deactivate();
        self.repos.tenants.update(&tenant).unwrap();
    }

    /// A registered, enabled user that is not stored.
    pub fn user(&self, username: &str) -> User {
        let mut tenant = self.tenant.lock().unwrap();
        let invitation = format!("invite {username}");
        tenant.offer_invitation(&invitation).unwrap();
        let mut user = tenant
            .register_user(
                &invitation,
                username,
                &PlainPassword::new("Str0ng!Pass"),
                Enablement::indefinite(),
                sample_person(username, "Example"),
                &PlainHasher,
            )
            .unwrap();
        user.take_events();
        user
    }

    pub fn stored_user(&self, username: &str) -> User {
        let user = self.user(username);
        self.repos.users.add(&user).unwrap();
        user
    }

    pub fn save_user(&self, user: &User) {
        self.repos.users.update(user).unwrap();
    }

    pub fn group(&self, name: &str) -> Group {
        self.tenant.lock().unwrap().provision_group(name, "").unwrap()
    }

    pub fn stored_group(&self, name: &str) -> Group {
        let mut group = self.group(name);
        group.take_events();
        self.repos.groups.add(&group).unwrap();
        group
    }

    /// A group nesting `nested`, built without any cycle check.
    pub fn group_with_members(&self, name: &str, nested: &[&str]) -> Group {
        let blind = MembershipResolver::new(
            Arc::new(FakeUserRepository::default()),
            Arc::new(FakeGroupRepository::default()),
        );
        let mut group = self.group(name);
        for member in nested {
            group.add_group(&self.group(member), &blind).unwrap();
        }
        group
    }

    pub fn save_group(&self, group: &Group) {
        self.repos.groups.update(group).unwrap();
    }

    pub fn load_group(&self, name: &str) -> Group {
        self.repos
            .groups
            .group_named(self.tenant_id(), name)
            .unwrap()
            .unwrap()
    }

    pub fn role(&self, name: &str, supports_nesting: bool) -> Role {
        self.tenant
            .lock()
            .unwrap()
            .provision_role(name, "", supports_nesting)
            .unwrap()
    }

    pub fn save_role(&self, role: &Role) {
        self.repos.roles.update(role).unwrap();
    }

    pub fn role_lookups(&self) -> usize {
        self.repos.roles.lookups()
    }

    pub fn resolver(&self) -> MembershipResolver {
        MembershipResolver::new(self.repos.users.clone(), self.repos.groups.clone())
    }

    pub fn authentication(&self) -> AuthenticationService {
        AuthenticationService::new(
            self.repos.tenants.clone(),
            self.repos.users.clone(),
            Arc::new(PlainHasher),
        )
    }

    pub fn authorization(&self) -> AuthorizationService {
        AuthorizationService::new(
            self.repos.users.clone(),
            self.repos.groups.clone(),
            self.repos.roles.clone(),
        )
    }
}
