//! Tenant-scoped credential checks.

use std::sync::Arc;

use gatehouse_core::{DomainResult, TenantId};

use crate::password::{CredentialHasher, PlainPassword};
use crate::repository::{TenantRepository, UserRepository};
use crate::user::UserDescriptor;

/// Authenticates users against their tenant.
///
/// Every negative outcome (unknown or inactive tenant, unknown user, wrong
/// password, disabled user) is the same `Ok(None)`. Only collaborator
/// failures surface as errors.
#[derive(Clone)]
pub struct AuthenticationService {
    tenants: Arc<dyn TenantRepository>,
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AuthenticationService {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            tenants,
            users,
            hasher,
        }
    }

    pub fn authenticate(
        &self,
        tenant_id: TenantId,
        username: &str,
        password: &PlainPassword,
    ) -> DomainResult<Option<UserDescriptor>> {
        let tenant_active = self
            .tenants
            .tenant_with_id(tenant_id)?
            .is_some_and(|t| t.is_active());
        if !tenant_active {
            tracing::debug!(tenant_id = %tenant_id, username, "authentication refused");
            return Ok(None);
        }

        let hashed = self.hasher.hash(password)?;
        let descriptor = self
            .users
            .user_with_credentials(tenant_id, username, &hashed)?
            .filter(|u| u.is_enabled())
            .map(|u| u.to_descriptor());

        match &descriptor {
            Some(_) => tracing::debug!(tenant_id = %tenant_id, username, "authentication succeeded"),
            None => tracing::debug!(tenant_id = %tenant_id, username, "authentication refused"),
        }
        Ok(descriptor)
    }
}
