//! `gatehouse-identity`: tenants, users, groups and roles.
//!
//! Aggregates are state-based and record events while they change; nothing in
//! here performs IO except through the repository, hasher and publisher ports.
//!
//! - [`tenant`]: invitation lifecycle and the factory for everything else
//! - [`group`] + [`membership`]: nestable groups and membership resolution
//! - [`role`]: roles backed by a private group of assignees
//! - [`authentication`], [`authorization`], [`provisioning`]: domain services

pub mod authentication;
pub mod authorization;
pub mod contact;
pub mod enablement;
pub mod events;
pub mod group;
pub mod invitation;
pub mod membership;
pub mod password;
pub mod provisioning;
pub mod repository;
pub mod role;
pub mod tenant;
pub mod user;

#[cfg(test)]
mod testing;

pub use authentication::AuthenticationService;
pub use authorization::AuthorizationService;
pub use contact::{ContactInformation, EmailAddress, FullName, Person, PostalAddress, Telephone};
pub use enablement::Enablement;
pub use events::{BusPublisher, EventPublisher, IdentityEvent};
pub use group::{Group, GroupEvent, GroupKind, GroupMember, GroupMemberType};
pub use invitation::{Invitation, InvitationDescriptor};
pub use membership::MembershipResolver;
pub use password::{CredentialHasher, PasswordHash, PlainPassword};
pub use provisioning::{AdministratorProfile, ProvisioningSettings, TenantProvisioningService};
pub use repository::{GroupRepository, RoleRepository, TenantRepository, UserRepository};
pub use role::{Role, RoleEvent};
pub use tenant::{Tenant, TenantEvent};
pub use user::{User, UserDescriptor, UserEvent};
