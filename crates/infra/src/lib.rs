//! Infrastructure adapters: in-memory repositories, credential hashing and
//! environment configuration.

pub mod config;
pub mod hasher;
pub mod repository;
pub mod store;

pub use config::IamConfig;
pub use hasher::Sha256CredentialHasher;
pub use repository::{
    InMemoryGroupRepository, InMemoryRoleRepository, InMemoryTenantRepository,
    InMemoryUserRepository,
};
pub use store::{InMemoryTenantStore, TenantStore};
