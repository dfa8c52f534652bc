//! In-memory implementations of the identity repository ports.
//!
//! Each repository is a thin layer over an [`InMemoryTenantStore`] keyed by
//! the aggregate's natural key inside its tenant. `add` refuses an existing
//! key, `update` refuses a missing one, `remove` is idempotent.
//!
//! [`InMemoryTenantStore`]: crate::store::InMemoryTenantStore

pub mod group;
pub mod role;
pub mod tenant;
pub mod user;

pub use group::InMemoryGroupRepository;
pub use role::InMemoryRoleRepository;
pub use tenant::InMemoryTenantRepository;
pub use user::InMemoryUserRepository;
