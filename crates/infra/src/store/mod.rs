//! Tenant-partitioned storage used by the in-memory repositories.

pub mod tenant_store;

pub use tenant_store::{InMemoryTenantStore, TenantStore};
