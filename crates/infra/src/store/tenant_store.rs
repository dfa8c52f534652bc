use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gatehouse_core::{DomainError, DomainResult, TenantId};

/// Tenant-isolated key/value store.
///
/// Every record lives under a `(tenant, key)` pair; no operation ever crosses
/// tenants except [`list_all`](TenantStore::list_all).
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, tenant_id: TenantId, key: &K) -> DomainResult<Option<V>>;

    /// Fails with `Conflict` when the key is taken.
    fn insert(&self, tenant_id: TenantId, key: K, value: V) -> DomainResult<()>;

    /// Fails with `NotFound` when the key is absent.
    fn replace(&self, tenant_id: TenantId, key: K, value: V) -> DomainResult<()>;

    /// Returns whether a record was removed.
    fn remove(&self, tenant_id: TenantId, key: &K) -> DomainResult<bool>;

    fn list(&self, tenant_id: TenantId) -> DomainResult<Vec<V>>;

    /// Records of every tenant.
    fn list_all(&self) -> DomainResult<Vec<V>>;
}

impl<K, V, S> TenantStore<K, V> for Arc<S>
where
    S: TenantStore<K, V> + ?Sized,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> DomainResult<Option<V>> {
        (**self).get(tenant_id, key)
    }

    fn insert(&self, tenant_id: TenantId, key: K, value: V) -> DomainResult<()> {
        (**self).insert(tenant_id, key, value)
    }

    fn replace(&self, tenant_id: TenantId, key: K, value: V) -> DomainResult<()> {
        (**self).replace(tenant_id, key, value)
    }

    fn remove(&self, tenant_id: TenantId, key: &K) -> DomainResult<bool> {
        (**self).remove(tenant_id, key)
    }

    fn list(&self, tenant_id: TenantId) -> DomainResult<Vec<V>> {
        (**self).list(tenant_id)
    }

    fn list_all(&self) -> DomainResult<Vec<V>> {
        (**self).list_all()
    }
}

/// In-memory tenant-isolated store.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    name: &'static str,
    inner: RwLock<HashMap<(TenantId, K), V>>,
}

impl<K, V> InMemoryTenantStore<K, V> {
    /// `name` labels errors, e.g. `"user"`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, HashMap<(TenantId, K), V>>> {
        self.inner
            .read()
            .map_err(|_| DomainError::internal(format!("{} store lock poisoned", self.name)))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, HashMap<(TenantId, K), V>>> {
        self.inner
            .write()
            .map_err(|_| DomainError::internal(format!("{} store lock poisoned", self.name)))
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Clone + Eq + Hash + core::fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> DomainResult<Option<V>> {
        let map = self.read()?;
        Ok(map.get(&(tenant_id, key.clone())).cloned())
    }

    fn insert(&self, tenant_id: TenantId, key: K, value: V) -> DomainResult<()> {
        let mut map = self.write()?;
        if map.contains_key(&(tenant_id, key.clone())) {
            return Err(DomainError::conflict(format!(
                "{} {} already exists",
                self.name, key
            )));
        }
        map.insert((tenant_id, key), value);
        Ok(())
    }

    fn replace(&self, tenant_id: TenantId, key: K, value: V) -> DomainResult<()> {
        let mut map = self.write()?;
        match map.get_mut(&(tenant_id, key.clone())) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(DomainError::not_found(self.name, key.to_string())),
        }
    }

    fn remove(&self, tenant_id: TenantId, key: &K) -> DomainResult<bool> {
        let mut map = self.write()?;
        Ok(map.remove(&(tenant_id, key.clone())).is_some())
    }

    fn list(&self, tenant_id: TenantId) -> DomainResult<Vec<V>> {
        let map = self.read()?;
        Ok(map
            .iter()
            .filter_map(|((t, _k), v)| if *t == tenant_id { Some(v.clone()) } else { None })
            .collect())
    }

    fn list_all(&self) -> DomainResult<Vec<V>> {
        let map = self.read()?;
        Ok(map.values().cloned().collect())
    }
}
