use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::domain::DomainError;

/// In-memory cache whose entries expire `ttl` after insertion.
/// A zero TTL disables caching.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Result<Option<V>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone()))
    }

    pub fn insert(&self, key: K, value: V) -> Result<(), DomainError> {
        if self.ttl.is_zero() {
            return Ok(());
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
        Ok(())
    }
}
