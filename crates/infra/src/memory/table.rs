use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use supplyhub_catalog::RepositoryError;

/// Keyed in-memory table for tests/dev.
///
/// Guards are never held across an `.await`; every method takes and releases
/// the lock synchronously.
#[derive(Debug)]
pub struct InMemoryTable<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryTable<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("in-memory table lock poisoned".into())
}

impl<K, V> InMemoryTable<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn get(&self, key: &K) -> Result<Option<V>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    pub fn insert(&self, key: K, value: V) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(&key) {
            return Err(RepositoryError::Duplicate);
        }
        map.insert(key, value);
        Ok(())
    }

    pub fn replace(&self, key: K, value: V) -> Result<(), RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    pub fn remove(&self, key: &K) -> Result<V, RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(key).ok_or(RepositoryError::NotFound)
    }

    pub fn list(&self) -> Result<Vec<V>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    pub fn filter(&self, predicate: impl Fn(&V) -> bool) -> Result<Vec<V>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().filter(|v| predicate(v)).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_taken_key() {
        let table = InMemoryTable::new();
        table.insert(1, "a").unwrap();
        assert_eq!(table.insert(1, "b"), Err(RepositoryError::Duplicate));
        assert_eq!(table.get(&1).unwrap(), Some("a"));
    }

    #[test]
    fn replace_and_remove_require_existing_key() {
        let table: InMemoryTable<u32, &str> = InMemoryTable::new();
        assert_eq!(table.replace(1, "a"), Err(RepositoryError::NotFound));
        assert_eq!(table.remove(&1), Err(RepositoryError::NotFound));

        table.insert(1, "a").unwrap();
        table.replace(1, "b").unwrap();
        assert_eq!(table.remove(&1).unwrap(), "b");
        assert!(table.is_empty());
    }

    #[test]
    fn filter_returns_matching_values() {
        let table = InMemoryTable::new();
        for n in 0..10u32 {
            table.insert(n, n).unwrap();
        }
        let mut even = table.filter(|v| v % 2 == 0).unwrap();
        even.sort();
        assert_eq!(even, vec![0, 2, 4, 6, 8]);
    }
}
