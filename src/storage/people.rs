//! Person repository
//!
//! Owns the authoritative in-memory collection and mirrors it to the backing
//! store as a JSON array of serialized records under [`CONTACTS_KEY`].

use std::sync::{Arc, RwLock};

use log::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::models::{Person, PersonId, PersonRecord};

use super::store::{KeyValueStore, CONTACTS_KEY};

/// Repository for person persistence
pub struct PersonRepository {
    store: Arc<dyn KeyValueStore>,
    data: RwLock<Vec<Person>>,
}

impl PersonRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load the collection from the store
    ///
    /// A missing key yields an empty collection. If the stored value cannot be
    /// parsed the in-memory collection is reset to empty, the store is left
    /// untouched, and a storage error is returned.
    pub fn load(&self) -> RegistryResult<usize> {
        let raw = self.store.get(CONTACTS_KEY)?;

        let parsed = match raw {
            None => Ok(Vec::new()),
            Some(text) => serde_json::from_str::<Vec<PersonRecord>>(&text),
        };

        let mut data = self.data.write().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match parsed {
            Ok(records) => {
                *data = records.into_iter().map(Person::from_record).collect();
                debug!("loaded {} contacts", data.len());
                Ok(data.len())
            }
            Err(e) => {
                data.clear();
                warn!("stored contacts could not be parsed, starting empty: {}", e);
                Err(RegistryError::Storage(format!(
                    "Failed to parse stored contacts: {}",
                    e
                )))
            }
        }
    }

    /// Write `persons` to the store, then make them the live collection
    ///
    /// Nothing changes in memory if the write fails.
    pub fn commit(&self, persons: Vec<Person>) -> RegistryResult<()> {
        let records: Vec<PersonRecord> = persons.iter().map(Person::to_record).collect();
        let json = serde_json::to_string(&records)
            .map_err(|e| RegistryError::unknown("Failed to serialize contacts", e))?;

        let mut data = self.data.write().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        self.store.set(CONTACTS_KEY, &json)?;
        *data = persons;
        Ok(())
    }

    /// Snapshot of the whole collection, in order
    pub fn get_all(&self) -> RegistryResult<Vec<Person>> {
        let data = self.data.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.clone())
    }

    /// Serialized form of the whole collection
    pub fn records(&self) -> RegistryResult<Vec<PersonRecord>> {
        let data = self.data.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().map(Person::to_record).collect())
    }

    /// Person at a position
    pub fn get(&self, index: usize) -> RegistryResult<Option<Person>> {
        let data = self.data.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.get(index).cloned())
    }

    /// Person with a given id
    pub fn get_by_id(&self, id: &PersonId) -> RegistryResult<Option<Person>> {
        let data = self.data.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().find(|p| p.id() == id).cloned())
    }

    /// Position of the person with a given id
    pub fn position(&self, id: &PersonId) -> RegistryResult<Option<usize>> {
        let data = self.data.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().position(|p| p.id() == id))
    }

    pub fn count(&self) -> RegistryResult<usize> {
        let data = self.data.read().map_err(|e| {
            RegistryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn person(name: &str, email: &str) -> Person {
        Person::new(name, "01/01/1990", "(11) 99999-9999", email)
    }

    #[test]
    fn test_empty_load() {
        let repo = PersonRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load().unwrap(), 0);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_commit_and_get() {
        let repo = PersonRepository::new(Arc::new(MemoryStore::new()));
        let ana = person("Ana", "ana@x.com");
        let id = ana.id().clone();

        repo.commit(vec![ana]).unwrap();

        assert_eq!(repo.get(0).unwrap().unwrap().name(), "ANA");
        assert!(repo.get(1).unwrap().is_none());
        assert_eq!(repo.get_by_id(&id).unwrap().unwrap().email(), "ana@x.com");
        assert_eq!(repo.position(&id).unwrap(), Some(0));
        assert!(repo.get_by_id(&PersonId::new()).unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(temp_dir.path().to_path_buf()));

        let repo = PersonRepository::new(store.clone());
        let people = vec![person("Ana", "ana@x.com"), person("Bia", "bia@x.com")];
        repo.commit(people.clone()).unwrap();

        let repo2 = PersonRepository::new(store);
        assert_eq!(repo2.load().unwrap(), 2);
        assert_eq!(repo2.get_all().unwrap(), people);
    }

    #[test]
    fn test_corrupt_store_resets_to_empty() {
        let store = Arc::new(MemoryStore::new());
        let repo = PersonRepository::new(store.clone());
        repo.commit(vec![person("Ana", "ana@x.com")]).unwrap();

        store.set(CONTACTS_KEY, "{not json").unwrap();

        let err = repo.load().unwrap_err();
        assert!(matches!(err, RegistryError::Storage(_)));
        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(store.get(CONTACTS_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_failed_commit_keeps_previous_state() {
        let store = Arc::new(MemoryStore::with_quota(600));
        let repo = PersonRepository::new(store);
        repo.commit(vec![person("Ana", "ana@x.com")]).unwrap();

        let many: Vec<Person> = (0..10)
            .map(|i| person("Someone", &format!("p{}@x.com", i)))
            .collect();
        let err = repo.commit(many).unwrap_err();

        assert!(matches!(err, RegistryError::StorageQuota(_)));
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get(0).unwrap().unwrap().name(), "ANA");
    }
}
