//! Contact service
//!
//! Owns the live contact collection and enforces the rules around it:
//! validation before anything is written, email/phone uniqueness, automatic
//! backups on change, and an audit entry for every successful mutation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::backup::{checksum, BackupInfo, BackupManager};
use crate::config::Settings;
use crate::error::{RegistryError, RegistryResult};
use crate::export::export_to_file;
use crate::import::{import_from_file, preview, ImportPreview};
use crate::models::{BackupId, Person, PersonId, PersonRecord, PersonUpdate};
use crate::storage::{KeyValueStore, PersonRepository};

/// Service for contact management
pub struct ContactService {
    people: PersonRepository,
    backups: BackupManager,
    audit: Option<AuditLogger>,
}

impl ContactService {
    /// Create a service over `store`
    ///
    /// Nothing is read until [`ContactService::load`] is called.
    pub fn new(store: Arc<dyn KeyValueStore>, settings: &Settings) -> Self {
        Self {
            people: PersonRepository::new(Arc::clone(&store)),
            backups: BackupManager::new(store, settings.max_backups),
            audit: None,
        }
    }

    /// Record every mutation in `logger`
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Load contacts and backup history from the store
    ///
    /// An unreadable backup history is only logged. An unreadable contact
    /// list leaves the service empty and is returned as an error; the
    /// service remains usable.
    pub fn load(&self) -> RegistryResult<usize> {
        if let Err(e) = self.backups.load() {
            warn!("continuing without backup history: {}", e);
        }
        let count = self.people.load()?;
        info!("contact registry loaded with {} contacts", count);
        Ok(count)
    }

    /// All contacts, in insertion order
    pub fn persons(&self) -> RegistryResult<Vec<Person>> {
        self.people.get_all()
    }

    pub fn count(&self) -> RegistryResult<usize> {
        self.people.count()
    }

    /// Build a contact from raw field values and add it
    pub fn create(
        &self,
        name: &str,
        birth_date: &str,
        phone: &str,
        email: &str,
    ) -> RegistryResult<Person> {
        let person = Person::new(name.trim(), birth_date.trim(), phone.trim(), email.trim());
        self.add_person(person.clone())?;
        Ok(person)
    }

    /// Append a contact after validation and the uniqueness check
    pub fn add_person(&self, person: Person) -> RegistryResult<()> {
        ensure_valid(&person)?;

        let mut persons = self.people.get_all()?;
        check_duplicate(&persons, &person, None)?;

        persons.push(person.clone());
        self.persist(persons, None)?;

        self.audit(AuditEntry::create(
            EntityType::Person,
            person.id().to_string(),
            Some(person.name().to_string()),
            &person.to_record(),
        ));
        debug!("added contact {}", person.id());
        Ok(())
    }

    /// Replace the contact at `index`, keeping its identity
    ///
    /// Returns the stored version, which carries the original id and
    /// creation time and a fresh `updated_at`.
    pub fn update_person(&self, index: usize, updated: Person) -> RegistryResult<Person> {
        let mut persons = self.people.get_all()?;
        let original = persons
            .get(index)
            .cloned()
            .ok_or_else(|| RegistryError::person_index_not_found(index))?;

        ensure_valid(&updated)?;
        check_duplicate(&persons, &updated, Some(index))?;

        let mut updated = updated;
        updated.adopt_identity(&original);
        persons[index] = updated.clone();
        self.persist(persons, None)?;

        let before = original.to_record();
        let after = updated.to_record();
        self.audit(AuditEntry::update(
            EntityType::Person,
            updated.id().to_string(),
            Some(updated.name().to_string()),
            &before,
            &after,
            generate_diff(&before, &after),
        ));
        Ok(updated)
    }

    /// Apply a partial edit to the contact at `index`
    pub fn edit_person(&self, index: usize, changes: PersonUpdate) -> RegistryResult<Person> {
        let mut person = self
            .people
            .get(index)?
            .ok_or_else(|| RegistryError::person_index_not_found(index))?;
        person.update(changes);
        self.update_person(index, person)
    }

    /// Remove the contact at `index`, returning it
    pub fn delete_person(&self, index: usize) -> RegistryResult<Person> {
        let mut persons = self.people.get_all()?;
        if index >= persons.len() {
            return Err(RegistryError::person_index_not_found(index));
        }

        let removed = persons.remove(index);
        self.persist(persons, None)?;

        self.audit(AuditEntry::delete(
            EntityType::Person,
            removed.id().to_string(),
            Some(removed.name().to_string()),
            &removed.to_record(),
        ));
        Ok(removed)
    }

    /// Contacts whose name, email or phone contains `query`
    ///
    /// Matching is case-insensitive. A blank query returns everything.
    pub fn search_persons(&self, query: &str) -> RegistryResult<Vec<Person>> {
        Ok(self
            .search_indexed(query)?
            .into_iter()
            .map(|(_, person)| person)
            .collect())
    }

    /// Same as [`ContactService::search_persons`], with each match's position
    pub fn search_indexed(&self, query: &str) -> RegistryResult<Vec<(usize, Person)>> {
        Ok(self
            .people
            .get_all()?
            .into_iter()
            .enumerate()
            .filter(|(_, person)| person.matches(query))
            .collect())
    }

    pub fn get_person_by_index(&self, index: usize) -> RegistryResult<Option<Person>> {
        self.people.get(index)
    }

    pub fn get_person_by_id(&self, id: &PersonId) -> RegistryResult<Option<Person>> {
        self.people.get_by_id(id)
    }

    /// Position of the contact with `id`
    pub fn index_of(&self, id: &PersonId) -> RegistryResult<Option<usize>> {
        self.people.position(id)
    }

    /// Export the collection into `dir`, returning the file written
    pub fn export_data(&self, dir: &Path, filename: Option<&str>) -> RegistryResult<PathBuf> {
        let records = self.people.records()?;
        export_to_file(&records, dir, filename)
    }

    /// Read an import file without touching the live collection
    pub fn import_data(&self, path: &Path) -> RegistryResult<ImportPreview> {
        let data = import_from_file(path)?;
        Ok(preview(&data))
    }

    /// Swap the whole collection for `persons`
    ///
    /// Every incoming contact must be valid and no two may share an email,
    /// phone or id. The current collection is snapshotted first.
    pub fn replace_all_data(&self, persons: Vec<Person>) -> RegistryResult<()> {
        self.replace_with(persons, "import")
    }

    /// Replace the collection with a verified snapshot's contents
    pub fn restore_backup(&self, id: &BackupId) -> RegistryResult<usize> {
        let records = self.backups.restore_backup(id)?;
        let persons: Vec<Person> = records.into_iter().map(Person::from_record).collect();
        let count = persons.len();
        self.replace_with(persons, "restore")?;
        info!("restored backup {} ({} contacts)", id, count);
        Ok(count)
    }

    /// Snapshot metadata, newest first
    pub fn backups(&self) -> RegistryResult<Vec<BackupInfo>> {
        self.backups.list_backups()
    }

    /// Newest snapshot whose contents differ from the live collection
    ///
    /// Every write is snapshotted, so the newest snapshot usually equals the
    /// current state and restoring it would change nothing.
    pub fn latest_restorable_backup(&self) -> RegistryResult<Option<BackupInfo>> {
        let live = checksum(&self.people.records()?)?;
        Ok(self
            .backups
            .list_backups()?
            .into_iter()
            .find(|backup| backup.checksum != live))
    }

    fn replace_with(&self, persons: Vec<Person>, source: &str) -> RegistryResult<()> {
        for (i, person) in persons.iter().enumerate() {
            if let Err(e) = ensure_valid(person) {
                warn!("rejected replacement: record {} is invalid", i + 1);
                return Err(e);
            }
            check_duplicate(&persons[..i], person, None)?;
            if persons[..i].iter().any(|p| p.id() == person.id()) {
                return Err(RegistryError::Duplicate {
                    field: "id",
                    value: person.id().to_string(),
                });
            }
        }

        let current = self.people.records()?;
        let count = persons.len();
        self.persist(persons, Some(&current))?;

        self.audit(AuditEntry::replace(source, current.len(), count));
        Ok(())
    }

    /// Snapshot the collection about to be written, then write it
    ///
    /// `outgoing`, when given, is snapshotted first so the collection being
    /// replaced stays restorable. If anything fails the backup history is put
    /// back as it was and the live collection is left untouched.
    fn persist(
        &self,
        persons: Vec<Person>,
        outgoing: Option<&[PersonRecord]>,
    ) -> RegistryResult<()> {
        let records: Vec<PersonRecord> = persons.iter().map(Person::to_record).collect();
        let history = self.backups.snapshots()?;

        let result = outgoing
            .map_or(Ok(()), |previous| self.snapshot_if_changed(previous))
            .and_then(|()| self.snapshot_if_changed(&records))
            .and_then(|()| self.people.commit(persons));

        if let Err(e) = result {
            warn!("failed to persist contacts: {}", e);
            if let Err(reset) = self.backups.reset_history(history) {
                warn!("failed to roll back backup history: {}", reset);
            }
            return Err(e);
        }
        Ok(())
    }

    fn snapshot_if_changed(&self, records: &[PersonRecord]) -> RegistryResult<()> {
        let current = checksum(records)?;
        if self.backups.latest_checksum()?.as_deref() != Some(current.as_str()) {
            self.backups.create_backup(records)?;
        }
        Ok(())
    }

    fn audit(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&entry) {
                warn!("failed to write audit entry: {}", e);
            }
        }
    }
}

fn ensure_valid(person: &Person) -> RegistryResult<()> {
    let result = person.validate();
    if result.is_valid() {
        Ok(())
    } else {
        Err(RegistryError::Validation {
            errors: result.into_errors(),
        })
    }
}

/// Reject `candidate` if another contact has the same email or phone
///
/// Emails compare case-insensitively, phones by their digits.
fn check_duplicate(
    persons: &[Person],
    candidate: &Person,
    exclude: Option<usize>,
) -> RegistryResult<()> {
    let email = candidate.email().trim().to_lowercase();
    let phone = candidate.normalized_phone();

    let others = persons
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != exclude)
        .map(|(_, p)| p);

    for existing in others {
        if existing.email().trim().to_lowercase() == email {
            return Err(RegistryError::Duplicate {
                field: "email",
                value: candidate.email().to_string(),
            });
        }
        if !phone.is_empty() && existing.normalized_phone() == phone {
            return Err(RegistryError::Duplicate {
                field: "phone",
                value: candidate.phone().to_string(),
            });
        }
    }
    Ok(())
}
