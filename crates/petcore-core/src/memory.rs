use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use petcore_domain::{Owner, Pet, PetType};
use tracing::debug;
use uuid::Uuid;

use crate::data_source::PetDataSource;
use crate::error::DataSourceError;

const DEFAULT_TYPES: [&str; 6] = ["DOG", "CAT", "BIRD", "RABBIT", "FISH", "OTHER"];

#[derive(Debug, Default)]
struct State {
    owners: BTreeMap<String, Owner>,
    pets: BTreeMap<String, Pet>,
    pet_types: Vec<PetType>,
}

/// Process-local backend used by tests and the `memory` CLI backend.
#[derive(Debug)]
pub struct InMemoryDataSource {
    state: RwLock<State>,
    fail_next: Mutex<Option<DataSourceError>>,
}

impl Default for InMemoryDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDataSource {
    /// Empty store with the default pet-type taxonomy.
    pub fn new() -> Self {
        let pet_types = DEFAULT_TYPES
            .iter()
            .enumerate()
            .map(|(idx, kind)| PetType::new(format!("type-{}", idx + 1), *kind))
            .collect();
        Self {
            state: RwLock::new(State {
                pet_types,
                ..State::default()
            }),
            fail_next: Mutex::new(None),
        }
    }

    /// Builder form of [`insert_owner`](Self::insert_owner); an owner without an id is skipped.
    pub fn with_owner(mut self, owner: Owner) -> Self {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = owner.id.clone() {
            state.owners.insert(id, owner);
        }
        self
    }

    pub fn insert_owner(&self, owner: Owner) -> Result<(), DataSourceError> {
        let id = owner
            .id
            .clone()
            .ok_or_else(|| DataSourceError::InvalidRequest("owner has no id".into()))?;
        self.write()?.owners.insert(id, owner);
        Ok(())
    }

    /// Stores `pet` as-is, assigning an id when it has none.
    pub fn insert_pet(&self, mut pet: Pet) -> Result<String, DataSourceError> {
        let id = pet.id.clone().unwrap_or_else(new_id);
        pet.id = Some(id.clone());
        self.write()?.pets.insert(id.clone(), pet);
        Ok(id)
    }

    /// Makes the next data-source call fail with `err`.
    pub fn fail_next(&self, err: DataSourceError) {
        if let Ok(mut slot) = self.fail_next.lock() {
            *slot = Some(err);
        }
    }

    pub fn pet_count(&self) -> usize {
        self.read().map(|state| state.pets.len()).unwrap_or(0)
    }

    fn injected_failure(&self) -> Result<(), DataSourceError> {
        match self.fail_next.lock() {
            Ok(mut slot) => slot.take().map_or(Ok(()), Err),
            Err(_) => Err(poisoned()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, DataSourceError> {
        self.state.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, DataSourceError> {
        self.state.write().map_err(|_| poisoned())
    }
}

impl PetDataSource for InMemoryDataSource {
    fn add_pet(&self, pet: &Pet) -> Result<Pet, DataSourceError> {
        self.injected_failure()?;
        if pet.owner_id.is_none() {
            return Err(DataSourceError::InvalidRequest("pet has no owner".into()));
        }
        let mut stored = pet.clone();
        let id = new_id();
        stored.id = Some(id.clone());
        self.write()?.pets.insert(id.clone(), stored.clone());
        debug!(pet_id = %id, "memory backend created pet");
        Ok(stored)
    }

    fn edit_pet(&self, pet: &Pet) -> Result<Pet, DataSourceError> {
        self.injected_failure()?;
        let id = pet
            .id
            .clone()
            .ok_or_else(|| DataSourceError::InvalidRequest("pet has no id".into()))?;
        let mut state = self.write()?;
        match state.pets.get_mut(&id) {
            Some(slot) => {
                *slot = pet.clone();
                debug!(pet_id = %id, "memory backend updated pet");
                Ok(pet.clone())
            }
            None => Err(DataSourceError::NotFound(format!("pet {id}"))),
        }
    }

    fn delete_pet(&self, pet_id: &str) -> Result<(), DataSourceError> {
        self.injected_failure()?;
        self.write()?
            .pets
            .remove(pet_id)
            .map(|_| ())
            .ok_or_else(|| DataSourceError::NotFound(format!("pet {pet_id}")))
    }

    fn fetch_pet_by_id(&self, pet_id: &str) -> Result<Pet, DataSourceError> {
        self.injected_failure()?;
        self.read()?
            .pets
            .get(pet_id)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(format!("pet {pet_id}")))
    }

    fn fetch_owner_pets(&self, owner_id: &str) -> Result<Vec<Pet>, DataSourceError> {
        self.injected_failure()?;
        let state = self.read()?;
        Ok(state
            .pets
            .values()
            .filter(|pet| pet.owner_id.as_deref() == Some(owner_id))
            .cloned()
            .collect())
    }

    fn fetch_user_by_id(&self, user_id: &str) -> Result<Owner, DataSourceError> {
        self.injected_failure()?;
        self.read()?
            .owners
            .get(user_id)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound(format!("user {user_id}")))
    }

    fn fetch_pet_types(&self) -> Result<Vec<PetType>, DataSourceError> {
        self.injected_failure()?;
        Ok(self.read()?.pet_types.clone())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn poisoned() -> DataSourceError {
    DataSourceError::Transport("in-memory state lock poisoned".into())
}
