//! Per-flow view model for the dashboard, profile, and wizard screens.
//!
//! A session is built explicitly with its data source and clock. Every
//! operation returns its outcome to the caller and also mirrors it into
//! [`Alert`] so a screen can show a modal without inspecting the error.

use std::sync::Arc;

use petcore_domain::{Owner, Pet, PetType};
use tracing::{debug, info, warn};

use crate::data_source::PetDataSource;
use crate::error::{CoreError, DataSourceError, WizardError};
use crate::time::Clock;
use crate::wizard::PetWizard;

pub const VALIDATION_ALERT_TITLE: &str = "Validation Error";
pub const ERROR_ALERT_TITLE: &str = "Error";
pub const SUCCESS_ALERT_TITLE: &str = "Success";

/// Modal message produced by the last operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub success: bool,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: SUCCESS_ALERT_TITLE.into(),
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            success: false,
        }
    }
}

/// What a successful submission did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated,
}

pub struct PetSession {
    source: Arc<dyn PetDataSource>,
    clock: Arc<dyn Clock>,
    owner: Option<Owner>,
    pets: Vec<Pet>,
    selected: Option<Pet>,
    pet_types: Vec<PetType>,
    wizard: PetWizard,
    loading: bool,
    alert: Option<Alert>,
}

impl std::fmt::Debug for PetSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetSession")
            .field("owner", &self.owner.as_ref().and_then(|o| o.id.clone()))
            .field("pets", &self.pets.len())
            .field("selected", &self.selected.as_ref().and_then(|p| p.id.clone()))
            .field("wizard", &self.wizard)
            .field("alert", &self.alert)
            .finish_non_exhaustive()
    }
}

impl PetSession {
    pub fn new(source: Arc<dyn PetDataSource>, clock: Arc<dyn Clock>) -> Self {
        let wizard = PetWizard::new(clock.clone());
        Self {
            source,
            clock,
            owner: None,
            pets: Vec::new(),
            selected: None,
            pet_types: Vec::new(),
            wizard,
            loading: false,
            alert: None,
        }
    }

    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn selected_pet(&self) -> Option<&Pet> {
        self.selected.as_ref()
    }

    pub fn pet_types(&self) -> &[PetType] {
        &self.pet_types
    }

    pub fn wizard(&self) -> &PetWizard {
        &self.wizard
    }

    pub fn wizard_mut(&mut self) -> &mut PetWizard {
        &mut self.wizard
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    /// Fetches and stores the signed-in user.
    pub fn load_user(&mut self, user_id: &str) -> Result<&Owner, CoreError> {
        match self.call(|source| source.fetch_user_by_id(user_id)) {
            Ok(owner) => {
                debug!(user_id, "user loaded");
                let owner = self.owner.insert(owner);
                Ok(&*owner)
            }
            Err(err) => self.fail(err.into()),
        }
    }

    /// Reloads the pets of the loaded owner.
    pub fn load_user_pets(&mut self) -> Result<&[Pet], CoreError> {
        let owner_id = match self.owner_id() {
            Some(id) => id,
            None => return self.fail(CoreError::UserNotLoaded),
        };
        match self.call(|source| source.fetch_owner_pets(&owner_id)) {
            Ok(pets) => {
                debug!(owner_id = %owner_id, count = pets.len(), "pets loaded");
                self.pets = pets;
                Ok(&self.pets)
            }
            Err(err) => self.fail(err.into()),
        }
    }

    pub fn load_pet_types(&mut self) -> Result<&[PetType], CoreError> {
        match self.call(|source| source.fetch_pet_types()) {
            Ok(types) => {
                self.pet_types = types;
                Ok(&self.pet_types)
            }
            Err(err) => self.fail(err.into()),
        }
    }

    pub fn select_pet(&mut self, pet: Pet) {
        debug!(pet_id = ?pet.id, "pet selected");
        self.selected = Some(pet);
    }

    /// Resolves `query` against the loaded pets by id, then by name (case-insensitive).
    pub fn find_pet(&self, query: &str) -> Option<&Pet> {
        let query = query.trim();
        self.pets
            .iter()
            .find(|pet| pet.id.as_deref() == Some(query))
            .or_else(|| {
                self.pets.iter().find(|pet| {
                    pet.name
                        .as_deref()
                        .is_some_and(|name| name.eq_ignore_ascii_case(query))
                })
            })
    }

    /// Re-fetches the selected pet so the profile shows the stored record.
    pub fn refresh_selected_pet(&mut self) -> Result<&Pet, CoreError> {
        let pet_id = match self.selected.as_ref().and_then(|pet| pet.id.clone()) {
            Some(id) => id,
            None => return self.fail(CoreError::NoPetSelected),
        };
        match self.call(|source| source.fetch_pet_by_id(&pet_id)) {
            Ok(pet) => {
                self.replace_listed(&pet);
                let pet = self.selected.insert(pet);
                Ok(&*pet)
            }
            Err(err) => self.fail(err.into()),
        }
    }

    /// Starts an empty "add pet" flow.
    pub fn begin_create(&mut self) {
        self.wizard.reset(0);
    }

    /// Loads the stored pet into the wizard for editing.
    pub fn begin_edit(&mut self, pet_id: &str) -> Result<(), CoreError> {
        match self.call(|source| source.fetch_pet_by_id(pet_id)) {
            Ok(pet) => {
                self.wizard.load_pet(&pet);
                self.selected = Some(pet);
                Ok(())
            }
            Err(DataSourceError::NotFound(_)) => {
                self.fail(CoreError::PetNotFound(pet_id.to_string()))
            }
            Err(err) => self.fail(err.into()),
        }
    }

    pub fn advance_wizard(&mut self) -> Result<usize, CoreError> {
        match self.wizard.advance() {
            Ok(step) => Ok(step),
            Err(err) => self.fail(err.into()),
        }
    }

    pub fn retreat_wizard(&mut self) -> usize {
        self.wizard.retreat()
    }

    /// Sends the wizard's payload to the backend.
    ///
    /// On success the wizard returns to step 0 and the pet list is refreshed.
    /// On failure the wizard keeps every entered value.
    pub fn submit_wizard(&mut self) -> Result<(Pet, SubmitOutcome), CoreError> {
        let payload = match self.wizard.build_submission_payload(self.owner.as_ref()) {
            Ok(payload) => payload,
            Err(err) => return self.fail(err.into()),
        };

        let editing = self.wizard.is_editing();
        let result = if editing {
            self.call(|source| source.edit_pet(&payload))
        } else {
            self.call(|source| source.add_pet(&payload))
        };
        let stored = match result {
            Ok(stored) => stored,
            Err(err) => return self.fail(err.into()),
        };

        let outcome = if editing {
            SubmitOutcome::Updated
        } else {
            SubmitOutcome::Created
        };
        info!(pet_id = ?stored.id, ?outcome, "pet submitted");

        self.wizard.reset(0);
        if editing {
            self.selected = Some(stored.clone());
        }
        if let Err(err) = self.refresh_pets_quietly() {
            warn!(error = %err, "pet list refresh after submit failed");
        }
        let message = match outcome {
            SubmitOutcome::Created => "Pet added successfully",
            SubmitOutcome::Updated => "Pet updated successfully",
        };
        self.alert = Some(Alert::success(message));
        Ok((stored, outcome))
    }

    pub fn delete_pet(&mut self, pet_id: &str) -> Result<(), CoreError> {
        if let Err(err) = self.call(|source| source.delete_pet(pet_id)) {
            return self.fail(err.into());
        }
        info!(pet_id, "pet deleted");
        self.pets.retain(|pet| pet.id.as_deref() != Some(pet_id));
        if self.selected.as_ref().and_then(|pet| pet.id.as_deref()) == Some(pet_id) {
            self.selected = None;
        }
        self.alert = Some(Alert::success("Pet deleted"));
        Ok(())
    }

    fn owner_id(&self) -> Option<String> {
        self.owner.as_ref().and_then(|owner| owner.id.clone())
    }

    fn refresh_pets_quietly(&mut self) -> Result<(), DataSourceError> {
        let Some(owner_id) = self.owner_id() else {
            return Ok(());
        };
        self.pets = self.call(|source| source.fetch_owner_pets(&owner_id))?;
        Ok(())
    }

    fn replace_listed(&mut self, pet: &Pet) {
        if let Some(slot) = self.pets.iter_mut().find(|listed| listed.id == pet.id) {
            *slot = pet.clone();
        }
    }

    fn call<T>(
        &mut self,
        op: impl FnOnce(&dyn PetDataSource) -> Result<T, DataSourceError>,
    ) -> Result<T, DataSourceError> {
        self.loading = true;
        let result = op(self.source.as_ref());
        self.loading = false;
        if let Err(err) = &result {
            warn!(error = %err, "data source call failed");
        }
        result
    }

    fn fail<T>(&mut self, err: CoreError) -> Result<T, CoreError> {
        let title = match &err {
            CoreError::Wizard(WizardError::Validation(_)) => VALIDATION_ALERT_TITLE,
            _ => ERROR_ALERT_TITLE,
        };
        self.alert = Some(Alert::failure(title, err.to_string()));
        Err(err)
    }
}
