//! Multi-step state machine behind the "add pet" and "edit pet" flows.
//!
//! The wizard owns every value the user typed so far, the current step, the
//! per-field validation messages, and the image the session started with. It
//! never talks to the backend: callers validate, advance, and finally ask for
//! a submission payload which they hand to a `PetDataSource`.
//!
//! Steps:
//!
//! | # | Title       | Required                      |
//! |---|-------------|-------------------------------|
//! | 0 | Basic Info  | name, type                    |
//! | 1 | Breed       | breed                         |
//! | 2 | Pet Details | description                   |
//! | 3 | Health Info | weight (numeric), size        |
//! | 4 | Review      | nothing                       |

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use petcore_domain::{Gender, ImageRef, Owner, Pet, Size, WeightUnit};
use thiserror::Error;
use tracing::debug;

use crate::dates;
use crate::error::WizardError;
use crate::time::Clock;

pub const TOTAL_STEPS: usize = 5;

const STEP_TITLES: [&str; TOTAL_STEPS] =
    ["Basic Info", "Breed", "Pet Details", "Health Info", "Review"];

/// Fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardField {
    Name,
    PetType,
    Breed,
    Description,
    Birthday,
    AdoptionDate,
    Weight,
    Size,
}

impl WizardField {
    pub fn label(self) -> &'static str {
        match self {
            WizardField::Name => "Pet name",
            WizardField::PetType => "Pet type",
            WizardField::Breed => "Breed",
            WizardField::Description => "Description",
            WizardField::Birthday => "Birthday",
            WizardField::AdoptionDate => "Adoption date",
            WizardField::Weight => "Weight",
            WizardField::Size => "Size",
        }
    }
}

impl fmt::Display for WizardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: WizardField,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: WizardField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn required(field: WizardField) -> Self {
        Self::new(field, format!("{} is required", field.label()))
    }

    fn not_in_past(field: WizardField) -> Self {
        Self::new(
            field,
            format!("{} cannot be today or in the future", field.label()),
        )
    }
}

/// Outcome of checking the fields of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepValidation {
    pub valid: bool,
    pub message: Option<String>,
}

impl StepValidation {
    fn from_result(result: &Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                message: None,
            },
            Err(err) => Self {
                valid: false,
                message: Some(err.message.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardMode {
    Create,
    /// Editing an existing pet; the record as it was loaded.
    Edit { pet: Pet },
}

/// Values collected across all steps. Blank text is stored as `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PetForm {
    pub name: Option<String>,
    pub pet_type: Option<String>,
    pub breed: Option<String>,
    pub breed_id: Option<String>,
    pub description: Option<String>,
    pub gender: Option<Gender>,
    pub birthday: Option<NaiveDate>,
    pub adoption_date: Option<NaiveDate>,
    pub is_lost: bool,
    pub weight: Option<String>,
    pub weight_unit: WeightUnit,
    pub size: Option<Size>,
}

impl PetForm {
    fn parsed_weight(&self) -> Option<f64> {
        self.weight.as_deref().and_then(parse_weight)
    }
}

pub struct PetWizard {
    clock: Arc<dyn Clock>,
    mode: WizardMode,
    current_step: usize,
    form: PetForm,
    errors: BTreeMap<WizardField, String>,
    original_image: Option<ImageRef>,
    image: Option<ImageRef>,
    dirty: bool,
}

impl fmt::Debug for PetWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PetWizard")
            .field("mode", &self.mode)
            .field("current_step", &self.current_step)
            .field("form", &self.form)
            .field("errors", &self.errors)
            .field("image", &self.image)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl PetWizard {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            mode: WizardMode::Create,
            current_step: 0,
            form: PetForm::default(),
            errors: BTreeMap::new(),
            original_image: None,
            image: None,
            dirty: false,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        TOTAL_STEPS
    }

    pub fn step_title(step: usize) -> Option<&'static str> {
        STEP_TITLES.get(step).copied()
    }

    pub fn current_step_title(&self) -> &'static str {
        STEP_TITLES[self.current_step]
    }

    pub fn progress_label(&self) -> String {
        format!(
            "Step {} of {}: {}",
            self.current_step + 1,
            TOTAL_STEPS,
            self.current_step_title()
        )
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == TOTAL_STEPS - 1
    }

    pub fn mode(&self) -> &WizardMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, WizardMode::Edit { .. })
    }

    pub fn form(&self) -> &PetForm {
        &self.form
    }

    pub fn error(&self, field: WizardField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = (WizardField, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn original_image(&self) -> Option<&ImageRef> {
        self.original_image.as_ref()
    }

    /// Whether the held image differs from the one the session started with.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.form.name = non_blank(value.into());
        self.clear_error_if_filled(WizardField::Name, self.form.name.is_some());
    }

    /// Stores the type tag upper-cased, matching the taxonomy tags.
    pub fn set_pet_type(&mut self, value: impl Into<String>) {
        self.form.pet_type = non_blank(value.into()).map(|tag| tag.to_ascii_uppercase());
        self.clear_error_if_filled(WizardField::PetType, self.form.pet_type.is_some());
    }

    pub fn set_breed(&mut self, name: impl Into<String>, breed_id: Option<String>) {
        self.form.breed = non_blank(name.into());
        self.form.breed_id = breed_id.and_then(non_blank);
        self.clear_error_if_filled(WizardField::Breed, self.form.breed.is_some());
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.form.description = non_blank(value.into());
        self.clear_error_if_filled(WizardField::Description, self.form.description.is_some());
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.form.gender = gender;
    }

    pub fn set_lost(&mut self, is_lost: bool) {
        self.form.is_lost = is_lost;
    }

    /// Stores the raw weight text and re-derives whether it is numeric.
    pub fn set_weight(&mut self, value: impl Into<String>) {
        self.form.weight = non_blank(value.into());
        match self.form.weight.as_deref() {
            Some(raw) if parse_weight(raw).is_none() => {
                self.errors
                    .insert(WizardField::Weight, weight_not_numeric().message);
            }
            _ => {
                self.errors.remove(&WizardField::Weight);
            }
        }
    }

    pub fn set_weight_unit(&mut self, unit: WeightUnit) {
        self.form.weight_unit = unit;
    }

    pub fn set_size(&mut self, size: Option<Size>) {
        self.form.size = size;
        self.clear_error_if_filled(WizardField::Size, size.is_some());
    }

    /// Accepts only a birthday strictly before today.
    pub fn set_birthday(&mut self, date: NaiveDate) -> Result<(), ValidationError> {
        self.set_past_date(WizardField::Birthday, date)
    }

    /// Accepts only an adoption date strictly before today.
    pub fn set_adoption_date(&mut self, date: NaiveDate) -> Result<(), ValidationError> {
        self.set_past_date(WizardField::AdoptionDate, date)
    }

    pub fn clear_birthday(&mut self) {
        self.form.birthday = None;
        self.errors.remove(&WizardField::Birthday);
    }

    pub fn clear_adoption_date(&mut self) {
        self.form.adoption_date = None;
        self.errors.remove(&WizardField::AdoptionDate);
    }

    /// Copies the birthday into the adoption date.
    ///
    /// The birthday goes through the same past-date rule as any adoption date,
    /// so a birthday that became invalid is never propagated silently.
    pub fn adoption_date_same_as_birthday(&mut self) -> Result<(), ValidationError> {
        let birthday = self
            .form
            .birthday
            .ok_or_else(|| ValidationError::required(WizardField::Birthday))?;
        self.set_adoption_date(birthday)
    }

    /// UI affordance: offer "same as birthday" when it would change something.
    pub fn should_offer_copy_birthday_shortcut(&self) -> bool {
        match self.form.birthday {
            Some(birthday) => {
                birthday < self.clock.today() && self.form.adoption_date != Some(birthday)
            }
            None => false,
        }
    }

    /// Replaces the current image and re-runs change detection.
    pub fn set_image(&mut self, image: Option<ImageRef>) -> bool {
        self.image = image;
        self.detect_image_change()
    }

    /// Compares the current image against the session's original and updates `dirty`.
    pub fn detect_image_change(&mut self) -> bool {
        self.dirty = image_changed(self.original_image.as_ref(), self.image.as_ref());
        debug!(dirty = self.dirty, "image change detection");
        self.dirty
    }

    /// Checks the fields of the current step and records the first failure.
    pub fn validate_current_step(&mut self) -> StepValidation {
        let result = self.check_step(self.current_step);
        if let Err(err) = &result {
            self.errors.insert(err.field, err.message.clone());
        }
        StepValidation::from_result(&result)
    }

    /// Moves forward when the current step validates.
    pub fn advance(&mut self) -> Result<usize, ValidationError> {
        let result = self.check_step(self.current_step);
        if let Err(err) = result {
            self.errors.insert(err.field, err.message.clone());
            debug!(step = self.current_step, field = %err.field, "advance rejected");
            return Err(err);
        }
        self.current_step = (self.current_step + 1).min(TOTAL_STEPS - 1);
        debug!(step = self.current_step, "advanced");
        Ok(self.current_step)
    }

    pub fn retreat(&mut self) -> usize {
        self.current_step = self.current_step.saturating_sub(1);
        debug!(step = self.current_step, "retreated");
        self.current_step
    }

    /// Clears everything and lands on `step` in create mode.
    pub fn reset(&mut self, step: usize) {
        self.mode = WizardMode::Create;
        self.form = PetForm::default();
        self.errors.clear();
        self.original_image = None;
        self.image = None;
        self.dirty = false;
        self.current_step = step.min(TOTAL_STEPS - 1);
        debug!(step = self.current_step, "wizard reset");
    }

    /// Switches to edit mode with every field taken from `pet`.
    pub fn load_pet(&mut self, pet: &Pet) {
        self.reset(0);
        self.form = PetForm {
            name: pet.name.clone().and_then(non_blank),
            pet_type: pet
                .pet_type
                .clone()
                .and_then(non_blank)
                .map(|tag| tag.to_ascii_uppercase()),
            breed: pet.breed_name.clone().and_then(non_blank),
            breed_id: pet.breed_id.clone().and_then(non_blank),
            description: pet.description.clone().and_then(non_blank),
            gender: pet.gender,
            birthday: pet.date_of_birth.as_deref().and_then(dates::wire_to_naive),
            adoption_date: pet.adoption_date.as_deref().and_then(dates::wire_to_naive),
            is_lost: pet.is_lost(),
            weight: weight_input(pet),
            weight_unit: pet
                .weight_value
                .as_deref()
                .and_then(WeightUnit::from_weight_value)
                .unwrap_or_default(),
            size: pet.size,
        };
        self.original_image = pet.image.clone();
        self.image = pet.image.clone();
        self.dirty = false;
        self.mode = WizardMode::Edit { pet: pet.clone() };
        debug!(pet_id = ?pet.id, "loaded pet into wizard");
    }

    /// Assembles the record to create or edit.
    ///
    /// Every step is re-checked so a payload never carries an empty required
    /// field; dates are converted to wire strings here and nowhere earlier.
    pub fn build_submission_payload(&self, owner: Option<&Owner>) -> Result<Pet, WizardError> {
        let owner_id = owner
            .and_then(|owner| owner.id.clone())
            .and_then(non_blank)
            .ok_or_else(|| WizardError::PreconditionFailed("no owner loaded".into()))?;

        let id = match &self.mode {
            WizardMode::Create => None,
            WizardMode::Edit { pet } => Some(pet.id.clone().and_then(non_blank).ok_or_else(
                || WizardError::PreconditionFailed("pet being edited has no id".into()),
            )?),
        };

        for step in 0..TOTAL_STEPS {
            self.check_step(step)?;
        }

        let weight = self
            .form
            .parsed_weight()
            .ok_or_else(|| WizardError::Validation(weight_not_numeric()))?;

        Ok(Pet {
            id,
            owner_id: Some(owner_id),
            name: self.form.name.clone(),
            breed_id: self.form.breed_id.clone(),
            breed_name: self.form.breed.clone(),
            date_of_birth: self.form.birthday.map(dates::naive_to_wire),
            adoption_date: self.form.adoption_date.map(dates::naive_to_wire),
            gender: self.form.gender,
            is_lost: Some(self.form.is_lost),
            size: self.form.size,
            pet_type: self.form.pet_type.clone(),
            weight_value: Some(self.form.weight_unit.format(weight)),
            description: self.form.description.clone(),
            image: self.image.clone(),
            weight: Some(weight),
        })
    }

    /// Label/value pairs shown on the review step.
    pub fn review_rows(&self) -> Vec<(&'static str, String)> {
        let today = self.clock.today();
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());
        let day = |value: Option<NaiveDate>| {
            value
                .map(|date| date.format("%b %-d, %Y").to_string())
                .unwrap_or_else(|| "-".into())
        };

        vec![
            ("Name", text(&self.form.name)),
            ("Type", text(&self.form.pet_type)),
            ("Breed", text(&self.form.breed)),
            (
                "Age",
                self.form
                    .birthday
                    .map(|date| dates::age_label(&dates::naive_to_wire(date), today))
                    .unwrap_or_else(|| dates::UNKNOWN_AGE.into()),
            ),
            (
                "Weight",
                self.form
                    .parsed_weight()
                    .map(|weight| self.form.weight_unit.format(weight))
                    .unwrap_or_else(|| "-".into()),
            ),
            (
                "Size",
                self.form
                    .size
                    .map(|size| size.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
            (
                "Gender",
                self.form
                    .gender
                    .map(|gender| gender.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
            ("Birthday", day(self.form.birthday)),
            ("Adoption date", day(self.form.adoption_date)),
            ("Lost", if self.form.is_lost { "Yes" } else { "No" }.into()),
            ("Notes", text(&self.form.description)),
        ]
    }

    fn check_step(&self, step: usize) -> Result<(), ValidationError> {
        let form = &self.form;
        match step {
            0 => {
                require(&form.name, WizardField::Name)?;
                require(&form.pet_type, WizardField::PetType)
            }
            1 => require(&form.breed, WizardField::Breed),
            2 => require(&form.description, WizardField::Description),
            3 => {
                let raw = form
                    .weight
                    .as_deref()
                    .ok_or_else(|| ValidationError::required(WizardField::Weight))?;
                if parse_weight(raw).is_none() {
                    return Err(weight_not_numeric());
                }
                if form.size.is_none() {
                    return Err(ValidationError::required(WizardField::Size));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn set_past_date(&mut self, field: WizardField, date: NaiveDate) -> Result<(), ValidationError> {
        if date >= self.clock.today() {
            let err = ValidationError::not_in_past(field);
            self.errors.insert(field, err.message.clone());
            return Err(err);
        }
        match field {
            WizardField::Birthday => self.form.birthday = Some(date),
            _ => self.form.adoption_date = Some(date),
        }
        self.errors.remove(&field);
        Ok(())
    }

    fn clear_error_if_filled(&mut self, field: WizardField, filled: bool) {
        if filled {
            self.errors.remove(&field);
        }
    }
}

fn image_changed(original: Option<&ImageRef>, current: Option<&ImageRef>) -> bool {
    match (original, current) {
        (None, None) => false,
        (None, Some(_)) | (Some(_), None) => true,
        (Some(original), Some(current)) => {
            if current.is_pending_upload() {
                return true;
            }
            let id_differs = match (&original.image_id, &current.image_id) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            };
            id_differs || original.url != current.url
        }
    }
}

fn require(value: &Option<String>, field: WizardField) -> Result<(), ValidationError> {
    match value {
        Some(_) => Ok(()),
        None => Err(ValidationError::required(field)),
    }
}

fn weight_not_numeric() -> ValidationError {
    ValidationError::new(WizardField::Weight, "Weight must be a number")
}

fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn weight_input(pet: &Pet) -> Option<String> {
    match pet.weight {
        Some(weight) if weight > 0.0 => Some(weight.to_string()),
        _ => pet
            .weight_value
            .as_deref()
            .and_then(|value| value.split_whitespace().next())
            .filter(|number| parse_weight(number).is_some())
            .map(str::to_string),
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
