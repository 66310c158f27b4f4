use std::sync::Arc;

use chrono::NaiveDate;
use petcore_domain::{ImageRef, Owner, Pet, Size};

use crate::{
    CoreError, DataSourceError, FixedClock, InMemoryDataSource, PetDataSource, PetSession,
    SubmitOutcome, WizardError, WizardField,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 2).unwrap()
}

fn backend() -> Arc<InMemoryDataSource> {
    let owner = Owner {
        first_name: Some("Ada".into()),
        ..Owner::with_id("owner-1")
    };
    Arc::new(InMemoryDataSource::new().with_owner(owner))
}

fn session_with(source: Arc<InMemoryDataSource>) -> PetSession {
    PetSession::new(source, Arc::new(FixedClock::on(today())))
}

fn fill_rex(session: &mut PetSession) {
    let wizard = session.wizard_mut();
    wizard.set_name("Rex");
    wizard.set_pet_type("DOG");
    wizard.set_breed("Labrador", None);
    wizard.set_description("Good boy");
    wizard
        .set_birthday(NaiveDate::from_ymd_opt(2022, 8, 2).unwrap())
        .expect("birthday in the past");
    wizard.set_weight("12");
    wizard.set_size(Some(Size::Large));
}

#[test]
fn load_user_then_pets() {
    let source = backend();
    source
        .insert_pet(Pet {
            owner_id: Some("owner-1".into()),
            ..Pet::named("Milo", "CAT")
        })
        .expect("seed pet");
    let mut session = session_with(source);

    let owner = session.load_user("owner-1").expect("user loads");
    assert_eq!(owner.first_name.as_deref(), Some("Ada"));
    let pets = session.load_user_pets().expect("pets load");
    assert_eq!(pets.len(), 1);
    assert!(!session.is_loading());
}

#[test]
fn loading_pets_without_user_sets_error_alert() {
    let mut session = session_with(backend());
    assert_eq!(session.load_user_pets().unwrap_err(), CoreError::UserNotLoaded);
    let alert = session.alert().expect("alert raised");
    assert_eq!(alert.title, "Error");
    assert!(!alert.success);
}

#[test]
fn rex_is_created_and_wizard_resets() {
    let source = backend();
    let mut session = session_with(source.clone());
    session.load_user("owner-1").unwrap();
    session.begin_create();
    fill_rex(&mut session);

    for expected in 1..=4 {
        assert_eq!(session.advance_wizard().unwrap(), expected);
    }
    let (stored, outcome) = session.submit_wizard().expect("submit succeeds");

    assert_eq!(outcome, SubmitOutcome::Created);
    assert!(stored.id.is_some());
    assert_eq!(stored.owner_id.as_deref(), Some("owner-1"));
    assert_eq!(stored.pet_type.as_deref(), Some("DOG"));
    assert_eq!(
        stored.date_of_birth.as_deref(),
        Some("2022-08-02T00:00:00.000+0000")
    );
    assert_eq!(session.wizard().current_step(), 0);
    assert!(session.wizard().form().name.is_none());
    assert_eq!(session.pets().len(), 1);
    assert_eq!(session.alert().map(|a| a.title.as_str()), Some("Success"));
    assert_eq!(source.pet_count(), 1);
}

#[test]
fn validation_failure_sets_validation_alert() {
    let mut session = session_with(backend());
    session.begin_create();
    session.wizard_mut().set_name("Rex");

    let err = session.advance_wizard().unwrap_err();
    assert!(matches!(err, CoreError::Wizard(WizardError::Validation(_))));
    let alert = session.dismiss_alert().expect("alert raised");
    assert_eq!(alert.title, "Validation Error");
    assert_eq!(alert.message, "Pet type is required");
    assert!(session.alert().is_none());
    assert_eq!(session.wizard().current_step(), 0);
}

#[test]
fn submit_without_owner_is_a_precondition_failure() {
    let mut session = session_with(backend());
    fill_rex(&mut session);
    let err = session.submit_wizard().unwrap_err();
    assert!(matches!(err, CoreError::Wizard(WizardError::PreconditionFailed(_))));
    assert_eq!(session.alert().unwrap().title, "Error");
}

#[test]
fn backend_failure_keeps_wizard_state() {
    let source = backend();
    let mut session = session_with(source.clone());
    session.load_user("owner-1").unwrap();
    fill_rex(&mut session);
    for _ in 0..4 {
        session.advance_wizard().unwrap();
    }

    source.fail_next(DataSourceError::Status {
        status: 500,
        message: "boom".into(),
    });
    let err = session.submit_wizard().unwrap_err();
    assert!(matches!(err, CoreError::DataSource(DataSourceError::Status { .. })));

    let alert = session.alert().unwrap();
    assert_eq!(alert.title, "Error");
    assert!(alert.message.contains("500"));
    assert_eq!(session.wizard().current_step(), 4);
    assert_eq!(session.wizard().form().name.as_deref(), Some("Rex"));
    assert_eq!(source.pet_count(), 0);
}

#[test]
fn edit_flow_updates_stored_pet() {
    let source = backend();
    let id = source
        .insert_pet(Pet {
            owner_id: Some("owner-1".into()),
            breed_name: Some("Siamese".into()),
            description: Some("Sleepy".into()),
            weight: Some(4.0),
            size: Some(Size::Small),
            image: Some(ImageRef::from_url("https://cdn/milo.jpg")),
            ..Pet::named("Milo", "CAT")
        })
        .unwrap();
    let mut session = session_with(source.clone());
    session.load_user("owner-1").unwrap();

    session.begin_edit(&id).expect("pet loads into wizard");
    assert!(session.wizard().is_editing());
    assert!(!session.wizard().is_dirty());

    session.wizard_mut().set_description("Very sleepy");
    assert!(session
        .wizard_mut()
        .set_image(Some(ImageRef::local("/tmp/milo-new.jpg"))));
    let (stored, outcome) = session.submit_wizard().unwrap();

    assert_eq!(outcome, SubmitOutcome::Updated);
    assert_eq!(stored.id.as_deref(), Some(id.as_str()));
    let fetched = source.fetch_pet_by_id(&id).unwrap();
    assert_eq!(fetched.description.as_deref(), Some("Very sleepy"));
    assert_eq!(
        session.selected_pet().and_then(|p| p.description.as_deref()),
        Some("Very sleepy")
    );
}

#[test]
fn begin_edit_unknown_pet_is_not_found() {
    let mut session = session_with(backend());
    assert_eq!(
        session.begin_edit("nope").unwrap_err(),
        CoreError::PetNotFound("nope".into())
    );
    assert!(!session.wizard().is_editing());
}

#[test]
fn delete_removes_pet_and_clears_selection() {
    let source = backend();
    let id = source
        .insert_pet(Pet {
            owner_id: Some("owner-1".into()),
            ..Pet::named("Milo", "CAT")
        })
        .unwrap();
    let mut session = session_with(source.clone());
    session.load_user("owner-1").unwrap();
    session.load_user_pets().unwrap();
    let milo = session.find_pet("milo").cloned().expect("found by name");
    session.select_pet(milo);

    session.delete_pet(&id).unwrap();
    assert!(session.pets().is_empty());
    assert!(session.selected_pet().is_none());
    assert_eq!(source.pet_count(), 0);
}

#[test]
fn refresh_selected_requires_selection() {
    let mut session = session_with(backend());
    assert_eq!(
        session.refresh_selected_pet().unwrap_err(),
        CoreError::NoPetSelected
    );
}

#[test]
fn pet_types_are_loaded() {
    let mut session = session_with(backend());
    let types = session.load_pet_types().unwrap();
    assert!(types.iter().any(|t| t.tag().as_deref() == Some("DOG")));
}

#[test]
fn stale_errors_clear_when_field_is_set() {
    let mut session = session_with(backend());
    let _ = session.advance_wizard();
    assert!(session.wizard().error(WizardField::Name).is_some());
    session.wizard_mut().set_name("Rex");
    assert!(session.wizard().error(WizardField::Name).is_none());
}
