use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use petcore::cli::shell_context::DEMO_OWNER_ID;
use petcore_core::{FixedClock, InMemoryDataSource, PetSession};
use petcore_domain::Owner;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const TODAY: &str = "2024-08-02";

/// A fresh directory to use as `PETCORE_HOME`.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn today() -> NaiveDate {
    NaiveDate::parse_from_str(TODAY, "%Y-%m-%d").expect("valid date")
}

/// Session over an in-memory backend holding the demo owner, with the owner loaded.
pub fn demo_session() -> (PetSession, Arc<InMemoryDataSource>) {
    let source = Arc::new(InMemoryDataSource::new().with_owner(Owner {
        first_name: Some("Demo".into()),
        ..Owner::with_id(DEMO_OWNER_ID)
    }));
    let mut session = PetSession::new(source.clone(), Arc::new(FixedClock::on(today())));
    session.load_user(DEMO_OWNER_ID).expect("demo owner loads");
    session.load_pet_types().expect("pet types load");
    (session, source)
}
