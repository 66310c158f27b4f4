//! petcore-core
//!
//! Wizard state machine, date helpers, session and navigation state for the
//! pet feature area. Depends on petcore-domain. No terminal I/O, no HTTP; the
//! backend is reached through the `PetDataSource` trait.

pub mod coordinator;
pub mod data_source;
pub mod dates;
pub mod error;
pub mod memory;
pub mod routes;
pub mod session;
pub mod time;
pub mod wizard;

pub use coordinator::*;
pub use data_source::PetDataSource;
pub use error::{CoreError, DataSourceError, WizardError};
pub use memory::InMemoryDataSource;
pub use routes::ApiRoute;
pub use session::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use wizard::*;

#[cfg(test)]
mod tests;
