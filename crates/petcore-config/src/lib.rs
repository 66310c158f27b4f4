//! petcore-config
//!
//! Persistent CLI preferences: backend selection, API endpoint, signed-in user.
//! Owns the Config data structure plus disk persistence and env overrides.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Backend, Config};
