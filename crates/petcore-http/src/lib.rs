//! petcore-http
//!
//! Blocking REST implementation of `PetDataSource` built on ureq. JSON bodies
//! go through serde; transport failures, non-2xx statuses, and undecodable
//! bodies all surface as `DataSourceError`.

pub mod client;

pub use client::HttpPetDataSource;
