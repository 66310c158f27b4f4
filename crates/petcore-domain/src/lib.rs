//! petcore-domain
//!
//! Pure records exchanged with the pet backend (Pet, Owner, ImageRef, PetType).
//! No I/O, no clocks, no validation rules. Only data types and wire enums.

pub mod common;
pub mod image;
pub mod owner;
pub mod pet;
pub mod pet_type;

pub use common::*;
pub use image::*;
pub use owner::*;
pub use pet::*;
pub use pet_type::*;
