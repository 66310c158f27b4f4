use petcore_domain::{Owner, Pet, PetType};

use crate::error::DataSourceError;

/// Backend operations the pet screens depend on.
///
/// Calls are blocking and single-shot; implementations do not retry.
pub trait PetDataSource: Send + Sync {
    /// Creates `pet` and returns the stored record with its assigned id.
    fn add_pet(&self, pet: &Pet) -> Result<Pet, DataSourceError>;
    fn edit_pet(&self, pet: &Pet) -> Result<Pet, DataSourceError>;
    fn delete_pet(&self, pet_id: &str) -> Result<(), DataSourceError>;
    fn fetch_pet_by_id(&self, pet_id: &str) -> Result<Pet, DataSourceError>;
    fn fetch_owner_pets(&self, owner_id: &str) -> Result<Vec<Pet>, DataSourceError>;
    fn fetch_user_by_id(&self, user_id: &str) -> Result<Owner, DataSourceError>;
    fn fetch_pet_types(&self) -> Result<Vec<PetType>, DataSourceError>;
}
