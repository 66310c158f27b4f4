//! REST paths used by the HTTP data source.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    AddPet,
    EditPet,
    DeletePet,
    FetchPet,
    FetchOwnerPets,
    FetchUser,
    FetchPetTypes,
}

/// HTTP verb paired with a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiRoute {
    pub fn method(self) -> Method {
        match self {
            ApiRoute::AddPet => Method::Post,
            ApiRoute::EditPet => Method::Put,
            ApiRoute::DeletePet => Method::Delete,
            ApiRoute::FetchPet
            | ApiRoute::FetchOwnerPets
            | ApiRoute::FetchUser
            | ApiRoute::FetchPetTypes => Method::Get,
        }
    }

    /// Whether the path ends in an identifier segment.
    pub fn needs_id(self) -> bool {
        !matches!(self, ApiRoute::AddPet | ApiRoute::FetchPetTypes)
    }

    /// Relative path for this route; `id` fills the trailing segment.
    ///
    /// Returns `None` when an id is required but missing or blank.
    pub fn path(self, id: Option<&str>) -> Option<String> {
        let id = id.map(str::trim).filter(|id| !id.is_empty());
        match (self, id) {
            (ApiRoute::AddPet, _) => Some("/pets".to_string()),
            (ApiRoute::FetchPetTypes, _) => Some("/pets/animals/types".to_string()),
            (ApiRoute::EditPet | ApiRoute::DeletePet | ApiRoute::FetchPet, Some(id)) => {
                Some(format!("/pets/{id}"))
            }
            (ApiRoute::FetchOwnerPets, Some(id)) => Some(format!("/pets/owner/{id}")),
            (ApiRoute::FetchUser, Some(id)) => Some(format!("/user/{id}")),
            (_, None) => None,
        }
    }
}
