use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::image::ImageRef;

/// The signed-in user who owns pets. Read-only from this crate's side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Owner {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub finished_onboarding: Option<bool>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub image: Option<ImageRef>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub auth_provider: Option<String>,
    pub auth_provider_id: Option<String>,
    pub favorite_services: Option<Vec<String>>,
    pub favorite_parks: Option<Vec<String>>,
}

impl Owner {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        parts.join(" ")
    }
}

impl Identifiable for Owner {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Displayable for Owner {
    fn display_label(&self) -> String {
        let name = self.full_name();
        match (name.is_empty(), self.email.as_deref()) {
            (false, Some(email)) => format!("{name} <{email}>"),
            (false, None) => name,
            (true, Some(email)) => email.to_string(),
            (true, None) => self.id.clone().unwrap_or_else(|| "Unknown user".into()),
        }
    }
}
