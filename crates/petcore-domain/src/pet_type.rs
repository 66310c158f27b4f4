use serde::{Deserialize, Serialize};

use crate::common::*;

/// Taxonomy entry used to populate the pet-type choices of the first wizard step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(default)]
pub struct PetType {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "img")]
    pub image: Option<String>,
}

impl PetType {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind.into()),
            image: None,
        }
    }

    /// Tag stored on pets, upper-cased the way the wizard submits it.
    pub fn tag(&self) -> Option<String> {
        self.kind
            .as_deref()
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .map(str::to_ascii_uppercase)
    }
}

impl Identifiable for PetType {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Displayable for PetType {
    fn display_label(&self) -> String {
        self.kind.clone().unwrap_or_else(|| "Unknown".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_img_and_type_keys() {
        let entry: PetType =
            serde_json::from_str(r#"{"id":"t1","type":"dog","img":"https://cdn/dog.png"}"#)
                .unwrap();
        assert_eq!(entry.tag().as_deref(), Some("DOG"));
        assert_eq!(entry.image.as_deref(), Some("https://cdn/dog.png"));
    }
}
