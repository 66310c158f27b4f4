//! The pet record as stored by the backend.

use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::image::ImageRef;

/// A pet belonging to an owner.
///
/// Every field is optional on the wire. Dates stay as wire strings here; the
/// core crate parses them when it needs calendar values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed_name: Option<String>,
    #[serde(
        rename = "birthDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adoption_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_enum",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_lost: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_enum",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<Size>,
    #[serde(
        rename = "animalType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pet_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Pet {
    pub fn named(name: impl Into<String>, pet_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            pet_type: Some(pet_type.into()),
            ..Self::default()
        }
    }

    pub fn name_or_unknown(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn is_lost(&self) -> bool {
        self.is_lost.unwrap_or(false)
    }
}

impl Identifiable for Pet {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Displayable for Pet {
    fn display_label(&self) -> String {
        let mut label = self.name_or_unknown().to_string();
        match (self.pet_type.as_deref(), self.breed_name.as_deref()) {
            (Some(kind), Some(breed)) if !breed.is_empty() => {
                label.push_str(&format!(" ({kind}, {breed})"))
            }
            (Some(kind), _) => label.push_str(&format!(" ({kind})")),
            (None, Some(breed)) if !breed.is_empty() => label.push_str(&format!(" ({breed})")),
            _ => {}
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_differ_for_owner_breed_birth_and_type() {
        let pet = Pet {
            owner_id: Some("owner-1".into()),
            breed_id: Some("breed-9".into()),
            date_of_birth: Some("2022-08-02T00:00:00.000+0000".into()),
            pet_type: Some("DOG".into()),
            ..Pet::named("Rex", "DOG")
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["ownerId"], "owner-1");
        assert_eq!(json["breedId"], "breed-9");
        assert_eq!(json["birthDate"], "2022-08-02T00:00:00.000+0000");
        assert_eq!(json["animalType"], "DOG");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn missing_fields_decode_as_none() {
        let pet: Pet = serde_json::from_str(r#"{"id":"p1","name":"Rex","isLost":true}"#).unwrap();
        assert_eq!(pet.id(), Some("p1"));
        assert!(pet.is_lost());
        assert!(pet.gender.is_none());
        assert_eq!(pet.display_label(), "Rex");
    }

    #[test]
    fn blank_or_loose_enum_values_do_not_fail_the_record() {
        let pet: Pet = serde_json::from_str(r#"{"id":"p1","gender":"","size":""}"#).unwrap();
        assert_eq!(pet.gender, None);
        assert_eq!(pet.size, None);

        let pets: Vec<Pet> = serde_json::from_str(
            r#"[
                {"id":"p1","gender":"MALE","size":"EXTRA_LARGE"},
                {"id":"p2","gender":"male","size":"large"},
                {"id":"p3","gender":"giant","size":null},
                {"id":"p4"}
            ]"#,
        )
        .unwrap();
        assert_eq!(pets.len(), 4);
        assert_eq!(pets[0].gender, Some(Gender::Male));
        assert_eq!(pets[0].size, Some(Size::ExtraLarge));
        assert_eq!(pets[1].gender, Some(Gender::Male));
        assert_eq!(pets[1].size, Some(Size::Large));
        assert_eq!(pets[2].gender, None);
        assert_eq!(pets[2].size, None);
        assert_eq!(pets[3].gender, None);
    }

    #[test]
    fn enums_still_encode_as_screaming_snake_case() {
        let pet = Pet {
            gender: Some(Gender::Female),
            size: Some(Size::ExtraLarge),
            ..Pet::default()
        };
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["gender"], "FEMALE");
        assert_eq!(json["size"], "EXTRA_LARGE");
    }
}
