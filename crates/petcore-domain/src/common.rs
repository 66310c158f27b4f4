//! Shared traits and wire enums for pet records.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Exposes the backend identifier of a record, once it has one.
pub trait Identifiable {
    fn id(&self) -> Option<&str>;
}

/// Converts a record into a short user-facing label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Returned when a free-text value does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: `{}`", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_ascii_uppercase()
        .replace([' ', '-'], "_")
}

/// Reads an optional wire enum through its `FromStr`, so blank or unrecognised
/// text decodes as `None` instead of failing the whole record.
pub(crate) fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unknown];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "MALE" | "M" => Ok(Gender::Male),
            "FEMALE" | "F" => Ok(Gender::Female),
            "UNKNOWN" => Ok(Gender::Unknown),
            _ => Err(UnknownVariant {
                kind: "gender",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Size {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Size {
    pub const ALL: [Size; 4] = [Size::Small, Size::Medium, Size::Large, Size::ExtraLarge];
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::ExtraLarge => "Extra large",
        };
        f.write_str(label)
    }
}

impl FromStr for Size {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "SMALL" | "S" => Ok(Size::Small),
            "MEDIUM" | "M" => Ok(Size::Medium),
            "LARGE" | "L" => Ok(Size::Large),
            "EXTRA_LARGE" | "XL" => Ok(Size::ExtraLarge),
            _ => Err(UnknownVariant {
                kind: "size",
                value: value.to_string(),
            }),
        }
    }
}

/// Unit used when rendering `Pet::weight_value`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }

    /// Formats a weight the way the backend stores `weightValue`.
    ///
    /// Uses the shortest text that parses back to `weight`, so `weightValue`
    /// always agrees with the numeric `weight` sent beside it.
    pub fn format(self, weight: f64) -> String {
        format!("{} {}", weight, self.symbol())
    }

    /// Recovers the unit from a stored `weightValue` such as `"12.5 kg"`.
    pub fn from_weight_value(value: &str) -> Option<Self> {
        value
            .split_whitespace()
            .last()
            .and_then(|unit| unit.parse().ok())
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for WeightUnit {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Lb),
            _ => Err(UnknownVariant {
                kind: "weight unit",
                value: value.to_string(),
            }),
        }
    }
}
