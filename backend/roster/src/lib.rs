//! # Roster
//!
//! Candidates the voting pages are seeded with.
//!
//! ## Sources
//! - Bundled list: 48 names, images `p1.jpg` through `p48.jpg`, no gender tag.
//! - JSON file: array of `{ "name", "image", "gender"? }` objects. Used when
//!   candidates need gender tags for the `/vote/{gender}` pages.
//!
//! Seeding only happens into an empty store, so editing a roster file after
//! the first boot has no effect unless the store is reset.
use std::{collections::HashSet, fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod people;

pub use people::default_roster;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" | "f" | "women" => Ok(Gender::Female),
            "male" | "m" | "men" => Ok(Gender::Male),
            _ => Err(RosterError::UnknownGender(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPerson {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Unknown gender: {0}")]
    UnknownGender(String),

    #[error("Entry {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },

    #[error("Image {0} is listed more than once")]
    DuplicateImage(String),

    #[error("Failed to read roster: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed roster: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<SeedPerson>, RosterError> {
    let data = fs::read_to_string(path)?;
    let people: Vec<SeedPerson> = serde_json::from_str(&data)?;

    validate(&people)?;

    Ok(people)
}

pub fn validate(people: &[SeedPerson]) -> Result<(), RosterError> {
    let mut images = HashSet::new();

    for (index, person) in people.iter().enumerate() {
        if person.name.trim().is_empty() {
            return Err(RosterError::EmptyField {
                index,
                field: "name",
            });
        }

        if person.image.trim().is_empty() {
            return Err(RosterError::EmptyField {
                index,
                field: "image",
            });
        }

        if !images.insert(person.image.as_str()) {
            return Err(RosterError::DuplicateImage(person.image.clone()));
        }
    }

    Ok(())
}
