//! Schema v0.1.0: the first released shape
//!
//! Actors are keyed by id and carry their own movies, spouses and
//! filmography. Nothing is constrained beyond its type.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::collections::MovieCollection;
use aktorz_schemas::{Document, VersionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: &str = "v0.1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
}

/// An actor performing as a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub actor: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub cast: Option<BTreeMap<String, CastMember>>,
    pub budget: Option<i64>,
    pub run_time_minutes: Option<i64>,
    pub year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spouse {
    pub first_name: String,
    pub last_name: String,
    pub children: Vec<Person>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub first_name: String,
    pub last_name: String,
    pub movies: MovieCollection<Movie>,
    pub birth_year: Option<i64>,
    pub filmography: Option<Vec<(String, i64)>>,
    pub is_funny: Option<bool>,
    pub spouses: Option<BTreeMap<String, Spouse>>,
    pub hobbies: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub schema_version: VersionId,
    pub actors: BTreeMap<String, Actor>,
}

impl Document for Model {
    fn schema_version(&self) -> &VersionId {
        &self.schema_version
    }

    fn set_schema_version(&mut self, version: VersionId) {
        self.schema_version = version;
    }
}
