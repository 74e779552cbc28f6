//! Schema v0.1.1
//!
//! Same layout as v0.1.0 with constraints added: years from 1850 on, ids
//! matching `[a-z][a-z0-9_]+`, non-negative budgets and run times. Cast
//! members gain optional `first_name`/`last_name`; `name` becomes optional and
//! is derived from them when absent.
//!
//! v0.1.2 has the same document shape, so it shares these types.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::collections::MovieCollection;
use crate::constraints::{check_cast_name, check_keys, check_non_negative, check_year, full_name};
use aktorz_schemas::{Document, FieldViolation, ValidationContext, ValidationHelpers, VersionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: &str = "v0.1.1";

pub use crate::v0_1_0::Person;

/// Cast member fields as they appear in input, before `name` is derived
#[derive(Deserialize)]
struct CastMemberFields {
    actor: String,
    first_name: Option<String>,
    last_name: Option<String>,
    name: Option<String>,
}

/// An actor performing as a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CastMemberFields")]
pub struct CastMember {
    pub actor: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
}

impl From<CastMemberFields> for CastMember {
    fn from(fields: CastMemberFields) -> Self {
        let name = match fields.name.filter(|name| !name.is_empty()) {
            Some(name) => Some(name),
            None => full_name(fields.first_name.as_deref(), fields.last_name.as_deref()),
        };
        Self {
            actor: fields.actor,
            first_name: fields.first_name,
            last_name: fields.last_name,
            name,
        }
    }
}

impl CastMember {
    pub(crate) fn check(&self, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
        ValidationHelpers::check_identifier(&self.actor, &context.child("actor"), out);
        check_cast_name(
            self.name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            context,
            out,
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub cast: Option<BTreeMap<String, CastMember>>,
    pub budget: Option<i64>,
    pub run_time_minutes: Option<i64>,
    pub year: Option<i64>,
}

impl Movie {
    fn check(&self, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
        if let Some(cast) = &self.cast {
            let cast_context = context.child("cast");
            check_keys(cast.keys(), &cast_context, out);
            for (character_id, member) in cast {
                member.check(&cast_context.child(character_id), out);
            }
        }
        check_non_negative(self.budget, &context.child("budget"), out);
        check_non_negative(self.run_time_minutes, &context.child("run_time_minutes"), out);
        check_year(self.year, &context.child("year"), out);
    }
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
    pub filmography: Option<Vec<(String, i64)>>,
    pub birth_year: Option<i64>,
    pub is_funny: Option<bool>,
    pub spouses: Option<BTreeMap<String, Spouse>>,
    pub hobbies: Option<BTreeMap<String, String>>,
}

impl Actor {
    fn check(&self, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
        let movies = context.child("movies");
        if let MovieCollection::ById(by_id) = &self.movies {
            check_keys(by_id.keys(), &movies, out);
        }
        for (movie_context, movie) in self.movies.located(&movies) {
            movie.check(&movie_context, out);
        }
        if let Some(filmography) = &self.filmography {
            let filmography_context = context.child("filmography");
            for (index, (_, year)) in filmography.iter().enumerate() {
                check_year(Some(*year), &filmography_context.child_index(index).child_index(1), out);
            }
        }
        check_year(self.birth_year, &context.child("birth_year"), out);
        if let Some(spouses) = &self.spouses {
            check_keys(spouses.keys(), &context.child("spouses"), out);
        }
    }
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

    fn check_fields(&self, context: &ValidationContext, violations: &mut Vec<FieldViolation>) {
        let actors = context.child("actors");
        check_keys(self.actors.keys(), &actors, violations);
        for (actor_id, actor) in &self.actors {
            actor.check(&actors.child(actor_id), violations);
        }
    }
}
