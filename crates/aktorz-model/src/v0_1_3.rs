//! Schema v0.1.3: the last 0.1.x shape
//!
//! Adds demographics (`gender`, `home_town`, spouse `birth_year`) and money
//! (movie `gross`, cast `salary`) to the v0.1.1 layout. Data in this shape is
//! the input of the migration to v0.2.0.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use crate::collections::MovieCollection;
use crate::constraints::{check_cast_name, check_keys, check_non_negative, check_year, full_name};
use aktorz_schemas::{Document, FieldViolation, ValidationContext, ValidationHelpers, VersionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: &str = "v0.1.3";

pub use crate::v0_1_0::Person;

#[derive(Deserialize)]
struct CastMemberFields {
    actor: String,
    first_name: Option<String>,
    last_name: Option<String>,
    name: Option<String>,
    salary: Option<i64>,
}

/// An actor performing as a character, paid `salary` (millions USD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CastMemberFields")]
pub struct CastMember {
    pub actor: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub salary: Option<i64>,
}

impl From<CastMemberFields> for CastMember {
    fn from(fields: CastMemberFields) -> Self {
        let name = fields
            .name
            .filter(|name| !name.is_empty())
            .or_else(|| full_name(fields.first_name.as_deref(), fields.last_name.as_deref()));
        Self {
            actor: fields.actor,
            first_name: fields.first_name,
            last_name: fields.last_name,
            name,
            salary: fields.salary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub cast: Option<BTreeMap<String, CastMember>>,
    pub budget: Option<i64>,
    pub gross: Option<i64>,
    pub run_time_minutes: Option<i64>,
    pub year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spouse {
    pub first_name: String,
    pub last_name: String,
    pub birth_year: Option<i64>,
    pub gender: Option<String>,
    pub home_town: Option<String>,
    pub children: Vec<Person>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub home_town: Option<String>,
    pub movies: MovieCollection<Movie>,
    pub filmography: Option<Vec<(String, i64)>>,
    pub birth_year: Option<i64>,
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

    fn check_fields(&self, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
        let actors = context.child("actors");
        check_keys(self.actors.keys(), &actors, out);

        for (actor_id, actor) in &self.actors {
            let actor_context = actors.child(actor_id);
            let movies = actor_context.child("movies");
            if let MovieCollection::ById(by_id) = &actor.movies {
                check_keys(by_id.keys(), &movies, out);
            }

            for (movie_context, movie) in actor.movies.located(&movies) {
                if let Some(cast) = &movie.cast {
                    let cast_context = movie_context.child("cast");
                    check_keys(cast.keys(), &cast_context, out);
                    for (character_id, member) in cast {
                        let member_context = cast_context.child(character_id);
                        ValidationHelpers::check_identifier(&member.actor, &member_context.child("actor"), out);
                        check_cast_name(
                            member.name.as_deref(),
                            member.first_name.as_deref(),
                            member.last_name.as_deref(),
                            &member_context,
                            out,
                        );
                        check_non_negative(member.salary, &member_context.child("salary"), out);
                    }
                }
                check_non_negative(movie.budget, &movie_context.child("budget"), out);
                check_non_negative(movie.gross, &movie_context.child("gross"), out);
                check_non_negative(movie.run_time_minutes, &movie_context.child("run_time_minutes"), out);
                check_year(movie.year, &movie_context.child("year"), out);
            }

            if let Some(filmography) = &actor.filmography {
                let filmography_context = actor_context.child("filmography");
                for (index, (_, year)) in filmography.iter().enumerate() {
                    check_year(Some(*year), &filmography_context.child_index(index).child_index(1), out);
                }
            }
            check_year(actor.birth_year, &actor_context.child("birth_year"), out);

            if let Some(spouses) = &actor.spouses {
                let spouses_context = actor_context.child("spouses");
                check_keys(spouses.keys(), &spouses_context, out);
                for (spouse_id, spouse) in spouses {
                    check_year(spouse.birth_year, &spouses_context.child(spouse_id).child("birth_year"), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aktorz_schemas::document::materialize;
    use aktorz_schemas::FieldStrictness;
    use serde_json::json;

    #[test]
    fn test_money_must_be_non_negative() {
        let value = json!({
            "schema_version": VERSION,
            "actors": {
                "dwayne_johnson": {
                    "first_name": "Dwayne",
                    "last_name": "Johnson",
                    "gender": "male",
                    "movies": [{
                        "title": "Fast Five",
                        "gross": -1,
                        "cast": {"luke_hobbs": {"actor": "dwayne_johnson", "name": "Luke Hobbs", "salary": -2}}
                    }]
                }
            }
        });
        let report = materialize::<Model>(&value, FieldStrictness::Strict).unwrap_err();
        assert_eq!(
            report.paths().collect::<Vec<_>>(),
            vec![
                "$.actors.dwayne_johnson.movies[0].cast.luke_hobbs.salary",
                "$.actors.dwayne_johnson.movies[0].gross",
            ]
        );
    }

    #[test]
    fn test_spouse_demographics() {
        let value = json!({
            "schema_version": VERSION,
            "actors": {
                "charlie_chaplin": {
                    "first_name": "Charlie",
                    "last_name": "Chaplin",
                    "movies": {},
                    "spouses": {
                        "oona_oneill": {"first_name": "Oona", "last_name": "O'Neill", "birth_year": 1925, "gender": "female", "children": []}
                    }
                }
            }
        });
        let model = materialize::<Model>(&value, FieldStrictness::Strict).unwrap();
        let spouse = &model.actors["charlie_chaplin"].spouses.as_ref().unwrap()["oona_oneill"];
        assert_eq!(spouse.birth_year, Some(1925));
        assert_eq!(spouse.home_town, None);
    }
}
