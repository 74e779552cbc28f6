//! Containers shared by the 0.1.x shapes
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use aktorz_schemas::ValidationContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An actor's movies, either keyed by movie id or as a plain list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieCollection<M> {
    ById(BTreeMap<String, M>),
    Listed(Vec<M>),
}

impl<M> MovieCollection<M> {
    pub fn len(&self) -> usize {
        match self {
            Self::ById(movies) => movies.len(),
            Self::Listed(movies) => movies.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Movies in storage order
    pub fn iter(&self) -> Box<dyn Iterator<Item = &M> + '_> {
        match self {
            Self::ById(movies) => Box::new(movies.values()),
            Self::Listed(movies) => Box::new(movies.iter()),
        }
    }

    /// Movies paired with the validation context locating each one
    pub(crate) fn located(&self, context: &ValidationContext) -> Vec<(ValidationContext, &M)> {
        match self {
            Self::ById(movies) => movies
                .iter()
                .map(|(movie_id, movie)| (context.child(movie_id), movie))
                .collect(),
            Self::Listed(movies) => movies
                .iter()
                .enumerate()
                .map(|(index, movie)| (context.child_index(index), movie))
                .collect(),
        }
    }
}

impl<M> Default for MovieCollection<M> {
    fn default() -> Self {
        Self::ById(BTreeMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_forms() {
        let by_id: MovieCollection<String> = serde_json::from_value(json!({"a": "x", "b": "y"})).unwrap();
        assert!(matches!(by_id, MovieCollection::ById(_)));
        assert_eq!(by_id.iter().collect::<Vec<_>>(), vec!["x", "y"]);

        let listed: MovieCollection<String> = serde_json::from_value(json!(["x"])).unwrap();
        assert!(matches!(listed, MovieCollection::Listed(_)));
        assert_eq!(listed.len(), 1);

        assert!(serde_json::from_value::<MovieCollection<String>>(json!("x")).is_err());
    }

    #[test]
    fn test_located_paths() {
        let context = ValidationContext::default().child("movies");
        let listed = MovieCollection::Listed(vec![1, 2]);
        let paths: Vec<_> = listed.located(&context).into_iter().map(|(c, _)| c.path).collect();
        assert_eq!(paths, vec!["$.movies[0]", "$.movies[1]"]);

        let by_id = MovieCollection::ById(BTreeMap::from([("modern_times".to_string(), 1)]));
        let paths: Vec<_> = by_id.located(&context).into_iter().map(|(c, _)| c.path).collect();
        assert_eq!(paths, vec!["$.movies.modern_times"]);
    }
}
