//! Aktorz Model - versioned actor and movie documents
//!
//! One module per released schema version, each exposing a `Model` document
//! type and its `VERSION`. The 0.1.x releases nest movies and spouses under
//! each actor; 0.2.0 normalizes them into global collections and is reached
//! from v0.1.3 data through the [`migration::NormalizeCollections`]
//! migration.
//!
//! ```rust
//! use aktorz_model::{registry, v0_2_0};
//! use aktorz_schemas::{LoadOptions, VersionId};
//!
//! let data = r#"{
//!     "schema_version": "v0.1.3",
//!     "actors": {
//!         "charlie_chaplin": {
//!             "first_name": "Charlie",
//!             "last_name": "Chaplin",
//!             "movies": [{"title": "Modern Times", "year": 1936}]
//!         }
//!     }
//! }"#;
//!
//! let loader = registry().loader(&VersionId::parse("v0.2.0")?)?;
//! let model: v0_2_0::Model = loader.load_as(data, &LoadOptions::default())?;
//! assert_eq!(model.movies["modern_times"].title, "Modern Times");
//! # Ok::<(), aktorz_schemas::Error>(())
//! ```

mod collections;
mod constraints;

pub mod export;
pub mod migration;
pub mod supported;
pub mod v0_1_0;
pub mod v0_1_1;
pub mod v0_1_2;
pub mod v0_1_3;
pub mod v0_2_0;

pub use collections::MovieCollection;
pub use constraints::EARLIEST_YEAR;
pub use supported::{build_registry, registry, CURRENT_VERSION, PREVIOUS_VERSION, SUPPORTED_VERSIONS};
