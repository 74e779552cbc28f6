//! Schema v0.1.2
//!
//! Structurally identical to v0.1.1; it is a separate release and a separate
//! registry entry, so data declared `v0.1.2` is checked against its own
//! implementation.
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

pub use crate::v0_1_1::{Actor, CastMember, Model, Movie, Person, Spouse};

pub const VERSION: &str = "v0.1.2";
