//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.
//! Every handler works against the process-wide registry of the actor model.

mod check;
mod export;
mod load;
mod utils;
mod versions;

pub use check::handle_check;
pub use export::handle_export;
pub use load::handle_load;
pub use versions::handle_versions;
