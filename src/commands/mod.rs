//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod profiles;
pub mod run;

pub use profiles::run_profiles;
pub use run::run_watch;
