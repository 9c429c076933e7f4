//! Profiles command implementation
//!
//! Lists the adapter profiles and whether they are enabled.

use crate::cli::args::{OutputFormat, ProfilesArgs};
use crate::cli::output::{print_output, ProfileEntry, ProfileList};
use crate::config::Config;
use crate::error::Result;
use crate::services::catalogue;

/// Execute the profiles command
pub fn run_profiles(args: &ProfilesArgs, config: &Config, format: OutputFormat) -> Result<()> {
    print_output(&profile_list(args.all, config), format)?;
    Ok(())
}

fn profile_list(all: bool, config: &Config) -> ProfileList {
    let profiles = catalogue()
        .iter()
        .map(|p| ProfileEntry::new(p, config.adapters.is_enabled(p.id)))
        .filter(|entry| all || entry.enabled)
        .collect();

    ProfileList { profiles }
}
