//! Run command implementation
//!
//! Executes one check pass against the state snapshot and saves it.

use crate::cli::args::{OutputFormat, RunArgs};
use crate::cli::output::{print_output, DeviceLists};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::services::Watcher;
use crate::store::SnapshotStore;

use chrono::{DateTime, FixedOffset, Local};

/// Execute the run command
pub fn run_watch(args: &RunArgs, config: Config, format: OutputFormat) -> Result<()> {
    let now = run_instant(args.at.as_deref())?;

    let path = config.store.path.clone().ok_or_else(|| ConfigError::InvalidValue {
        key: "store.path".to_string(),
        message: "no state snapshot configured, use --store".to_string(),
    })?;
    let mut store = SnapshotStore::open(&path)?;
    log::debug!("Opened state snapshot {}", store.path().display());

    let watcher = Watcher::new(config);
    let summary = watcher.run(&mut store, now)?;

    if !summary.dry_run {
        store.flush()?;
    }

    print_output(&summary, format)?;
    if args.lists {
        print_output(&DeviceLists { lists: &summary.lists }, format)?;
    }

    Ok(())
}

/// Parse an explicit instant or take the local time
fn run_instant(at: Option<&str>) -> Result<DateTime<FixedOffset>> {
    match at {
        Some(at) => DateTime::parse_from_rfc3339(at).map_err(|e| {
            ConfigError::InvalidValue {
                key: "--at".to_string(),
                message: e.to_string(),
            }
            .into()
        }),
        None => Ok(Local::now().fixed_offset()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_run_instant() {
        let at = run_instant(Some("2024-05-06T12:30:00+02:00")).unwrap();
        assert_eq!(at.hour(), 12);
        assert_eq!(at.offset().local_minus_utc(), 7200);
        assert!(run_instant(Some("yesterday")).is_err());
        assert!(run_instant(None).is_ok());
    }

    #[test]
    fn test_run_requires_store() {
        let args = RunArgs {
            at: None,
            lists: false,
        };
        assert!(run_watch(&args, Config::default(), OutputFormat::Compact).is_err());
    }
}
