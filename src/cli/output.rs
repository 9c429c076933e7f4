//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{AdapterProfile, AggregatedLists};
use crate::services::RunSummary;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

impl TableDisplay for RunSummary {
    fn to_table(&self) -> String {
        let mut output = format!("Checked at: {}\n", self.checked_at);
        if self.dry_run {
            output.push_str("Dry run: nothing written or sent\n");
        }
        output.push_str(&format!("Adapters: {}\n\n", self.profiles.join(", ")));
        output.push_str(&format!("Devices:       {}\n", self.count_all));
        output.push_str(&format!("Offline:       {}\n", self.offline_count));
        output.push_str(&format!("Link quality:  {}\n", self.link_quality_count));
        output.push_str(&format!("Battery:       {}\n", self.battery_count));
        output.push_str(&format!("Low battery:   {}\n\n", self.low_battery_count));
        output.push_str(&format!("Offline alert:     {}\n", self.offline_alert));
        output.push_str(&format!("Low battery alert: {}\n", self.low_battery_alert));
        if !self.notified.is_empty() {
            output.push_str(&format!("Notified via:      {}\n", self.notified.join(", ")));
        }
        if !self.failed_writes.is_empty() {
            output.push_str(&format!("Failed writes:     {}\n", self.failed_writes.join(", ")));
        }
        output
    }

    fn to_compact(&self) -> String {
        format!(
            "devices={} offline={} battery={} low={} offline_alert={} battery_alert={}",
            self.count_all,
            self.offline_count,
            self.battery_count,
            self.low_battery_count,
            self.offline_alert,
            self.low_battery_alert
        )
    }
}

/// Device lists for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceLists<'a> {
    #[serde(flatten)]
    pub lists: &'a AggregatedLists,
}

impl TableDisplay for DeviceLists<'_> {
    fn to_table(&self) -> String {
        let mut output = String::from("All devices:\n");
        for r in &self.lists.all {
            output.push_str(&format!(
                "  {:<30} {:<14} {:>8} {:>14} {:>8}\n",
                r.device, r.adapter, r.battery, r.last_contact, r.link_quality
            ));
        }

        output.push_str("\nOffline:\n");
        for r in &self.lists.offline {
            output.push_str(&format!("  {:<30} {:<14} {}\n", r.device, r.adapter, r.last_contact));
        }

        output.push_str("\nLow battery:\n");
        for r in &self.lists.low_battery {
            output.push_str(&format!("  {:<30} {:<14} {}\n", r.device, r.adapter, r.battery));
        }

        output
    }

    fn to_compact(&self) -> String {
        self.lists
            .offline
            .iter()
            .map(|r| format!("{}:offline", r.device))
            .chain(self.lists.low_battery.iter().map(|r| format!("{}:{}", r.device, r.battery)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Profile list entry for display
#[derive(Debug, Clone, Serialize)]
pub struct ProfileEntry {
    pub id: String,
    pub vendor: String,
    pub selector: String,
    pub battery: Option<String>,
    pub reach: Option<String>,
    pub low_battery: Option<String>,
    pub enabled: bool,
}

impl ProfileEntry {
    pub fn new(profile: &AdapterProfile, enabled: bool) -> Self {
        Self {
            id: profile.id.to_string(),
            vendor: profile.vendor.to_string(),
            selector: profile.selector.to_string(),
            battery: profile
                .battery
                .map(|path| format!("{} ({})", path, profile.battery_unit)),
            reach: profile.reach.map(|r| r.path.to_string()),
            low_battery: profile.low_battery.map(str::to_string),
            enabled,
        }
    }
}

impl TableDisplay for ProfileEntry {
    fn to_table(&self) -> String {
        let mark = if self.enabled { "*" } else { " " };
        format!(
            "{} {:<14} {:<14} {:<28} battery: {}",
            mark,
            self.id,
            self.vendor,
            self.selector,
            self.battery.as_deref().unwrap_or("-")
        )
    }

    fn to_compact(&self) -> String {
        self.id.clone()
    }
}

/// Profile list for display
#[derive(Debug, Clone, Serialize)]
pub struct ProfileList {
    pub profiles: Vec<ProfileEntry>,
}

impl TableDisplay for ProfileList {
    fn to_table(&self) -> String {
        if self.profiles.is_empty() {
            return "No adapter enabled".to_string();
        }

        let mut output = String::new();
        for profile in &self.profiles {
            output.push_str(&profile.to_table());
            output.push('\n');
        }
        output
    }

    fn to_compact(&self) -> String {
        self.profiles
            .iter()
            .map(|p| p.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalogue;

    #[test]
    fn test_profile_entry() {
        let homematic = catalogue().into_iter().find(|p| p.id == "homematic").unwrap();
        let entry = ProfileEntry::new(&homematic, true);
        assert_eq!(entry.battery.as_deref(), Some(".OPERATING_VOLTAGE (V)"));
        assert_eq!(entry.reach.as_deref(), Some(".UNREACH"));
        assert!(entry.to_table().starts_with("* homematic"));
    }

    #[test]
    fn test_empty_profile_list() {
        let list = ProfileList { profiles: vec![] };
        assert_eq!(list.to_table(), "No adapter enabled");
        assert_eq!(list.to_compact(), "");
    }

    #[test]
    fn test_device_lists_compact() {
        let mut lists = AggregatedLists::default();
        lists.offline.push(crate::domain::OfflineRecord {
            device: "Lamp".to_string(),
            adapter: "Hue".to_string(),
            last_contact: "2 Tagen".to_string(),
        });
        let view = DeviceLists { lists: &lists };
        assert_eq!(view.to_compact(), "Lamp:offline");
        assert!(view.to_table().contains("Lamp"));
    }
}
