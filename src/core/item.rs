//! View projection of a process record.
//!
//! One item type serves every layout: the list renderer reads `title` and
//! `detail`, the table renderer reads `columns`. Items are rebuilt from every
//! snapshot; only `pid` carries identity across refreshes.

use crate::core::models::ProcessRecord;
use crate::utils::format::{format_bytes, format_percent, format_timestamp};

/// Pre-formatted table cells, in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemColumns {
    pub pid: String,
    pub name: String,
    pub cpu: String,
    pub memory_percent: String,
    pub memory_resident: String,
    pub parent_pid: String,
    pub created: String,
}

impl ItemColumns {
    pub const HEADERS: [&'static str; 7] = [
        "PID",
        "Name",
        "CPU (%)",
        "RAM (%)",
        "RAM (Used)",
        "PPID",
        "Creation Date",
    ];

    pub fn cells(&self) -> [&str; 7] {
        [
            &self.pid,
            &self.name,
            &self.cpu,
            &self.memory_percent,
            &self.memory_resident,
            &self.parent_pid,
            &self.created,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessItem {
    pub pid: u32,
    /// `(<pid>) <name>`; the pid is always the parenthesised prefix
    pub title: String,
    /// Two lines: command line, then resource usage
    pub detail: String,
    /// Lowercase pid, name and command line, matched by substring
    pub filter_key: String,
    pub command_line: String,
    pub columns: ItemColumns,
}

impl ProcessItem {
    /// Case-insensitive substring match; `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.filter_key.contains(needle)
    }

    /// Parse the pid back out of a title produced by this module.
    pub fn pid_from_title(title: &str) -> Option<u32> {
        let rest = title.strip_prefix('(')?;
        let (pid, _) = rest.split_once(')')?;
        pid.parse().ok()
    }
}

impl From<&ProcessRecord> for ProcessItem {
    fn from(record: &ProcessRecord) -> Self {
        let cpu = format_percent(record.cpu_percent);
        let memory_percent = format_percent(f64::from(record.memory_percent));
        let memory_resident = format_bytes(record.memory_resident_bytes);
        let created = format_timestamp(record.creation_timestamp);

        let detail = format!(
            "CMD: {}\nRAM: {}% ({}) | CPU: {}% | PPID: {} | Created: {}",
            record.command_line, memory_percent, memory_resident, cpu, record.parent_pid, created
        );
        let filter_key =
            format!("{} {} {}", record.pid, record.name, record.command_line).to_lowercase();

        Self {
            pid: record.pid,
            title: format!("({}) {}", record.pid, record.name),
            detail,
            filter_key,
            command_line: record.command_line.clone(),
            columns: ItemColumns {
                pid: record.pid.to_string(),
                name: record.name.clone(),
                cpu,
                memory_percent,
                memory_resident,
                parent_pid: record.parent_pid.to_string(),
                created,
            },
        }
    }
}
