//! Snapshot data model
//!
//! Defines the per-process record and the immutable snapshot handed from the
//! refresh worker to the view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed process, built once per refresh cycle and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub parent_pid: u32,
    pub name: String,
    pub command_line: String,
    /// Instantaneous CPU usage, may exceed 100 on multi-core hosts
    pub cpu_percent: f64,
    pub memory_percent: f32,
    pub memory_resident_bytes: u64,
    /// Milliseconds since the UNIX epoch
    pub creation_timestamp: i64,
}

/// A complete capture of the process table.
///
/// Records are always ordered by pid descending with no repeated pid; the
/// constructors enforce this regardless of the order the source produced.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    captured_at: DateTime<Utc>,
    records: Vec<ProcessRecord>,
    dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    enumeration_error: Option<String>,
}

impl Snapshot {
    /// Build a snapshot captured now.
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self::captured(Utc::now(), records, 0)
    }

    /// Build a snapshot from surviving records, remembering how many
    /// processes were dropped by the partial-failure policy.
    pub fn captured(
        captured_at: DateTime<Utc>,
        mut records: Vec<ProcessRecord>,
        dropped: usize,
    ) -> Self {
        records.sort_by(|a, b| b.pid.cmp(&a.pid));
        records.dedup_by_key(|record| record.pid);
        Self {
            captured_at,
            records,
            dropped,
            enumeration_error: None,
        }
    }

    /// Snapshot standing in for a cycle where the process list itself could
    /// not be read. Carries no records; consumers keep what they had.
    pub fn enumeration_failed(reason: impl Into<String>) -> Self {
        Self {
            captured_at: Utc::now(),
            records: Vec::new(),
            dropped: 0,
            enumeration_error: Some(reason.into()),
        }
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    /// Number of processes left out because one of their fields failed.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn enumeration_error(&self) -> Option<&str> {
        self.enumeration_error.as_deref()
    }

    pub fn is_enumeration_failure(&self) -> bool {
        self.enumeration_error.is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.records
            .binary_search_by(|record| pid.cmp(&record.pid))
            .is_ok()
    }
}
