//! Process fact sources
//!
//! A fact source lists process ids and reads the observable fields of one
//! process. Every field is read independently: a source never decides whether
//! a process as a whole is usable, the snapshot builder does.
//!
//! Platform strategy:
//! - Linux: psutil, which reports not-found / access-denied per field
//! - Everything else: sysinfo

use std::fmt;

use thiserror::Error;

use crate::core::models::ProcessRecord;

#[cfg(target_os = "linux")]
mod psutil_source;
mod static_source;
#[cfg(not(target_os = "linux"))]
mod sysinfo_source;

#[cfg(target_os = "linux")]
pub use psutil_source::PsutilFactSource;
pub use static_source::{FactTable, StaticFactSource};
#[cfg(not(target_os = "linux"))]
pub use sysinfo_source::SysinfoFactSource;

/// Fact source backed by the running operating system.
#[cfg(target_os = "linux")]
pub type SystemFactSource = PsutilFactSource;
#[cfg(not(target_os = "linux"))]
pub type SystemFactSource = SysinfoFactSource;

/// Why a single field of a single process could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The process exited (or became a zombie) before the field was read
    #[error("process not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("transient read error: {0}")]
    Transient(String),
}

/// Failure to obtain the process list itself.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to enumerate processes: {0}")]
    Enumeration(String),
}

/// The seven per-process fields a record is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ParentPid,
    Name,
    CommandLine,
    CpuPercent,
    MemoryPercent,
    MemoryResidentBytes,
    CreationTimestamp,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::ParentPid,
        Field::Name,
        Field::CommandLine,
        Field::CpuPercent,
        Field::MemoryPercent,
        Field::MemoryResidentBytes,
        Field::CreationTimestamp,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Field::ParentPid => "parent_pid",
            Field::Name => "name",
            Field::CommandLine => "command_line",
            Field::CpuPercent => "cpu_percent",
            Field::MemoryPercent => "memory_percent",
            Field::MemoryResidentBytes => "memory_resident_bytes",
            Field::CreationTimestamp => "creation_timestamp",
        };
        f.write_str(name)
    }
}

/// First field that failed while turning facts into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub pid: u32,
    pub field: Field,
    pub error: FieldError,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "pid {} field {}: {}", self.pid, self.field, self.error)
    }
}

/// Raw per-field read results for one process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessFacts {
    pub pid: u32,
    pub parent_pid: Result<u32, FieldError>,
    pub name: Result<String, FieldError>,
    pub command_line: Result<String, FieldError>,
    pub cpu_percent: Result<f64, FieldError>,
    pub memory_percent: Result<f32, FieldError>,
    pub memory_resident_bytes: Result<u64, FieldError>,
    pub creation_timestamp: Result<i64, FieldError>,
}

impl ProcessFacts {
    /// Facts for a process whose handle could not be opened at all.
    pub fn unavailable(pid: u32, error: FieldError) -> Self {
        Self {
            pid,
            parent_pid: Err(error.clone()),
            name: Err(error.clone()),
            command_line: Err(error.clone()),
            cpu_percent: Err(error.clone()),
            memory_percent: Err(error.clone()),
            memory_resident_bytes: Err(error.clone()),
            creation_timestamp: Err(error),
        }
    }

    /// Replace one field with a failure.
    pub fn with_error(mut self, field: Field, error: FieldError) -> Self {
        match field {
            Field::ParentPid => self.parent_pid = Err(error),
            Field::Name => self.name = Err(error),
            Field::CommandLine => self.command_line = Err(error),
            Field::CpuPercent => self.cpu_percent = Err(error),
            Field::MemoryPercent => self.memory_percent = Err(error),
            Field::MemoryResidentBytes => self.memory_resident_bytes = Err(error),
            Field::CreationTimestamp => self.creation_timestamp = Err(error),
        }
        self
    }

    /// Assemble a record, failing on the first field that could not be read.
    pub fn into_record(self) -> Result<ProcessRecord, FieldFailure> {
        let pid = self.pid;
        let fail = move |field: Field| move |error: FieldError| FieldFailure { pid, field, error };

        Ok(ProcessRecord {
            pid,
            parent_pid: self.parent_pid.map_err(fail(Field::ParentPid))?,
            name: self.name.map_err(fail(Field::Name))?,
            command_line: self.command_line.map_err(fail(Field::CommandLine))?,
            cpu_percent: self.cpu_percent.map_err(fail(Field::CpuPercent))?,
            memory_percent: self.memory_percent.map_err(fail(Field::MemoryPercent))?,
            memory_resident_bytes: self
                .memory_resident_bytes
                .map_err(fail(Field::MemoryResidentBytes))?,
            creation_timestamp: self
                .creation_timestamp
                .map_err(fail(Field::CreationTimestamp))?,
        })
    }
}

impl From<ProcessRecord> for ProcessFacts {
    fn from(record: ProcessRecord) -> Self {
        Self {
            pid: record.pid,
            parent_pid: Ok(record.parent_pid),
            name: Ok(record.name),
            command_line: Ok(record.command_line),
            cpu_percent: Ok(record.cpu_percent),
            memory_percent: Ok(record.memory_percent),
            memory_resident_bytes: Ok(record.memory_resident_bytes),
            creation_timestamp: Ok(record.creation_timestamp),
        }
    }
}

/// Upstream process information provider.
///
/// Sources are owned by exactly one snapshot builder and called from the
/// refresh worker thread, hence `Send` and `&mut self`.
pub trait ProcessFactSource: Send {
    /// List the ids of all currently visible processes.
    fn list_processes(&mut self) -> Result<Vec<u32>, SourceError>;

    /// Read every field of one process. Never fails as a whole.
    fn read_facts(&mut self, pid: u32) -> ProcessFacts;
}

impl<S: ProcessFactSource + ?Sized> ProcessFactSource for Box<S> {
    fn list_processes(&mut self) -> Result<Vec<u32>, SourceError> {
        (**self).list_processes()
    }

    fn read_facts(&mut self, pid: u32) -> ProcessFacts {
        (**self).read_facts(pid)
    }
}
