//! Linux fact source backed by psutil.
//!
//! Process handles are cached across cycles: psutil measures `cpu_percent`
//! between two calls on the same handle, so keeping the handle makes the
//! reported CPU usage cover one refresh interval.

use std::collections::{HashMap, HashSet};

use psutil::process::{Process, ProcessError};

use super::{FieldError, ProcessFactSource, ProcessFacts, SourceError};

impl From<ProcessError> for FieldError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::NoSuchProcess { .. } | ProcessError::ZombieProcess { .. } => {
                FieldError::NotFound
            }
            ProcessError::AccessDenied { .. } => FieldError::PermissionDenied,
            #[allow(unreachable_patterns)]
            other => FieldError::Transient(other.to_string()),
        }
    }
}

#[derive(Default)]
pub struct PsutilFactSource {
    handles: HashMap<u32, Process>,
}

impl PsutilFactSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached handle for `pid`, reopened when the pid was recycled.
    fn handle(&mut self, pid: u32) -> Result<&mut Process, FieldError> {
        let stale = self
            .handles
            .get(&pid)
            .map_or(true, |process| !process.is_running());
        if stale {
            let process = Process::new(pid)?;
            self.handles.insert(pid, process);
        }
        self.handles.get_mut(&pid).ok_or(FieldError::NotFound)
    }
}

impl ProcessFactSource for PsutilFactSource {
    fn list_processes(&mut self) -> Result<Vec<u32>, SourceError> {
        let pids = psutil::process::pids()
            .map_err(|err| SourceError::Enumeration(err.to_string()))?;

        let live: HashSet<u32> = pids.iter().copied().collect();
        self.handles.retain(|pid, _| live.contains(pid));

        Ok(pids)
    }

    fn read_facts(&mut self, pid: u32) -> ProcessFacts {
        let process = match self.handle(pid) {
            Ok(process) => process,
            Err(err) => return ProcessFacts::unavailable(pid, err),
        };

        ProcessFacts {
            pid,
            // Processes without a parent (pid 1, kernel threads) report 0 like ps does
            parent_pid: process
                .ppid()
                .map(|ppid| ppid.unwrap_or(0))
                .map_err(FieldError::from),
            name: process.name().map_err(FieldError::from),
            command_line: process
                .cmdline()
                .map(Option::unwrap_or_default)
                .map_err(FieldError::from),
            cpu_percent: process
                .cpu_percent()
                .map(f64::from)
                .map_err(FieldError::from),
            memory_percent: process.memory_percent().map_err(FieldError::from),
            memory_resident_bytes: process
                .memory_info()
                .map(|info| info.rss())
                .map_err(FieldError::from),
            creation_timestamp: Ok(process.create_time().as_millis() as i64),
        }
    }
}
