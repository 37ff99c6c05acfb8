//! Cross-platform fact source backed by sysinfo.
//!
//! sysinfo refreshes the whole table at once and has no per-field errors, so
//! a process is either fully readable or not found.

use sysinfo::{Pid, ProcessesToUpdate, System};

use super::{FieldError, ProcessFactSource, ProcessFacts, SourceError};

pub struct SysinfoFactSource {
    system: System,
}

impl SysinfoFactSource {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::All, true);
        Self { system }
    }
}

impl Default for SysinfoFactSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessFactSource for SysinfoFactSource {
    fn list_processes(&mut self) -> Result<Vec<u32>, SourceError> {
        self.system.refresh_memory();
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        let pids: Vec<u32> = self
            .system
            .processes()
            .keys()
            .map(|pid| pid.as_u32())
            .collect();
        if pids.is_empty() {
            return Err(SourceError::Enumeration(
                "process table is empty".to_string(),
            ));
        }
        Ok(pids)
    }

    fn read_facts(&mut self, pid: u32) -> ProcessFacts {
        let total_memory = self.system.total_memory();
        let Some(process) = self.system.process(Pid::from_u32(pid)) else {
            return ProcessFacts::unavailable(pid, FieldError::NotFound);
        };

        let memory = process.memory();
        let memory_percent = if total_memory == 0 {
            0.0
        } else {
            (memory as f64 / total_memory as f64 * 100.0) as f32
        };
        let command_line = process
            .cmd()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ");

        ProcessFacts {
            pid,
            parent_pid: Ok(process.parent().map(|parent| parent.as_u32()).unwrap_or(0)),
            name: Ok(process.name().to_string_lossy().into_owned()),
            command_line: Ok(command_line),
            cpu_percent: Ok(f64::from(process.cpu_usage())),
            memory_percent: Ok(memory_percent),
            memory_resident_bytes: Ok(memory),
            creation_timestamp: Ok((process.start_time() as i64).saturating_mul(1_000)),
        }
    }
}
