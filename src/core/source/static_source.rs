//! In-memory fact source
//!
//! Replays a scripted sequence of process tables, one per refresh cycle. Used
//! by tests and demos to reproduce per-field failures, processes exiting
//! between listing and reading, and enumeration failures deterministically.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{FieldError, ProcessFactSource, ProcessFacts, SourceError};

/// What the source reports during one cycle.
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    processes: BTreeMap<u32, ProcessFacts>,
    vanished: BTreeSet<u32>,
    enumeration_error: Option<String>,
}

impl FactTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a process and its facts.
    pub fn process(mut self, facts: impl Into<ProcessFacts>) -> Self {
        let facts = facts.into();
        self.vanished.remove(&facts.pid);
        self.processes.insert(facts.pid, facts);
        self
    }

    /// List `pid` but have it gone by the time its fields are read.
    pub fn vanished(mut self, pid: u32) -> Self {
        self.processes.remove(&pid);
        self.vanished.insert(pid);
        self
    }

    /// A cycle in which the process list itself cannot be obtained.
    pub fn enumeration_failure(reason: impl Into<String>) -> Self {
        Self {
            enumeration_error: Some(reason.into()),
            ..Self::default()
        }
    }

    fn pids(&self) -> Vec<u32> {
        self.processes
            .keys()
            .chain(self.vanished.iter())
            .copied()
            .collect()
    }
}

/// Scripted source: each `list_processes` call advances to the next table;
/// the last table repeats forever.
#[derive(Debug, Clone)]
pub struct StaticFactSource {
    tables: VecDeque<FactTable>,
    started: bool,
}

impl StaticFactSource {
    pub fn new(table: FactTable) -> Self {
        Self {
            tables: VecDeque::from([table]),
            started: false,
        }
    }

    /// Queue the table reported by the following cycle.
    pub fn then(mut self, table: FactTable) -> Self {
        self.tables.push_back(table);
        self
    }

    fn current(&self) -> Option<&FactTable> {
        self.tables.front()
    }
}

impl ProcessFactSource for StaticFactSource {
    fn list_processes(&mut self) -> Result<Vec<u32>, SourceError> {
        if self.started && self.tables.len() > 1 {
            self.tables.pop_front();
        }
        self.started = true;

        match self.current() {
            Some(table) => match &table.enumeration_error {
                Some(reason) => Err(SourceError::Enumeration(reason.clone())),
                None => Ok(table.pids()),
            },
            None => Ok(Vec::new()),
        }
    }

    fn read_facts(&mut self, pid: u32) -> ProcessFacts {
        self.current()
            .and_then(|table| table.processes.get(&pid))
            .cloned()
            .unwrap_or_else(|| ProcessFacts::unavailable(pid, FieldError::NotFound))
    }
}
