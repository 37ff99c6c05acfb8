//! Snapshot construction
//!
//! Runs one pass over a [`ProcessFactSource`] and applies the partial-failure
//! policy: a process with any unreadable field is dropped from that snapshot,
//! the rest of the batch is unaffected.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use crate::core::models::Snapshot;
use crate::core::source::{FieldError, ProcessFactSource};

pub struct SnapshotBuilder<S> {
    source: S,
    enumeration_failing: bool,
}

impl<S: ProcessFactSource> SnapshotBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            enumeration_failing: false,
        }
    }

    /// Capture the process table once.
    ///
    /// Never fails: when the process list cannot be obtained the returned
    /// snapshot is flagged with the enumeration error and carries no records.
    pub fn build_snapshot(&mut self) -> Snapshot {
        let started = Instant::now();

        let pids = match self.source.list_processes() {
            Ok(pids) => {
                if self.enumeration_failing {
                    info!("process enumeration recovered");
                    self.enumeration_failing = false;
                }
                pids
            }
            Err(err) => {
                // Reported once per failure streak; retried on the next tick
                if self.enumeration_failing {
                    debug!(error = %err, "process enumeration still failing");
                } else {
                    warn!(error = %err, "process enumeration failed, keeping previous snapshot");
                    self.enumeration_failing = true;
                }
                return Snapshot::enumeration_failed(err.to_string());
            }
        };

        let mut records = Vec::with_capacity(pids.len());
        let mut dropped = 0usize;

        for pid in pids {
            match self.source.read_facts(pid).into_record() {
                Ok(record) => records.push(record),
                Err(failure) => {
                    dropped += 1;
                    if failure.error == FieldError::NotFound {
                        trace!(pid, "process exited during collection");
                    } else {
                        debug!(
                            pid,
                            field = %failure.field,
                            error = %failure.error,
                            "dropping process from snapshot"
                        );
                    }
                }
            }
        }

        let snapshot = Snapshot::captured(Utc::now(), records, dropped);
        debug!(
            processes = snapshot.len(),
            dropped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "snapshot built"
        );
        snapshot
    }

    /// Whether the last enumeration attempt failed.
    pub fn is_enumeration_failing(&self) -> bool {
        self.enumeration_failing
    }
}
