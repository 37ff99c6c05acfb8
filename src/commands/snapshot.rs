//! `pretty-processes snapshot`: capture the process table once and print it.

use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::common::constants::duration::CPU_SAMPLE_WINDOW;
use crate::core::item::ProcessItem;
use crate::core::models::{ProcessRecord, Snapshot};
use crate::core::snapshot::SnapshotBuilder;
use crate::core::source::{ProcessFactSource, SystemFactSource};
use crate::error::{MonitorError, MonitorResult};

use super::table_format::format_process_table;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub json: bool,
    pub filter: Option<String>,
}

#[derive(Serialize)]
struct SnapshotReport<'a> {
    captured_at: DateTime<Utc>,
    dropped: usize,
    processes: Vec<&'a ProcessRecord>,
}

/// Capture with the platform source and print to stdout.
pub fn run(options: &SnapshotOptions) -> MonitorResult<()> {
    let mut builder = SnapshotBuilder::new(SystemFactSource::new());
    let snapshot = capture(&mut builder, CPU_SAMPLE_WINDOW)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_snapshot(&snapshot, options, &mut out)
}

/// Build a snapshot, first priming CPU counters for `warm_up`.
///
/// CPU usage is measured between two reads of the same process, so a single
/// pass would report zero for everything.
pub fn capture<S: ProcessFactSource>(
    builder: &mut SnapshotBuilder<S>,
    warm_up: Duration,
) -> MonitorResult<Snapshot> {
    if !warm_up.is_zero() {
        builder.build_snapshot();
        thread::sleep(warm_up);
    }
    let snapshot = builder.build_snapshot();
    if let Some(reason) = snapshot.enumeration_error() {
        return Err(MonitorError::Enumeration(reason.to_string()));
    }
    info!(
        processes = snapshot.len(),
        dropped = snapshot.dropped(),
        "snapshot captured"
    );
    Ok(snapshot)
}

pub fn write_snapshot<W: Write>(
    snapshot: &Snapshot,
    options: &SnapshotOptions,
    out: &mut W,
) -> MonitorResult<()> {
    let needle = options
        .filter
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    let (processes, items): (Vec<&ProcessRecord>, Vec<ProcessItem>) = snapshot
        .records()
        .iter()
        .map(|record| (record, ProcessItem::from(record)))
        .filter(|(_, item)| item.matches(&needle))
        .unzip();
    debug!(matched = items.len(), filter = %needle, "filtered snapshot");

    if options.json {
        let report = SnapshotReport {
            captured_at: snapshot.captured_at(),
            dropped: snapshot.dropped(),
            processes,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out).map_err(MonitorError::Output)?;
    } else {
        writeln!(out, "{}", format_process_table(&items)).map_err(MonitorError::Output)?;
    }
    out.flush().map_err(MonitorError::Output)
}
