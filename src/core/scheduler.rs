use std::{
    io,
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, trace};

use crate::core::models::Snapshot;
use crate::core::snapshot::SnapshotBuilder;
use crate::core::source::ProcessFactSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedulerState {
    Idle = 0,
    Collecting = 1,
}

impl SchedulerState {
    fn from_u8(value: u8) -> Self {
        if value == SchedulerState::Collecting as u8 {
            SchedulerState::Collecting
        } else {
            SchedulerState::Idle
        }
    }
}

enum Control {
    /// The previous snapshot was merged; the next cycle may start
    Arm,
}

/// Background worker that rebuilds the process snapshot once per interval.
///
/// The first cycle starts immediately. After each delivery the worker waits
/// for [`RefreshScheduler::schedule_next`] and for the next start deadline
/// (`cycle_start + interval`), so at most one collection is ever in flight and
/// a slow collection pushes the following one back instead of overlapping it.
pub struct RefreshScheduler {
    control: Option<Sender<Control>>,
    shutdown: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
}

impl RefreshScheduler {
    /// Start the worker thread. `deliver` receives each snapshot on the
    /// worker thread; returning `false` stops the worker.
    pub fn spawn<S, F>(
        builder: SnapshotBuilder<S>,
        interval: Duration,
        deliver: F,
    ) -> io::Result<Self>
    where
        S: ProcessFactSource + 'static,
        F: FnMut(Snapshot) -> bool + Send + 'static,
    {
        let (control_tx, control_rx) = channel::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let state = Arc::new(AtomicU8::new(SchedulerState::Idle as u8));

        let worker = Worker {
            builder,
            interval,
            deliver,
            control: control_rx,
            shutdown: shutdown.clone(),
            state: state.clone(),
        };
        thread::Builder::new()
            .name("refresh-scheduler".into())
            .spawn(move || worker.run())?;

        debug!(interval_ms = interval.as_millis() as u64, "refresh scheduler started");
        Ok(Self {
            control: Some(control_tx),
            shutdown,
            state,
        })
    }

    /// Allow the next cycle once its start deadline passes.
    pub fn schedule_next(&self) {
        if let Some(control) = &self.control {
            if control.send(Control::Arm).is_err() {
                debug!("refresh worker already stopped");
            }
        }
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Signal the worker and detach from it. Never waits for an in-flight
    /// collection; its result is discarded.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if self.control.take().is_some() {
            debug!("refresh scheduler shut down");
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker<S, F> {
    builder: SnapshotBuilder<S>,
    interval: Duration,
    deliver: F,
    control: Receiver<Control>,
    shutdown: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
}

impl<S, F> Worker<S, F>
where
    S: ProcessFactSource,
    F: FnMut(Snapshot) -> bool,
{
    fn run(mut self) {
        let mut next_start = Instant::now();

        loop {
            if !self.wait_until(next_start) || self.is_shutting_down() {
                break;
            }

            let cycle_start = Instant::now();
            self.set_state(SchedulerState::Collecting);
            let snapshot = self.builder.build_snapshot();
            self.set_state(SchedulerState::Idle);

            if self.is_shutting_down() {
                trace!("discarding snapshot collected during shutdown");
                break;
            }
            // Stale arms must not release the cycle after this delivery
            while self.control.try_recv().is_ok() {}
            if !(self.deliver)(snapshot) {
                debug!("snapshot receiver gone");
                break;
            }

            next_start = cycle_start + self.interval;
            if self.control.recv().is_err() {
                break;
            }
        }

        trace!("refresh worker exiting");
    }

    /// Block until `deadline`. Returns `false` when the scheduler handle is gone.
    fn wait_until(&self, deadline: Instant) -> bool {
        loop {
            match self.control.recv_deadline(deadline) {
                // Surplus arm; the cycle is already allowed
                Ok(Control::Arm) => continue,
                Err(RecvTimeoutError::Timeout) => return true,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    fn set_state(&self, state: SchedulerState) {
        self.state.store(state as u8, Ordering::Release);
    }
}
