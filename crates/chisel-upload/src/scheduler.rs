//! Periodic upload of the recorded session.
//!
//! # Thread model
//!
//! ```text
//!     interaction loop                      "chisel-upload" thread
//!     |                                      |
//!     | poll(recorder, now)                  |
//!     |   due? gate? export()                |
//!     |---[job_tx: bounded(1)]-------------->| sink.upload(name, container)
//!     |                                      |
//!     |<--[report_tx: bounded(1)]------------| Ok / SinkError
//!     |   re-arm at now + interval           |
//! ```
//!
//! The check is a one-shot timer that re-arms itself: after a skipped
//! check, and after an upload finishes (whether or not it succeeded).
//! While an upload is in flight no check runs, so at most one upload is
//! ever outstanding.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use tracing::{debug, info, warn};

use chisel_core::{Container, ContainerSink, SinkError};
use chisel_replay::Recorder;

use crate::config::{ConfigError, UploadConfig};
use crate::gate::UploadGate;

// ── Messages ─────────────────────────────────────────────────────

/// One container to hand to the sink.
#[derive(Clone, Debug)]
pub struct UploadJob {
    /// File name, `<session id>.<extension>`.
    pub name: String,
    /// The exported session.
    pub container: Container,
}

/// The worker's answer to one [`UploadJob`].
#[derive(Debug)]
struct UploadReport {
    name: String,
    result: Result<(), SinkError>,
}

// ── PollOutcome ──────────────────────────────────────────────────

/// What one [`UploadScheduler::poll`] call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// Uploads are switched off.
    Disabled,
    /// Nothing to do yet: the check is not due, or an upload is in flight.
    Waiting,
    /// The check ran and the gate declined; re-armed.
    Skipped,
    /// The session was exported and handed to the worker.
    Dispatched {
        /// Size of the exported container.
        bytes: usize,
    },
    /// The in-flight upload finished; re-armed.
    Uploaded,
    /// The in-flight upload failed, or the worker is gone; re-armed.
    Failed,
}

// ── UploadScheduler ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timer {
    Armed { due: Instant },
    InFlight,
}

/// Owns the upload worker and decides when to feed it.
///
/// # Examples
///
/// ```
/// use std::time::Instant;
/// use chisel_replay::Recorder;
/// use chisel_test_utils::{MemorySink, MockSession};
/// use chisel_upload::{PollOutcome, UploadConfig, UploadScheduler};
///
/// let session = MockSession::new();
/// let recorder = Recorder::new(&session);
/// let now = Instant::now();
/// let mut scheduler =
///     UploadScheduler::start(UploadConfig::default(), MemorySink::new(), now).unwrap();
///
/// // A fresh session is far below the upload threshold.
/// assert_eq!(scheduler.poll(&recorder, now), PollOutcome::Skipped);
/// scheduler.stop();
/// ```
#[derive(Debug)]
pub struct UploadScheduler {
    config: UploadConfig,
    gate: UploadGate,
    timer: Timer,
    job_tx: Option<Sender<UploadJob>>,
    report_rx: Receiver<UploadReport>,
    worker: Option<JoinHandle<()>>,
}

impl UploadScheduler {
    /// Validate `config` and spawn the worker. The first check is due at `now`.
    pub fn start<S: ContainerSink>(
        config: UploadConfig,
        sink: S,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (job_tx, job_rx) = crossbeam_channel::bounded::<UploadJob>(1);
        let (report_tx, report_rx) = crossbeam_channel::bounded(1);

        let worker = thread::Builder::new()
            .name("chisel-upload".into())
            .spawn(move || worker_loop(sink, job_rx, report_tx))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("upload worker: {e}"),
            })?;

        Ok(Self {
            config,
            gate: UploadGate::new(),
            timer: Timer::Armed { due: now },
            job_tx: Some(job_tx),
            report_rx,
            worker: Some(worker),
        })
    }

    /// Advance the scheduler. Call from the interaction loop.
    pub fn poll(&mut self, recorder: &Recorder, now: Instant) -> PollOutcome {
        if !self.config.enabled {
            return PollOutcome::Disabled;
        }
        match self.timer {
            Timer::InFlight => self.collect(now),
            Timer::Armed { due } if now < due => PollOutcome::Waiting,
            Timer::Armed { .. } => self.check(recorder, now),
        }
    }

    /// The session was reset: forget the last uploaded size and restart
    /// the interval. An in-flight upload is left to finish.
    pub fn on_session_reset(&mut self, now: Instant) {
        self.gate.reset();
        if let Timer::Armed { .. } = self.timer {
            self.rearm(now);
        }
    }

    /// Whether an upload is outstanding.
    pub fn in_flight(&self) -> bool {
        self.timer == Timer::InFlight
    }

    /// The active configuration.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Close the job channel and join the worker.
    ///
    /// Blocks until an in-flight upload finishes.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn check(&mut self, recorder: &Recorder, now: Instant) -> PollOutcome {
        let passed = self.gate.evaluate(
            recorder.embedded_mesh_bytes(),
            recorder.entry_count(),
            &self.config,
        );
        if !passed {
            self.rearm(now);
            return PollOutcome::Skipped;
        }

        let container = recorder.export();
        let bytes = container.len();
        let job = UploadJob {
            name: self.config.file_name(recorder.session_id()),
            container,
        };
        let name = job.name.clone();
        let sent = match &self.job_tx {
            Some(tx) => tx.try_send(job),
            None => Err(TrySendError::Disconnected(job)),
        };
        match sent {
            Ok(()) => {
                info!(
                    name = %name,
                    bytes,
                    entries = recorder.entry_count(),
                    "dispatched session upload"
                );
                self.timer = Timer::InFlight;
                PollOutcome::Dispatched { bytes }
            }
            Err(e) => {
                warn!(name = %name, error = %e, "upload worker unavailable");
                self.rearm(now);
                PollOutcome::Failed
            }
        }
    }

    fn collect(&mut self, now: Instant) -> PollOutcome {
        match self.report_rx.try_recv() {
            Ok(UploadReport { name, result }) => {
                self.rearm(now);
                match result {
                    Ok(()) => {
                        info!(name = %name, "session upload finished");
                        PollOutcome::Uploaded
                    }
                    Err(e) => {
                        warn!(name = %name, error = %e, "session upload failed");
                        PollOutcome::Failed
                    }
                }
            }
            Err(TryRecvError::Empty) => PollOutcome::Waiting,
            Err(TryRecvError::Disconnected) => {
                warn!("upload worker exited with an upload in flight");
                self.rearm(now);
                PollOutcome::Failed
            }
        }
    }

    fn rearm(&mut self, now: Instant) {
        let due = now + self.config.check_interval;
        debug!(interval = ?self.config.check_interval, "upload check re-armed");
        self.timer = Timer::Armed { due };
    }

    fn shutdown(&mut self) {
        self.job_tx.take();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("upload worker panicked");
            }
        }
    }
}

impl Drop for UploadScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop<S: ContainerSink>(
    mut sink: S,
    jobs: Receiver<UploadJob>,
    reports: Sender<UploadReport>,
) {
    // Exits when the scheduler drops its sender.
    while let Ok(job) = jobs.recv() {
        let result = sink.upload(&job.name, &job.container);
        let report = UploadReport {
            name: job.name,
            result,
        };
        if reports.send(report).is_err() {
            break;
        }
    }
}
