//! Upload scheduler integration tests against in-memory sinks.

use std::thread;
use std::time::{Duration, Instant};

use chisel_core::{Container, ContainerSink, SinkError};
use chisel_replay::Recorder;
use chisel_test_utils::{FailingSink, MemorySink, MockSession};
use chisel_upload::{PollOutcome, UploadConfig, UploadScheduler};
use crossbeam_channel::{Receiver, Sender};

// ── Helpers ─────────────────────────────────────────────────────

const INTERVAL: Duration = Duration::from_secs(20);

fn recorder_with(entries: usize) -> (MockSession, Recorder) {
    let session = MockSession::new();
    let mut recorder = Recorder::new(&session);
    while recorder.entry_count() < entries {
        recorder.push_undo();
    }
    (session, recorder)
}

/// Poll until the in-flight upload reports back.
fn settle(scheduler: &mut UploadScheduler, recorder: &Recorder, now: Instant) -> PollOutcome {
    for _ in 0..2000 {
        match scheduler.poll(recorder, now) {
            PollOutcome::Waiting => thread::sleep(Duration::from_millis(1)),
            other => return other,
        }
    }
    panic!("upload never completed");
}

/// Sink that blocks each upload until the test releases it.
struct GatedSink {
    release: Receiver<()>,
}

impl ContainerSink for GatedSink {
    fn upload(&mut self, _name: &str, _container: &Container) -> Result<(), SinkError> {
        self.release.recv().map_err(|_| SinkError::Rejected {
            reason: "gate closed".into(),
        })
    }
}

fn gated() -> (GatedSink, Sender<()>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (GatedSink { release: rx }, tx)
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn threshold_example_uploads_exactly_once() {
    let (_, mut recorder) = recorder_with(4999);
    let sink = MemorySink::new();
    let t0 = Instant::now();
    let mut scheduler =
        UploadScheduler::start(UploadConfig::default(), sink.clone(), t0).unwrap();

    assert_eq!(scheduler.poll(&recorder, t0), PollOutcome::Skipped);

    recorder.push_redo();
    assert_eq!(recorder.entry_count(), 5000);
    let t1 = t0 + INTERVAL;
    let expected = recorder.export();
    assert_eq!(
        scheduler.poll(&recorder, t1),
        PollOutcome::Dispatched {
            bytes: expected.len()
        }
    );
    assert_eq!(settle(&mut scheduler, &recorder, t1), PollOutcome::Uploaded);

    // Unchanged session: the next check declines.
    assert_eq!(
        scheduler.poll(&recorder, t1 + INTERVAL),
        PollOutcome::Skipped
    );
    scheduler.stop();

    let uploads = sink.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].name, format!("{}.rep", recorder.session_id()));
    assert_eq!(uploads[0].bytes, expected.to_vec());
}

#[test]
fn completed_upload_rearms_from_completion() {
    let (_, mut recorder) = recorder_with(5000);
    let t0 = Instant::now();
    let mut scheduler =
        UploadScheduler::start(UploadConfig::default(), MemorySink::new(), t0).unwrap();
    assert!(matches!(
        scheduler.poll(&recorder, t0),
        PollOutcome::Dispatched { .. }
    ));
    let done = t0 + Duration::from_secs(3);
    assert_eq!(settle(&mut scheduler, &recorder, done), PollOutcome::Uploaded);

    recorder.push_undo();
    assert_eq!(
        scheduler.poll(&recorder, t0 + INTERVAL),
        PollOutcome::Waiting
    );
    assert!(matches!(
        scheduler.poll(&recorder, done + INTERVAL),
        PollOutcome::Dispatched { .. }
    ));
}

#[test]
fn in_flight_upload_blocks_new_checks() {
    let (_, mut recorder) = recorder_with(5000);
    let (sink, release) = gated();
    let t0 = Instant::now();
    let mut scheduler = UploadScheduler::start(UploadConfig::default(), sink, t0).unwrap();

    assert!(matches!(
        scheduler.poll(&recorder, t0),
        PollOutcome::Dispatched { .. }
    ));
    recorder.push_undo();
    for minutes in 1..5 {
        let later = t0 + Duration::from_secs(60 * minutes);
        assert_eq!(scheduler.poll(&recorder, later), PollOutcome::Waiting);
        assert!(scheduler.in_flight());
    }

    release.send(()).unwrap();
    let t1 = t0 + Duration::from_secs(300);
    assert_eq!(settle(&mut scheduler, &recorder, t1), PollOutcome::Uploaded);
    assert!(!scheduler.in_flight());
}

#[test]
fn failure_is_retried_and_leaves_the_log_alone() {
    let (session, mut recorder) = recorder_with(5000);
    let sink = FailingSink::new();
    let t0 = Instant::now();
    let mut scheduler =
        UploadScheduler::start(UploadConfig::default(), sink.clone(), t0).unwrap();

    assert!(matches!(
        scheduler.poll(&recorder, t0),
        PollOutcome::Dispatched { .. }
    ));
    assert_eq!(settle(&mut scheduler, &recorder, t0), PollOutcome::Failed);
    assert_eq!(recorder.entry_count(), 5000);

    recorder.push_pointer_up(&session);
    let t1 = t0 + INTERVAL;
    assert!(matches!(
        scheduler.poll(&recorder, t1),
        PollOutcome::Dispatched { .. }
    ));
    assert_eq!(settle(&mut scheduler, &recorder, t1), PollOutcome::Failed);
    scheduler.stop();
    assert_eq!(sink.attempts(), 2);
}

#[test]
fn failed_upload_waits_for_the_session_to_grow() {
    let (_, recorder) = recorder_with(5000);
    let sink = FailingSink::new();
    let t0 = Instant::now();
    let mut scheduler =
        UploadScheduler::start(UploadConfig::default(), sink.clone(), t0).unwrap();

    assert!(matches!(
        scheduler.poll(&recorder, t0),
        PollOutcome::Dispatched { .. }
    ));
    assert_eq!(settle(&mut scheduler, &recorder, t0), PollOutcome::Failed);
    for n in 1..4 {
        assert_eq!(
            scheduler.poll(&recorder, t0 + INTERVAL * n),
            PollOutcome::Skipped
        );
    }
    scheduler.stop();
    assert_eq!(sink.attempts(), 1);
}

#[test]
fn heavy_mesh_sessions_are_never_uploaded() {
    let (_, mut recorder) = recorder_with(6000);
    recorder.push_load_mesh_blob(vec![0u8; 10_000_001]);
    let sink = MemorySink::new();
    let t0 = Instant::now();
    let mut scheduler =
        UploadScheduler::start(UploadConfig::default(), sink.clone(), t0).unwrap();
    assert_eq!(scheduler.poll(&recorder, t0), PollOutcome::Skipped);
    assert_eq!(
        scheduler.poll(&recorder, t0 + INTERVAL),
        PollOutcome::Skipped
    );
    scheduler.stop();
    assert_eq!(sink.upload_count(), 0);
}

#[test]
fn session_reset_allows_same_size_again() {
    let (session, mut recorder) = recorder_with(5000);
    let sink = MemorySink::new();
    let t0 = Instant::now();
    let mut scheduler =
        UploadScheduler::start(UploadConfig::default(), sink.clone(), t0).unwrap();
    assert!(matches!(
        scheduler.poll(&recorder, t0),
        PollOutcome::Dispatched { .. }
    ));
    assert_eq!(settle(&mut scheduler, &recorder, t0), PollOutcome::Uploaded);

    recorder.reset(&session);
    while recorder.entry_count() < 5000 {
        recorder.push_undo();
    }
    let t1 = t0 + Duration::from_secs(7);
    scheduler.on_session_reset(t1);
    assert!(matches!(
        scheduler.poll(&recorder, t1 + INTERVAL),
        PollOutcome::Dispatched { .. }
    ));
    assert_eq!(
        settle(&mut scheduler, &recorder, t1 + INTERVAL),
        PollOutcome::Uploaded
    );
    scheduler.stop();

    let uploads = sink.uploads();
    assert_eq!(uploads.len(), 2);
    assert_ne!(uploads[0].name, uploads[1].name);
}
