//! Chisel: recording a session, continuing it, and uploading it.
//!
//! Demonstrates:
//!   1. Recording pointer strokes and tool changes with a Recorder
//!   2. Exporting the session and continuing it in a fresh recorder
//!   3. Uploading the combined container through a file-writing sink
//!   4. Reading the upload back frame by frame
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example record_session

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use chisel::prelude::*;
use chisel_test_utils::MockSession;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ---- Sink: one file per upload -------------------------------------------

struct DirectorySink {
    dir: PathBuf,
}

impl ContainerSink for DirectorySink {
    fn upload(&mut self, name: &str, container: &Container) -> Result<(), SinkError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(name), container.as_bytes())?;
        Ok(())
    }
}

// ---- Session script --------------------------------------------------------

fn stroke(session: &mut MockSession, recorder: &mut Recorder, y: i32) {
    recorder.push_pointer_down(session, 1, 100, y, Modifiers::default());
    session.button = 1;
    for x in (100..400).step_by(4) {
        recorder.push_pointer_move(session, x, y + (x % 7));
    }
    session.button = 0;
    recorder.push_pointer_up(session);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // 1. First sitting: a few brush strokes, then inflate with a larger radius.
    let mut session = MockSession::new();
    let mut recorder = Recorder::new(&session);
    for row in 0..5 {
        stroke(&mut session, &mut recorder, 100 + row * 20);
    }
    session.sculpt.tool = ToolKind::Inflate;
    session.radius = 80.0;
    stroke(&mut session, &mut recorder, 300);
    recorder.push_undo();

    let first = recorder.export();
    info!(entries = recorder.entry_count(), bytes = first.len(), "first sitting");

    // 2. Second sitting continues the first.
    let mut recorder = Recorder::new(&session);
    let header = recorder.import_prefix(first.clone())?;
    info!(version = header.version, "continuing earlier session");
    recorder.push_camera_fov(60.0);
    recorder.push_camera_fov(65.0);
    session.sculpt.tool = ToolKind::Paint;
    session.sculpt.paint.color = [0.2, 0.4, 0.9];
    stroke(&mut session, &mut recorder, 500);

    // 3. Upload once the session is long enough.
    let dir = std::env::temp_dir().join("chisel-replays");
    let config = UploadConfig {
        min_entries: 50,
        check_interval: Duration::from_millis(50),
        ..UploadConfig::default()
    };
    let sink = DirectorySink { dir: dir.clone() };
    let mut scheduler = UploadScheduler::start(config, sink, Instant::now())?;
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        match scheduler.poll(&recorder, Instant::now()) {
            PollOutcome::Uploaded | PollOutcome::Failed => break,
            _ => thread::sleep(Duration::from_millis(5)),
        }
    }
    scheduler.stop();

    // 4. Read the upload back.
    let path = dir.join(format!("{}.rep", recorder.session_id()));
    let bytes = fs::read(&path)?;
    let reader = ContainerReader::open(&bytes)?;
    let embedded = reader.header().embedded_mesh_bytes;
    let mut frames = 0usize;
    let mut moves = 0usize;
    for entry in reader.entries() {
        let entry = entry?;
        frames += 1;
        if entry.opcode() == Opcode::DeviceMove {
            moves += 1;
        }
    }
    info!(
        path = %path.display(),
        frames,
        moves,
        embedded_mesh_bytes = embedded,
        "replay verified"
    );
    assert_eq!(&bytes[12..first.len()], &first[12..]);
    Ok(())
}
