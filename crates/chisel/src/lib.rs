//! Chisel: action-log recording and binary replay for sculpting sessions.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Chisel sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use chisel::prelude::*;
//! use chisel_test_utils::MockSession;
//!
//! let mut session = MockSession::new();
//! let mut recorder = Recorder::new(&session);
//!
//! // Switch tool, then stroke: the tool change is recorded at pointer-down.
//! session.sculpt.tool = ToolKind::Smooth;
//! recorder.push_pointer_down(&session, 1, 100, 100, Modifiers::default());
//! session.button = 1;
//! recorder.push_pointer_move(&session, 110, 104);
//! session.button = 0;
//! recorder.push_pointer_up(&session);
//!
//! let container = recorder.export();
//! let decoded = chisel::replay::codec::decode_container(&container).unwrap();
//! assert_eq!(decoded.entries[4].opcode(), Opcode::SculptTool);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `chisel-core` | Opcode catalog, live-state types, collaborator traits |
//! | [`replay`] | `chisel-replay` | Recorder, action log, container codec |
//! | [`upload`] | `chisel-upload` | Background upload scheduler |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Opcodes, live-state types, and collaborator traits (`chisel-core`).
///
/// Implement [`types::SessionView`] to let the recorder sample your
/// application, and [`types::ContainerSink`] to receive uploads.
pub use chisel_core as types;

/// Recording and the container format (`chisel-replay`).
///
/// Record with [`replay::Recorder`], read back with
/// [`replay::ContainerReader`] or [`replay::codec::decode_container`].
pub use chisel_replay as replay;

/// Periodic session upload (`chisel-upload`).
pub use chisel_upload as upload;

/// Common imports for typical Chisel usage.
///
/// ```rust
/// use chisel::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use chisel_core::{
        CameraMode, CameraState, Container, ContainerSink, MeshExporter, Opcode, ProjectionType,
        SculptState, SessionView, TabletState, ToolKind,
    };

    // Errors
    pub use chisel_core::SinkError;
    pub use chisel_replay::MalformedContainer;
    pub use chisel_upload::ConfigError;

    // Recording
    pub use chisel_replay::{ContainerReader, LogEntry, Modifiers, Payload, Recorder};

    // Upload
    pub use chisel_upload::{PollOutcome, UploadConfig, UploadScheduler};
}
