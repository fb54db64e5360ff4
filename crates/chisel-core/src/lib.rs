//! Core types and traits for Chisel session recording.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the opcode catalog shared by the recorder and every replay player,
//! the value types sampled from the live session, and the collaborator
//! traits at the recorder's boundaries.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod container;
pub mod error;
pub mod opcode;
pub mod state;
pub mod traits;

pub use container::Container;
pub use error::{SinkError, UnknownOpcode};
pub use opcode::{Opcode, PayloadShape, MODIFIER_SECONDARY, MODIFIER_TERTIARY};
pub use state::{
    BrushParams, CameraMode, CameraState, CullingParams, PaintParams, ProjectionType,
    SculptState, SignedToolParams, SmoothParams, TabletState, ToolKind, DEFAULT_SCREEN_RADIUS,
};
pub use traits::{ContainerSink, MeshExporter, SessionView};
