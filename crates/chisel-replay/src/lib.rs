//! Session recording and binary replay containers for Chisel.
//!
//! Records every user action of a sculpting session into an append-only
//! log and serializes it to a compact container that a player can
//! re-execute to reproduce the session.
//!
//! # Architecture
//!
//! - [`Recorder`] owns the [`ActionLog`] and exposes one push per action
//! - [`SessionSnapshot`] diffs live tool and camera state into the log
//!   at checkpoints instead of on every slider tick
//! - [`codec`] encodes and decodes containers in one pass;
//!   [`ContainerReader`] reads them frame by frame
//! - A container can continue an earlier one (the prefix), so long
//!   sessions accumulate across reloads
//!
//! # Format
//!
//! ```text
//! [MAGIC "CHSL" u32] [VERSION u32] [embedded mesh bytes u32]
//! [opcode u8] [payload] [opcode u8] [payload] ...
//! ```
//!
//! Integers are big-endian. Payload layout is a pure function of the
//! opcode; see [`chisel_core::Opcode`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod log;
pub mod quantize;
pub mod reader;
pub mod recorder;
pub mod snapshot;
pub mod types;

pub use error::MalformedContainer;
pub use log::{ActionLog, CoalesceSlot, LogEntry, Payload};
pub use reader::{ContainerReader, EntryIter};
pub use recorder::Recorder;
pub use snapshot::{SessionSnapshot, SyncedOpcodes};
pub use types::{ContainerHeader, DecodedContainer, Modifiers};

/// Magic code at the start of every container (`"CHSL"`).
pub const MAGIC: u32 = 0x4348_534C;

/// Format version written by this build.
///
/// History:
/// - v1: initial format
pub const FORMAT_VERSION: u32 = 1;

/// Format versions this build can decode and continue.
pub const ACCEPTED_VERSIONS: &[u32] = &[FORMAT_VERSION];

/// Length of the container header in bytes.
pub const HEADER_LEN: usize = 12;

/// Offset of the embedded mesh byte count within the header.
pub const EMBEDDED_BYTES_OFFSET: usize = 8;
