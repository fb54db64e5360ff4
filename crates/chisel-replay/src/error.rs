//! Error types for container decoding and prefix import.

use chisel_core::Opcode;
use thiserror::Error;

/// A byte buffer that is not a well-formed replay container.
///
/// Decoding is all-or-nothing: when any of these is returned, nothing
/// decoded so far is kept and no recorder state has been touched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedContainer {
    /// Fewer bytes than the fixed 12-byte header.
    #[error("container header truncated: {len} bytes, need 12")]
    TruncatedHeader {
        /// Length of the buffer.
        len: usize,
    },
    /// The first four bytes are not the Chisel magic code.
    #[error("invalid magic code {found:#010x} (expected 0x4348534c)")]
    InvalidMagic {
        /// The magic code found in the buffer.
        found: u32,
    },
    /// The format version is not accepted by this build.
    #[error("unsupported format version {found}")]
    UnsupportedVersion {
        /// The version found in the header.
        found: u32,
    },
    /// A frame starts with a byte that names no opcode.
    #[error("unknown opcode {code} at offset {offset}")]
    UnknownOpcode {
        /// The unrecognized byte.
        code: u8,
        /// Offset of the frame from the start of the container.
        offset: usize,
    },
    /// A frame's declared payload runs past the end of the buffer.
    #[error(
        "truncated {opcode} frame at offset {offset}: \
         need {needed} payload bytes, {available} available"
    )]
    TruncatedFrame {
        /// Opcode of the truncated frame.
        opcode: Opcode,
        /// Offset of the frame from the start of the container.
        offset: usize,
        /// Payload bytes the opcode requires.
        needed: usize,
        /// Bytes actually left after the opcode.
        available: usize,
    },
}
