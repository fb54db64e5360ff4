//! Error types shared across the Chisel workspace.

use thiserror::Error;

/// A byte that does not name any [`Opcode`](crate::Opcode).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unknown opcode {code}")]
pub struct UnknownOpcode {
    /// The unrecognized wire code.
    pub code: u8,
}

/// Failure reported by a [`ContainerSink`](crate::ContainerSink).
///
/// Sink failures are recoverable: the upload scheduler logs them and
/// re-arms its next check. They never affect the recorded session.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The remote end refused the container.
    #[error("container rejected: {reason}")]
    Rejected {
        /// Human-readable reason given by the transport.
        reason: String,
    },
    /// The transport failed while writing the container.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}
