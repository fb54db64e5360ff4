//! Background upload of recorded Chisel sessions.
//!
//! [`UploadScheduler`] periodically checks the [`Recorder`] and, once a
//! session is long enough and has grown since the last upload, exports it
//! and hands the container to a [`ContainerSink`] on a worker thread.
//! Sink failures are logged and never touch the recording. A failed
//! upload is not resent as is: the next attempt waits until the session
//! has grown, exactly like after a successful one.
//!
//! [`Recorder`]: chisel_replay::Recorder
//! [`ContainerSink`]: chisel_core::ContainerSink

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod gate;
pub mod scheduler;

pub use config::{ConfigError, UploadConfig};
pub use gate::UploadGate;
pub use scheduler::{PollOutcome, UploadJob, UploadScheduler};
