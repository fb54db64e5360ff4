//! In-memory container sinks.

use std::sync::{Arc, Mutex};

use chisel_core::{Container, ContainerSink, SinkError};

/// One container received by a [`MemorySink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Sink that keeps every upload in a shared vector.
///
/// Clone the sink before handing it to the scheduler; the clone shares
/// storage, so the test can inspect uploads afterwards.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    uploads: Arc<Mutex<Vec<Upload>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything uploaded so far.
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

impl ContainerSink for MemorySink {
    fn upload(&mut self, name: &str, container: &Container) -> Result<(), SinkError> {
        self.uploads.lock().unwrap().push(Upload {
            name: name.to_string(),
            bytes: container.to_vec(),
        });
        Ok(())
    }
}

/// Sink that rejects every upload and counts the attempts.
#[derive(Clone, Debug, Default)]
pub struct FailingSink {
    attempts: Arc<Mutex<usize>>,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl ContainerSink for FailingSink {
    fn upload(&mut self, _name: &str, _container: &Container) -> Result<(), SinkError> {
        *self.attempts.lock().unwrap() += 1;
        Err(SinkError::Rejected {
            reason: "mock transport offline".into(),
        })
    }
}
