//! The decision whether a session is worth uploading right now.

use crate::config::UploadConfig;

/// Remembers the entry count of the last upload so an unchanged session
/// is not sent twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadGate {
    last_checked: usize,
}

impl UploadGate {
    /// A gate that has never passed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to upload a session with these totals.
    ///
    /// Fails when too many mesh bytes are embedded, when the session is
    /// shorter than `min_entries`, or when nothing was recorded since the
    /// last pass. A pass records `entry_count`.
    pub fn evaluate(
        &mut self,
        embedded_mesh_bytes: u64,
        entry_count: usize,
        config: &UploadConfig,
    ) -> bool {
        if embedded_mesh_bytes > config.max_embedded_mesh_bytes
            || entry_count == self.last_checked
            || entry_count < config.min_entries
        {
            return false;
        }
        self.last_checked = entry_count;
        true
    }

    /// Entry count at the last pass.
    pub fn last_checked(&self) -> usize {
        self.last_checked
    }

    /// Forget the last pass.
    pub fn reset(&mut self) {
        self.last_checked = 0;
    }
}
