//! Upload configuration, validation, and error types.
//!
//! [`UploadConfig`] is the builder-input for
//! [`UploadScheduler::start`](crate::UploadScheduler::start), which calls
//! [`validate()`](UploadConfig::validate) before spawning the worker.

use std::time::Duration;

use thiserror::Error;

// ── UploadConfig ──────────────────────────────────────────────────

/// Configuration for periodic session uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    /// Whether uploads happen at all. Default: true.
    pub enabled: bool,
    /// Time between checks, and between a finished upload and the next
    /// check. Default: 20 s.
    pub check_interval: Duration,
    /// Minimum log entries before a session is worth uploading. Default: 5000.
    pub min_entries: usize,
    /// Sessions embedding more mesh bytes than this are never uploaded.
    /// Default: 10 000 000.
    pub max_embedded_mesh_bytes: u64,
    /// Extension of the uploaded file name, without the dot. Default: `"rep"`.
    pub file_extension: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval: Duration::from_secs(20),
            min_entries: 5000,
            max_embedded_mesh_bytes: 10_000_000,
            file_extension: "rep".to_string(),
        }
    }
}

impl UploadConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.file_extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        Ok(())
    }

    /// Upload file name for a session.
    pub fn file_name(&self, session_id: u64) -> String {
        format!("{session_id}.{}", self.file_extension)
    }
}

// ── ConfigError ───────────────────────────────────────────────────

/// Errors from configuration validation or scheduler startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `check_interval` is zero.
    #[error("check_interval must be non-zero")]
    ZeroInterval,
    /// `file_extension` is empty.
    #[error("file_extension must not be empty")]
    EmptyExtension,
    /// The upload worker thread could not be spawned.
    #[error("failed to spawn upload worker: {reason}")]
    ThreadSpawnFailed {
        /// The OS error.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = UploadConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.min_entries, 5000);
        assert_eq!(cfg.check_interval, Duration::from_secs(20));
    }

    #[test]
    fn zero_interval_fails() {
        let cfg = UploadConfig {
            check_interval: Duration::ZERO,
            ..UploadConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn empty_extension_fails() {
        let cfg = UploadConfig {
            file_extension: String::new(),
            ..UploadConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyExtension)));
    }

    #[test]
    fn file_name_uses_session_id() {
        let cfg = UploadConfig::default();
        assert_eq!(cfg.file_name(1_700_000_000_123), "1700000000123.rep");
    }
}
