//! Data types for container headers and decoded sessions.

use crate::log::LogEntry;
use chisel_core::{MODIFIER_SECONDARY, MODIFIER_TERTIARY};

/// The fixed 12-byte header at the start of every container.
///
/// # Examples
///
/// ```
/// use chisel_replay::{ContainerHeader, FORMAT_VERSION, MAGIC};
///
/// let header = ContainerHeader::new(0);
/// assert_eq!(header.magic, MAGIC);
/// assert_eq!(header.version, FORMAT_VERSION);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Magic code, always [`MAGIC`](crate::MAGIC) in a valid container.
    pub magic: u32,
    /// Format version of the first segment.
    pub version: u32,
    /// Total bytes of embedded mesh blobs across every segment.
    pub embedded_mesh_bytes: u32,
}

impl ContainerHeader {
    /// A current-version header with the given embedded byte count.
    pub fn new(embedded_mesh_bytes: u32) -> Self {
        Self {
            magic: crate::MAGIC,
            version: crate::FORMAT_VERSION,
            embedded_mesh_bytes,
        }
    }
}

/// A fully decoded container.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedContainer {
    /// The container header.
    pub header: ContainerHeader,
    /// Every frame, in recording order.
    pub entries: Vec<LogEntry>,
}

/// Keyboard modifiers held during a pointer press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Secondary key (ctrl).
    pub secondary: bool,
    /// Tertiary key (alt).
    pub tertiary: bool,
}

impl Modifiers {
    /// Pack into the pointer-down modifier byte.
    pub fn mask(self) -> u8 {
        let mut mask = 0;
        if self.secondary {
            mask |= MODIFIER_SECONDARY;
        }
        if self.tertiary {
            mask |= MODIFIER_TERTIARY;
        }
        mask
    }

    /// Unpack a modifier byte; unknown bits are ignored.
    pub fn from_mask(mask: u8) -> Self {
        Self {
            secondary: mask & MODIFIER_SECONDARY != 0,
            tertiary: mask & MODIFIER_TERTIARY != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_mask_bits() {
        assert_eq!(Modifiers::default().mask(), 0);
        let ctrl = Modifiers {
            secondary: true,
            tertiary: false,
        };
        assert_eq!(ctrl.mask(), 1);
        let both = Modifiers {
            secondary: true,
            tertiary: true,
        };
        assert_eq!(both.mask(), 3);
        assert!(Modifiers::from_mask(2).tertiary);
        assert_eq!(Modifiers::from_mask(0xFF), both);
    }
}
