//! The immutable serialized session blob.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A serialized replay container.
///
/// Produced by the recorder's export step and never mutated afterwards.
/// Cloning is cheap (reference counted), so the same container can be
/// handed to a background uploader while the session keeps recording.
///
/// # Examples
///
/// ```
/// use chisel_core::Container;
///
/// let c = Container::from(vec![1u8, 2, 3]);
/// let shared = c.clone();
/// assert_eq!(shared.as_bytes(), &[1, 2, 3]);
/// assert_eq!(c.len(), 3);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Container(Arc<[u8]>);

impl Container {
    /// The container bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the container.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the container holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy the bytes out into an owned buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl From<Vec<u8>> for Container {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl From<&[u8]> for Container {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }
}

impl Deref for Container {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Container {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container").field("len", &self.0.len()).finish()
    }
}
