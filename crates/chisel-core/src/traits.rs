//! Collaborator traits at the recorder's boundaries.

use crate::container::Container;
use crate::error::SinkError;
use crate::state::{CameraState, SculptState, TabletState};

/// Read-only view of the live application state.
///
/// The recorder samples this at checkpoints (pointer down/up, hover
/// moves that start a new entry, explicit checkpoints) and at reset.
/// Implementations must be cheap: they are called on the input path.
pub trait SessionView {
    /// Current pen-tablet state.
    fn tablet(&self) -> TabletState;

    /// Current screen-space selection radius in pixels.
    fn screen_radius(&self) -> f32;

    /// Current sculpt-tool state.
    fn sculpt(&self) -> &SculptState;

    /// Current camera state.
    fn camera(&self) -> CameraState;

    /// Pointer button currently held, `0` when none.
    fn pointer_button(&self) -> u8;
}

/// Encodes in-memory meshes into a self-contained mesh file.
///
/// The recorder embeds the returned bytes verbatim in a `LOAD_MESHES`
/// frame and never inspects them.
pub trait MeshExporter {
    /// The application's mesh type.
    type Mesh;

    /// Serialize `meshes` into one blob.
    fn export(&self, meshes: &[Self::Mesh]) -> Vec<u8>;
}

/// Destination for exported containers (file save, network upload).
///
/// Called from the upload worker thread, hence `Send`.
pub trait ContainerSink: Send + 'static {
    /// Persist or transmit `container` under `name`.
    fn upload(&mut self, name: &str, container: &Container) -> Result<(), SinkError>;
}
