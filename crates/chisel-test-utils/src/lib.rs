//! Test utilities and mock collaborators for Chisel development.
//!
//! Provides a mutable [`MockSession`] implementing [`SessionView`], a
//! [`MockMeshExporter`], and in-memory [`ContainerSink`]s for exercising
//! the upload path without a network.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod sinks;

pub use sinks::{FailingSink, MemorySink, Upload};

use chisel_core::{
    CameraState, MeshExporter, SculptState, SessionView, TabletState, DEFAULT_SCREEN_RADIUS,
};

/// Live session stand-in with every observable exposed as a public field.
///
/// Tests mutate the fields between recorder calls to simulate the user
/// tweaking tools, moving the camera, or holding a button.
#[derive(Clone, Debug)]
pub struct MockSession {
    pub tablet: TabletState,
    pub radius: f32,
    pub sculpt: SculptState,
    pub camera: CameraState,
    pub button: u8,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            tablet: TabletState::default(),
            radius: DEFAULT_SCREEN_RADIUS,
            sculpt: SculptState::default(),
            camera: CameraState::default(),
            button: 0,
        }
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionView for MockSession {
    fn tablet(&self) -> TabletState {
        self.tablet
    }

    fn screen_radius(&self) -> f32 {
        self.radius
    }

    fn sculpt(&self) -> &SculptState {
        &self.sculpt
    }

    fn camera(&self) -> CameraState {
        self.camera
    }

    fn pointer_button(&self) -> u8 {
        self.button
    }
}

/// A mesh for [`MockMeshExporter`]: just its serialized bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockMesh(pub Vec<u8>);

/// Exporter that concatenates each mock mesh's bytes behind a `b"MESH"` tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockMeshExporter;

impl MeshExporter for MockMeshExporter {
    type Mesh = MockMesh;

    fn export(&self, meshes: &[MockMesh]) -> Vec<u8> {
        let mut out = b"MESH".to_vec();
        for mesh in meshes {
            out.extend_from_slice(&mesh.0);
        }
        out
    }
}
