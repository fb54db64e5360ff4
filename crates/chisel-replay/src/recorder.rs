//! The session recorder: push API, lifecycle, and export.
//!
//! A [`Recorder`] is owned by whatever drives the interaction loop. Calls
//! that need to look at live tool state take a `&dyn SessionView`; the
//! recorder never holds on to it.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use chisel_core::{CameraMode, Container, MeshExporter, Opcode, ProjectionType, SessionView};

use crate::codec::{decode_container, encode_container};
use crate::error::MalformedContainer;
use crate::log::{ActionLog, CoalesceSlot, LogEntry, Payload};
use crate::quantize::wrap_u8;
use crate::snapshot::{SessionSnapshot, SyncedOpcodes};
use crate::types::{ContainerHeader, Modifiers};

/// Records one sculpting session into an [`ActionLog`].
///
/// # Examples
///
/// ```
/// use chisel_replay::{codec::decode_container, Modifiers, Recorder};
/// use chisel_test_utils::MockSession;
///
/// let session = MockSession::new();
/// let mut recorder = Recorder::new(&session);
/// recorder.push_pointer_down(&session, 0, 12, 34, Modifiers::default());
/// recorder.push_pointer_up(&session);
///
/// let container = recorder.export();
/// let decoded = decode_container(&container).unwrap();
/// assert_eq!(decoded.entries, recorder.log().entries());
/// ```
#[derive(Debug)]
pub struct Recorder {
    log: ActionLog,
    snapshot: SessionSnapshot,
    prefix: Option<Container>,
    embedded_mesh_bytes: u64,
    session_id: u64,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

fn flag(on: bool) -> Payload {
    Payload::U8(u8::from(on))
}

impl Recorder {
    /// A recorder seeded from the current camera.
    pub fn new(view: &dyn SessionView) -> Self {
        let mut recorder = Self {
            log: ActionLog::new(),
            snapshot: SessionSnapshot::new(),
            prefix: None,
            embedded_mesh_bytes: 0,
            session_id: 0,
        };
        recorder.reset(view);
        recorder
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Start a new session.
    ///
    /// Drops the log, the prefix, and the embedded byte count, resets the
    /// snapshot to defaults, then records the current camera so a replay
    /// starts from the same view.
    pub fn reset(&mut self, view: &dyn SessionView) {
        self.session_id = now_millis().max(self.session_id + 1);
        self.log.clear();
        self.prefix = None;
        self.embedded_mesh_bytes = 0;
        self.snapshot = SessionSnapshot::new();

        let camera = view.camera();
        self.push_camera_size(camera.width, camera.height);
        self.push_camera_mode(camera.mode);
        self.push_camera_proj_type(camera.projection);
        self.push_camera_fov(camera.fov);
        if camera.use_pivot {
            self.push_camera_toggle_pivot();
        }
        debug!(session_id = self.session_id, "recorder reset");
    }

    /// Continue recording after an earlier container.
    ///
    /// The whole container is decoded first; on error nothing changes. On
    /// success the log is cleared, the snapshot becomes the state a player
    /// reaches at the end of the prefix, and later exports start with
    /// `bytes` verbatim. Calling this again replaces the prefix.
    pub fn import_prefix(
        &mut self,
        bytes: impl Into<Container>,
    ) -> Result<ContainerHeader, MalformedContainer> {
        let bytes = bytes.into();
        let decoded = decode_container(&bytes)?;
        self.log.clear();
        self.embedded_mesh_bytes = 0;
        self.snapshot = SessionSnapshot::replayed(&decoded.entries);
        info!(
            bytes = bytes.len(),
            entries = decoded.entries.len(),
            embedded_mesh_bytes = decoded.header.embedded_mesh_bytes,
            "imported replay prefix"
        );
        self.prefix = Some(bytes);
        Ok(decoded.header)
    }

    /// Forget the prefix; later exports start with a fresh header.
    pub fn clear_prefix(&mut self) {
        self.prefix = None;
    }

    // ── Device input ────────────────────────────────────────────

    /// Pointer moved to (`x`, `y`).
    ///
    /// Hover moves (no button held) coalesce into one entry until anything
    /// else is recorded. Only a move that starts a new entry diffs live state.
    pub fn push_pointer_move(&mut self, view: &dyn SessionView, x: i32, y: i32) {
        let payload = Payload::U16x2(x as u16, y as u16);
        if view.pointer_button() == 0
            && self.log.replace_tail(CoalesceSlot::PointerMove, payload.clone())
        {
            return;
        }
        self.checkpoint(view);
        self.log.push_in_slot(
            CoalesceSlot::PointerMove,
            LogEntry::new(Opcode::DeviceMove, payload),
        );
    }

    /// Pointer button pressed.
    pub fn push_pointer_down(
        &mut self,
        view: &dyn SessionView,
        button: u8,
        x: i32,
        y: i32,
        modifiers: Modifiers,
    ) {
        self.checkpoint(view);
        self.push(
            Opcode::DeviceDown,
            Payload::PointerDown {
                button,
                x: x as u16,
                y: y as u16,
                mask: modifiers.mask(),
            },
        );
    }

    /// Pointer button released.
    pub fn push_pointer_up(&mut self, view: &dyn SessionView) {
        self.checkpoint(view);
        self.marker(Opcode::DeviceUp);
    }

    /// Wheel scrolled by `delta` notches.
    pub fn push_wheel(&mut self, delta: i32) {
        self.push(Opcode::DeviceWheel, Payload::I8(delta as i8));
    }

    /// Undo.
    pub fn push_undo(&mut self) {
        self.marker(Opcode::Undo);
    }

    /// Redo.
    pub fn push_redo(&mut self) {
        self.marker(Opcode::Redo);
    }

    // ── Camera ──────────────────────────────────────────────────

    /// Viewport resized.
    pub fn push_camera_size(&mut self, width: u32, height: u32) {
        self.push(
            Opcode::CameraSize,
            Payload::U16x2(width as u16, height as u16),
        );
    }

    /// First-person movement direction changed; read from the live camera.
    pub fn push_camera_fps(&mut self, view: &dyn SessionView) {
        let camera = view.camera();
        self.push(
            Opcode::CameraFps,
            Payload::I8x2(camera.move_x as i8, camera.move_z as i8),
        );
    }

    /// Navigation mode changed.
    pub fn push_camera_mode(&mut self, mode: CameraMode) {
        self.push(Opcode::CameraMode, Payload::U8(mode.code()));
    }

    /// Projection changed.
    pub fn push_camera_proj_type(&mut self, projection: ProjectionType) {
        self.push(Opcode::CameraProjType, Payload::U8(projection.code()));
    }

    /// Field of view changed. Consecutive changes coalesce.
    pub fn push_camera_fov(&mut self, fov: f32) {
        self.snapshot.set_fov(fov);
        self.log.push_coalesced(
            CoalesceSlot::CameraFov,
            LogEntry::new(Opcode::CameraFov, Payload::U8(wrap_u8(fov))),
        );
    }

    /// Pivot mode toggled.
    pub fn push_camera_toggle_pivot(&mut self) {
        self.marker(Opcode::CameraTogglePivot);
    }

    /// Camera reset to the default view.
    pub fn push_camera_reset(&mut self) {
        self.marker(Opcode::CameraReset);
    }

    /// Camera snapped to the front view.
    pub fn push_camera_reset_front(&mut self) {
        self.marker(Opcode::CameraResetFront);
    }

    /// Camera snapped to the left view.
    pub fn push_camera_reset_left(&mut self) {
        self.marker(Opcode::CameraResetLeft);
    }

    /// Camera snapped to the top view.
    pub fn push_camera_reset_top(&mut self) {
        self.marker(Opcode::CameraResetTop);
    }

    // ── Topology ────────────────────────────────────────────────

    /// Multiresolution subdivide.
    pub fn push_multi_subdivide(&mut self) {
        self.marker(Opcode::MultiSubdivide);
    }

    /// Multiresolution reverse (generate a lower level).
    pub fn push_multi_reverse(&mut self) {
        self.marker(Opcode::MultiReverse);
    }

    /// Active multiresolution level selected.
    pub fn push_multi_resolution(&mut self, level: u32) {
        self.push(Opcode::MultiResolution, Payload::U8(level as u8));
    }

    /// Lower multiresolution levels deleted.
    pub fn push_multi_delete_lower(&mut self) {
        self.marker(Opcode::MultiDelLower);
    }

    /// Higher multiresolution levels deleted.
    pub fn push_multi_delete_higher(&mut self) {
        self.marker(Opcode::MultiDelHigher);
    }

    /// Voxel remesh at `resolution`.
    pub fn push_voxel_remesh(&mut self, resolution: u32) {
        self.push(Opcode::VoxelRemesh, Payload::U16(resolution as u16));
    }

    /// Dynamic topology switched on or off.
    pub fn push_dynamic_toggle_activate(&mut self) {
        self.marker(Opcode::DynamicToggleActivate);
    }

    /// Dynamic topology linear subdivision toggled.
    pub fn push_dynamic_toggle_linear(&mut self) {
        self.marker(Opcode::DynamicToggleLinear);
    }

    /// Dynamic topology subdivision factor changed.
    pub fn push_dynamic_subdivision(&mut self, value: u32) {
        self.push(Opcode::DynamicSubdivision, Payload::U8(value as u8));
    }

    /// Dynamic topology decimation factor changed.
    pub fn push_dynamic_decimation(&mut self, value: u32) {
        self.push(Opcode::DynamicDecimation, Payload::U8(value as u8));
    }

    // ── Meshes ──────────────────────────────────────────────────

    /// Meshes loaded, already serialized to `blob`.
    pub fn push_load_mesh_blob(&mut self, blob: impl Into<Arc<[u8]>>) {
        let blob = blob.into();
        self.embedded_mesh_bytes += blob.len() as u64;
        self.push(Opcode::LoadMeshes, Payload::Blob(blob));
    }

    /// Meshes loaded; serialized through `exporter` and embedded.
    pub fn push_load_meshes<E: MeshExporter>(&mut self, exporter: &E, meshes: &[E::Mesh]) {
        self.push_load_mesh_blob(exporter.export(meshes));
    }

    /// Primitive sphere added.
    pub fn push_add_sphere(&mut self) {
        self.marker(Opcode::AddSphere);
    }

    /// Selected mesh deleted.
    pub fn push_delete_mesh(&mut self) {
        self.marker(Opcode::DeleteCurrentMesh);
    }

    // ── Sculpt and render ───────────────────────────────────────

    /// One continuous-mode tool application.
    pub fn push_update_continuous(&mut self) {
        self.marker(Opcode::SculptUpdateContinuous);
    }

    /// Exposure changed.
    pub fn push_exposure(&mut self, value: f32) {
        self.push(Opcode::ExposureIntensity, Payload::U8(wrap_u8(value)));
    }

    /// Grid shown or hidden.
    pub fn push_show_grid(&mut self, on: bool) {
        self.push(Opcode::ShowGrid, flag(on));
    }

    /// Wireframe shown or hidden.
    pub fn push_show_wireframe(&mut self, on: bool) {
        self.push(Opcode::ShowWireframe, flag(on));
    }

    /// Flat shading switched on or off.
    pub fn push_flat_shading(&mut self, on: bool) {
        self.push(Opcode::FlatShading, flag(on));
    }

    /// Shader selected.
    pub fn push_shader_select(&mut self, id: u32) {
        self.push(Opcode::ShaderSelect, Payload::U8(id as u8));
    }

    /// Matcap selected.
    pub fn push_matcap_select(&mut self, id: u32) {
        self.push(Opcode::MatcapSelect, Payload::U8(id as u8));
    }

    /// Record every tool, tablet, and camera change since the last sync.
    pub fn checkpoint(&mut self, view: &dyn SessionView) -> SyncedOpcodes {
        self.snapshot.sync(view, &mut self.log)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The recorded log since the last reset or prefix import.
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Last recorded tool and camera values.
    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// Entries recorded since the last reset or prefix import.
    pub fn entry_count(&self) -> usize {
        self.log.len()
    }

    /// Bytes of mesh blobs embedded since the last reset or prefix import.
    pub fn embedded_mesh_bytes(&self) -> u64 {
        self.embedded_mesh_bytes
    }

    /// The imported prefix, if any.
    pub fn prefix(&self) -> Option<&Container> {
        self.prefix.as_ref()
    }

    /// Millisecond timestamp identifying the current session.
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Serialize the session. Leaves the recorder unchanged.
    pub fn export(&self) -> Container {
        let bytes = encode_container(
            self.prefix.as_deref(),
            &self.log,
            self.embedded_mesh_bytes,
        );
        debug!(
            entries = self.log.len(),
            bytes = bytes.len(),
            prefixed = self.prefix.is_some(),
            "exported container"
        );
        Container::from(bytes)
    }

    fn push(&mut self, opcode: Opcode, payload: Payload) {
        self.log.push(LogEntry::new(opcode, payload));
    }

    fn marker(&mut self, opcode: Opcode) {
        self.log.push(LogEntry::marker(opcode));
    }
}
