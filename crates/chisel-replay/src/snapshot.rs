//! Last-recorded tool, tablet, and camera state, and the diff pass that
//! keeps it in step with the live session.
//!
//! [`SessionSnapshot::sync`] compares every tracked observable against the
//! live [`SessionView`] and appends one entry per observable that changed.
//! Comparison is exact, floats included: a value that has not changed
//! bit-for-bit is not recorded, and one that has is recorded even when
//! the difference is below the wire field's precision.

use smallvec::SmallVec;
use tracing::trace;

use chisel_core::{
    BrushParams, CullingParams, Opcode, PaintParams, SculptState, SessionView, SignedToolParams,
    SmoothParams, TabletState, ToolKind, DEFAULT_SCREEN_RADIUS,
};

use crate::log::{ActionLog, CoalesceSlot, LogEntry, Payload};
use crate::quantize::{percent_u8, wrap_u8};

/// Opcodes appended by one diff pass, in append order.
pub type SyncedOpcodes = SmallVec<[Opcode; 8]>;

/// Opcodes for the observables of a signed tool (crease, inflate, flatten, pinch).
#[derive(Clone, Copy)]
struct SignedToolOps {
    intensity: Opcode,
    negative: Opcode,
    culling: Opcode,
}

const CREASE_OPS: SignedToolOps = SignedToolOps {
    intensity: Opcode::CreaseIntensity,
    negative: Opcode::CreaseToggleNegative,
    culling: Opcode::CreaseToggleCulling,
};
const INFLATE_OPS: SignedToolOps = SignedToolOps {
    intensity: Opcode::InflateIntensity,
    negative: Opcode::InflateToggleNegative,
    culling: Opcode::InflateToggleCulling,
};
const FLATTEN_OPS: SignedToolOps = SignedToolOps {
    intensity: Opcode::FlattenIntensity,
    negative: Opcode::FlattenToggleNegative,
    culling: Opcode::FlattenToggleCulling,
};
const PINCH_OPS: SignedToolOps = SignedToolOps {
    intensity: Opcode::PinchIntensity,
    negative: Opcode::PinchToggleNegative,
    culling: Opcode::PinchToggleCulling,
};

/// The last value recorded for every tracked observable.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    tablet: TabletState,
    radius: f32,
    sculpt: SculptState,
    fov: Option<f32>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            tablet: TabletState::default(),
            radius: DEFAULT_SCREEN_RADIUS,
            sculpt: SculptState::default(),
            fov: None,
        }
    }
}

/// Appends to the log and remembers what was appended.
struct Emitter<'a> {
    log: &'a mut ActionLog,
    appended: SyncedOpcodes,
}

impl Emitter<'_> {
    fn marker(&mut self, opcode: Opcode) {
        self.push(LogEntry::marker(opcode));
    }

    fn push(&mut self, entry: LogEntry) {
        self.appended.push(entry.opcode());
        self.log.push(entry);
    }

    fn percent(&mut self, opcode: Opcode, intensity: f32) {
        self.push(LogEntry::new(opcode, Payload::U8(percent_u8(intensity))));
    }

    fn toggle(&mut self, opcode: Opcode, recorded: &mut bool, live: bool) {
        if *recorded != live {
            *recorded = live;
            self.marker(opcode);
        }
    }

    fn intensity(&mut self, opcode: Opcode, recorded: &mut f32, live: f32) {
        if *recorded != live {
            *recorded = live;
            self.percent(opcode, live);
        }
    }
}

impl SessionSnapshot {
    /// Snapshot of the session defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded tablet state.
    pub fn tablet(&self) -> &TabletState {
        &self.tablet
    }

    /// Last recorded screen radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Last recorded sculpt state.
    pub fn sculpt(&self) -> &SculptState {
        &self.sculpt
    }

    /// Last recorded field of view, if one has been recorded.
    pub fn fov(&self) -> Option<f32> {
        self.fov
    }

    /// Record that `fov` was just written to the log.
    pub(crate) fn set_fov(&mut self, fov: f32) {
        self.fov = Some(fov);
    }

    /// The snapshot a player holds after replaying `entries` from the
    /// session defaults.
    ///
    /// Toggles flip the recorded flag; valued entries overwrite it with the
    /// value as stored on the wire. Entries that carry no tracked state are
    /// ignored.
    pub fn replayed<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> Self {
        let mut snapshot = Self::new();
        for entry in entries {
            snapshot.apply(entry);
        }
        snapshot
    }

    fn apply(&mut self, entry: &LogEntry) {
        fn flip(flag: &mut bool) {
            *flag = !*flag;
        }
        fn from_percent(p: u8) -> f32 {
            f32::from(p) / 100.0
        }

        let sculpt = &mut self.sculpt;
        match (entry.opcode(), entry.payload()) {
            (Opcode::TabletToggleRadius, _) => flip(&mut self.tablet.use_on_radius),
            (Opcode::TabletToggleIntensity, _) => flip(&mut self.tablet.use_on_intensity),
            (Opcode::TabletPressure, Payload::F32(v)) => self.tablet.pressure = *v,
            (Opcode::SculptRadius, Payload::U8(v)) => self.radius = f32::from(*v),
            (Opcode::CameraFov, Payload::U8(v)) => self.fov = Some(f32::from(*v)),

            (Opcode::SculptToggleSymmetry, _) => flip(&mut sculpt.symmetry),
            (Opcode::SculptToggleContinuous, _) => flip(&mut sculpt.continuous),
            (Opcode::SculptTool, Payload::U8(code)) => {
                if let Some(tool) = ToolKind::from_code(*code) {
                    sculpt.tool = tool;
                }
            }

            (Opcode::BrushIntensity, Payload::U8(p)) => sculpt.brush.intensity = from_percent(*p),
            (Opcode::BrushToggleNegative, _) => flip(&mut sculpt.brush.negative),
            (Opcode::BrushToggleClay, _) => flip(&mut sculpt.brush.clay),
            (Opcode::BrushToggleCulling, _) => flip(&mut sculpt.brush.culling),
            (Opcode::BrushToggleAccumulate, _) => flip(&mut sculpt.brush.accumulate),

            (Opcode::CreaseIntensity, Payload::U8(p)) => sculpt.crease.intensity = from_percent(*p),
            (Opcode::CreaseToggleNegative, _) => flip(&mut sculpt.crease.negative),
            (Opcode::CreaseToggleCulling, _) => flip(&mut sculpt.crease.culling),
            (Opcode::InflateIntensity, Payload::U8(p)) => {
                sculpt.inflate.intensity = from_percent(*p)
            }
            (Opcode::InflateToggleNegative, _) => flip(&mut sculpt.inflate.negative),
            (Opcode::InflateToggleCulling, _) => flip(&mut sculpt.inflate.culling),
            (Opcode::FlattenIntensity, Payload::U8(p)) => {
                sculpt.flatten.intensity = from_percent(*p)
            }
            (Opcode::FlattenToggleNegative, _) => flip(&mut sculpt.flatten.negative),
            (Opcode::FlattenToggleCulling, _) => flip(&mut sculpt.flatten.culling),
            (Opcode::PinchIntensity, Payload::U8(p)) => sculpt.pinch.intensity = from_percent(*p),
            (Opcode::PinchToggleNegative, _) => flip(&mut sculpt.pinch.negative),
            (Opcode::PinchToggleCulling, _) => flip(&mut sculpt.pinch.culling),

            (Opcode::SmoothIntensity, Payload::U8(p)) => sculpt.smooth.intensity = from_percent(*p),
            (Opcode::SmoothToggleCulling, _) => flip(&mut sculpt.smooth.culling),
            (Opcode::SmoothToggleTangent, _) => flip(&mut sculpt.smooth.tangent),
            (Opcode::TwistToggleCulling, _) => flip(&mut sculpt.twist.culling),
            (Opcode::ScaleToggleCulling, _) => flip(&mut sculpt.scale.culling),

            (Opcode::PaintIntensity, Payload::U8(p)) => sculpt.paint.intensity = from_percent(*p),
            (Opcode::PaintRoughness, Payload::F32(v)) => sculpt.paint.roughness = *v,
            (Opcode::PaintMetallic, Payload::F32(v)) => sculpt.paint.metallic = *v,
            (Opcode::PaintToggleCulling, _) => flip(&mut sculpt.paint.culling),
            (Opcode::PaintColor, Payload::F32x3(rgb)) => sculpt.paint.color = *rgb,
            _ => {}
        }
    }

    /// Bring the snapshot in line with `live`, appending one entry per change.
    ///
    /// Returns the appended opcodes; empty when nothing changed.
    pub fn sync(&mut self, live: &dyn SessionView, log: &mut ActionLog) -> SyncedOpcodes {
        let mut out = Emitter {
            log,
            appended: SmallVec::new(),
        };

        let tablet = live.tablet();
        out.toggle(
            Opcode::TabletToggleRadius,
            &mut self.tablet.use_on_radius,
            tablet.use_on_radius,
        );
        out.toggle(
            Opcode::TabletToggleIntensity,
            &mut self.tablet.use_on_intensity,
            tablet.use_on_intensity,
        );
        if self.tablet.pressure != tablet.pressure {
            self.tablet.pressure = tablet.pressure;
            out.push(LogEntry::new(
                Opcode::TabletPressure,
                Payload::F32(tablet.pressure),
            ));
        }

        let radius = live.screen_radius();
        if self.radius != radius {
            self.radius = radius;
            out.push(LogEntry::new(
                Opcode::SculptRadius,
                Payload::U8(wrap_u8(radius)),
            ));
        }

        let sculpt = live.sculpt();
        let recorded = &mut self.sculpt;
        out.toggle(
            Opcode::SculptToggleSymmetry,
            &mut recorded.symmetry,
            sculpt.symmetry,
        );
        out.toggle(
            Opcode::SculptToggleContinuous,
            &mut recorded.continuous,
            sculpt.continuous,
        );
        if recorded.tool != sculpt.tool {
            recorded.tool = sculpt.tool;
            out.push(LogEntry::new(
                Opcode::SculptTool,
                Payload::U8(sculpt.tool.code()),
            ));
        }

        match sculpt.tool {
            ToolKind::Brush => sync_brush(&mut out, &mut recorded.brush, &sculpt.brush),
            ToolKind::Crease => {
                sync_signed(&mut out, CREASE_OPS, &mut recorded.crease, &sculpt.crease)
            }
            ToolKind::Inflate => {
                sync_signed(&mut out, INFLATE_OPS, &mut recorded.inflate, &sculpt.inflate)
            }
            ToolKind::Flatten => {
                sync_signed(&mut out, FLATTEN_OPS, &mut recorded.flatten, &sculpt.flatten)
            }
            ToolKind::Pinch => sync_signed(&mut out, PINCH_OPS, &mut recorded.pinch, &sculpt.pinch),
            ToolKind::Smooth => sync_smooth(&mut out, &mut recorded.smooth, &sculpt.smooth),
            ToolKind::Twist => sync_culling(
                &mut out,
                Opcode::TwistToggleCulling,
                &mut recorded.twist,
                &sculpt.twist,
            ),
            ToolKind::Scale => sync_culling(
                &mut out,
                Opcode::ScaleToggleCulling,
                &mut recorded.scale,
                &sculpt.scale,
            ),
            ToolKind::Paint => sync_paint(&mut out, &mut recorded.paint, &sculpt.paint),
        }

        let fov = live.camera().fov;
        if self.fov != Some(fov) {
            self.fov = Some(fov);
            let coalesced = out.log.push_coalesced(
                CoalesceSlot::CameraFov,
                LogEntry::new(Opcode::CameraFov, Payload::U8(wrap_u8(fov))),
            );
            if !coalesced {
                out.appended.push(Opcode::CameraFov);
            }
        }

        if !out.appended.is_empty() {
            trace!(appended = out.appended.len(), "synced live state");
        }
        out.appended
    }
}

fn sync_brush(out: &mut Emitter<'_>, recorded: &mut BrushParams, live: &BrushParams) {
    out.intensity(Opcode::BrushIntensity, &mut recorded.intensity, live.intensity);
    out.toggle(Opcode::BrushToggleNegative, &mut recorded.negative, live.negative);
    out.toggle(Opcode::BrushToggleClay, &mut recorded.clay, live.clay);
    out.toggle(Opcode::BrushToggleCulling, &mut recorded.culling, live.culling);
    out.toggle(
        Opcode::BrushToggleAccumulate,
        &mut recorded.accumulate,
        live.accumulate,
    );
}

fn sync_signed(
    out: &mut Emitter<'_>,
    ops: SignedToolOps,
    recorded: &mut SignedToolParams,
    live: &SignedToolParams,
) {
    out.intensity(ops.intensity, &mut recorded.intensity, live.intensity);
    out.toggle(ops.negative, &mut recorded.negative, live.negative);
    out.toggle(ops.culling, &mut recorded.culling, live.culling);
}

fn sync_smooth(out: &mut Emitter<'_>, recorded: &mut SmoothParams, live: &SmoothParams) {
    out.intensity(Opcode::SmoothIntensity, &mut recorded.intensity, live.intensity);
    out.toggle(Opcode::SmoothToggleCulling, &mut recorded.culling, live.culling);
    out.toggle(Opcode::SmoothToggleTangent, &mut recorded.tangent, live.tangent);
}

fn sync_culling(
    out: &mut Emitter<'_>,
    opcode: Opcode,
    recorded: &mut CullingParams,
    live: &CullingParams,
) {
    out.toggle(opcode, &mut recorded.culling, live.culling);
}

fn sync_paint(out: &mut Emitter<'_>, recorded: &mut PaintParams, live: &PaintParams) {
    // Sampling a color mutates the live color every frame.
    if live.pick_color {
        return;
    }
    out.intensity(Opcode::PaintIntensity, &mut recorded.intensity, live.intensity);
    if recorded.roughness != live.roughness {
        recorded.roughness = live.roughness;
        out.push(LogEntry::new(
            Opcode::PaintRoughness,
            Payload::F32(live.roughness),
        ));
    }
    if recorded.metallic != live.metallic {
        recorded.metallic = live.metallic;
        out.push(LogEntry::new(
            Opcode::PaintMetallic,
            Payload::F32(live.metallic),
        ));
    }
    out.toggle(Opcode::PaintToggleCulling, &mut recorded.culling, live.culling);
    if squared_distance(recorded.color, live.color) != 0.0 {
        recorded.color = live.color;
        out.push(LogEntry::new(Opcode::PaintColor, Payload::F32x3(live.color)));
    }
}

fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chisel_test_utils::MockSession;

    fn synced(session: &MockSession) -> (SessionSnapshot, ActionLog) {
        let mut snap = SessionSnapshot::new();
        let mut log = ActionLog::new();
        snap.sync(session, &mut log);
        (snap, log)
    }

    #[test]
    fn defaults_only_record_the_camera_fov() {
        let session = MockSession::new();
        let mut snap = SessionSnapshot::new();
        let mut log = ActionLog::new();
        let ops = snap.sync(&session, &mut log);
        assert_eq!(ops.as_slice(), &[Opcode::CameraFov]);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn unchanged_state_appends_nothing() {
        let session = MockSession::new();
        let (mut snap, mut log) = synced(&session);
        let before = log.len();
        assert!(snap.sync(&session, &mut log).is_empty());
        assert_eq!(log.len(), before);
    }

    #[test]
    fn tablet_and_radius_changes_are_recorded_in_order() {
        let mut session = MockSession::new();
        let (mut snap, mut log) = synced(&session);
        session.tablet.use_on_radius = false;
        session.tablet.pressure = 0.4;
        session.radius = 72.6;
        let ops = snap.sync(&session, &mut log);
        assert_eq!(
            ops.as_slice(),
            &[
                Opcode::TabletToggleRadius,
                Opcode::TabletPressure,
                Opcode::SculptRadius
            ]
        );
        let tail = &log.entries()[log.len() - 2..];
        assert_eq!(tail[0].payload(), &Payload::F32(0.4));
        assert_eq!(tail[1].payload(), &Payload::U8(72));
        assert_eq!(snap.radius(), 72.6);
    }

    #[test]
    fn intensity_is_recorded_as_percentage() {
        let mut session = MockSession::new();
        let (mut snap, mut log) = synced(&session);
        session.sculpt.brush.intensity = 0.8;
        snap.sync(&session, &mut log);
        let last = log.last().unwrap();
        assert_eq!(last.opcode(), Opcode::BrushIntensity);
        assert_eq!(last.payload(), &Payload::U8(80));
    }

    #[test]
    fn only_the_active_tool_is_diffed() {
        let mut session = MockSession::new();
        let (mut snap, mut log) = synced(&session);
        session.sculpt.smooth.tangent = true;
        assert!(snap.sync(&session, &mut log).is_empty());

        session.sculpt.tool = ToolKind::Smooth;
        let ops = snap.sync(&session, &mut log);
        assert_eq!(
            ops.as_slice(),
            &[Opcode::SculptTool, Opcode::SmoothToggleTangent]
        );
        assert_eq!(snap.sculpt().tool, ToolKind::Smooth);
    }

    #[test]
    fn signed_tools_use_their_own_opcodes() {
        let cases = [
            (ToolKind::Crease, Opcode::CreaseToggleCulling),
            (ToolKind::Inflate, Opcode::InflateToggleCulling),
            (ToolKind::Flatten, Opcode::FlattenToggleCulling),
            (ToolKind::Pinch, Opcode::PinchToggleCulling),
        ];
        for (tool, expected) in cases {
            let mut session = MockSession::new();
            session.sculpt.tool = tool;
            let (mut snap, mut log) = synced(&session);
            match tool {
                ToolKind::Crease => session.sculpt.crease.culling = true,
                ToolKind::Inflate => session.sculpt.inflate.culling = true,
                ToolKind::Flatten => session.sculpt.flatten.culling = true,
                _ => session.sculpt.pinch.culling = true,
            }
            let ops = snap.sync(&session, &mut log);
            assert_eq!(ops.as_slice(), &[expected], "{tool:?}");
        }
    }

    #[test]
    fn twist_and_scale_track_culling_only() {
        let mut session = MockSession::new();
        session.sculpt.tool = ToolKind::Twist;
        let (mut snap, mut log) = synced(&session);
        session.sculpt.twist.culling = true;
        session.sculpt.brush.negative = true;
        let ops = snap.sync(&session, &mut log);
        assert_eq!(ops.as_slice(), &[Opcode::TwistToggleCulling]);
    }

    #[test]
    fn paint_color_and_material() {
        let mut session = MockSession::new();
        session.sculpt.tool = ToolKind::Paint;
        let (mut snap, mut log) = synced(&session);
        session.sculpt.paint.color = [0.5, 0.25, 0.125];
        session.sculpt.paint.roughness = 0.9;
        let ops = snap.sync(&session, &mut log);
        assert_eq!(
            ops.as_slice(),
            &[Opcode::PaintRoughness, Opcode::PaintColor]
        );
        assert_eq!(
            log.last().unwrap().payload(),
            &Payload::F32x3([0.5, 0.25, 0.125])
        );
    }

    #[test]
    fn pick_color_mode_suspends_paint_diffing() {
        let mut session = MockSession::new();
        session.sculpt.tool = ToolKind::Paint;
        let (mut snap, mut log) = synced(&session);
        session.sculpt.paint.pick_color = true;
        session.sculpt.paint.color = [0.0, 0.0, 0.0];
        session.sculpt.paint.intensity = 0.1;
        assert!(snap.sync(&session, &mut log).is_empty());

        session.sculpt.paint.pick_color = false;
        let ops = snap.sync(&session, &mut log);
        assert_eq!(
            ops.as_slice(),
            &[Opcode::PaintIntensity, Opcode::PaintColor]
        );
    }

    #[test]
    fn tiny_float_change_is_still_recorded() {
        let mut session = MockSession::new();
        let (mut snap, mut log) = synced(&session);
        session.tablet.pressure = 1.0 - f32::EPSILON;
        let ops = snap.sync(&session, &mut log);
        assert_eq!(ops.as_slice(), &[Opcode::TabletPressure]);
    }

    #[test]
    fn fov_changes_coalesce_in_the_log() {
        let mut session = MockSession::new();
        let (mut snap, mut log) = synced(&session);
        for fov in [50.0, 55.0, 60.0] {
            session.camera.fov = fov;
            snap.sync(&session, &mut log);
        }
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].payload(), &Payload::U8(60));
        assert_eq!(snap.fov(), Some(60.0));
    }

    #[test]
    fn replayed_flips_toggles_and_sets_values() {
        let mut log = ActionLog::new();
        for entry in [
            LogEntry::marker(Opcode::SculptToggleSymmetry),
            LogEntry::marker(Opcode::BrushToggleClay),
            LogEntry::marker(Opcode::BrushToggleClay),
            LogEntry::marker(Opcode::TabletToggleIntensity),
            LogEntry::new(Opcode::SculptTool, Payload::U8(ToolKind::Paint.code())),
            LogEntry::new(Opcode::SculptRadius, Payload::U8(72)),
            LogEntry::new(Opcode::PaintIntensity, Payload::U8(25)),
            LogEntry::new(Opcode::PaintColor, Payload::F32x3([0.5, 0.25, 0.125])),
            LogEntry::new(Opcode::CameraFov, Payload::U8(60)),
            LogEntry::marker(Opcode::Undo),
        ] {
            log.push(entry);
        }

        let snap = SessionSnapshot::replayed(log.iter());
        let defaults = SculptState::default();
        assert_eq!(snap.sculpt().symmetry, !defaults.symmetry);
        assert_eq!(snap.sculpt().brush.clay, defaults.brush.clay);
        assert_eq!(
            snap.tablet().use_on_intensity,
            !TabletState::default().use_on_intensity
        );
        assert_eq!(snap.sculpt().tool, ToolKind::Paint);
        assert_eq!(snap.radius(), 72.0);
        assert_eq!(snap.sculpt().paint.intensity, 0.25);
        assert_eq!(snap.sculpt().paint.color, [0.5, 0.25, 0.125]);
        assert_eq!(snap.fov(), Some(60.0));
    }

    #[test]
    fn replaying_a_synced_log_agrees_on_every_toggle() {
        let mut session = MockSession::new();
        session.sculpt.tool = ToolKind::Smooth;
        session.sculpt.symmetry = false;
        session.sculpt.smooth.tangent = true;
        session.tablet.use_on_radius = false;
        let (snap, log) = synced(&session);

        let replayed = SessionSnapshot::replayed(log.iter());
        assert_eq!(replayed.sculpt(), snap.sculpt());
        assert_eq!(replayed.tablet(), snap.tablet());
        assert_eq!(replayed.fov(), snap.fov());
    }

    #[test]
    fn coalesced_fov_is_not_reported_as_appended() {
        let mut session = MockSession::new();
        let (mut snap, mut log) = synced(&session);
        session.camera.fov = 70.0;
        let before = log.len();
        let ops = snap.sync(&session, &mut log);
        assert!(ops.is_empty());
        assert_eq!(log.len(), before);
        assert_eq!(log.last().unwrap().payload(), &Payload::U8(70));

        log.push(LogEntry::marker(Opcode::Undo));
        session.camera.fov = 80.0;
        let ops = snap.sync(&session, &mut log);
        assert_eq!(ops.as_slice(), &[Opcode::CameraFov]);
        assert_eq!(log.len(), before + 2);
    }
}
