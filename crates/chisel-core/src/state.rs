//! Value types for the live tool, camera, and tablet state.
//!
//! The recorder never owns the application's tool objects. It samples
//! them through [`SessionView`](crate::SessionView) into these plain
//! values and keeps its own copy of the last recorded values.

/// Screen-space selection radius (pixels) at session start.
pub const DEFAULT_SCREEN_RADIUS: f32 = 50.0;

/// Pen-tablet state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TabletState {
    /// Current pen pressure in `[0, 1]`.
    pub pressure: f32,
    /// Whether pressure modulates the tool radius.
    pub use_on_radius: bool,
    /// Whether pressure modulates the tool intensity.
    pub use_on_intensity: bool,
}

impl Default for TabletState {
    fn default() -> Self {
        Self {
            pressure: 1.0,
            use_on_radius: true,
            use_on_intensity: false,
        }
    }
}

/// Camera navigation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// Orbit around a target point.
    #[default]
    Orbit,
    /// Free spherical rotation.
    Spherical,
    /// Rotation constrained to a plane.
    Plane,
}

impl CameraMode {
    /// Wire code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Orbit => 0,
            Self::Spherical => 1,
            Self::Plane => 2,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Orbit),
            1 => Some(Self::Spherical),
            2 => Some(Self::Plane),
            _ => None,
        }
    }
}

/// Camera projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProjectionType {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Orthographic projection.
    Orthographic,
}

impl ProjectionType {
    /// Wire code.
    pub const fn code(self) -> u8 {
        match self {
            Self::Perspective => 0,
            Self::Orthographic => 1,
        }
    }

    /// Inverse of [`code`](Self::code).
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Perspective),
            1 => Some(Self::Orthographic),
            _ => None,
        }
    }
}

/// Camera state as seen by the recorder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Navigation mode.
    pub mode: CameraMode,
    /// Projection type.
    pub projection: ProjectionType,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Whether rotation pivots around the picked point.
    pub use_pivot: bool,
    /// First-person strafe direction (-1, 0, 1).
    pub move_x: i32,
    /// First-person forward direction (-1, 0, 1).
    pub move_z: i32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            mode: CameraMode::Orbit,
            projection: ProjectionType::Perspective,
            fov: 45.0,
            use_pivot: false,
            move_x: 0,
            move_z: 0,
        }
    }
}

/// The sculpt tool families that carry recordable parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    /// Standard displacement brush.
    #[default]
    Brush,
    /// Sharp crease along the stroke.
    Crease,
    /// Push vertices along their normals.
    Inflate,
    /// Flatten toward the stroke plane.
    Flatten,
    /// Pull vertices toward the stroke center.
    Pinch,
    /// Relax vertex positions.
    Smooth,
    /// Rotate the selection around the view axis.
    Twist,
    /// Scale the selection.
    Scale,
    /// Vertex painting.
    Paint,
}

impl ToolKind {
    /// Every tool kind, in code order.
    pub const ALL: [ToolKind; 9] = [
        Self::Brush,
        Self::Crease,
        Self::Inflate,
        Self::Flatten,
        Self::Pinch,
        Self::Smooth,
        Self::Twist,
        Self::Scale,
        Self::Paint,
    ];

    /// Wire code written after a `SCULPT_TOOL` opcode.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

/// Parameters of the standard brush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushParams {
    /// Strength in `[0, 1]`.
    pub intensity: f32,
    /// Dig instead of raise.
    pub negative: bool,
    /// Clay-style flattened buildup.
    pub clay: bool,
    /// Skip back-facing vertices.
    pub culling: bool,
    /// Accumulate displacement within one stroke.
    pub accumulate: bool,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            negative: false,
            clay: true,
            culling: false,
            accumulate: true,
        }
    }
}

/// Parameters shared by crease, inflate, flatten, and pinch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignedToolParams {
    /// Strength in `[0, 1]`.
    pub intensity: f32,
    /// Invert the tool's direction.
    pub negative: bool,
    /// Skip back-facing vertices.
    pub culling: bool,
}

impl SignedToolParams {
    /// Parameters with the given intensity and every flag off.
    pub const fn with_intensity(intensity: f32) -> Self {
        Self {
            intensity,
            negative: false,
            culling: false,
        }
    }
}

/// Parameters of the smooth tool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothParams {
    /// Strength in `[0, 1]`.
    pub intensity: f32,
    /// Skip back-facing vertices.
    pub culling: bool,
    /// Smooth only in the tangent plane.
    pub tangent: bool,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            intensity: 0.75,
            culling: false,
            tangent: false,
        }
    }
}

/// Parameters of tools whose only recordable state is culling (twist, scale).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CullingParams {
    /// Skip back-facing vertices.
    pub culling: bool,
}

/// Parameters of the paint tool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintParams {
    /// Strength in `[0, 1]`.
    pub intensity: f32,
    /// Skip back-facing vertices.
    pub culling: bool,
    /// The user is sampling a color from the mesh instead of painting.
    pub pick_color: bool,
    /// Linear RGB paint color.
    pub color: [f32; 3],
    /// Material roughness in `[0, 1]`.
    pub roughness: f32,
    /// Material metalness in `[0, 1]`.
    pub metallic: f32,
}

impl Default for PaintParams {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            culling: false,
            pick_color: false,
            color: [1.0, 0.766, 0.336],
            roughness: 0.18,
            metallic: 0.078,
        }
    }
}

/// Complete sculpt-tool state: global flags, the active tool, and the
/// parameters of every tool.
///
/// # Examples
///
/// ```
/// use chisel_core::{SculptState, ToolKind};
///
/// let mut sculpt = SculptState::default();
/// sculpt.tool = ToolKind::Smooth;
/// sculpt.smooth.tangent = true;
/// assert_ne!(sculpt, SculptState::default());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SculptState {
    /// Mirror strokes across the symmetry plane.
    pub symmetry: bool,
    /// Apply the tool continuously while the pointer is held still.
    pub continuous: bool,
    /// The active tool.
    pub tool: ToolKind,
    /// Standard brush parameters.
    pub brush: BrushParams,
    /// Crease parameters.
    pub crease: SignedToolParams,
    /// Inflate parameters.
    pub inflate: SignedToolParams,
    /// Flatten parameters.
    pub flatten: SignedToolParams,
    /// Pinch parameters.
    pub pinch: SignedToolParams,
    /// Smooth parameters.
    pub smooth: SmoothParams,
    /// Twist parameters.
    pub twist: CullingParams,
    /// Scale parameters.
    pub scale: CullingParams,
    /// Paint parameters.
    pub paint: PaintParams,
}

impl Default for SculptState {
    fn default() -> Self {
        Self {
            symmetry: true,
            continuous: false,
            tool: ToolKind::Brush,
            brush: BrushParams::default(),
            crease: SignedToolParams {
                intensity: 0.75,
                negative: true,
                culling: false,
            },
            inflate: SignedToolParams::with_intensity(0.3),
            flatten: SignedToolParams::with_intensity(0.75),
            pinch: SignedToolParams::with_intensity(0.75),
            smooth: SmoothParams::default(),
            twist: CullingParams::default(),
            scale: CullingParams::default(),
            paint: PaintParams::default(),
        }
    }
}
