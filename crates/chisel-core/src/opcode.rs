//! The opcode catalog: stable numeric codes and their payload shapes.
//!
//! Every recorded event is tagged with an [`Opcode`]. The numbering is a
//! wire contract shared with every replay player, so codes are never
//! reused or renumbered; new opcodes are only ever appended.
//!
//! The payload layout of a frame is a pure function of its opcode
//! ([`Opcode::shape`]). Neither the encoder nor the decoder ever looks at
//! run-time content to decide how many bytes follow an opcode.

use std::fmt;

use crate::error::UnknownOpcode;

/// Modifier-mask bit for the secondary key (ctrl) in a pointer-down frame.
pub const MODIFIER_SECONDARY: u8 = 1;
/// Modifier-mask bit for the tertiary key (alt) in a pointer-down frame.
pub const MODIFIER_TERTIARY: u8 = 2;

/// Wire layout class of an opcode's payload.
///
/// All multi-byte fields are big-endian.
///
/// # Examples
///
/// ```
/// use chisel_core::{Opcode, PayloadShape};
///
/// assert_eq!(Opcode::DeviceDown.shape(), PayloadShape::PointerDown);
/// assert_eq!(PayloadShape::PointerDown.fixed_len(), Some(6));
/// assert_eq!(PayloadShape::Blob.fixed_len(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadShape {
    /// No payload; the opcode byte alone is the event.
    Marker,
    /// One unsigned byte.
    U8,
    /// One signed byte.
    I8,
    /// Two signed bytes.
    I8x2,
    /// One unsigned 16-bit integer.
    U16,
    /// Two unsigned 16-bit integers.
    U16x2,
    /// Button byte, two unsigned 16-bit coordinates, modifier-mask byte.
    PointerDown,
    /// One IEEE-754 single.
    F32,
    /// Three IEEE-754 singles (an RGB color).
    F32x3,
    /// A `u32` byte length followed by that many raw bytes.
    Blob,
}

impl PayloadShape {
    /// Payload size in bytes, or `None` for the length-prefixed [`Blob`](Self::Blob).
    pub const fn fixed_len(self) -> Option<usize> {
        match self {
            Self::Marker => Some(0),
            Self::U8 | Self::I8 => Some(1),
            Self::I8x2 | Self::U16 => Some(2),
            Self::U16x2 | Self::F32 => Some(4),
            Self::PointerDown => Some(6),
            Self::F32x3 => Some(12),
            Self::Blob => None,
        }
    }
}

macro_rules! opcodes {
    ($( $(#[$doc:meta])* $variant:ident = $code:literal => $name:literal, $shape:ident; )*) => {
        /// A recorded event kind.
        ///
        /// See the module docs for the stability guarantees of the numbering.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                #[doc = concat!("Wire name `", $name, "`.")]
                $variant = $code,
            )*
        }

        impl Opcode {
            /// Every opcode, in code order.
            pub const ALL: &'static [Opcode] = &[ $( Opcode::$variant, )* ];

            /// Look up an opcode by its wire code.
            pub const fn from_code(code: u8) -> Result<Self, UnknownOpcode> {
                match code {
                    $( $code => Ok(Opcode::$variant), )*
                    _ => Err(UnknownOpcode { code }),
                }
            }

            /// Symbolic name as used by replay players and log output.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Opcode::$variant => $name, )*
                }
            }

            /// Payload layout that follows this opcode on the wire.
            pub const fn shape(self) -> PayloadShape {
                match self {
                    $( Opcode::$variant => PayloadShape::$shape, )*
                }
            }
        }
    };
}

opcodes! {
    /// Pointer hover or drag position.
    DeviceMove = 0 => "DEVICE_MOVE", U16x2;
    /// Pointer press: button, position, modifier mask.
    DeviceDown = 1 => "DEVICE_DOWN", PointerDown;
    /// Pointer release.
    DeviceUp = 2 => "DEVICE_UP", Marker;
    /// Wheel delta.
    DeviceWheel = 3 => "DEVICE_WHEEL", I8;
    /// Undo the last mesh edit.
    Undo = 4 => "UNDO", Marker;
    /// Redo the last undone mesh edit.
    Redo = 5 => "REDO", Marker;
    /// Viewport size in pixels.
    CameraSize = 6 => "CAMERA_SIZE", U16x2;
    /// First-person camera movement deltas (x, z).
    CameraFps = 7 => "CAMERA_FPS", I8x2;
    /// Camera navigation mode.
    CameraMode = 8 => "CAMERA_MODE", U8;
    /// Camera projection type.
    CameraProjType = 9 => "CAMERA_PROJ_TYPE", U8;
    /// Camera field of view in whole degrees.
    CameraFov = 10 => "CAMERA_FOV", U8;
    CameraTogglePivot = 11 => "CAMERA_TOGGLE_PIVOT", Marker;
    CameraReset = 12 => "CAMERA_RESET", Marker;
    CameraResetFront = 13 => "CAMERA_RESET_FRONT", Marker;
    CameraResetLeft = 14 => "CAMERA_RESET_LEFT", Marker;
    CameraResetTop = 15 => "CAMERA_RESET_TOP", Marker;
    MultiSubdivide = 16 => "MULTI_SUBDIVIDE", Marker;
    MultiReverse = 17 => "MULTI_REVERSE", Marker;
    /// Selected multiresolution level.
    MultiResolution = 18 => "MULTI_RESOLUTION", U8;
    MultiDelLower = 19 => "MULTI_DEL_LOWER", Marker;
    MultiDelHigher = 20 => "MULTI_DEL_HIGHER", Marker;
    /// Voxel remesh at the given grid resolution.
    VoxelRemesh = 21 => "VOXEL_REMESH", U16;
    DynamicToggleActivate = 22 => "DYNAMIC_TOGGLE_ACTIVATE", Marker;
    DynamicToggleLinear = 23 => "DYNAMIC_TOGGLE_LINEAR", Marker;
    DynamicSubdivision = 24 => "DYNAMIC_SUBDIVISION", U8;
    DynamicDecimation = 25 => "DYNAMIC_DECIMATION", U8;
    /// Length-prefixed, pre-encoded mesh file.
    LoadMeshes = 26 => "LOAD_MESHES", Blob;
    AddSphere = 27 => "ADD_SPHERE", Marker;
    DeleteCurrentMesh = 28 => "DELETE_CURRENT_MESH", Marker;
    /// Active sculpt tool (see `ToolKind::code`).
    SculptTool = 29 => "SCULPT_TOOL", U8;
    /// Screen-space tool radius in pixels.
    SculptRadius = 30 => "SCULPT_RADIUS", U8;
    SculptToggleSymmetry = 31 => "SCULPT_TOGGLE_SYMMETRY", Marker;
    SculptToggleContinuous = 32 => "SCULPT_TOGGLE_CONTINUOUS", Marker;
    SculptUpdateContinuous = 33 => "SCULPT_UPDATE_CONTINUOUS", Marker;
    TabletToggleIntensity = 34 => "TABLET_TOGGLE_INTENSITY", Marker;
    TabletToggleRadius = 35 => "TABLET_TOGGLE_RADIUS", Marker;
    /// Tablet pen pressure in `[0, 1]`.
    TabletPressure = 36 => "TABLET_PRESSURE", F32;
    BrushIntensity = 37 => "BRUSH_INTENSITY", U8;
    BrushToggleNegative = 38 => "BRUSH_TOGGLE_NEGATIVE", Marker;
    BrushToggleClay = 39 => "BRUSH_TOGGLE_CLAY", Marker;
    BrushToggleCulling = 40 => "BRUSH_TOGGLE_CULLING", Marker;
    BrushToggleAccumulate = 41 => "BRUSH_TOGGLE_ACCUMULATE", Marker;
    CreaseIntensity = 42 => "CREASE_INTENSITY", U8;
    CreaseToggleNegative = 43 => "CREASE_TOGGLE_NEGATIVE", Marker;
    CreaseToggleCulling = 44 => "CREASE_TOGGLE_CULLING", Marker;
    FlattenIntensity = 45 => "FLATTEN_INTENSITY", U8;
    FlattenToggleNegative = 46 => "FLATTEN_TOGGLE_NEGATIVE", Marker;
    FlattenToggleCulling = 47 => "FLATTEN_TOGGLE_CULLING", Marker;
    InflateIntensity = 48 => "INFLATE_INTENSITY", U8;
    InflateToggleNegative = 49 => "INFLATE_TOGGLE_NEGATIVE", Marker;
    InflateToggleCulling = 50 => "INFLATE_TOGGLE_CULLING", Marker;
    PinchIntensity = 51 => "PINCH_INTENSITY", U8;
    PinchToggleNegative = 52 => "PINCH_TOGGLE_NEGATIVE", Marker;
    PinchToggleCulling = 53 => "PINCH_TOGGLE_CULLING", Marker;
    SmoothIntensity = 54 => "SMOOTH_INTENSITY", U8;
    SmoothToggleTangent = 55 => "SMOOTH_TOGGLE_TANGENT", Marker;
    SmoothToggleCulling = 56 => "SMOOTH_TOGGLE_CULLING", Marker;
    TwistToggleCulling = 57 => "TWIST_TOGGLE_CULLING", Marker;
    ScaleToggleCulling = 58 => "SCALE_TOGGLE_CULLING", Marker;
    PaintIntensity = 59 => "PAINT_INTENSITY", U8;
    /// Paint color as linear RGB.
    PaintColor = 60 => "PAINT_COLOR", F32x3;
    PaintRoughness = 61 => "PAINT_ROUGHNESS", F32;
    PaintMetallic = 62 => "PAINT_METALLIC", F32;
    PaintToggleCulling = 63 => "PAINT_TOGGLE_CULLING", Marker;
    ExposureIntensity = 64 => "EXPOSURE_INTENSITY", U8;
    ShowGrid = 65 => "SHOW_GRID", U8;
    ShowWireframe = 66 => "SHOW_WIREFRAME", U8;
    FlatShading = 67 => "FLAT_SHADING", U8;
    ShaderSelect = 68 => "SHADER_SELECT", U8;
    MatcapSelect = 69 => "MATCAP_SELECT", U8;
}

impl Opcode {
    /// The wire code of this opcode.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}
