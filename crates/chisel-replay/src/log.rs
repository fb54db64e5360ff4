//! The in-memory action log.
//!
//! [`ActionLog`] is an append-only sequence of [`LogEntry`] values. Each
//! entry pairs an [`Opcode`] with a typed [`Payload`] whose variant is
//! fixed by the opcode's [`PayloadShape`]; [`LogEntry::new`] refuses any
//! other combination.
//!
//! Two opcodes fire once per frame (hover moves and field-of-view drags).
//! For those the log supports coalescing: while the entry a
//! [`CoalesceSlot`] last appended is still the tail, a new value
//! overwrites it in place instead of growing the log.

use std::sync::Arc;

use chisel_core::{Opcode, PayloadShape};

/// Operands of a log entry, one variant per payload shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// No operands.
    Marker,
    /// One unsigned byte.
    U8(u8),
    /// One signed byte.
    I8(i8),
    /// Two signed bytes.
    I8x2(i8, i8),
    /// One unsigned 16-bit value.
    U16(u16),
    /// Two unsigned 16-bit values.
    U16x2(u16, u16),
    /// Pointer press.
    PointerDown {
        /// Pressed button.
        button: u8,
        /// Pointer x in pixels.
        x: u16,
        /// Pointer y in pixels.
        y: u16,
        /// Modifier mask (`MODIFIER_SECONDARY | MODIFIER_TERTIARY`).
        mask: u8,
    },
    /// One single-precision float.
    F32(f32),
    /// Three single-precision floats.
    F32x3([f32; 3]),
    /// Opaque embedded bytes.
    Blob(Arc<[u8]>),
}

impl Payload {
    /// The shape class of these operands.
    pub fn shape(&self) -> PayloadShape {
        match self {
            Self::Marker => PayloadShape::Marker,
            Self::U8(_) => PayloadShape::U8,
            Self::I8(_) => PayloadShape::I8,
            Self::I8x2(..) => PayloadShape::I8x2,
            Self::U16(_) => PayloadShape::U16,
            Self::U16x2(..) => PayloadShape::U16x2,
            Self::PointerDown { .. } => PayloadShape::PointerDown,
            Self::F32(_) => PayloadShape::F32,
            Self::F32x3(_) => PayloadShape::F32x3,
            Self::Blob(_) => PayloadShape::Blob,
        }
    }

    /// Bytes these operands occupy on the wire.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Blob(bytes) => 4 + bytes.len(),
            other => other.shape().fixed_len().unwrap_or(0),
        }
    }
}

/// One recorded event.
///
/// # Examples
///
/// ```
/// use chisel_core::Opcode;
/// use chisel_replay::{LogEntry, Payload};
///
/// let entry = LogEntry::new(Opcode::DeviceMove, Payload::U16x2(10, 20));
/// assert_eq!(entry.encoded_len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    opcode: Opcode,
    payload: Payload,
}

impl LogEntry {
    /// Pair an opcode with its operands.
    ///
    /// # Panics
    ///
    /// If the payload's shape is not the opcode's declared shape.
    pub fn new(opcode: Opcode, payload: Payload) -> Self {
        assert_eq!(
            payload.shape(),
            opcode.shape(),
            "payload shape does not match {opcode}"
        );
        Self { opcode, payload }
    }

    /// An operand-less entry.
    pub fn marker(opcode: Opcode) -> Self {
        Self::new(opcode, Payload::Marker)
    }

    /// The event kind.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The operands.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Bytes this entry occupies on the wire (opcode byte included).
    pub fn encoded_len(&self) -> usize {
        1 + self.payload.encoded_len()
    }
}

/// High-frequency opcodes whose consecutive values collapse into one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoalesceSlot {
    /// `DEVICE_MOVE` while no button is held.
    PointerMove,
    /// `CAMERA_FOV`.
    CameraFov,
}

impl CoalesceSlot {
    /// The opcode this slot tracks.
    pub fn opcode(self) -> Opcode {
        match self {
            Self::PointerMove => Opcode::DeviceMove,
            Self::CameraFov => Opcode::CameraFov,
        }
    }
}

/// Ordered, append-only log of recorded events.
#[derive(Clone, Debug, Default)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
    last_move: Option<usize>,
    last_fov: Option<usize>,
}

impl ActionLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Append an entry and remember its position for `slot`.
    pub fn push_in_slot(&mut self, slot: CoalesceSlot, entry: LogEntry) {
        debug_assert_eq!(entry.opcode(), slot.opcode());
        let index = self.entries.len();
        self.entries.push(entry);
        *self.marker_mut(slot) = Some(index);
    }

    /// Whether the entry `slot` last appended is still the tail.
    pub fn is_tail(&self, slot: CoalesceSlot) -> bool {
        let marker = match slot {
            CoalesceSlot::PointerMove => self.last_move,
            CoalesceSlot::CameraFov => self.last_fov,
        };
        matches!(marker, Some(i) if i + 1 == self.entries.len())
    }

    /// Overwrite the tail's operands if `slot` owns the tail.
    ///
    /// Returns `false`, leaving the log untouched, when another entry has
    /// been appended since the slot's last push.
    pub fn replace_tail(&mut self, slot: CoalesceSlot, payload: Payload) -> bool {
        if !self.is_tail(slot) {
            return false;
        }
        match self.entries.last_mut() {
            Some(tail) => {
                assert_eq!(payload.shape(), tail.opcode.shape());
                tail.payload = payload;
                true
            }
            None => false,
        }
    }

    /// Coalesce into the tail when possible, append otherwise.
    ///
    /// Returns `true` when the tail was overwritten.
    pub fn push_coalesced(&mut self, slot: CoalesceSlot, entry: LogEntry) -> bool {
        if self.is_tail(slot) {
            return self.replace_tail(slot, entry.payload);
        }
        self.push_in_slot(slot, entry);
        false
    }

    /// Drop every entry and forget both coalescing positions.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_move = None;
        self.last_fov = None;
    }

    /// All entries in recording order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Iterate entries in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total frame-stream bytes the log encodes to.
    pub fn encoded_len(&self) -> usize {
        self.entries.iter().map(LogEntry::encoded_len).sum()
    }

    fn marker_mut(&mut self, slot: CoalesceSlot) -> &mut Option<usize> {
        match slot {
            CoalesceSlot::PointerMove => &mut self.last_move,
            CoalesceSlot::CameraFov => &mut self.last_fov,
        }
    }
}

impl<'a> IntoIterator for &'a ActionLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
