//! Binary encode/decode for the container format.
//!
//! All integers are big-endian. A container is a 12-byte header followed
//! by a stream of frames; each frame is an opcode byte and a payload whose
//! layout is fixed by the opcode. There is no frame count or terminator:
//! the stream ends where the buffer ends.
//!
//! ```text
//! [magic u32] [version u32] [embedded mesh bytes u32]
//! [opcode u8] [payload] [opcode u8] [payload] ...
//! ```
//!
//! A container may start with a verbatim earlier container (the prefix).
//! New frames are appended after it and only the embedded-byte count in
//! the prefix's header is rewritten.

use chisel_core::{Opcode, PayloadShape};

use crate::error::MalformedContainer;
use crate::log::{ActionLog, LogEntry, Payload};
use crate::types::{ContainerHeader, DecodedContainer};
use crate::{ACCEPTED_VERSIONS, EMBEDDED_BYTES_OFFSET, HEADER_LEN, MAGIC};

// ── Primitive writers ───────────────────────────────────────────

/// Append a single byte.
pub fn put_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

/// Append a signed byte.
pub fn put_i8(buf: &mut Vec<u8>, v: i8) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Append a big-endian u16.
pub fn put_u16_be(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Append a big-endian u32.
pub fn put_u32_be(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Append a big-endian f32.
pub fn put_f32_be(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

// ── Primitive readers ───────────────────────────────────────────

/// Forward-only cursor over a byte slice.
///
/// Every read either returns the requested bytes and advances, or
/// returns `None` and leaves the position unchanged.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Start reading `data` at `pos`.
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current offset from the start of the slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Take the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Take the next `N` bytes as an array.
    pub fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.take(N)?;
        bytes.try_into().ok()
    }

    /// Read a byte.
    pub fn u8(&mut self) -> Option<u8> {
        self.array::<1>().map(|b| b[0])
    }

    /// Read a signed byte.
    pub fn i8(&mut self) -> Option<i8> {
        self.array().map(i8::from_be_bytes)
    }

    /// Read a big-endian u16.
    pub fn u16_be(&mut self) -> Option<u16> {
        self.array().map(u16::from_be_bytes)
    }

    /// Read a big-endian u32.
    pub fn u32_be(&mut self) -> Option<u32> {
        self.array().map(u32::from_be_bytes)
    }

    /// Read a big-endian f32.
    pub fn f32_be(&mut self) -> Option<f32> {
        self.array().map(f32::from_be_bytes)
    }
}

// ── Header encode/decode ────────────────────────────────────────

/// Append a fresh header.
pub fn encode_header(buf: &mut Vec<u8>, header: &ContainerHeader) {
    put_u32_be(buf, header.magic);
    put_u32_be(buf, header.version);
    put_u32_be(buf, header.embedded_mesh_bytes);
}

/// Decode and validate the header at the start of `data`.
pub fn decode_header(data: &[u8]) -> Result<ContainerHeader, MalformedContainer> {
    let mut cur = ByteCursor::new(data, 0);
    let truncated = MalformedContainer::TruncatedHeader { len: data.len() };
    let magic = cur.u32_be().ok_or(truncated.clone())?;
    let version = cur.u32_be().ok_or(truncated.clone())?;
    let embedded_mesh_bytes = cur.u32_be().ok_or(truncated)?;

    if magic != MAGIC {
        return Err(MalformedContainer::InvalidMagic { found: magic });
    }
    if !ACCEPTED_VERSIONS.contains(&version) {
        return Err(MalformedContainer::UnsupportedVersion { found: version });
    }

    Ok(ContainerHeader {
        magic,
        version,
        embedded_mesh_bytes,
    })
}

// ── Frame encode/decode ─────────────────────────────────────────

/// Append one frame: the opcode byte, then the payload per its shape.
pub fn encode_entry(buf: &mut Vec<u8>, entry: &LogEntry) {
    put_u8(buf, entry.opcode().code());
    match entry.payload() {
        Payload::Marker => {}
        Payload::U8(v) => put_u8(buf, *v),
        Payload::I8(v) => put_i8(buf, *v),
        Payload::I8x2(a, b) => {
            put_i8(buf, *a);
            put_i8(buf, *b);
        }
        Payload::U16(v) => put_u16_be(buf, *v),
        Payload::U16x2(a, b) => {
            put_u16_be(buf, *a);
            put_u16_be(buf, *b);
        }
        Payload::PointerDown { button, x, y, mask } => {
            put_u8(buf, *button);
            put_u16_be(buf, *x);
            put_u16_be(buf, *y);
            put_u8(buf, *mask);
        }
        Payload::F32(v) => put_f32_be(buf, *v),
        Payload::F32x3(rgb) => {
            for c in rgb {
                put_f32_be(buf, *c);
            }
        }
        Payload::Blob(bytes) => {
            let len = u32::try_from(bytes.len()).expect("embedded blob exceeds u32 length");
            put_u32_be(buf, len);
            buf.extend_from_slice(bytes);
        }
    }
}

/// Decode the frame starting at `offset`.
///
/// Returns `Ok(None)` when `offset` is exactly the end of `data`, and
/// advances `offset` past the frame on success. On error `offset` is
/// left unchanged.
pub fn decode_entry(
    data: &[u8],
    offset: &mut usize,
) -> Result<Option<LogEntry>, MalformedContainer> {
    let start = *offset;
    let mut cur = ByteCursor::new(data, start);
    let code = match cur.u8() {
        Some(code) => code,
        None => return Ok(None),
    };
    let opcode = Opcode::from_code(code).map_err(|e| MalformedContainer::UnknownOpcode {
        code: e.code,
        offset: start,
    })?;

    let shape = opcode.shape();
    let truncated = |cur: &ByteCursor<'_>, needed: usize| MalformedContainer::TruncatedFrame {
        opcode,
        offset: start,
        needed,
        available: cur.remaining(),
    };

    let payload = match shape.fixed_len() {
        Some(needed) => {
            if cur.remaining() < needed {
                return Err(truncated(&cur, needed));
            }
            read_fixed(&mut cur, shape).ok_or_else(|| truncated(&cur, needed))?
        }
        None => {
            let available = cur.remaining();
            let len = cur.u32_be().ok_or(MalformedContainer::TruncatedFrame {
                opcode,
                offset: start,
                needed: 4,
                available,
            })? as usize;
            let bytes = cur.take(len).ok_or(MalformedContainer::TruncatedFrame {
                opcode,
                offset: start,
                needed: len.saturating_add(4),
                available,
            })?;
            Payload::Blob(bytes.into())
        }
    };

    *offset = cur.position();
    Ok(Some(LogEntry::new(opcode, payload)))
}

fn read_fixed(cur: &mut ByteCursor<'_>, shape: PayloadShape) -> Option<Payload> {
    let payload = match shape {
        PayloadShape::Marker => Payload::Marker,
        PayloadShape::U8 => Payload::U8(cur.u8()?),
        PayloadShape::I8 => Payload::I8(cur.i8()?),
        PayloadShape::I8x2 => Payload::I8x2(cur.i8()?, cur.i8()?),
        PayloadShape::U16 => Payload::U16(cur.u16_be()?),
        PayloadShape::U16x2 => Payload::U16x2(cur.u16_be()?, cur.u16_be()?),
        PayloadShape::PointerDown => Payload::PointerDown {
            button: cur.u8()?,
            x: cur.u16_be()?,
            y: cur.u16_be()?,
            mask: cur.u8()?,
        },
        PayloadShape::F32 => Payload::F32(cur.f32_be()?),
        PayloadShape::F32x3 => Payload::F32x3([cur.f32_be()?, cur.f32_be()?, cur.f32_be()?]),
        PayloadShape::Blob => return None,
    };
    Some(payload)
}

// ── Container encode/decode ─────────────────────────────────────

/// Serialize a log into a container.
///
/// With no prefix a fresh header is written. With a prefix its bytes are
/// copied verbatim and the frames are appended after it. Either way the
/// embedded-byte count at offset 8 becomes its previous value plus
/// `embedded_mesh_bytes` (wrapping at `u32::MAX`).
///
/// # Panics
///
/// If `prefix` is shorter than a header. The recorder validates
/// prefixes on import, so this only fires on misuse of this function.
pub fn encode_container(
    prefix: Option<&[u8]>,
    log: &ActionLog,
    embedded_mesh_bytes: u64,
) -> Vec<u8> {
    let head_len = prefix.map_or(HEADER_LEN, <[u8]>::len);
    let mut buf = Vec::with_capacity(head_len + log.encoded_len());

    match prefix {
        Some(bytes) => {
            assert!(bytes.len() >= HEADER_LEN, "prefix shorter than a header");
            buf.extend_from_slice(bytes);
        }
        None => encode_header(&mut buf, &ContainerHeader::new(0)),
    }

    let field = EMBEDDED_BYTES_OFFSET..EMBEDDED_BYTES_OFFSET + 4;
    let mut existing = [0u8; 4];
    existing.copy_from_slice(&buf[field.clone()]);
    let total = u32::from_be_bytes(existing).wrapping_add(embedded_mesh_bytes as u32);
    buf[field].copy_from_slice(&total.to_be_bytes());

    for entry in log {
        encode_entry(&mut buf, entry);
    }
    buf
}

/// Decode a whole container in one forward pass.
///
/// All-or-nothing: the first malformed frame aborts the decode.
///
/// # Examples
///
/// ```
/// use chisel_core::Opcode;
/// use chisel_replay::codec::{decode_container, encode_container};
/// use chisel_replay::{ActionLog, LogEntry};
///
/// let mut log = ActionLog::new();
/// log.push(LogEntry::marker(Opcode::Undo));
/// let bytes = encode_container(None, &log, 0);
///
/// let decoded = decode_container(&bytes).unwrap();
/// assert_eq!(decoded.entries, log.entries());
/// ```
pub fn decode_container(data: &[u8]) -> Result<DecodedContainer, MalformedContainer> {
    let header = decode_header(data)?;
    let mut offset = HEADER_LEN;
    let mut entries = Vec::new();
    while let Some(entry) = decode_entry(data, &mut offset)? {
        entries.push(entry);
    }
    Ok(DecodedContainer { header, entries })
}
