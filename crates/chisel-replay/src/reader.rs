//! Streaming container reader.

use crate::codec::decode_entry;
use crate::error::MalformedContainer;
use crate::log::LogEntry;
use crate::types::ContainerHeader;
use crate::HEADER_LEN;

/// Reads frames from a container one at a time.
///
/// The header is validated on [`open`](Self::open); frames are then
/// decoded lazily, so a player can start replaying before the whole
/// buffer has been checked.
#[derive(Debug)]
pub struct ContainerReader<'a> {
    data: &'a [u8],
    header: ContainerHeader,
    offset: usize,
    entries_read: u64,
}

impl<'a> ContainerReader<'a> {
    /// Validate the header and position the reader at the first frame.
    pub fn open(data: &'a [u8]) -> Result<Self, MalformedContainer> {
        let header = crate::codec::decode_header(data)?;
        Ok(Self {
            data,
            header,
            offset: HEADER_LEN,
            entries_read: 0,
        })
    }

    /// The container header.
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Read the next frame. Returns `Ok(None)` at the end of the buffer.
    pub fn next_entry(&mut self) -> Result<Option<LogEntry>, MalformedContainer> {
        let entry = decode_entry(self.data, &mut self.offset)?;
        if entry.is_some() {
            self.entries_read += 1;
        }
        Ok(entry)
    }

    /// Frames read so far.
    pub fn entries_read(&self) -> u64 {
        self.entries_read
    }

    /// Byte offset of the next frame.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Consume the reader as an iterator over the remaining frames.
    pub fn entries(self) -> EntryIter<'a> {
        EntryIter {
            reader: self,
            done: false,
        }
    }
}

/// Iterator adapter over container frames. Yields at most one error.
pub struct EntryIter<'a> {
    reader: ContainerReader<'a>,
    done: bool,
}

impl Iterator for EntryIter<'_> {
    type Item = Result<LogEntry, MalformedContainer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_container;
    use crate::log::{ActionLog, Payload};
    use chisel_core::Opcode;

    fn sample() -> Vec<u8> {
        let mut log = ActionLog::new();
        log.push(LogEntry::new(Opcode::CameraSize, Payload::U16x2(800, 600)));
        log.push(LogEntry::marker(Opcode::AddSphere));
        log.push(LogEntry::new(Opcode::ShaderSelect, Payload::U8(2)));
        encode_container(None, &log, 0)
    }

    #[test]
    fn reads_frames_in_order() {
        let bytes = sample();
        let mut reader = ContainerReader::open(&bytes).unwrap();
        assert_eq!(reader.offset(), HEADER_LEN);
        let first = reader.next_entry().unwrap().unwrap();
        assert_eq!(first.opcode(), Opcode::CameraSize);
        assert_eq!(reader.offset(), HEADER_LEN + 5);
        assert_eq!(reader.entries_read(), 1);

        let rest: Vec<_> = reader.entries().collect::<Result<_, _>>().unwrap();
        let ops: Vec<_> = rest.iter().map(LogEntry::opcode).collect();
        assert_eq!(ops, [Opcode::AddSphere, Opcode::ShaderSelect]);
    }

    #[test]
    fn open_rejects_bad_header() {
        let mut bytes = sample();
        bytes[0] = 0;
        assert!(matches!(
            ContainerReader::open(&bytes),
            Err(MalformedContainer::InvalidMagic { .. })
        ));
    }

    #[test]
    fn empty_body_yields_nothing() {
        let bytes = encode_container(None, &ActionLog::new(), 0);
        let reader = ContainerReader::open(&bytes).unwrap();
        assert_eq!(reader.entries().count(), 0);
    }

    #[test]
    fn iterator_stops_after_first_error() {
        let mut bytes = sample();
        bytes.push(0xEE);
        bytes.push(Opcode::Undo.code());
        let reader = ContainerReader::open(&bytes).unwrap();
        let items: Vec<_> = reader.entries().collect();
        assert_eq!(items.len(), 4);
        assert!(items[..3].iter().all(Result::is_ok));
        assert_eq!(
            items[3],
            Err(MalformedContainer::UnknownOpcode {
                code: 0xEE,
                offset: HEADER_LEN + 5 + 1 + 2
            })
        );
    }

    #[test]
    fn error_leaves_offset_at_bad_frame() {
        let mut bytes = sample();
        bytes.push(Opcode::VoxelRemesh.code());
        let mut reader = ContainerReader::open(&bytes).unwrap();
        for _ in 0..3 {
            reader.next_entry().unwrap();
        }
        let at = reader.offset();
        assert!(reader.next_entry().is_err());
        assert_eq!(reader.offset(), at);
        assert_eq!(reader.entries_read(), 3);
    }
}
