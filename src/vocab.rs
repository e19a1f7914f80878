// Copyright 2026-present Vocex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Vocabulary record codec.
//!
//! A vocabulary record is the per-term metadata entry of an inverted index
//! file: how many documents contain the term, how often it occurs, the last
//! document it appears in, and a locator into the external postings store.
//! This module translates between the typed [`VocabRecord`] and its compact
//! on-disk form.
//!
//! # Wire format
//!
//! ```text
//! [1 byte]  kind discriminant
//! [varint]  size
//! [varint]  docs
//! [varint]  occurs
//! [varint]  last
//! [varint]  file_no
//! [varint]  offset
//! ```
//!
//! No kind currently adds trailing fields; the discriminant byte is reserved
//! space for future variants to diverge after the common header.
//!
//! # Failure discipline
//!
//! Every operation is atomic with respect to the cursor: on any failure the
//! position is restored to exactly where it was before the call, so a caller
//! never observes a partially consumed or partially written record. The
//! varint primitive cannot tell "ran out of buffer" from "value too large",
//! so the decoder infers it from how much room was available: at most
//! [`MAX_VARINT_BYTES`] remaining means a larger buffer could help
//! ([`CodecError::ShortBuffer`]), more than that means the data itself is
//! bad ([`CodecError::Overflow`]). Downstream retry loops depend on this
//! exact boundary; do not "improve" it.

use thiserror::Error;

use crate::cursor::{ReadCursor, WriteCursor};
use crate::varint::{read_varint, varint_len, write_varint, MAX_VARINT_BYTES};

// ============================================================================
// ERRORS
// ============================================================================

/// Failure states of the vocabulary codec.
///
/// "No more records" is not an error: [`VocabRecord::decode`] returns
/// `Ok(None)` for a cursor already at its end bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Fewer bytes remained than a field could possibly need. Recoverable:
    /// retry the decode with more bytes in the buffer.
    #[error("buffer too short for a complete record; retry with more bytes")]
    ShortBuffer,

    /// Enough bytes were present but a field's encoding exceeds the u64
    /// range. More bytes will not help; the data is corrupt or from an
    /// incompatible format.
    #[error("encoded field exceeds the 64-bit value range")]
    Overflow,

    /// The discriminant byte matches no known [`VocabKind`]. Corrupt data,
    /// or a future format this build does not understand.
    #[error("unrecognized vocabulary entry kind {0:#04x}")]
    InvalidKind(u8),

    /// Encode-only: the output cursor ran out of capacity. Recoverable by
    /// encoding into a larger buffer.
    #[error("output buffer has insufficient space")]
    NoSpace,
}

// ============================================================================
// DATA MODEL
// ============================================================================

/// Record kind discriminant as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VocabKind {
    /// Postings carry document identifiers only.
    DocOnly = 0,
    /// Postings carry document identifiers plus in-document positions.
    DocWithPositions = 1,
    /// Impact-ordered postings. Shares the common header today; the
    /// discriminant keeps the layouts from ever aliasing if it diverges.
    Impact = 2,
}

impl VocabKind {
    /// Parse a discriminant byte. Unknown values must fail explicitly so a
    /// future format is never silently misparsed as an older one.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::DocOnly),
            1 => Some(Self::DocWithPositions),
            2 => Some(Self::Impact),
            _ => None,
        }
    }

    /// The wire discriminant for this kind.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Per-term counters common to all current record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocCounts {
    /// Number of documents containing the term.
    pub docs: u64,
    /// Total occurrences of the term across all documents.
    pub occurs: u64,
    /// Identifier of the last document containing the term. The surrounding
    /// index keeps this non-decreasing across records sharing a postings
    /// stream; the codec does not enforce that.
    pub last: u64,
}

/// Kind-specific header payload.
///
/// All three variants carry [`DocCounts`] today. They are separate variants
/// anyway: this is the forward-compatibility seam, and adding a kind with
/// genuinely different fields is then a localized change to `encoded_len`,
/// `encode`, and `decode` rather than a layout reinterpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabHeader {
    DocOnly(DocCounts),
    DocWithPositions(DocCounts),
    Impact(DocCounts),
}

/// Where a term's postings live in the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Postings file number.
    pub file_no: u64,
    /// Byte offset within that file.
    pub offset: u64,
}

/// One vocabulary entry: a transient value built by [`decode`] or by the
/// caller for [`encode`]; the codec keeps no state between calls.
///
/// [`decode`]: VocabRecord::decode
/// [`encode`]: VocabRecord::encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabRecord {
    /// Length, in index-defined units, of the term string or key this
    /// record names.
    pub size: u64,
    /// Kind-tagged header.
    pub header: VocabHeader,
    /// Locator for the term's postings.
    pub location: Location,
}

impl VocabRecord {
    /// The kind this record's header carries.
    pub fn kind(&self) -> VocabKind {
        match self.header {
            VocabHeader::DocOnly(_) => VocabKind::DocOnly,
            VocabHeader::DocWithPositions(_) => VocabKind::DocWithPositions,
            VocabHeader::Impact(_) => VocabKind::Impact,
        }
    }

    /// Number of documents containing the term.
    pub fn doc_count(&self) -> u64 {
        match self.header {
            VocabHeader::DocOnly(c) | VocabHeader::DocWithPositions(c) | VocabHeader::Impact(c) => {
                c.docs
            }
        }
    }

    /// Total occurrences of the term across all documents.
    pub fn occurrence_count(&self) -> u64 {
        match self.header {
            VocabHeader::DocOnly(c) | VocabHeader::DocWithPositions(c) | VocabHeader::Impact(c) => {
                c.occurs
            }
        }
    }

    /// Identifier of the last document containing the term.
    pub fn last_document(&self) -> u64 {
        match self.header {
            VocabHeader::DocOnly(c) | VocabHeader::DocWithPositions(c) | VocabHeader::Impact(c) => {
                c.last
            }
        }
    }

    fn counts(&self) -> DocCounts {
        match self.header {
            VocabHeader::DocOnly(c) | VocabHeader::DocWithPositions(c) | VocabHeader::Impact(c) => c,
        }
    }

    // ------------------------------------------------------------------
    // LENGTH
    // ------------------------------------------------------------------

    /// Exact number of bytes [`encode`](Self::encode) will write for this
    /// record. Pure; the encoding length is fully determined by the field
    /// values because varints are self-delimiting.
    pub fn encoded_len(&self) -> usize {
        let counts = self.counts();
        let mut len = 1 // discriminant
            + varint_len(self.size)
            + varint_len(counts.docs)
            + varint_len(counts.occurs)
            + varint_len(counts.last);

        // Kind-specific trailing fields. None yet; a kind that grows its own
        // fields changes this match, encode, and decode in lockstep.
        match self.header {
            VocabHeader::DocOnly(_) | VocabHeader::DocWithPositions(_) => {}
            VocabHeader::Impact(_) => {}
        }

        len += varint_len(self.location.file_no) + varint_len(self.location.offset);
        len
    }

    // ------------------------------------------------------------------
    // DECODE
    // ------------------------------------------------------------------

    /// Decode one record from `cur`.
    ///
    /// Returns `Ok(None)` when the cursor is already at its end bound (no
    /// more records in this buffer region, cursor untouched). On success the
    /// cursor has advanced exactly [`encoded_len`](Self::encoded_len) bytes;
    /// on any error it is restored to the entry position.
    ///
    /// The discriminant is validated after the common header fields, as the
    /// format has always done: a truncated buffer that happens to start with
    /// a bad discriminant reports [`CodecError::ShortBuffer`] so the caller
    /// refills before judging the byte.
    pub fn decode(cur: &mut ReadCursor<'_>) -> Result<Option<Self>, CodecError> {
        let start = cur.position();
        let kind_byte = match cur.read_byte() {
            Some(byte) => byte,
            None => return Ok(None),
        };

        // Common header: size then the three counters.
        let size = read_field(cur, start)?;
        let docs = read_field(cur, start)?;
        let occurs = read_field(cur, start)?;
        let last = read_field(cur, start)?;
        let counts = DocCounts { docs, occurs, last };

        // Kind dispatch; trailing kind-specific fields would be read here.
        let header = match VocabKind::from_byte(kind_byte) {
            Some(VocabKind::DocOnly) => VocabHeader::DocOnly(counts),
            Some(VocabKind::DocWithPositions) => VocabHeader::DocWithPositions(counts),
            Some(VocabKind::Impact) => VocabHeader::Impact(counts),
            None => {
                cur.set_position(start);
                return Err(CodecError::InvalidKind(kind_byte));
            }
        };

        let file_no = read_field(cur, start)?;
        let offset = read_field(cur, start)?;

        Ok(Some(Self {
            size,
            header,
            location: Location { file_no, offset },
        }))
    }

    // ------------------------------------------------------------------
    // ENCODE
    // ------------------------------------------------------------------

    /// Encode this record into `cur`.
    ///
    /// On success the cursor has advanced exactly
    /// [`encoded_len`](Self::encoded_len) bytes. On
    /// [`CodecError::NoSpace`] the cursor is restored to the entry
    /// position, so no half-written record is ever observable in the
    /// cursor's position-bounded view.
    pub fn encode(&self, cur: &mut WriteCursor<'_>) -> Result<(), CodecError> {
        let start = cur.position();
        if !cur.write_byte(self.kind().as_byte()) {
            return Err(CodecError::NoSpace);
        }

        let counts = self.counts();
        write_field(cur, self.size, start)?;
        write_field(cur, counts.docs, start)?;
        write_field(cur, counts.occurs, start)?;
        write_field(cur, counts.last, start)?;

        // Kind-specific trailing fields, mirroring decode. None yet.
        match self.header {
            VocabHeader::DocOnly(_) | VocabHeader::DocWithPositions(_) => {}
            VocabHeader::Impact(_) => {}
        }

        write_field(cur, self.location.file_no, start)?;
        write_field(cur, self.location.offset, start)?;
        Ok(())
    }
}

/// Read one varint field, classifying failure per the format's rule and
/// rolling the cursor back to the record's entry position.
fn read_field(cur: &mut ReadCursor<'_>, start: usize) -> Result<u64, CodecError> {
    match read_varint(cur) {
        Some((value, _)) => Ok(value),
        None => {
            // The primitive restored its own position, so `remaining` counts
            // the failed field's bytes too. A buffer that small could not
            // hold the widest possible field, so the boundary is the limit;
            // anything larger means the encoding itself is bad.
            let err = if cur.remaining() <= MAX_VARINT_BYTES {
                CodecError::ShortBuffer
            } else {
                CodecError::Overflow
            };
            cur.set_position(start);
            Err(err)
        }
    }
}

/// Write one varint field, rolling the cursor back to the record's entry
/// position when capacity runs out.
fn write_field(cur: &mut WriteCursor<'_>, value: u64, start: usize) -> Result<(), CodecError> {
    match write_varint(cur, value) {
        Some(_) => Ok(()),
        None => {
            cur.set_position(start);
            Err(CodecError::NoSpace)
        }
    }
}

// ============================================================================
// SCANNING
// ============================================================================

/// Iterator over the records packed into one buffer region.
///
/// Yields records until the end bound (the clean-termination state of
/// [`VocabRecord::decode`]), then stops. The first decode failure is yielded
/// as an error and the iterator fuses.
#[derive(Debug)]
pub struct VocabScan<'a> {
    cur: ReadCursor<'a>,
    failed: bool,
}

impl<'a> VocabScan<'a> {
    /// Scan the records in `buf` from the beginning.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            cur: ReadCursor::new(buf),
            failed: false,
        }
    }

    /// Byte position the scan has consumed up to. After a `ShortBuffer`
    /// error this is where the caller should resume once it has more bytes.
    pub fn position(&self) -> usize {
        self.cur.position()
    }
}

impl Iterator for VocabScan<'_> {
    type Item = Result<VocabRecord, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match VocabRecord::decode(&mut self.cur) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_record() -> VocabRecord {
        VocabRecord {
            size: 5,
            header: VocabHeader::DocOnly(DocCounts {
                docs: 3,
                occurs: 10,
                last: 9,
            }),
            location: Location {
                file_no: 0,
                offset: 128,
            },
        }
    }

    fn encode_to_vec(record: &VocabRecord) -> Vec<u8> {
        let mut buf = vec![0u8; 128];
        let mut cur = WriteCursor::new(&mut buf);
        record.encode(&mut cur).unwrap();
        let len = cur.position();
        buf.truncate(len);
        buf
    }

    #[test]
    fn test_roundtrip_all_kinds() {
        let counts = DocCounts {
            docs: 1000,
            occurs: 123_456,
            last: 999,
        };
        let headers = [
            VocabHeader::DocOnly(counts),
            VocabHeader::DocWithPositions(counts),
            VocabHeader::Impact(counts),
        ];
        for header in headers {
            let record = VocabRecord {
                size: 42,
                header,
                location: Location {
                    file_no: 7,
                    offset: u64::MAX,
                },
            };
            let bytes = encode_to_vec(&record);
            assert_eq!(bytes.len(), record.encoded_len());

            let mut cur = ReadCursor::new(&bytes);
            let decoded = VocabRecord::decode(&mut cur).unwrap().unwrap();
            assert_eq!(decoded, record);
            assert_eq!(cur.position(), record.encoded_len());
        }
    }

    #[test]
    fn test_decode_at_end_is_clean_termination() {
        let mut cur = ReadCursor::new(&[]);
        assert_eq!(VocabRecord::decode(&mut cur), Ok(None));
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn test_discriminant_only_buffer_is_short_not_overflow() {
        // One well-formed kind byte and nothing else: far less room than
        // the widest field, so the buffer is the limiting factor.
        let buf = [VocabKind::DocOnly.as_byte()];
        let mut cur = ReadCursor::new(&buf);
        assert_eq!(VocabRecord::decode(&mut cur), Err(CodecError::ShortBuffer));
        assert_eq!(cur.position(), 0, "cursor must be restored");
    }

    #[test]
    fn test_truncated_record_is_short_buffer() {
        let bytes = encode_to_vec(&doc_record());
        for cut in 1..bytes.len() {
            let mut cur = ReadCursor::new(&bytes[..cut]);
            assert_eq!(
                VocabRecord::decode(&mut cur),
                Err(CodecError::ShortBuffer),
                "truncation at {cut} bytes"
            );
            assert_eq!(cur.position(), 0);
        }
    }

    #[test]
    fn test_overflow_when_room_was_ample() {
        // Kind byte, then a size field of nothing but continuation bytes,
        // padded so plenty of room remains. More bytes cannot help.
        let mut buf = vec![VocabKind::DocOnly.as_byte()];
        buf.extend_from_slice(&[0xFF; 32]);
        let mut cur = ReadCursor::new(&buf);
        assert_eq!(VocabRecord::decode(&mut cur), Err(CodecError::Overflow));
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn test_unterminated_field_near_end_is_short_buffer() {
        // Same bad field, but with at most MAX_VARINT_BYTES remaining the
        // classification rule blames the buffer, not the data. Callers'
        // refill loops rely on this.
        let mut buf = vec![VocabKind::DocOnly.as_byte()];
        buf.extend_from_slice(&[0xFF; MAX_VARINT_BYTES]);
        let mut cur = ReadCursor::new(&buf);
        assert_eq!(VocabRecord::decode(&mut cur), Err(CodecError::ShortBuffer));
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn test_invalid_kind_rejected() {
        // Full record bytes with the discriminant swapped for garbage; the
        // common header still parses, then the kind check fires.
        let mut bytes = encode_to_vec(&doc_record());
        bytes[0] = 0x7B;
        let mut cur = ReadCursor::new(&bytes);
        assert_eq!(
            VocabRecord::decode(&mut cur),
            Err(CodecError::InvalidKind(0x7B))
        );
        assert_eq!(cur.position(), 0, "cursor must not advance");
    }

    #[test]
    fn test_invalid_kind_in_short_buffer_reports_short() {
        // Bad discriminant but truncated header: refill wins over rejection,
        // matching the original decode order.
        let buf = [0x7B];
        let mut cur = ReadCursor::new(&buf);
        assert_eq!(VocabRecord::decode(&mut cur), Err(CodecError::ShortBuffer));
    }

    #[test]
    fn test_encode_into_eight_byte_buffer() {
        // {DocOnly, size 5, docs 3, occurs 10, last 9, file 0, offset 128}:
        // offset 128 needs two varint bytes, so the record is 8 bytes and
        // fits exactly.
        let record = doc_record();
        assert_eq!(record.encoded_len(), 8);

        let mut buf = [0u8; 8];
        let mut cur = WriteCursor::new(&mut buf);
        record.encode(&mut cur).unwrap();
        assert_eq!(cur.position(), record.encoded_len());

        let mut rcur = ReadCursor::new(&buf);
        let decoded = VocabRecord::decode(&mut rcur).unwrap().unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encode_no_space_rolls_back() {
        let record = doc_record();
        let needed = record.encoded_len();
        for capacity in 0..needed {
            let mut buf = vec![0u8; capacity];
            let mut cur = WriteCursor::new(&mut buf);
            assert_eq!(
                record.encode(&mut cur),
                Err(CodecError::NoSpace),
                "capacity {capacity}"
            );
            assert_eq!(cur.position(), 0, "capacity {capacity}");
        }
    }

    #[test]
    fn test_encode_after_rollback_leaves_earlier_records_intact() {
        let first = doc_record();
        let second = VocabRecord {
            size: 20,
            header: VocabHeader::Impact(DocCounts {
                docs: u64::MAX,
                occurs: u64::MAX,
                last: u64::MAX,
            }),
            location: Location {
                file_no: 3,
                offset: 1,
            },
        };

        // Room for the first record only; the second must fail cleanly.
        let mut buf = vec![0u8; first.encoded_len() + 4];
        let mut cur = WriteCursor::new(&mut buf);
        first.encode(&mut cur).unwrap();
        let mark = cur.position();
        assert_eq!(second.encode(&mut cur), Err(CodecError::NoSpace));
        assert_eq!(cur.position(), mark);

        let mut rcur = ReadCursor::new(&buf[..mark]);
        assert_eq!(VocabRecord::decode(&mut rcur), Ok(Some(first)));
        assert_eq!(VocabRecord::decode(&mut rcur), Ok(None));
    }

    #[test]
    fn test_accessors_project_header_fields() {
        let record = VocabRecord {
            size: 1,
            header: VocabHeader::DocWithPositions(DocCounts {
                docs: 12,
                occurs: 34,
                last: 56,
            }),
            location: Location::default(),
        };
        assert_eq!(record.kind(), VocabKind::DocWithPositions);
        assert_eq!(record.doc_count(), 12);
        assert_eq!(record.occurrence_count(), 34);
        assert_eq!(record.last_document(), 56);
    }

    #[test]
    fn test_kind_byte_conversions() {
        for kind in [
            VocabKind::DocOnly,
            VocabKind::DocWithPositions,
            VocabKind::Impact,
        ] {
            assert_eq!(VocabKind::from_byte(kind.as_byte()), Some(kind));
        }
        assert_eq!(VocabKind::from_byte(3), None);
        assert_eq!(VocabKind::from_byte(0xFF), None);
    }

    #[test]
    fn test_scan_yields_packed_records() {
        let records = [
            doc_record(),
            VocabRecord {
                size: 9,
                header: VocabHeader::DocWithPositions(DocCounts {
                    docs: 2,
                    occurs: 2,
                    last: 40,
                }),
                location: Location {
                    file_no: 1,
                    offset: 4096,
                },
            },
        ];

        let mut buf = vec![0u8; 64];
        let mut cur = WriteCursor::new(&mut buf);
        for record in &records {
            record.encode(&mut cur).unwrap();
        }
        let len = cur.position();

        let scanned: Vec<_> = VocabScan::new(&buf[..len])
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(scanned, records);
    }

    #[test]
    fn test_scan_stops_at_first_error_and_fuses() {
        let mut buf = encode_to_vec(&doc_record());
        let resume_at = buf.len();
        buf.push(VocabKind::Impact.as_byte()); // trailing partial record

        let mut scan = VocabScan::new(&buf);
        assert!(matches!(scan.next(), Some(Ok(_))));
        assert_eq!(scan.next(), Some(Err(CodecError::ShortBuffer)));
        assert_eq!(scan.next(), None);
        assert_eq!(scan.position(), resume_at);
    }
}
