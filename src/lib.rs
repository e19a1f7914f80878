// Copyright 2026-present Vocex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Variable-byte vocabulary record codec for inverted index files.
//!
//! An inverted index keeps one vocabulary entry per term: document
//! frequency, occurrence count, last-document marker, and a locator into a
//! separate postings store. This crate is the fixed-schema binary codec for
//! that entry. It is the one place where untrusted index bytes become typed
//! data, so buffer-boundary failures (retry with a bigger buffer) and value
//! overflow (give up, the data is bad) are kept precisely distinct, and
//! every failure rolls the cursor back to where the call began.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  cursor.rs  │────▶│  varint.rs   │────▶│   vocab.rs   │
//! │ (ReadCursor,│     │ (read_varint,│     │ (VocabRecord,│
//! │ WriteCursor)│     │ write_varint)│     │  VocabScan)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use vocex::{DocCounts, Location, ReadCursor, VocabHeader, VocabRecord, WriteCursor};
//!
//! let record = VocabRecord {
//!     size: 5,
//!     header: VocabHeader::DocOnly(DocCounts { docs: 3, occurs: 10, last: 9 }),
//!     location: Location { file_no: 0, offset: 128 },
//! };
//!
//! let mut buf = vec![0u8; record.encoded_len()];
//! let mut w = WriteCursor::new(&mut buf);
//! record.encode(&mut w).unwrap();
//!
//! let mut r = ReadCursor::new(&buf);
//! assert_eq!(VocabRecord::decode(&mut r).unwrap(), Some(record));
//! ```
//!
//! The codec is fully synchronous and does no I/O; buffers and cursors are
//! caller-owned, and concurrent callers must serialize or partition them.

// Module declarations
pub mod cursor;
pub mod varint;
pub mod vocab;

// Re-exports for public API
pub use cursor::{ReadCursor, WriteCursor};
pub use varint::{read_varint, varint_len, write_varint, MAX_VARINT_BYTES};
pub use vocab::{
    CodecError, DocCounts, Location, VocabHeader, VocabKind, VocabRecord, VocabScan,
};
