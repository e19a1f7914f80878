// Copyright 2026-present Vocex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Variable-byte integer primitive: varint (LEB128) over bounded cursors.
//!
//! Each byte carries 7 data bits plus a continuation flag in the high bit,
//! little-endian digit order, self-terminating. The encoder always emits the
//! minimal form; the decoder accepts any encoding that fits in 64 bits and
//! at most [`MAX_VARINT_BYTES`] bytes.
//!
//! Failure here is deliberately opaque: `read_varint` returns `None` both
//! when the buffer runs out mid-varint and when the encoded value does not
//! fit in a `u64`. The record codec tells the two apart from how much room
//! the buffer had (see `vocab`); collapsing the distinction at this layer is
//! what keeps that classification rule in one place.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer
//!   encoding, DWARF4 specification §7.6 "Variable Length Data", and
//!   Google Protocol Buffers encoding: <https://protobuf.dev/programming-guides/encoding/>

use crate::cursor::{ReadCursor, WriteCursor};

/// Maximum varint bytes (u64 needs at most 10 bytes).
pub const MAX_VARINT_BYTES: usize = 10;

/// Exact number of bytes the minimal encoding of `value` occupies.
pub fn varint_len(value: u64) -> usize {
    // 7 data bits per byte; zero still takes one byte
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Read one varint, returning `(value, bytes_consumed)`.
///
/// On failure the cursor is restored to where it was and `None` is returned.
/// Failure covers both a buffer that ends mid-varint and an encoding that
/// exceeds 64 bits; callers classify via remaining capacity.
pub fn read_varint(cur: &mut ReadCursor<'_>) -> Option<(u64, usize)> {
    let start = cur.position();
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    let mut consumed = 0usize;

    while let Some(byte) = cur.read_byte() {
        consumed += 1;
        let payload = u64::from(byte & 0x7F);

        // The 10th byte may only contribute bit 63; an 11th byte, or high
        // bits past 63, means the value does not fit in a u64.
        if shift > 63 || (shift == 63 && payload > 1) {
            cur.set_position(start);
            return None;
        }
        value |= payload << shift;

        if byte & 0x80 == 0 {
            return Some((value, consumed));
        }
        shift += 7;
    }

    // Ran off the end bound mid-varint.
    cur.set_position(start);
    None
}

/// Write the minimal encoding of `value`, returning the bytes written.
///
/// On insufficient capacity the cursor is restored and `None` is returned.
pub fn write_varint(cur: &mut WriteCursor<'_>, mut value: u64) -> Option<usize> {
    let start = cur.position();
    let mut written = 0usize;

    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        let fit = if value == 0 {
            cur.write_byte(byte)
        } else {
            cur.write_byte(byte | 0x80)
        };
        if !fit {
            cur.set_position(start);
            return None;
        }
        written += 1;
        if value == 0 {
            return Some(written);
        }
    }
}


// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================
//
// Run with: cargo kani
//
// Verified properties:
// 1. write_varint never panics for any u64 value
// 2. read_varint never panics for any byte sequence
// 3. Roundtrip: read(write(x)) == x for all x
// 4. varint_len matches the bytes write_varint actually produces

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn verify_varint_roundtrip() {
        let original: u64 = kani::any();
        let mut buf = [0u8; MAX_VARINT_BYTES];

        let mut w = WriteCursor::new(&mut buf);
        let written = write_varint(&mut w, original);
        kani::assert(written.is_some(), "encode into 10 bytes must succeed");
        let written = written.unwrap();
        kani::assert(
            written == varint_len(original),
            "varint_len must predict encode output",
        );

        let mut r = ReadCursor::new(&buf);
        match read_varint(&mut r) {
            Some((value, consumed)) => {
                kani::assert(value == original, "roundtrip must preserve value");
                kani::assert(consumed == written, "must consume exactly the encoded bytes");
            }
            None => kani::assert(false, "decoding encoded value must succeed"),
        }
    }

    #[kani::proof]
    #[kani::unwind(12)]
    fn verify_read_varint_no_panic() {
        let len: usize = kani::any_where(|&n| n <= MAX_VARINT_BYTES + 1);
        let mut bytes = [0u8; 11];
        for slot in bytes.iter_mut().take(len) {
            *slot = kani::any();
        }

        let mut cur = ReadCursor::new(&bytes[..len]);
        match read_varint(&mut cur) {
            Some((_, consumed)) => {
                kani::assert(consumed > 0, "must consume at least 1 byte on success");
                kani::assert(consumed <= len, "cannot consume more bytes than available");
            }
            None => {
                kani::assert(cur.position() == 0, "failure must restore the cursor");
            }
        }
    }
}
