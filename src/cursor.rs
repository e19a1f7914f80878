// Copyright 2026-present Vocex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bounded byte cursors over caller-owned buffers.
//!
//! A cursor is a position into a fixed slice; the slice length is the end
//! bound. Successful reads and writes advance the position by one byte, and
//! `set_position` exists so codecs can roll the cursor back to where an
//! operation started when it fails partway through. Nothing here allocates
//! and nothing blocks; the caller owns the bytes.

/// Read-only cursor over a byte slice.
#[derive(Debug)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current position, in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor. `pos` must not exceed the end bound.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.buf.len());
        self.pos = pos.min(self.buf.len());
    }

    /// Bytes left between the position and the end bound.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True when the position has reached the end bound.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Read one byte and advance, or `None` at the end bound.
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }
}

/// Write cursor over a mutable byte slice of fixed capacity.
///
/// Bytes past a rolled-back position are don't-care: they may hold stale
/// data from a failed write, but the position bound makes them unobservable
/// to anything that respects the cursor.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WriteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current position, in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor. `pos` must not exceed the end bound.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.buf.len());
        self.pos = pos.min(self.buf.len());
    }

    /// Bytes of capacity left between the position and the end bound.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True when the position has reached the end bound.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Write one byte and advance. Returns `false` (writing nothing) when
    /// the cursor is at the end bound.
    pub fn write_byte(&mut self, byte: u8) -> bool {
        match self.buf.get_mut(self.pos) {
            Some(slot) => {
                *slot = byte;
                self.pos += 1;
                true
            }
            None => false,
        }
    }

    /// The bytes written so far, up to the current position.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cursor_advances() {
        let buf = [0xAA, 0xBB, 0xCC];
        let mut cur = ReadCursor::new(&buf);
        assert_eq!(cur.remaining(), 3);
        assert_eq!(cur.read_byte(), Some(0xAA));
        assert_eq!(cur.read_byte(), Some(0xBB));
        assert_eq!(cur.position(), 2);
        assert_eq!(cur.read_byte(), Some(0xCC));
        assert!(cur.is_at_end());
        assert_eq!(cur.read_byte(), None);
        assert_eq!(cur.position(), 3);
    }

    #[test]
    fn test_read_cursor_rollback() {
        let buf = [1, 2, 3, 4];
        let mut cur = ReadCursor::new(&buf);
        cur.read_byte();
        cur.read_byte();
        let mark = cur.position();
        cur.read_byte();
        cur.set_position(mark);
        assert_eq!(cur.read_byte(), Some(3));
    }

    #[test]
    fn test_write_cursor_capacity() {
        let mut buf = [0u8; 2];
        let mut cur = WriteCursor::new(&mut buf);
        assert!(cur.write_byte(7));
        assert!(cur.write_byte(8));
        assert!(!cur.write_byte(9));
        assert_eq!(cur.position(), 2);
        assert_eq!(cur.written(), &[7, 8]);
    }

    #[test]
    fn test_write_cursor_rollback_hides_partial_write() {
        let mut buf = [0u8; 4];
        let mut cur = WriteCursor::new(&mut buf);
        cur.write_byte(1);
        let mark = cur.position();
        cur.write_byte(2);
        cur.write_byte(3);
        cur.set_position(mark);
        assert_eq!(cur.written(), &[1]);
    }
}
