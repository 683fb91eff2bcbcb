//! Growable in-memory output stream.

use crate::error::StreamError;
use crate::out_stream::OutStream;

const INITIAL_CAPACITY: usize = 1024;

/// An [`OutStream`] that collects everything written into a growable
/// in-memory buffer.
///
/// Reservations that do not fit in the current allocation grow the backing
/// storage geometrically, so `reserve` never fails and `flush` has nothing
/// to do. The committed bytes are available through [`data`](Self::data),
/// which makes this the sink of choice for capturing a compressed stream in
/// memory and for tests.
#[derive(Debug)]
pub struct MemOutStream {
    buf: Vec<u8>,
    cursor: usize,
    corked: bool,
}

impl MemOutStream {
    /// Creates an empty stream with a small initial allocation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty stream whose first allocation holds `capacity`
    /// bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.max(1)],
            cursor: 0,
            corked: false,
        }
    }

    /// Returns the bytes committed so far.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.buf[..self.cursor]
    }

    /// Discards all committed bytes, keeping the allocation.
    pub fn clear(&mut self) {
        self.cursor = 0;
    }

    /// Returns `true` while the stream is corked.
    #[must_use]
    pub const fn is_corked(&self) -> bool {
        self.corked
    }
}

impl Default for MemOutStream {
    fn default() -> Self {
        Self::new()
    }
}

impl OutStream for MemOutStream {
    fn reserve(&mut self, min: usize) -> Result<&mut [u8], StreamError> {
        if self.available() < min {
            let needed = self.cursor + min;
            let grown = self.buf.len().saturating_mul(2).max(needed);
            self.buf.resize(grown, 0);
        }
        Ok(&mut self.buf[self.cursor..])
    }

    fn commit(&mut self, written: usize) {
        debug_assert!(self.cursor + written <= self.buf.len());
        self.cursor += written;
    }

    fn available(&self) -> usize {
        self.buf.len() - self.cursor
    }

    fn length(&self) -> u64 {
        self.cursor as u64
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        Ok(())
    }

    fn cork(&mut self, enable: bool) -> Result<(), StreamError> {
        self.corked = enable;
        Ok(())
    }
}
