//! The writable byte-sink trait implemented by every output stream.

use crate::error::StreamError;

/// A synchronous, buffered byte sink.
///
/// Producers obtain a writable region of the stream's own buffer with
/// [`reserve`](Self::reserve), fill some prefix of it, and account for the
/// bytes they wrote with [`commit`](Self::commit). This keeps the hand-off
/// zero-copy: layered streams (such as a compressing adapter) can produce
/// directly into the downstream buffer.
///
/// Implementations are single-owner and run every call to completion; a
/// stream must never be driven from more than one logical call at a time.
pub trait OutStream {
    /// Returns a writable region of at least `min` bytes.
    ///
    /// The implementation may drain or grow its buffer to make room. A
    /// request larger than the stream's total capacity fails with
    /// [`StreamErrorKind::CapacityExceeded`](crate::StreamErrorKind::CapacityExceeded);
    /// the buffer is not elastic and a single reservation can never exceed
    /// it.
    fn reserve(&mut self, min: usize) -> Result<&mut [u8], StreamError>;

    /// Records that `written` bytes of the most recently reserved region
    /// were filled.
    ///
    /// `written` must not exceed the length of the region returned by the
    /// matching [`reserve`](Self::reserve) call.
    fn commit(&mut self, written: usize);

    /// Returns the number of contiguous writable bytes currently free, i.e.
    /// the largest reservation that will succeed without the stream having
    /// to make room first.
    fn available(&self) -> usize;

    /// Returns the total number of bytes accepted by this stream so far,
    /// counting both bytes still buffered and bytes already passed
    /// downstream.
    fn length(&self) -> u64;

    /// Forces buffered bytes toward the stream's final destination.
    fn flush(&mut self) -> Result<(), StreamError>;

    /// Hints that the caller is batching several logical writes.
    ///
    /// While corked a stream may hold data back to coalesce downstream
    /// work; uncorking implies a flush. Layered streams propagate the
    /// toggle to the stream they drain into.
    fn cork(&mut self, enable: bool) -> Result<(), StreamError>;

    /// Copies an arbitrary-sized chunk into the stream.
    ///
    /// The chunk is split across as many reserve/commit cycles as needed,
    /// so unlike a single [`reserve`](Self::reserve) it may exceed the
    /// stream's buffer capacity.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), StreamError> {
        let mut remaining = data;
        while !remaining.is_empty() {
            let region = self.reserve(1)?;
            let n = region.len().min(remaining.len());
            region[..n].copy_from_slice(&remaining[..n]);
            self.commit(n);
            remaining = &remaining[n..];
        }
        Ok(())
    }
}
