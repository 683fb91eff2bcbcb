//! Buffered output stream that deflates into a downstream sink.

use flate2::{Compress, FlushCompress, Status};
use stream::{OutStream, StreamError, StreamErrorKind};

use crate::level::CompressionLevel;

/// Default capacity of the writer's input buffer in bytes.
pub const DEFAULT_BUF_SIZE: usize = 16384;

/// Consecutive drains that may reclaim no buffer space before the overrun
/// protocol gives up instead of spinning on a stuck compressor.
const MAX_STALLED_DRAINS: usize = 4;

/// A compressing [`OutStream`] adapter.
///
/// Bytes written through the reserve/commit protocol accumulate in a
/// fixed-capacity buffer; draining feeds them to a persistent deflate
/// context whose output (a single raw deflate stream, no zlib framing) is
/// produced directly into the downstream stream's buffer. The downstream stream is borrowed, not owned, and may be rebound
/// at any time with [`set_underlying`](Self::set_underlying); a drain
/// attempted while none is bound fails with
/// [`StreamErrorKind::UnderlyingMissing`].
///
/// While corked, drains ask the compressor to hold data internally rather
/// than force it out, batching many logical writes into fewer deflate
/// calls. Uncorking, or flushing while uncorked, performs a sync flush that
/// guarantees everything fed so far is actually emitted downstream while
/// leaving the deflate stream resumable.
///
/// Dropping the writer performs one last best-effort flush; failures during
/// teardown are discarded.
pub struct ZlibOutStream<'a> {
    underlying: Option<&'a mut dyn OutStream>,
    compressor: Compress,
    buf: Box<[u8]>,
    cursor: usize,
    offset: u64,
    level: CompressionLevel,
    pending_level: CompressionLevel,
    corked: bool,
}

impl<'a> ZlibOutStream<'a> {
    /// Creates a writer draining into `underlying` with the default buffer
    /// capacity.
    #[must_use]
    pub fn new(underlying: Option<&'a mut dyn OutStream>, level: CompressionLevel) -> Self {
        Self::with_buffer_size(underlying, level, DEFAULT_BUF_SIZE)
    }

    /// Creates a writer with an explicit input buffer capacity.
    #[must_use]
    pub fn with_buffer_size(
        underlying: Option<&'a mut dyn OutStream>,
        level: CompressionLevel,
        buf_size: usize,
    ) -> Self {
        Self {
            underlying,
            // Raw deflate (-15 window): no header or trailer, so the
            // stream stays continuable across a level change (see
            // `apply_pending_level`).
            compressor: Compress::new(level.into(), false),
            buf: vec![0; buf_size.max(1)].into_boxed_slice(),
            cursor: 0,
            offset: 0,
            level,
            pending_level: level,
            corked: false,
        }
    }

    /// Rebinds the downstream stream.
    ///
    /// No buffered data migrates; only future drains are affected. Passing
    /// `None` is valid and makes subsequent drains fail fast.
    pub fn set_underlying(&mut self, underlying: Option<&'a mut dyn OutStream>) {
        self.underlying = underlying;
    }

    /// Requests a new compression level for all data written from now on.
    ///
    /// The change is deferred: it takes effect at the start of the next
    /// drain, after a sync flush at the old parameters, so no emitted
    /// output straddles old and new parameters. Any integer is accepted;
    /// out-of-range values fall back to the default effort.
    pub fn set_compression_level(&mut self, level: i32) {
        self.pending_level = CompressionLevel::from_numeric(level);
    }

    /// Returns the compression level currently applied to the deflate
    /// context, which may lag a pending
    /// [`set_compression_level`](Self::set_compression_level) request until
    /// the next drain.
    #[must_use]
    pub const fn compression_level(&self) -> CompressionLevel {
        self.level
    }

    /// Returns the capacity of the writer's input buffer.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` while the writer is corked.
    #[must_use]
    pub const fn is_corked(&self) -> bool {
        self.corked
    }

    /// Reclaims at least `needed` bytes of buffer space through corked
    /// drains.
    ///
    /// The compressor is asked to accept buffered input without being
    /// forced to emit all pending output, since the goal here is room, not
    /// delivery. Each round must shrink the cursor; a compressor that stops
    /// accepting input trips the stall guard rather than spinning.
    fn overrun(&mut self, needed: usize) -> Result<(), StreamError> {
        #[cfg(feature = "tracing")]
        tracing::trace!(needed, available = self.available(), "overrun");

        self.apply_pending_level()?;

        let mut stalled = 0;
        while self.available() < needed {
            let before = self.cursor;
            let consumed = self.run_compressor(FlushCompress::None)?;
            self.retire_input(consumed);
            if self.cursor < before {
                stalled = 0;
            } else {
                stalled += 1;
                if stalled >= MAX_STALLED_DRAINS {
                    return Err(StreamError::compressor_stalled());
                }
            }
        }
        Ok(())
    }

    /// Drains the buffer through the compressor in the given flush mode and
    /// accounts for the input consumed.
    fn drain(&mut self, mode: FlushCompress) -> Result<(), StreamError> {
        self.apply_pending_level()?;

        #[cfg(feature = "tracing")]
        tracing::trace!(avail_in = self.cursor, ?mode, "flush");

        let consumed = self.run_compressor(mode)?;
        self.retire_input(consumed);
        Ok(())
    }

    /// Runs the compressor over `buf[..cursor]`, producing directly into
    /// regions reserved from the downstream stream. Returns how many input
    /// bytes the compressor accepted.
    fn run_compressor(&mut self, mode: FlushCompress) -> Result<usize, StreamError> {
        let Some(underlying) = self.underlying.as_deref_mut() else {
            return Err(StreamError::underlying_missing());
        };

        // Nothing buffered and nothing forced: skip the zero-byte deflate
        // call entirely.
        if matches!(mode, FlushCompress::None) && self.cursor == 0 {
            return Ok(0);
        }

        let mut consumed = 0;
        loop {
            let region = underlying.reserve(1)?;
            let offered = region.len();
            let before_in = self.compressor.total_in();
            let before_out = self.compressor.total_out();

            #[cfg(feature = "tracing")]
            tracing::trace!(
                avail_in = self.cursor - consumed,
                avail_out = offered,
                "calling deflate"
            );

            let status = self
                .compressor
                .compress(&self.buf[consumed..self.cursor], region, mode)
                .map_err(StreamError::compressor_failure)?;

            consumed += (self.compressor.total_in() - before_in) as usize;
            let produced = (self.compressor.total_out() - before_out) as usize;
            underlying.commit(produced);

            match status {
                Status::BufError => {
                    if matches!(mode, FlushCompress::None) {
                        // No forced flush to refuse, so a stall here is a
                        // genuine failure.
                        return Err(StreamError::new(StreamErrorKind::CompressorFailure));
                    }
                    // zlib refuses a second consecutive forced flush with
                    // no new input; there is nothing left to emit.
                    break;
                }
                Status::Ok | Status::StreamEnd => {}
            }

            // A partially filled region means the compressor has no more
            // pending output.
            if produced < offered {
                break;
            }

            // Under no-flush nothing forces the remaining pending output
            // out; once all input is accepted the drain is done. Whatever
            // the compressor still holds is emitted by a later drain.
            if matches!(mode, FlushCompress::None) && consumed == self.cursor {
                break;
            }
        }
        Ok(consumed)
    }

    /// Retires `consumed` bytes of buffered input.
    ///
    /// Full consumption resets the cursor; partial consumption (possible
    /// while corked, since the compressor may buffer input internally)
    /// shifts the unconsumed suffix to the start of the buffer in place.
    fn retire_input(&mut self, consumed: usize) {
        if consumed == 0 {
            return;
        }
        if consumed == self.cursor {
            self.cursor = 0;
        } else {
            self.buf.copy_within(consumed..self.cursor, 0);
            self.cursor -= consumed;
        }
        self.offset += consumed as u64;
    }

    /// Applies a deferred compression-level change, if one is pending.
    ///
    /// Runs before any other drain logic so consumed input is never counted
    /// twice: everything buffered is sync-flushed through at the old
    /// parameters, then the deflate context adopts the new level.
    fn apply_pending_level(&mut self) -> Result<(), StreamError> {
        if self.pending_level == self.level {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            avail_in = self.cursor,
            pending_level = ?self.pending_level,
            "changing compression level"
        );

        // deflateParams cannot be driven through flate2 once compression
        // has started, so the context is replaced instead: a completed
        // sync flush leaves raw deflate at a byte-aligned block boundary,
        // and a fresh context started there continues the same stream.
        // The new context starts with an empty history window, which costs
        // ratio on the bytes right after the change, never correctness.
        let consumed = self.run_compressor(FlushCompress::Sync)?;
        self.retire_input(consumed);

        self.compressor = Compress::new(self.pending_level.into(), false);
        self.level = self.pending_level;
        Ok(())
    }
}

impl OutStream for ZlibOutStream<'_> {
    fn reserve(&mut self, min: usize) -> Result<&mut [u8], StreamError> {
        if min > self.buf.len() {
            return Err(StreamError::capacity_exceeded(min, self.buf.len()));
        }
        if self.available() < min {
            self.overrun(min)?;
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
        self.offset + self.cursor as u64
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        let mode = if self.corked {
            FlushCompress::None
        } else {
            FlushCompress::Sync
        };
        self.drain(mode)
    }

    fn cork(&mut self, enable: bool) -> Result<(), StreamError> {
        self.corked = enable;
        if !enable {
            self.flush()?;
        }
        if let Some(underlying) = self.underlying.as_deref_mut() {
            underlying.cork(enable)?;
        }
        Ok(())
    }
}

impl Drop for ZlibOutStream<'_> {
    fn drop(&mut self) {
        // Teardown never propagates; the final flush is best effort.
        let _ = self.flush();
    }
}

impl std::fmt::Debug for ZlibOutStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZlibOutStream")
            .field("buf_size", &self.buf.len())
            .field("cursor", &self.cursor)
            .field("offset", &self.offset)
            .field("level", &self.level)
            .field("pending_level", &self.pending_level)
            .field("corked", &self.corked)
            .field("bound", &self.underlying.is_some())
            .finish()
    }
}
