//! Shared helpers for the zlib-stream integration suites.

#![allow(dead_code)]

use flate2::{Decompress, FlushDecompress, Status};
use stream::{OutStream, StreamError};

/// Inflates a sync-flushed (unfinished) raw deflate stream.
///
/// The writer under test emits headerless deflate and keeps the stream
/// resumable, so the captured bytes never carry a stream-end marker; a raw
/// [`Decompress`] driven with [`FlushDecompress::Sync`] recovers everything
/// emitted so far.
pub fn inflate(mut data: &[u8]) -> Vec<u8> {
    let mut decompressor = Decompress::new(false);
    let mut out = Vec::new();
    let mut scratch = [0u8; 4096];

    while !data.is_empty() {
        let before_in = decompressor.total_in();
        let before_out = decompressor.total_out();
        let status = decompressor
            .decompress(data, &mut scratch, FlushDecompress::Sync)
            .expect("inflate captured stream");
        let consumed = (decompressor.total_in() - before_in) as usize;
        let produced = (decompressor.total_out() - before_out) as usize;
        out.extend_from_slice(&scratch[..produced]);
        data = &data[consumed..];
        if status == Status::StreamEnd || (consumed == 0 && produced == 0) {
            break;
        }
    }
    out
}

/// Sink that records how often `commit` is invoked.
#[derive(Debug, Default)]
pub struct CountingSink {
    buf: Vec<u8>,
    cursor: usize,
    commits: usize,
    corked: bool,
}

impl CountingSink {
    pub fn new() -> Self {
        Self {
            buf: vec![0; 1024],
            cursor: 0,
            commits: 0,
            corked: false,
        }
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn data(&self) -> &[u8] {
        &self.buf[..self.cursor]
    }
}

impl OutStream for CountingSink {
    fn reserve(&mut self, min: usize) -> Result<&mut [u8], StreamError> {
        if self.buf.len() - self.cursor < min {
            let needed = self.cursor + min;
            let grown = self.buf.len().saturating_mul(2).max(needed);
            self.buf.resize(grown, 0);
        }
        Ok(&mut self.buf[self.cursor..])
    }

    fn commit(&mut self, written: usize) {
        self.commits += 1;
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

/// Sink that offers writable regions of at most `chunk` bytes, forcing the
/// writer's drain loop to take several rounds per flush.
#[derive(Debug)]
pub struct ChunkSink {
    window: Vec<u8>,
    cursor: usize,
    spilled: Vec<u8>,
}

impl ChunkSink {
    pub fn new(chunk: usize) -> Self {
        Self {
            window: vec![0; chunk.max(1)],
            cursor: 0,
            spilled: Vec::new(),
        }
    }

    pub fn data(&self) -> Vec<u8> {
        let mut all = self.spilled.clone();
        all.extend_from_slice(&self.window[..self.cursor]);
        all
    }
}

impl OutStream for ChunkSink {
    fn reserve(&mut self, min: usize) -> Result<&mut [u8], StreamError> {
        if self.available() < min {
            if min > self.window.len() {
                return Err(StreamError::capacity_exceeded(min, self.window.len()));
            }
            self.spilled.extend_from_slice(&self.window[..self.cursor]);
            self.cursor = 0;
        }
        Ok(&mut self.window[self.cursor..])
    }

    fn commit(&mut self, written: usize) {
        self.cursor += written;
    }

    fn available(&self) -> usize {
        self.window.len() - self.cursor
    }

    fn length(&self) -> u64 {
        (self.spilled.len() + self.cursor) as u64
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        Ok(())
    }

    fn cork(&mut self, _enable: bool) -> Result<(), StreamError> {
        Ok(())
    }
}

/// Deterministic pseudo-random bytes (LCG), for low-compressibility data
/// without external dependencies.
pub fn random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let mut data = Vec::with_capacity(size);
    for _ in 0..size {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        data.push((state >> 33) as u8);
    }
    data
}

/// Moderately compressible text of the requested size.
pub fn repetitive_text(size: usize) -> Vec<u8> {
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    pattern.iter().cycle().take(size).copied().collect()
}
