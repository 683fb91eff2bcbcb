//! Contract tests for the provided `write_bytes` copy loop against a
//! minimal sink implementation.

use stream::{OutStream, StreamError};

/// Fixed-window sink that exposes at most `window` writable bytes per
/// reservation, spilling committed bytes into a growing log.
struct NarrowSink {
    window: Vec<u8>,
    cursor: usize,
    log: Vec<u8>,
    corked: bool,
}

impl NarrowSink {
    fn new(window: usize) -> Self {
        Self {
            window: vec![0; window],
            cursor: 0,
            log: Vec::new(),
            corked: false,
        }
    }

    fn contents(&self) -> Vec<u8> {
        let mut all = self.log.clone();
        all.extend_from_slice(&self.window[..self.cursor]);
        all
    }
}

impl OutStream for NarrowSink {
    fn reserve(&mut self, min: usize) -> Result<&mut [u8], StreamError> {
        if min > self.window.len() {
            return Err(StreamError::capacity_exceeded(min, self.window.len()));
        }
        if self.available() < min {
            self.log.extend_from_slice(&self.window[..self.cursor]);
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
        (self.log.len() + self.cursor) as u64
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        Ok(())
    }

    fn cork(&mut self, enable: bool) -> Result<(), StreamError> {
        self.corked = enable;
        if !enable {
            self.flush()?;
        }
        Ok(())
    }
}

#[test]
fn write_bytes_splits_chunks_across_narrow_windows() {
    let payload: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
    let mut sink = NarrowSink::new(7);
    sink.write_bytes(&payload).expect("write");
    assert_eq!(sink.contents(), payload);
    assert_eq!(sink.length(), payload.len() as u64);
}

#[test]
fn write_bytes_with_an_empty_chunk_is_a_no_op() {
    let mut sink = NarrowSink::new(4);
    sink.write_bytes(&[]).expect("write");
    assert_eq!(sink.length(), 0);
}

#[test]
fn oversized_reservations_fail_with_the_capacity_kind() {
    let mut sink = NarrowSink::new(4);
    let err = sink.reserve(5).expect_err("reserve beyond window");
    assert_eq!(
        err.kind(),
        stream::StreamErrorKind::CapacityExceeded {
            requested: 5,
            capacity: 4,
        }
    );
}
