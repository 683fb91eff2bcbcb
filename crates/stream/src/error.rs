//! Error type shared by every output stream in the workspace.

use std::fmt;

use thiserror::Error;

/// Classification of a [`StreamError`](crate::StreamError).
///
/// Every variant is fatal to the stream that produced it: there is no retry
/// policy at this layer. Benign conditions (such as a compressor refusing a
/// second consecutive forced flush) are handled inside the stream
/// implementations and never surface here.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum StreamErrorKind {
    /// A drain was attempted while no downstream stream was bound.
    UnderlyingMissing,
    /// A single reservation exceeded the stream's total buffer capacity.
    CapacityExceeded {
        /// Number of bytes the caller asked for.
        requested: usize,
        /// Total capacity of the stream's buffer.
        capacity: usize,
    },
    /// The compression engine reported an unrecoverable failure.
    CompressorFailure,
    /// The compression engine stopped making forward progress while the
    /// stream was trying to reclaim buffer space.
    CompressorStalled,
}

/// Error returned by fallible [`OutStream`](crate::OutStream) operations.
#[derive(Debug, Error)]
pub struct StreamError {
    kind: StreamErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StreamError {
    /// Creates an error of the given kind with no underlying cause.
    #[must_use]
    pub const fn new(kind: StreamErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Creates a [`StreamErrorKind::UnderlyingMissing`] error.
    #[must_use]
    pub const fn underlying_missing() -> Self {
        Self::new(StreamErrorKind::UnderlyingMissing)
    }

    /// Creates a [`StreamErrorKind::CapacityExceeded`] error for a
    /// reservation of `requested` bytes against a buffer of `capacity`.
    #[must_use]
    pub const fn capacity_exceeded(requested: usize, capacity: usize) -> Self {
        Self::new(StreamErrorKind::CapacityExceeded {
            requested,
            capacity,
        })
    }

    /// Creates a [`StreamErrorKind::CompressorFailure`] error wrapping the
    /// engine's own error value.
    #[must_use]
    pub fn compressor_failure(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: StreamErrorKind::CompressorFailure,
            source: Some(Box::new(source)),
        }
    }

    /// Creates a [`StreamErrorKind::CompressorStalled`] error.
    #[must_use]
    pub const fn compressor_stalled() -> Self {
        Self::new(StreamErrorKind::CompressorStalled)
    }

    /// Returns the classification describing what went wrong.
    #[must_use]
    pub const fn kind(&self) -> StreamErrorKind {
        self.kind
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StreamErrorKind::UnderlyingMissing => {
                f.write_str("no underlying stream has been set")
            }
            StreamErrorKind::CapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "reservation of {requested} bytes exceeds the buffer capacity of {capacity}"
            ),
            StreamErrorKind::CompressorFailure => {
                f.write_str("compression engine reported an unrecoverable error")
            }
            StreamErrorKind::CompressorStalled => {
                f.write_str("compression engine stopped making forward progress")
            }
        }
    }
}
