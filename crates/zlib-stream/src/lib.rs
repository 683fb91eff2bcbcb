#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `zlib-stream` provides [`ZlibOutStream`], a buffered output stream that
//! transparently deflates everything written through it into a downstream
//! [`OutStream`]. The writer implements the same sink interface it drains
//! into, so it stacks onto any other stream in the workspace.
//!
//! # Design
//!
//! The writer owns a fixed-capacity buffer and a persistent
//! [`flate2::Compress`] context. Producers fill the buffer through the
//! reserve/commit protocol; when the buffer runs full or a flush is
//! requested, the buffered bytes are fed to the compressor and the
//! compressed output is produced directly into the downstream stream's own
//! buffer. Corking lets callers batch many small writes into fewer, larger
//! compressor invocations, and compression-level changes are deferred until
//! the next drain so the deflate state never straddles a parameter change.
//! The emitted bytes form a single raw deflate stream, no zlib header or
//! checksum, kept resumable by sync flushes.
//!
//! # Invariants
//!
//! - No byte accepted by the writer is ever dropped or reordered: the
//!   concatenated downstream output always inflates back to the exact
//!   producer input, regardless of corking or level changes.
//! - The writer performs no I/O of its own; blocking and backpressure are
//!   entirely the downstream stream's concern.
//!
//! # Errors
//!
//! All operations surface [`StreamError`] values whose kind separates
//! caller contract violations (oversized reservations, missing downstream
//! stream) from compressor failures. The deflate engine's benign refusal of
//! a second consecutive forced flush is absorbed internally and never
//! surfaces.
//!
//! # Examples
//!
//! ```
//! use stream::{MemOutStream, OutStream};
//! use zlib_stream::{CompressionLevel, ZlibOutStream};
//!
//! # fn main() -> Result<(), stream::StreamError> {
//! let mut sink = MemOutStream::new();
//! {
//!     let mut zos = ZlibOutStream::new(Some(&mut sink), CompressionLevel::Default);
//!     zos.write_bytes(b"payload")?;
//!     zos.flush()?;
//! }
//! assert!(!sink.data().is_empty());
//! # Ok(())
//! # }
//! ```

mod level;
mod zlib_out_stream;

pub use crate::level::CompressionLevel;
pub use crate::zlib_out_stream::{DEFAULT_BUF_SIZE, ZlibOutStream};

pub use stream::{OutStream, StreamError, StreamErrorKind};
