#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `stream` exposes the byte-sink abstraction shared across the workspace.
//! A sink hands out writable regions of its own buffer through a
//! reserve/commit protocol, which lets producers (and layered adapters such
//! as the zlib writer in `zlib-stream`) fill downstream buffers in place
//! instead of copying through intermediate allocations.
//!
//! # Design
//!
//! The crate provides the [`OutStream`] trait, the growable in-memory
//! [`MemOutStream`] sink, and the [`StreamError`] type used by every sink in
//! the workspace. Streams are synchronous and single-owner: each call runs
//! to completion, and nothing here spawns or suspends.
//!
//! # Invariants
//!
//! - A region returned by [`OutStream::reserve`] is at least as large as the
//!   requested minimum; a request exceeding the sink's total capacity fails
//!   with [`StreamErrorKind::CapacityExceeded`] instead of growing without
//!   bound.
//! - [`OutStream::length`] counts every byte accepted exactly once, whether
//!   it is still buffered or already drained downstream.
//!
//! # Errors
//!
//! All fallible operations return [`StreamError`], whose
//! [`kind`](StreamError::kind) distinguishes caller contract violations from
//! downstream failures as matchable variants rather than message strings.

mod error;
mod mem;
mod out_stream;

pub use crate::error::{StreamError, StreamErrorKind};
pub use crate::mem::MemOutStream;
pub use crate::out_stream::OutStream;
