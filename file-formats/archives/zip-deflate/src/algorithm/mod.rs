//! Streaming compression algorithm contract
//!
//! An algorithm is driven through a fixed lifecycle:
//!
//! ```text
//! allocate -> start -> { input | end_of_input | process }* -> end -> deallocate
//! ```
//!
//! `allocate` and `deallocate` live on the static [`AlgorithmDescriptor`]; the
//! remaining operations are methods of the allocated [`CompressionAlgorithm`].
//! A host pipeline only ever talks to the trait object and never needs to know
//! which engine sits behind it.

mod deflate;
mod descriptor;
mod engine;

pub use deflate::DeflateAlgorithm;
pub use descriptor::{
    AlgorithmDescriptor, DEFLATE_COMPRESS, DEFLATE_DECOMPRESS, algorithms, find_algorithm,
    is_supported, methods,
};

use bitflags::bitflags;
use bytes::Bytes;
use std::fmt;

use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};

/// Largest input chunk or output window the engine addresses in one call
pub const MAX_CHUNK_LEN: u64 = u32::MAX as u64;

/// Direction of an algorithm instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Uncompressed input, compressed output
    Compress,
    /// Compressed input, uncompressed output
    Decompress,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Compress => f.write_str("compression"),
            Mode::Decompress => f.write_str("decompression"),
        }
    }
}

/// Lifecycle position of an algorithm instance
///
/// `Started` covers both producing output and waiting for input; the two are
/// only distinguishable through the [`Status`] returned by `process`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    /// Allocated, `start` not called yet
    Unstarted,
    /// Engine session live, stream in progress
    Started,
    /// `process` reported [`Status::End`]
    Finished,
    /// `start` failed or `process` reported [`Status::Error`]
    Failed,
    /// `end` released the engine session
    Ended,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamState::Unstarted => "unstarted",
            StreamState::Started => "started",
            StreamState::Finished => "finished",
            StreamState::Failed => "failed",
            StreamState::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// Outcome of a single `process` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Progress was made and the stream is not finished
    Ok,
    /// The stream is complete, further calls produce nothing
    End,
    /// The registered input is exhausted and more is expected
    NeedData,
    /// Unrecoverable failure, a diagnostic has been recorded
    Error,
}

/// Status plus the number of bytes written into the output buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Outcome of the call
    pub status: Status,
    /// Bytes written to the front of the output buffer
    pub written: usize,
}

impl Progress {
    /// Create a new progress report
    pub fn new(status: Status, written: usize) -> Self {
        Self { status, written }
    }
}

bitflags! {
    /// Behavioral capabilities advertised by an algorithm instance
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CapabilityFlags: u32 {
        /// Output is a raw stream without container header or trailer,
        /// produced with the default strategy
        const RAW_STREAM = 0x0001;
    }
}

/// Operations every compression algorithm plugin implements
///
/// Calls are synchronous and must not overlap; an instance has no internal
/// locking. Failures are returned as values and mirrored on the
/// [`Diagnostics`](crate::Diagnostics) channel given at allocation.
pub trait CompressionAlgorithm: fmt::Debug + Send {
    /// Direction fixed at allocation
    fn mode(&self) -> Mode;

    /// Current lifecycle position
    fn state(&self) -> StreamState;

    /// Capability bitmask of this instance
    fn query_flags(&self) -> CapabilityFlags;

    /// Open the engine session. Must be called exactly once, before any other
    /// stream operation.
    fn start(&mut self) -> Result<()>;

    /// Release the engine session, whether or not the stream was drained
    fn end(&mut self) -> Result<()>;

    /// Register the next input chunk
    ///
    /// The chunk is held without copying until `process` has consumed it. It is
    /// rejected while a previous chunk still has unconsumed bytes.
    fn input(&mut self, chunk: Bytes) -> Result<()>;

    /// Declare that no further input follows. Irreversible.
    fn end_of_input(&mut self);

    /// Produce up to `output.len()` bytes into `output`
    fn process(&mut self, output: &mut [u8]) -> Progress;

    /// Bytes of the registered input chunk not yet consumed
    fn pending_input(&self) -> usize;

    /// Most recent failure recorded by this instance
    fn last_diagnostic(&self) -> Option<Diagnostic>;
}

/// Validate the length of an input chunk against [`MAX_CHUNK_LEN`]
pub fn check_chunk_len(len: usize) -> Result<()> {
    if len as u64 > MAX_CHUNK_LEN {
        return Err(Error::invalid_argument(format!(
            "input chunk of {len} bytes exceeds the engine limit of {MAX_CHUNK_LEN} bytes"
        )));
    }
    Ok(())
}
