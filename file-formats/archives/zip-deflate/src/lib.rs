//! # zip_deflate - Streaming compression algorithms for archive I/O
//!
//! A small plugin layer an archive reader or writer uses to compress and
//! decompress entry data without knowing which codec is behind it, plus the raw
//! deflate implementation of that layer.
//!
//! ## Features
//!
//! - One algorithm contract with a fixed lifecycle:
//!   `allocate -> start -> { input | end_of_input | process }* -> end -> deallocate`
//! - Bounded input chunks held without copying, bounded output windows
//! - A closed four-way [`Status`] (`Ok`, `End`, `NeedData`, `Error`)
//! - Failures reported as values and mirrored on a shared [`Diagnostics`] channel
//! - Raw (headerless) deflate in both directions, backed by `flate2`
//! - An [`AlgorithmReader`] that pumps any algorithm over `std::io::Read`
//!
//! ## Examples
//!
//! ### Driving an algorithm by hand
//!
//! ```
//! use bytes::Bytes;
//! use zip_deflate::{DEFLATE_COMPRESS, Diagnostics, Status};
//!
//! # fn main() -> Result<(), zip_deflate::Error> {
//! let diagnostics = Diagnostics::new();
//! let mut algorithm = DEFLATE_COMPRESS.allocate(0, &diagnostics)?;
//! algorithm.start()?;
//! algorithm.input(Bytes::from_static(b"hello world"))?;
//! algorithm.end_of_input();
//!
//! let mut compressed = Vec::new();
//! let mut buffer = [0u8; 8];
//! loop {
//!     let progress = algorithm.process(&mut buffer);
//!     compressed.extend_from_slice(&buffer[..progress.written]);
//!     match progress.status {
//!         Status::Ok => continue,
//!         Status::End => break,
//!         Status::NeedData | Status::Error => unreachable!("all input was supplied"),
//!     }
//! }
//!
//! algorithm.end()?;
//! DEFLATE_COMPRESS.deallocate(algorithm);
//! # Ok(())
//! # }
//! ```
//!
//! ### Using the pipeline helpers
//!
//! ```
//! use zip_deflate::{compress_to_vec, decompress_to_vec};
//!
//! # fn main() -> Result<(), zip_deflate::Error> {
//! let compressed = compress_to_vec(b"some archive entry", 0)?;
//! let restored = decompress_to_vec(&compressed, Some(18))?;
//! assert_eq!(restored, b"some archive entry");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod algorithm;
pub mod diagnostics;
pub mod error;
pub mod stream;

// Re-export commonly used types
pub use algorithm::{
    AlgorithmDescriptor, CapabilityFlags, CompressionAlgorithm, DEFLATE_COMPRESS,
    DEFLATE_DECOMPRESS, DeflateAlgorithm, MAX_CHUNK_LEN, Mode, Progress, Status, StreamState,
    algorithms, find_algorithm, is_supported, methods,
};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Error, ErrorCategory, Result};
pub use stream::{
    AlgorithmReader, TranscodeOptions, TransferStats, compress_to_vec, decompress_to_vec,
    transcode,
};
