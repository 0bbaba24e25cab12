//! Static algorithm descriptors and the method registry

use std::fmt;

use super::{CompressionAlgorithm, DeflateAlgorithm, Mode};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};

/// Compression method identifiers, as stored in archive entry headers
pub mod methods {
    /// Deflate
    pub const DEFLATE: u16 = 8;
}

type AllocateFn = fn(Mode, i32, Diagnostics) -> Result<Box<dyn CompressionAlgorithm>>;

/// Entry points for one method in one direction
///
/// Descriptors are process-wide and immutable. `allocate` creates a stream
/// context; the other stream operations are methods on that context.
pub struct AlgorithmDescriptor {
    /// Compression method identifier
    pub method: u16,
    /// Direction of the instances this descriptor allocates
    pub mode: Mode,
    /// Short human-readable name
    pub name: &'static str,
    allocate_fn: AllocateFn,
}

impl AlgorithmDescriptor {
    /// Allocate a new, unstarted stream context
    ///
    /// `flags` is the tuning value handed to the instance unchanged. Failures are
    /// also written to `diagnostics`.
    pub fn allocate(
        &self,
        flags: i32,
        diagnostics: &Diagnostics,
    ) -> Result<Box<dyn CompressionAlgorithm>> {
        (self.allocate_fn)(self.mode, flags, diagnostics.clone()).inspect_err(|err| {
            diagnostics.record(err.into());
        })
    }

    /// Release a stream context and everything it owns
    pub fn deallocate(&self, algorithm: Box<dyn CompressionAlgorithm>) {
        log::trace!("Deallocating {} {} context", self.name, algorithm.mode());
        drop(algorithm);
    }
}

impl fmt::Debug for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmDescriptor")
            .field("method", &self.method)
            .field("mode", &self.mode)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn allocate_deflate(
    mode: Mode,
    flags: i32,
    diagnostics: Diagnostics,
) -> Result<Box<dyn CompressionAlgorithm>> {
    Ok(Box::new(DeflateAlgorithm::new(mode, flags, diagnostics)))
}

/// Raw deflate compression
pub static DEFLATE_COMPRESS: AlgorithmDescriptor = AlgorithmDescriptor {
    method: methods::DEFLATE,
    mode: Mode::Compress,
    name: "deflate",
    allocate_fn: allocate_deflate,
};

/// Raw deflate decompression
pub static DEFLATE_DECOMPRESS: AlgorithmDescriptor = AlgorithmDescriptor {
    method: methods::DEFLATE,
    mode: Mode::Decompress,
    name: "deflate",
    allocate_fn: allocate_deflate,
};

static REGISTRY: [&AlgorithmDescriptor; 2] = [&DEFLATE_COMPRESS, &DEFLATE_DECOMPRESS];

/// All registered descriptors
pub fn algorithms() -> &'static [&'static AlgorithmDescriptor] {
    &REGISTRY
}

/// Look up the descriptor for a method and direction
pub fn find_algorithm(method: u16, mode: Mode) -> Result<&'static AlgorithmDescriptor> {
    REGISTRY
        .iter()
        .copied()
        .find(|descriptor| descriptor.method == method && descriptor.mode == mode)
        .ok_or(Error::UnsupportedMethod { method, mode })
}

/// Check whether a method can be handled in the given direction
pub fn is_supported(method: u16, mode: Mode) -> bool {
    find_algorithm(method, mode).is_ok()
}
