//! Host-side pipeline driving an algorithm over `std::io`
//!
//! [`AlgorithmReader`] is the generic pump an archive reader or writer puts
//! between an entry's byte source and its consumer: it reads input chunks from
//! upstream, feeds them to the algorithm on `NeedData`, and hands out whatever
//! `process` produces.

use bytes::Bytes;
use std::io::{self, Read, Write};

use crate::algorithm::{
    AlgorithmDescriptor, CompressionAlgorithm, DEFLATE_COMPRESS, DEFLATE_DECOMPRESS,
    MAX_CHUNK_LEN, Status, StreamState,
};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result, Z_STREAM_ERROR};

/// Default size of the chunks read from upstream
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default size of the output buffer used by [`transcode`]
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Buffer sizes for a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Bytes read from upstream per `input` call
    pub chunk_size: usize,
    /// Bytes requested per `process` call
    pub buffer_size: usize,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl TranscodeOptions {
    /// Check that both sizes are usable
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.buffer_size == 0 {
            return Err(Error::invalid_argument("chunk and buffer sizes must be non-zero"));
        }
        if self.chunk_size as u64 > MAX_CHUNK_LEN {
            return Err(Error::invalid_argument(format!(
                "chunk size {} exceeds the engine limit of {MAX_CHUNK_LEN} bytes",
                self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Byte counts of a finished or in-progress pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Bytes read from upstream
    pub bytes_in: u64,
    /// Bytes produced by the algorithm
    pub bytes_out: u64,
}

/// Reader that yields the output of an algorithm applied to an upstream reader
#[derive(Debug)]
pub struct AlgorithmReader<R> {
    inner: R,
    algorithm: Box<dyn CompressionAlgorithm>,
    diagnostics: Diagnostics,
    chunk_size: usize,
    upstream_done: bool,
    finished: bool,
    stats: TransferStats,
}

impl<R: Read> AlgorithmReader<R> {
    /// Allocate and start an algorithm over `inner` with default chunk size
    pub fn new(descriptor: &AlgorithmDescriptor, flags: i32, inner: R) -> Result<Self> {
        Self::with_options(descriptor, flags, inner, &TranscodeOptions::default())
    }

    /// Allocate and start an algorithm over `inner`
    pub fn with_options(
        descriptor: &AlgorithmDescriptor,
        flags: i32,
        inner: R,
        options: &TranscodeOptions,
    ) -> Result<Self> {
        options.validate()?;
        let diagnostics = Diagnostics::new();
        let mut algorithm = descriptor.allocate(flags, &diagnostics)?;
        algorithm.start()?;

        Ok(Self {
            inner,
            algorithm,
            diagnostics,
            chunk_size: options.chunk_size,
            upstream_done: false,
            finished: false,
            stats: TransferStats::default(),
        })
    }

    /// Byte counts so far
    pub fn stats(&self) -> TransferStats {
        self.stats
    }

    /// Diagnostic channel shared with the algorithm
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Whether the algorithm reported the end of the stream
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn fill_input(&mut self) -> io::Result<()> {
        let mut chunk = vec![0u8; self.chunk_size];
        let read = loop {
            match self.inner.read(&mut chunk) {
                Ok(read) => break read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        };

        if read == 0 {
            log::trace!("Upstream exhausted after {} bytes", self.stats.bytes_in);
            self.upstream_done = true;
            self.algorithm.end_of_input();
            return Ok(());
        }

        chunk.truncate(read);
        self.stats.bytes_in += read as u64;
        self.algorithm.input(Bytes::from(chunk))?;
        Ok(())
    }

    fn failure(&self) -> Error {
        self.algorithm
            .last_diagnostic()
            .map_or_else(|| Error::codec(Z_STREAM_ERROR), |d| d.to_error())
    }
}

impl<R: Read> Read for AlgorithmReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.finished {
            return Ok(0);
        }

        loop {
            let progress = self.algorithm.process(buf);
            self.stats.bytes_out += progress.written as u64;

            match progress.status {
                Status::Ok => {
                    if progress.written > 0 {
                        return Ok(progress.written);
                    }
                }
                Status::End => {
                    self.finished = true;
                    if self.algorithm.pending_input() > 0 {
                        log::debug!(
                            "Ignoring {} bytes after the end of the stream",
                            self.algorithm.pending_input()
                        );
                    }
                    self.close();
                    return Ok(progress.written);
                }
                Status::NeedData => {
                    if progress.written > 0 {
                        return Ok(progress.written);
                    }
                    if self.upstream_done {
                        return Err(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "compressed stream ended before its final block",
                        ));
                    }
                    self.fill_input()?;
                }
                Status::Error => return Err(self.failure().into()),
            }
        }
    }
}

impl<R> AlgorithmReader<R> {
    fn close(&mut self) {
        if !matches!(
            self.algorithm.state(),
            StreamState::Unstarted | StreamState::Ended
        ) {
            // Failure here leaves nothing for the caller to act on
            let _ = self.algorithm.end();
        }
    }
}

impl<R> Drop for AlgorithmReader<R> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Run `reader` through a freshly allocated algorithm into `writer`
pub fn transcode<R: Read, W: Write>(
    descriptor: &AlgorithmDescriptor,
    flags: i32,
    reader: R,
    writer: &mut W,
    options: &TranscodeOptions,
) -> Result<TransferStats> {
    let mut source = AlgorithmReader::with_options(descriptor, flags, reader, options)?;
    let mut buffer = vec![0u8; options.buffer_size];

    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        writer.write_all(&buffer[..read])?;
    }
    writer.flush()?;

    let stats = source.stats();
    log::debug!(
        "{} {}: {} bytes in, {} bytes out",
        descriptor.name,
        descriptor.mode,
        stats.bytes_in,
        stats.bytes_out
    );
    Ok(stats)
}

fn reserve(len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve(len).map_err(|_| Error::Memory)?;
    Ok(out)
}

/// Compress `data` into a raw deflate stream
///
/// `flags` selects the level: `0` for maximum effort or `1..=9`.
pub fn compress_to_vec(data: &[u8], flags: i32) -> Result<Vec<u8>> {
    let mut out = reserve(data.len() / 2 + 64)?;
    transcode(
        &DEFLATE_COMPRESS,
        flags,
        data,
        &mut out,
        &TranscodeOptions::default(),
    )?;
    Ok(out)
}

/// Decompress a raw deflate stream
///
/// `size_hint` pre-sizes the output, typically from the entry's recorded
/// uncompressed size.
pub fn decompress_to_vec(data: &[u8], size_hint: Option<usize>) -> Result<Vec<u8>> {
    let mut out = reserve(size_hint.unwrap_or(data.len().saturating_mul(2)))?;
    transcode(
        &DEFLATE_DECOMPRESS,
        0,
        data,
        &mut out,
        &TranscodeOptions::default(),
    )?;
    Ok(out)
}
