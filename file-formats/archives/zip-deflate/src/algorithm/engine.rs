//! Engine session around flate2's low-level raw deflate streams

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress};
use std::fmt;

use super::{MAX_CHUNK_LEN, Mode};
use crate::error::{Z_BUF_ERROR, Z_DATA_ERROR, Z_NEED_DICT, Z_OK, Z_STREAM_END, Z_STREAM_ERROR};

/// Result of one incremental engine call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EngineStep {
    /// Input bytes the engine took
    pub(crate) consumed: usize,
    /// Output bytes the engine wrote
    pub(crate) produced: usize,
    /// Native status code of the call
    pub(crate) code: i32,
}

enum Session {
    Deflate(Compress),
    Inflate(Decompress),
}

/// Live engine state for one stream, exclusively owned by its algorithm
pub(crate) struct EngineSession {
    session: Session,
}

/// Map the opaque flags value onto a deflate level
///
/// `0` asks for maximum effort; `1..=9` select that level. Anything else is
/// refused the way the engine refuses an out-of-range level.
pub(crate) fn compression_level(flags: i32) -> Option<Compression> {
    match flags {
        0 => Some(Compression::best()),
        1..=9 => Some(Compression::new(flags as u32)),
        _ => None,
    }
}

fn status_code(status: flate2::Status) -> i32 {
    match status {
        flate2::Status::Ok => Z_OK,
        flate2::Status::StreamEnd => Z_STREAM_END,
        flate2::Status::BufError => Z_BUF_ERROR,
    }
}

impl EngineSession {
    /// Begin a raw (headerless) encode or decode session
    pub(crate) fn begin(mode: Mode, flags: i32) -> Result<Self, i32> {
        let session = match mode {
            Mode::Compress => {
                let level = compression_level(flags).ok_or(Z_STREAM_ERROR)?;
                Session::Deflate(Compress::new(level, false))
            }
            Mode::Decompress => Session::Inflate(Decompress::new(false)),
        };
        Ok(Self { session })
    }

    /// Feed `input` and drain into `output`
    ///
    /// Encoding finishes the stream when `finish` is set and otherwise makes a
    /// non-flushing step. Decoding always flushes to a sync point.
    pub(crate) fn step(&mut self, input: &[u8], output: &mut [u8], finish: bool) -> EngineStep {
        let window = output.len().min(MAX_CHUNK_LEN as usize);
        let output = &mut output[..window];

        match &mut self.session {
            Session::Deflate(stream) => {
                let (before_in, before_out) = (stream.total_in(), stream.total_out());
                let flush = if finish {
                    FlushCompress::Finish
                } else {
                    FlushCompress::None
                };
                let code = match stream.compress(input, output, flush) {
                    Ok(status) => status_code(status),
                    Err(err) => {
                        log::debug!("Deflate step failed: {err}");
                        Z_STREAM_ERROR
                    }
                };
                EngineStep {
                    consumed: (stream.total_in() - before_in) as usize,
                    produced: (stream.total_out() - before_out) as usize,
                    code,
                }
            }
            Session::Inflate(stream) => {
                let (before_in, before_out) = (stream.total_in(), stream.total_out());
                let code = match stream.decompress(input, output, FlushDecompress::Sync) {
                    Ok(status) => status_code(status),
                    Err(err) => {
                        log::debug!("Inflate step failed: {err}");
                        if err.needs_dictionary().is_some() {
                            Z_NEED_DICT
                        } else {
                            Z_DATA_ERROR
                        }
                    }
                };
                EngineStep {
                    consumed: (stream.total_in() - before_in) as usize,
                    produced: (stream.total_out() - before_out) as usize,
                    code,
                }
            }
        }
    }

    /// Total bytes taken in by this session
    pub(crate) fn total_in(&self) -> u64 {
        match &self.session {
            Session::Deflate(stream) => stream.total_in(),
            Session::Inflate(stream) => stream.total_in(),
        }
    }

    /// Total bytes produced by this session
    pub(crate) fn total_out(&self) -> u64 {
        match &self.session {
            Session::Deflate(stream) => stream.total_out(),
            Session::Inflate(stream) => stream.total_out(),
        }
    }
}

impl fmt::Debug for EngineSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.session {
            Session::Deflate(_) => "deflate",
            Session::Inflate(_) => "inflate",
        };
        f.debug_struct("EngineSession")
            .field("kind", &kind)
            .field("total_in", &self.total_in())
            .field("total_out", &self.total_out())
            .finish()
    }
}
