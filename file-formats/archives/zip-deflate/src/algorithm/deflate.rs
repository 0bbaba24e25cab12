//! Raw deflate adapter
//!
//! Wraps an [`EngineSession`] and translates its incremental calls and native
//! return codes into the [`CompressionAlgorithm`] contract. Both directions share
//! this one state machine and differ only in [`Mode`].

use bytes::{Buf, Bytes};

use super::engine::EngineSession;
use super::{
    CapabilityFlags, CompressionAlgorithm, Mode, Progress, Status, StreamState, check_chunk_len,
};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result, Z_BUF_ERROR, Z_OK, Z_STREAM_END};

/// Translate a native engine code into a stream status
///
/// Buffer starvation is only benign when the registered input is used up.
/// Every other failure comes back as the native code to record. An empty
/// output window gets no special treatment.
fn translate(code: i32, input_left: bool) -> std::result::Result<Status, i32> {
    match code {
        Z_OK => Ok(Status::Ok),
        Z_STREAM_END => Ok(Status::End),
        Z_BUF_ERROR if !input_left => Ok(Status::NeedData),
        code => Err(code),
    }
}

/// Deflate algorithm instance for one stream
#[derive(Debug)]
pub struct DeflateAlgorithm {
    mode: Mode,
    flags: i32,
    end_of_input: bool,
    state: StreamState,
    engine: Option<EngineSession>,
    pending: Bytes,
    diagnostics: Diagnostics,
    last: Option<Diagnostic>,
}

impl DeflateAlgorithm {
    /// Create an unstarted instance. The engine is not touched until `start`.
    pub fn new(mode: Mode, flags: i32, diagnostics: Diagnostics) -> Self {
        Self {
            mode,
            flags,
            end_of_input: false,
            state: StreamState::Unstarted,
            engine: None,
            pending: Bytes::new(),
            diagnostics,
            last: None,
        }
    }

    /// Tuning flags fixed at allocation
    pub fn flags(&self) -> i32 {
        self.flags
    }

    /// Whether `end_of_input` has been called
    pub fn is_end_of_input(&self) -> bool {
        self.end_of_input
    }

    /// Total bytes consumed and produced by the live engine session
    pub fn totals(&self) -> Option<(u64, u64)> {
        self.engine
            .as_ref()
            .map(|engine| (engine.total_in(), engine.total_out()))
    }

    fn record(&mut self, err: &Error) {
        let diagnostic = Diagnostic::from(err);
        self.last = Some(diagnostic);
        self.diagnostics.record(diagnostic);
    }

    /// Record and return a caller misuse error without touching the engine
    fn reject(&mut self, err: Error) -> Error {
        log::debug!("Rejected {} call: {err}", self.mode);
        self.record(&err);
        err
    }

    fn fail(&mut self, code: i32) {
        let err = Error::codec(code);
        log::warn!("Deflate {} failed: {err}", self.mode);
        self.record(&err);
        self.state = StreamState::Failed;
    }
}

impl CompressionAlgorithm for DeflateAlgorithm {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn state(&self) -> StreamState {
        self.state
    }

    fn query_flags(&self) -> CapabilityFlags {
        match self.mode {
            Mode::Compress => CapabilityFlags::RAW_STREAM,
            Mode::Decompress => CapabilityFlags::empty(),
        }
    }

    fn start(&mut self) -> Result<()> {
        if self.state != StreamState::Unstarted {
            return Err(self.reject(Error::invalid_state("start", self.state)));
        }

        match EngineSession::begin(self.mode, self.flags) {
            Ok(engine) => {
                log::debug!("Started raw deflate {} (flags {})", self.mode, self.flags);
                self.engine = Some(engine);
                self.state = StreamState::Started;
                Ok(())
            }
            Err(code) => {
                self.fail(code);
                Err(Error::codec(code))
            }
        }
    }

    fn end(&mut self) -> Result<()> {
        if matches!(self.state, StreamState::Unstarted | StreamState::Ended) {
            return Err(self.reject(Error::invalid_state("end", self.state)));
        }

        if let Some(engine) = self.engine.take() {
            log::debug!(
                "Ended raw deflate {} after {} bytes in, {} bytes out",
                self.mode,
                engine.total_in(),
                engine.total_out()
            );
        }
        if !self.pending.is_empty() {
            log::debug!("Discarding {} unconsumed input bytes", self.pending.len());
        }
        self.pending = Bytes::new();
        self.state = StreamState::Ended;
        Ok(())
    }

    fn input(&mut self, chunk: Bytes) -> Result<()> {
        if self.state != StreamState::Started {
            return Err(self.reject(Error::invalid_state("input", self.state)));
        }
        if let Err(err) = check_chunk_len(chunk.len()) {
            return Err(self.reject(err));
        }
        if !self.pending.is_empty() {
            let err = Error::invalid_argument(format!(
                "previous input chunk still has {} unconsumed bytes",
                self.pending.len()
            ));
            return Err(self.reject(err));
        }

        self.pending = chunk;
        Ok(())
    }

    fn end_of_input(&mut self) {
        self.end_of_input = true;
    }

    fn process(&mut self, output: &mut [u8]) -> Progress {
        match self.state {
            StreamState::Started => {}
            StreamState::Finished => return Progress::new(Status::End, 0),
            StreamState::Failed => return Progress::new(Status::Error, 0),
            state => {
                self.reject(Error::invalid_state("process", state));
                return Progress::new(Status::Error, 0);
            }
        }

        let finish = self.mode == Mode::Compress && self.end_of_input;
        let Some(engine) = self.engine.as_mut() else {
            self.reject(Error::invalid_state("process", self.state));
            return Progress::new(Status::Error, 0);
        };
        let step = engine.step(&self.pending, output, finish);
        self.pending.advance(step.consumed);

        log::trace!(
            "{} step: consumed {}, produced {}, code {}, {} input bytes left",
            self.mode,
            step.consumed,
            step.produced,
            step.code,
            self.pending.len()
        );

        let status = match translate(step.code, !self.pending.is_empty()) {
            Ok(Status::End) => {
                self.state = StreamState::Finished;
                Status::End
            }
            Ok(status) => status,
            Err(code) => {
                self.fail(code);
                Status::Error
            }
        };

        Progress::new(status, step.produced)
    }

    fn pending_input(&self) -> usize {
        self.pending.len()
    }

    fn last_diagnostic(&self) -> Option<Diagnostic> {
        self.last
    }
}

impl Drop for DeflateAlgorithm {
    fn drop(&mut self) {
        if self.engine.is_some() {
            log::debug!("Raw deflate {} dropped without end", self.mode);
        }
    }
}
