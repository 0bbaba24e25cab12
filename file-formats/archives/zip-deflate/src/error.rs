//! Error types for the compression algorithm layer

use std::fmt;
use std::io;
use thiserror::Error;

use crate::algorithm::{Mode, StreamState};

/// Result type alias for compression algorithm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Native engine code reported for a clean step
pub const Z_OK: i32 = 0;
/// Native engine code reported when the stream is complete
pub const Z_STREAM_END: i32 = 1;
/// Native engine code reported when a preset dictionary is required
pub const Z_NEED_DICT: i32 = 2;
/// Native engine code for an inconsistent stream state or bad parameter
pub const Z_STREAM_ERROR: i32 = -2;
/// Native engine code for corrupted input
pub const Z_DATA_ERROR: i32 = -3;
/// Native engine code for an allocation failure inside the engine
pub const Z_MEM_ERROR: i32 = -4;
/// Native engine code reported when no progress was possible
pub const Z_BUF_ERROR: i32 = -5;

/// Describe a native engine code
pub fn native_code_message(code: i32) -> &'static str {
    match code {
        Z_OK => "ok",
        Z_STREAM_END => "stream end",
        Z_NEED_DICT => "need dictionary",
        Z_STREAM_ERROR => "stream error",
        Z_DATA_ERROR => "data error",
        Z_MEM_ERROR => "insufficient memory",
        Z_BUF_ERROR => "buffer error",
        _ => "unknown error",
    }
}

/// Error category written to the diagnostic channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The compression engine failed
    BackendCodec,
    /// The caller passed an argument or issued a call the stream cannot accept
    InvalidArgument,
    /// Resource exhaustion
    Memory,
    /// No algorithm is registered for the requested method
    Unsupported,
    /// Upstream or downstream I/O failed
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::BackendCodec => "backend codec error",
            ErrorCategory::InvalidArgument => "invalid argument",
            ErrorCategory::Memory => "memory allocation failure",
            ErrorCategory::Unsupported => "compression method not supported",
            ErrorCategory::Io => "I/O error",
        };
        f.write_str(name)
    }
}

/// Main error type for compression algorithm operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// The compression engine reported a failure
    #[error("Backend codec error: {message} (native code {code})")]
    Codec {
        /// Native engine code
        code: i32,
        /// Description of the native code
        message: &'static str,
    },

    /// The caller supplied an argument the stream cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was issued in a stream state that does not allow it
    #[error("Cannot {operation} while the stream is {state}")]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// State of the stream at the time of the call
        state: StreamState,
    },

    /// Memory allocation failure
    #[error("Memory allocation failure")]
    Memory,

    /// No algorithm registered for a method/mode pair
    #[error("Compression method {method} not supported for {mode}")]
    UnsupportedMethod {
        /// Compression method identifier
        method: u16,
        /// Requested direction
        mode: Mode,
    },

    /// An unsupported request rebuilt from a diagnostic, which carries no method
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Create a new Codec error from a native engine code
    pub fn codec(code: i32) -> Self {
        Error::Codec {
            code,
            message: native_code_message(code),
        }
    }

    /// Create a new InvalidArgument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a new InvalidState error
    pub fn invalid_state(operation: &'static str, state: StreamState) -> Self {
        Error::InvalidState { operation, state }
    }

    /// Category of this error as reported on the diagnostic channel
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Io,
            Error::Codec { .. } => ErrorCategory::BackendCodec,
            Error::InvalidArgument(_) | Error::InvalidState { .. } => {
                ErrorCategory::InvalidArgument
            }
            Error::Memory => ErrorCategory::Memory,
            Error::UnsupportedMethod { .. } | Error::Unsupported(_) => ErrorCategory::Unsupported,
        }
    }

    /// Native engine code carried by this error, `0` when there is none
    pub fn native_code(&self) -> i32 {
        match self {
            Error::Codec { code, .. } => *code,
            _ => 0,
        }
    }

    /// Check if this error was caused by the caller rather than the data or engine
    pub fn is_caller_misuse(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument(_)
                | Error::InvalidState { .. }
                | Error::UnsupportedMethod { .. }
                | Error::Unsupported(_)
        )
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        // Errors raised inside `AlgorithmReader::read` travel wrapped in io::Error
        if err.get_ref().is_none() {
            return Error::Io(err);
        }
        let kind = err.kind();
        match err.into_inner().map(|inner| inner.downcast::<Error>()) {
            Some(Ok(inner)) => *inner,
            Some(Err(other)) => Error::Io(io::Error::new(kind, other)),
            None => Error::Io(io::Error::from(kind)),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(inner) => inner,
            Error::InvalidArgument(_) | Error::InvalidState { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            Error::Codec { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::Memory => io::Error::new(io::ErrorKind::OutOfMemory, err),
            Error::UnsupportedMethod { .. } | Error::Unsupported(_) => {
                io::Error::new(io::ErrorKind::Unsupported, err)
            }
        }
    }
}
