//! Shared diagnostic channel
//!
//! A [`Diagnostics`] handle is passed to an algorithm at allocation time. Whenever
//! an operation fails, the algorithm writes a `(category, native code)` pair to it
//! instead of unwinding. The host pipeline owns the other end of the handle and
//! inspects it after a failed call.

use parking_lot::Mutex;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::error::{Error, ErrorCategory, native_code_message};

/// A single recorded failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// What kind of failure occurred
    pub category: ErrorCategory,
    /// Native engine code, `0` for failures that did not come from the engine
    pub native_code: i32,
}

impl Diagnostic {
    /// Create a diagnostic for an engine failure
    pub fn backend_codec(native_code: i32) -> Self {
        Self {
            category: ErrorCategory::BackendCodec,
            native_code,
        }
    }

    /// Create a diagnostic for a rejected caller argument
    pub fn invalid_argument() -> Self {
        Self {
            category: ErrorCategory::InvalidArgument,
            native_code: 0,
        }
    }

    /// Rebuild an error value from this diagnostic
    pub fn to_error(self) -> Error {
        match self.category {
            ErrorCategory::BackendCodec => Error::codec(self.native_code),
            ErrorCategory::Memory => Error::Memory,
            ErrorCategory::InvalidArgument => Error::invalid_argument(self.category.to_string()),
            ErrorCategory::Unsupported => Error::Unsupported(self.category.to_string()),
            ErrorCategory::Io => Error::Io(io::Error::other(self.category.to_string())),
        }
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        Self {
            category: err.category(),
            native_code: err.native_code(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            ErrorCategory::BackendCodec => write!(
                f,
                "{}: {} ({})",
                self.category,
                native_code_message(self.native_code),
                self.native_code
            ),
            category => write!(f, "{category}"),
        }
    }
}

#[derive(Debug, Default)]
struct DiagnosticLog {
    last: Option<Diagnostic>,
    recorded: u64,
}

/// Cloneable handle to a shared error-reporting slot
///
/// Clones refer to the same slot, so one handle can be given to several algorithm
/// instances and read back by the host.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    inner: Arc<Mutex<DiagnosticLog>>,
}

impl Diagnostics {
    /// Create an empty diagnostic channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure, replacing the previously recorded one
    pub fn record(&self, diagnostic: Diagnostic) {
        let mut log = self.inner.lock();
        log.last = Some(diagnostic);
        log.recorded += 1;
    }

    /// Most recently recorded failure
    pub fn last(&self) -> Option<Diagnostic> {
        self.inner.lock().last
    }

    /// Number of failures recorded since creation
    pub fn recorded(&self) -> u64 {
        self.inner.lock().recorded
    }

    /// Forget the most recent failure
    pub fn clear(&self) {
        self.inner.lock().last = None;
    }
}
