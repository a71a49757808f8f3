//! Error taxonomy - closed set of exception kinds returned by every operation
//!
//! Design: Errors are values, never panics. Each carries a kind (the
//! interpreter-level exception it surfaces as) and a short static message.

use std::borrow::Cow;
use std::fmt;

use crate::logging::error;

/// Result alias used by every fallible runtime operation
pub type PmResult<T> = Result<T, Error>;

/// Exception kinds surfaced to the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong variant supplied to an operation
    TypeError,
    /// Normalized index outside container bounds
    IndexError,
    /// Invalid parameter, or a searched value was not found
    ValueError,
    /// Attribute table lookup for an absent key
    KeyError,
    /// Allocator exhausted even after a collection attempt
    OutOfMemory,
    /// Platform byte transfer fault
    IoError,
    /// Invariant violation (dangling handle, reserved native slot, ...)
    SystemError,
}

impl ErrorKind {
    /// Name as shown to Python code
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypeError => "TypeError",
            Self::IndexError => "IndexError",
            Self::ValueError => "ValueError",
            Self::KeyError => "KeyError",
            Self::OutOfMemory => "MemoryError",
            Self::IoError => "IOError",
            Self::SystemError => "SystemError",
        }
    }

    /// Numeric code handed to the platform diagnostic sink
    pub const fn code(self) -> u8 {
        match self {
            Self::TypeError => 0xE0,
            Self::IndexError => 0xE1,
            Self::ValueError => 0xE2,
            Self::KeyError => 0xE3,
            Self::OutOfMemory => 0xE4,
            Self::IoError => 0xE5,
            Self::SystemError => 0xE6,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime error: kind plus context message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn type_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn index_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::IndexError, message)
    }

    pub fn value_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ValueError, message)
    }

    pub fn key_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::KeyError, message)
    }

    pub fn out_of_memory(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::OutOfMemory, message)
    }

    pub fn io_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::IoError, message)
    }

    pub fn system_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::SystemError, message)
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Emit this error as a structured log event
    pub fn report(&self) {
        error!(
            target: "runtime",
            kind = self.kind.name(),
            code = self.kind.code(),
            message = %self.message,
            "runtime error"
        );
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for Error {}
