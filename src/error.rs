//! Error type shared by the compiler, the incremental builder, and the table parser.
//!
//! None of these errors are transient: each one ends the compilation or
//! parse attempt that raised it, and nothing partial is returned.

use std::fmt;
use std::io;

use crate::types::State;

/// Errors produced by this crate.
#[derive(Debug)]
pub enum Error {
    /// Invalid parameters, rejected before any work starts.
    Configuration(String),
    /// The transition function failed or returned a state out of range.
    Function {
        /// The full input assignment that was being evaluated.
        inputs: Vec<State>,
        reason: String,
    },
    /// A caller-imposed ceiling was exceeded.
    ResourceExhausted {
        /// What was being counted (`"nodes"`, `"evaluations"`, `"assignments"`).
        what: &'static str,
        limit: String,
    },
    /// Malformed rule tree text.
    Format {
        /// 1-based line number, or 0 when the problem is not tied to a line.
        line: usize,
        message: String,
    },
    /// File I/O error.
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Error::Format {
            line,
            message: message.into(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::Function { inputs, reason } => {
                write!(f, "Transition function failed on {:?}: {}", inputs, reason)
            }
            Error::ResourceExhausted { what, limit } => {
                write!(f, "Resource exhausted: more than {} {}", limit, what)
            }
            Error::Format { line: 0, message } => write!(f, "Format error: {}", message),
            Error::Format { line, message } => write!(f, "Format error on line {}: {}", line, message),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}
