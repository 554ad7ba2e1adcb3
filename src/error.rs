//! Error classification shared by the loaders.

use std::fmt;

/// Broad category of a loading failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input document
    Parse,
    /// Required field missing or invalid
    Structural,
    /// Previous result version or shape incompatible
    Conversion,
    /// Input is well formed but violates a loading policy
    Policy,
    /// Input could not be read
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Parse => "parse",
            ErrorKind::Structural => "structural",
            ErrorKind::Conversion => "conversion",
            ErrorKind::Policy => "policy",
            ErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}
