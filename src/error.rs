//! Crate-level error types.

use std::fmt;

/// Errors produced by the thought-bubble crate.
///
/// Animation itself never fails: degenerate geometry is reported through
/// the frame's packing flag. Errors only come from loading or validating
/// options.
#[derive(Debug)]
pub enum BubbleError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Options that parsed but cannot drive an animation.
    InvalidOptions(String),
}

impl fmt::Display for BubbleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidOptions(msg) => {
                write!(f, "invalid options: {msg}")
            }
        }
    }
}

impl std::error::Error for BubbleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BubbleError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
