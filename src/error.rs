//! Error kinds for index construction.
//!
//! Query-time problems (empty pattern, pattern longer than the text, a
//! pattern byte absent from the indexed alphabet) are never reported as
//! errors: every matcher in this crate treats them as "yields no matches"
//! and terminates normally. Only construction can fail, and only when the
//! caller hands in text that violates the sentinel invariant.

extern crate alloc;

use core::fmt;

/// Errors that can occur while building an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// The caller asked the constructor to treat `text` as already
    /// sentinel-terminated, but a sentinel byte (`0`) occurs somewhere
    /// other than the final position.
    InvalidSentinel {
        /// Offset of the offending sentinel byte.
        at: usize,
    },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::InvalidSentinel { at } => {
                write!(f, "sentinel byte (0x00) found at offset {at}, expected only at the end")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IndexError {}

/// Result alias used throughout construction.
pub type Result<T> = core::result::Result<T, IndexError>;
