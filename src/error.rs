//! Custom error types.

use core::fmt;
#[cfg(feature = "std")]
use std::error::Error as StdError;

/// The possible errors that can occur while encoding a Code 128 symbol.
///
/// The encoder distinguishes exactly three kinds of failure: a bad input
/// character, an input (or planned codeword sequence) that is too long, and
/// an internal invariant violation that indicates an encoder bug rather than
/// a caller mistake.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// A character in the input is neither ISO 8859-1 nor a reserved FNC
    /// placeholder.
    InvalidCharacter,
    /// The input exceeded 170 characters, or the planned codeword count
    /// exceeded the 80-symbol bound (exclusive of check and stop).
    TooLong,
    /// An unreachable case was reached during planning or emission. This
    /// indicates a bug in the encoder, not bad input.
    InternalInvariantViolation(&'static str),
}

/// Alias-type for `Result<T, code128_core::error::EncodeError>`.
pub type Result<T> = ::core::result::Result<T, EncodeError>;

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter => write!(f, "input contains a character outside ISO 8859-1"),
            Self::TooLong => write!(f, "input or planned codeword sequence is too long"),
            Self::InternalInvariantViolation(why) => {
                write!(f, "internal invariant violation: {why}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl StdError for EncodeError {}
