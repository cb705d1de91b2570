//! Error types.

use core::fmt;

/// Error type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A byte string does not have the length the context expects.
    InvalidLength,

    /// An integer is out of range, e.g. an encoded value not below the
    /// modulus, or a modulus which is even or too small.
    InvalidValue,

    /// A structural parameter is unusable, e.g. a table array count which
    /// is not a power of two.
    InvalidParameter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::InvalidLength => "invalid length",
            Error::InvalidValue => "invalid value",
            Error::InvalidParameter => "invalid parameter",
        })
    }
}

impl core::error::Error for Error {}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
