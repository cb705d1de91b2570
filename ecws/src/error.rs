//! Error types.

use core::fmt;

/// Error type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A byte string does not match the field's byte length.
    InvalidLength,

    /// An encoded integer is not below the field modulus, or a curve
    /// parameter is out of range.
    InvalidValue,

    /// The candidate coordinates do not satisfy the curve equation.
    NotOnCurve,

    /// A binary point operation received points from different contexts.
    CurveMismatch,

    /// A structural parameter is unusable.
    InvalidParameter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::InvalidLength => "invalid length",
            Error::InvalidValue => "invalid value",
            Error::NotOnCurve => "point is not on the curve",
            Error::CurveMismatch => "points belong to different curves",
            Error::InvalidParameter => "invalid parameter",
        })
    }
}

impl core::error::Error for Error {}

impl From<montfield::Error> for Error {
    fn from(err: montfield::Error) -> Error {
        match err {
            montfield::Error::InvalidLength => Error::InvalidLength,
            montfield::Error::InvalidValue => Error::InvalidValue,
            montfield::Error::InvalidParameter => Error::InvalidParameter,
        }
    }
}

/// Result type.
pub type Result<T> = core::result::Result<T, Error>;
