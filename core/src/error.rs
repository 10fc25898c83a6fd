//! This module aggregates errors that may emerge from the library.
use snafu::{Backtrace, Snafu};

/// The main data type for errors in the library.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The given code is not a value representation
    /// known to the classification table.
    #[snafu(display("Unknown value representation {:?}", vr))]
    UnknownVr {
        /// the offending code
        vr: String,
        /// the generated backtrace, if available
        backtrace: Backtrace,
    },
    /// The given text is not a tag in canonical 8-hex-digit form.
    #[snafu(display("Malformed tag {:?}, expected 8 hexadecimal digits", tag))]
    MalformedTag {
        /// the offending text
        tag: String,
        /// the generated backtrace, if available
        backtrace: Backtrace,
    },
}

/// Type alias for a result from this library.
pub type Result<T, E = Error> = std::result::Result<T, E>;
