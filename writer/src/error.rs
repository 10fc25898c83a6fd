//! Error types for in-place record edits.
use dicom_splice_core::LengthWidth;
use snafu::{Backtrace, Snafu};
use std::borrow::Cow;

/// An error which may occur while editing a record.
///
/// A failed edit leaves the record's buffer and directory untouched.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The byte span to write lies outside of the buffer.
    #[snafu(display(
        "Span of {} bytes at position {} exceeds buffer of {} bytes",
        length,
        position,
        buffer_len
    ))]
    OutOfRange {
        /// the start of the span
        position: usize,
        /// the length of the span
        length: usize,
        /// the size of the buffer written to
        buffer_len: usize,
        /// the generated backtrace, if available
        backtrace: Backtrace,
    },

    /// The text contains characters
    /// which cannot be written one byte per character.
    #[snafu(display("Could not encode text: {}", message))]
    EncodeText {
        /// the reason reported by the encoder
        message: Cow<'static, str>,
        /// the generated backtrace, if available
        backtrace: Backtrace,
    },

    /// The value is too long for the field's length prefix.
    #[snafu(display("Value length {} does not fit in a {:?} length field", length, width))]
    ValueTooLong {
        /// the length of the written value
        length: usize,
        /// the width of the length field
        width: LengthWidth,
        /// the generated backtrace, if available
        backtrace: Backtrace,
    },
}

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
