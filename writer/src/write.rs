//! Low level primitives for rewriting the bytes of an encoded record.
//!
//! These functions are agnostic to value representations:
//! they do not apply any padding,
//! so values should be normalized beforehand
//! (see [`normalize_text`](crate::padding::normalize_text)).

use crate::error::{EncodeTextSnafu, OutOfRangeSnafu, Result, ValueTooLongSnafu};
use byteordered::byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;
use dicom_splice_core::LengthWidth;
use encoding::all::ISO_8859_1;
use encoding::{DecoderTrap, EncoderTrap, Encoding};
use snafu::{ensure, OptionExt};

/// Encode text with one byte per character,
/// as in the default character repertoire.
///
/// Characters beyond U+00FF cannot be represented
/// and result in an error.
pub fn encode_text(text: &str) -> Result<Vec<u8>> {
    ISO_8859_1
        .encode(text, EncoderTrap::Strict)
        .map_err(|message| EncodeTextSnafu { message }.build())
}

pub(crate) fn decode_text(bytes: &[u8]) -> String {
    // every byte maps to a character in 8859-1
    ISO_8859_1
        .decode(bytes, DecoderTrap::Replace)
        .unwrap_or_default()
}

/// Check that `length` bytes starting at `position` fit in a buffer,
/// returning the end of the span.
pub(crate) fn span_end(buffer_len: usize, position: usize, length: usize) -> Result<usize> {
    position
        .checked_add(length)
        .filter(|end| *end <= buffer_len)
        .context(OutOfRangeSnafu {
            position,
            length,
            buffer_len,
        })
}

/// Replace the `max_length` bytes at `position` with the given text.
///
/// The text is encoded with one byte per character
/// and written in full,
/// so the new buffer grows or shrinks
/// when its encoded length differs from `max_length`.
/// Bytes outside of the replaced span are kept as they were.
///
/// Returns the new buffer and the number of bytes written.
/// The input buffer is never modified,
/// so it remains valid if the operation fails.
pub fn write_span(
    buffer: &[u8],
    position: usize,
    max_length: usize,
    text: &str,
) -> Result<(Vec<u8>, usize)> {
    span_end(buffer.len(), position, max_length)?;
    let bytes = encode_text(text)?;
    write_span_bytes(buffer, position, max_length, &bytes)
}

/// Replace the `max_length` bytes at `position` with the given bytes.
///
/// This is the byte level counterpart of [`write_span`],
/// for values which are already encoded.
pub fn write_span_bytes(
    buffer: &[u8],
    position: usize,
    max_length: usize,
    bytes: &[u8],
) -> Result<(Vec<u8>, usize)> {
    let end = span_end(buffer.len(), position, max_length)?;
    let mut out = Vec::with_capacity(buffer.len() - max_length + bytes.len());
    out.extend_from_slice(&buffer[..position]);
    out.extend_from_slice(bytes);
    out.extend_from_slice(&buffer[end..]);
    Ok((out, bytes.len()))
}

/// Overwrite the length field at `position` with `length`,
/// in the given width and byte order.
pub fn write_length_prefix(
    buffer: &mut [u8],
    position: usize,
    width: LengthWidth,
    byte_order: Endianness,
    length: usize,
) -> Result<()> {
    ensure!(
        length <= width.max_length() as usize,
        ValueTooLongSnafu { length, width }
    );
    let end = span_end(buffer.len(), position, width.bytes())?;
    let slot = &mut buffer[position..end];
    match (width, byte_order) {
        (LengthWidth::Short, Endianness::Little) => LittleEndian::write_u16(slot, length as u16),
        (LengthWidth::Short, Endianness::Big) => BigEndian::write_u16(slot, length as u16),
        (LengthWidth::Long, Endianness::Little) => LittleEndian::write_u32(slot, length as u32),
        (LengthWidth::Long, Endianness::Big) => BigEndian::write_u32(slot, length as u32),
    }
    Ok(())
}
