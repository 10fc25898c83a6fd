//! The record view:
//! a byte buffer holding an encoded DICOM data set,
//! paired with the directory of its data elements.
//!
//! Edits rewrite the value bytes and the length field of one element,
//! and log how many bytes were added or removed.
//! Other directory entries are only corrected
//! once the batch is closed with [`RecordView::finish_changes`].

use crate::error::{OutOfRangeSnafu, Result};
use crate::offsets::{self, OffsetChange};
use crate::options::EditOptions;
use crate::padding::{normalize_text, trim_padding};
use crate::write::{decode_text, span_end, write_length_prefix, write_span};
use byteordered::Endianness;
use dicom_splice_core::{LengthWidth, Tag, VR};
use snafu::OptionExt;
use std::borrow::Cow;
use std::collections::HashMap;
use std::convert::TryFrom;
use tracing::{debug, trace, warn};

/// How the header of a data element was encoded,
/// overriding the defaults of the record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldParser {
    /// The byte order of the element's length field.
    pub byte_order: Endianness,
    /// Whether the element was encoded with an explicit VR,
    /// in which case the width of its length field depends on the VR.
    pub explicit_vr: bool,
}

impl FieldParser {
    /// An element encoded with an explicit VR.
    pub fn explicit(byte_order: Endianness) -> Self {
        FieldParser {
            byte_order,
            explicit_vr: true,
        }
    }

    /// An element encoded with an implicit VR.
    pub fn implicit(byte_order: Endianness) -> Self {
        FieldParser {
            byte_order,
            explicit_vr: false,
        }
    }

    /// The width of the length field of an element with this VR.
    ///
    /// With `standard_widths`, explicit VR elements follow
    /// [`VR::standard_length_prefix_width`]
    /// instead of [`VR::length_prefix_width`].
    pub fn length_width(&self, vr: VR, standard_widths: bool) -> LengthWidth {
        match (self.explicit_vr, standard_widths) {
            (false, _) => LengthWidth::Long,
            (true, false) => vr.length_prefix_width(),
            (true, true) => vr.standard_length_prefix_width(),
        }
    }
}

/// A directory entry for one data element of the record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    /// The element's tag.
    pub tag: Tag,
    /// The element's value representation.
    pub vr: VR,
    /// The length of the value in bytes.
    pub length: u32,
    /// The position of the element's header.
    pub offset: usize,
    /// The position of the first byte of the value.
    pub data_offset: usize,
    /// The element's own header encoding, if known.
    /// Without one, the element is assumed to have an implicit VR
    /// in the byte order of the record.
    pub parser: Option<FieldParser>,
}

impl Field {
    /// Create a directory entry without a header encoding of its own.
    pub fn new(tag: Tag, vr: VR, length: u32, offset: usize, data_offset: usize) -> Self {
        Field {
            tag,
            vr,
            length,
            offset,
            data_offset,
            parser: None,
        }
    }

    /// Attach a header encoding to this entry.
    pub fn with_parser(mut self, parser: FieldParser) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Resolve the width and byte order of this element's length field.
    pub fn length_prefix(&self, options: &EditOptions) -> (LengthWidth, Endianness) {
        match &self.parser {
            Some(parser) => (
                parser.length_width(self.vr, options.standard_length_widths),
                parser.byte_order,
            ),
            None => (LengthWidth::Long, options.byte_order),
        }
    }
}

/// An editable view over an encoded DICOM record.
///
/// The view exclusively owns the record's bytes.
/// Every edit replaces the buffer as a whole,
/// so nothing handed out before an edit can observe a half-written value.
#[derive(Debug, Clone)]
pub struct RecordView {
    buffer: Vec<u8>,
    fields: HashMap<Tag, Field>,
    options: EditOptions,
    offset_changes: Vec<OffsetChange>,
    total_offset_changes: Vec<OffsetChange>,
}

impl RecordView {
    /// Create a record view with the default options.
    ///
    /// The directory's positions must be accurate for the given buffer.
    pub fn new<I>(buffer: Vec<u8>, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        EditOptions::new().open(buffer, fields)
    }

    pub(crate) fn with_options<I>(buffer: Vec<u8>, fields: I, options: EditOptions) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        RecordView {
            buffer,
            fields: fields.into_iter().map(|f| (f.tag, f)).collect(),
            options,
            offset_changes: Vec::new(),
            total_offset_changes: Vec::new(),
        }
    }

    /// Replace the text value of the element with the given tag.
    ///
    /// Returns `Ok(false)` without touching the record
    /// if the element does not exist, has an empty value,
    /// or does not have a text value representation.
    ///
    /// The element's value and length field are rewritten right away,
    /// and later edits in the same batch see the shifted positions,
    /// but the directory entries of other elements
    /// are only corrected by [`finish_changes`](RecordView::finish_changes).
    pub fn change_string(&mut self, tag: Tag, text: &str) -> Result<bool> {
        let field = match self.fields.get(&tag) {
            Some(field) => *field,
            None => {
                trace!("No element {} to change", tag);
                return Ok(false);
            }
        };
        if field.length == 0 {
            trace!("Element {} is empty, not changing it", tag);
            return Ok(false);
        }
        if field.vr.is_string() != Some(true) {
            trace!("Element {} has non-text VR {}, not changing it", tag, field.vr);
            return Ok(false);
        }

        let text = if self.options.normalize_padding {
            Cow::Owned(normalize_text(field.vr, text))
        } else {
            Cow::Borrowed(text)
        };

        let old_length = field.length as usize;
        let data_offset = self.current_data_offset(&field)?;
        let (mut buffer, new_length) = write_span(&self.buffer, data_offset, old_length, &text)?;

        let (width, byte_order) = field.length_prefix(&self.options);
        let prefix_offset = data_offset
            .checked_sub(width.bytes())
            .context(OutOfRangeSnafu {
                position: data_offset,
                length: width.bytes(),
                buffer_len: buffer.len(),
            })?;
        write_length_prefix(&mut buffer, prefix_offset, width, byte_order, new_length)?;

        // nothing can fail from here on
        let change = new_length as isize - old_length as isize;
        self.buffer = buffer;
        if let Some(entry) = self.fields.get_mut(&tag) {
            entry.length = new_length as u32;
        }
        self.offset_changes.push(OffsetChange {
            offset: field.data_offset,
            change,
        });
        debug!(
            "Changed element {} at position {}: {} -> {} bytes",
            tag, data_offset, old_length, new_length
        );
        Ok(true)
    }

    /// Apply all changes of the current batch to the field directory,
    /// so that every data offset is valid for the edited buffer.
    ///
    /// A new batch of edits may start afterwards.
    /// Calling this again without new edits has no effect.
    pub fn finish_changes(&mut self) {
        let totals = offsets::accumulate(&mut self.offset_changes);
        for field in self.fields.values_mut() {
            let correction = offsets::total_correction(&totals, field.offset);
            if correction == 0 {
                continue;
            }
            field.offset = shift_saturating(field.tag, field.offset, correction);
            field.data_offset = shift_saturating(field.tag, field.data_offset, correction);
        }
        debug!(
            "Finished {} changes, record is now {} bytes",
            self.offset_changes.len(),
            self.buffer.len()
        );
        self.offset_changes.clear();
        self.total_offset_changes = totals;
    }

    /// Sum the size changes of the current batch
    /// made before the given element.
    pub fn get_offset_change(&self, field: &Field) -> isize {
        offsets::pending_correction(&self.offset_changes, field.offset)
    }

    /// Retrieve the raw value of the element with the given tag,
    /// as currently found in the buffer.
    pub fn value_bytes(&self, tag: Tag) -> Result<Option<&[u8]>> {
        let field = match self.fields.get(&tag) {
            Some(field) => field,
            None => return Ok(None),
        };
        let start = self.current_data_offset(field)?;
        let end = span_end(self.buffer.len(), start, field.length as usize)?;
        Ok(Some(&self.buffer[start..end]))
    }

    /// Retrieve the value of the element with the given tag as text,
    /// without its trailing padding.
    pub fn string(&self, tag: Tag) -> Result<Option<String>> {
        Ok(self
            .value_bytes(tag)?
            .map(|bytes| trim_padding(&decode_text(bytes)).to_string()))
    }

    /// The data offset of an element, corrected by the edits of the current batch.
    fn current_data_offset(&self, field: &Field) -> Result<usize> {
        let correction = self.get_offset_change(field);
        usize::try_from(field.data_offset as isize + correction)
            .ok()
            .context(OutOfRangeSnafu {
                position: field.data_offset,
                length: field.length as usize,
                buffer_len: self.buffer.len(),
            })
    }

    /// Retrieve the directory entry of the element with the given tag.
    pub fn field(&self, tag: Tag) -> Option<&Field> {
        self.fields.get(&tag)
    }

    /// Iterate over all directory entries, in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// The encoded record.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Take the encoded record out of the view.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    /// The default byte order of the record's length fields.
    pub fn byte_order(&self) -> Endianness {
        self.options.byte_order
    }

    /// The size changes logged in the current batch, in order of edit.
    pub fn offset_changes(&self) -> &[OffsetChange] {
        &self.offset_changes
    }

    /// The cumulative size changes built by the last call to
    /// [`finish_changes`](RecordView::finish_changes),
    /// in ascending order of offset.
    pub fn total_offset_changes(&self) -> &[OffsetChange] {
        &self.total_offset_changes
    }

    /// Whether there are edits not yet applied to the directory.
    pub fn has_pending_changes(&self) -> bool {
        !self.offset_changes.is_empty()
    }
}

/// Shift a directory position by a correction.
///
/// Corrections only sum the size changes of elements placed before this one,
/// so the result can only fall below zero
/// when the directory was inconsistent with the buffer to begin with.
/// Such positions are clamped to the start of the record.
fn shift_saturating(tag: Tag, position: usize, correction: isize) -> usize {
    let shifted = position as isize + correction;
    debug_assert!(
        shifted >= 0,
        "inconsistent directory: element {} shifted to {}",
        tag,
        shifted
    );
    match usize::try_from(shifted) {
        Ok(position) => position,
        Err(_) => {
            warn!(
                "Offset correction {} for element {} goes past the start of the record",
                correction, tag
            );
            0
        }
    }
}
