//! Options for editing a record.
use crate::record::{Field, RecordView};
use byteordered::Endianness;

/// A builder type for creating a [`RecordView`] with additional options.
///
/// # Example
///
/// ```
/// # use dicom_splice::EditOptions;
/// let record = EditOptions::new()
///     .big_endian()
///     .normalize_padding(true)
///     .open(vec![0; 16], vec![]);
/// assert!(!record.has_pending_changes());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct EditOptions {
    pub(crate) byte_order: Endianness,
    pub(crate) normalize_padding: bool,
    pub(crate) standard_length_widths: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        EditOptions {
            byte_order: Endianness::Little,
            normalize_padding: false,
            standard_length_widths: false,
        }
    }
}

impl EditOptions {
    /// Create the default options:
    /// little endian length fields and raw value writes.
    pub fn new() -> Self {
        EditOptions::default()
    }

    /// Set the byte order of the record,
    /// used for the length fields of data elements
    /// which do not declare their own.
    pub fn byte_order(mut self, byte_order: Endianness) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Write length fields in big endian by default.
    pub fn big_endian(self) -> Self {
        self.byte_order(Endianness::Big)
    }

    /// Write length fields in little endian by default.
    pub fn little_endian(self) -> Self {
        self.byte_order(Endianness::Little)
    }

    /// Set whether text values are stripped of insignificant spaces
    /// and padded to even length before they are written.
    ///
    /// Disabled by default, in which case text is written exactly as given.
    pub fn normalize_padding(mut self, option: bool) -> Self {
        self.normalize_padding = option;
        self
    }

    /// Set whether explicit VR elements with the representations
    /// `OD`, `OL`, `OV`, `SV`, `UC`, `UR` and `UV`
    /// have a 4-byte length field, as in the current edition of PS3.5.
    ///
    /// Disabled by default, in which case only `OB`, `OF`, `OW`, `SQ`, `UN` and `UT`
    /// have a 4-byte length field.
    pub fn standard_length_widths(mut self, option: bool) -> Self {
        self.standard_length_widths = option;
        self
    }

    /// Create a record view over the given buffer and field directory.
    pub fn open<I>(self, buffer: Vec<u8>, fields: I) -> RecordView
    where
        I: IntoIterator<Item = Field>,
    {
        RecordView::with_options(buffer, fields, self)
    }
}
