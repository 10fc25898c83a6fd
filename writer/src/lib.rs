#![deny(unsafe_code, unstable_features)]
#![warn(missing_debug_implementations, missing_docs, unused_import_braces)]

//! This crate edits the text values of an already parsed DICOM record in place,
//! without encoding the record again.
//!
//! A [`RecordView`] pairs the encoded bytes of the record
//! with a directory of its data elements
//! (tag, VR, length, header and value positions),
//! as produced by a DICOM parser.
//! Replacing a value with [`change_string`](RecordView::change_string)
//! rewrites the value bytes and the element's length field,
//! growing or shrinking the buffer as needed.
//! Once a batch of edits is done,
//! [`finish_changes`](RecordView::finish_changes)
//! corrects the positions of all other elements in the directory.
//!
//! # Example
//!
//! ```
//! use dicom_splice::{Endianness, Field, FieldParser, RecordView, Tag, VR};
//!
//! // explicit VR little endian: (0010,0010) PN "ABCD", (0010,0020) LO "ID"
//! let buffer = vec![
//!     0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x04, 0x00, b'A', b'B', b'C', b'D',
//!     0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x02, 0x00, b'I', b'D',
//! ];
//! let parser = FieldParser::explicit(Endianness::Little);
//! let mut record = RecordView::new(buffer, vec![
//!     Field::new(Tag(0x0010, 0x0010), VR::PN, 4, 0, 8).with_parser(parser),
//!     Field::new(Tag(0x0010, 0x0020), VR::LO, 2, 12, 20).with_parser(parser),
//! ]);
//!
//! assert!(record.change_string(Tag(0x0010, 0x0010), "Doe^John")?);
//! record.finish_changes();
//!
//! assert_eq!(record.field(Tag(0x0010, 0x0020)).unwrap().data_offset, 24);
//! assert_eq!(record.string(Tag(0x0010, 0x0010))?.as_deref(), Some("Doe^John"));
//! # Result::<(), dicom_splice::Error>::Ok(())
//! ```
//!
//! The byte level primitives in [`write`]
//! may also be used directly,
//! for example to build writers for binary values.

pub mod error;
pub mod offsets;
pub mod options;
pub mod padding;
pub mod record;
pub mod write;

pub use byteordered::Endianness;
pub use dicom_splice_core::{is_private_tag, is_string_vr, LengthWidth, Tag, VR};

pub use error::{Error, Result};
pub use offsets::OffsetChange;
pub use options::EditOptions;
pub use record::{Field, FieldParser, RecordView};
pub use write::{write_span, write_span_bytes};
