#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]

//! This is the core library of DICOM-splice,
//! containing the classification rules needed
//! to edit the fields of an already parsed DICOM record in place.
//!
//! The current structure of this crate is as follows:
//!
//! - [`header`] comprises the DICOM attribute tag
//!   and the value representation table,
//!   which tells whether a value is textual
//!   and how wide its length prefix is.
//! - [`error`] contains crate-level error and result types.

pub mod error;
pub mod header;

pub use error::{Error, Result};
pub use header::{is_private_tag, is_string_vr, length_prefix_width, LengthWidth, Tag, VR};
