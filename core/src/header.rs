//! This module contains the data types needed to classify DICOM data elements
//! for in-place editing:
//! the attribute tag and the value representation,
//! along with the static table deciding
//! whether a value is text and how wide its length prefix is.

use crate::error::{MalformedTagSnafu, Result, UnknownVrSnafu};
use snafu::{ensure, OptionExt};
use std::fmt;
use std::str::{from_utf8, FromStr};

/// An enum type for a DICOM value representation.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Very Long
    OV,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Signed Very Long
    SV,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier or Universal Resource Locator (URI/URL)
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
    /// Unsigned Very Long
    UV,
}

/// The width of the length field
/// which precedes a data element value.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum LengthWidth {
    /// A 2-byte length, as in most explicit VR data elements.
    Short,
    /// A 4-byte length, as in implicit VR data elements
    /// and explicit VR data elements with an extended length field.
    Long,
}

impl LengthWidth {
    /// The number of bytes occupied by the length field.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            LengthWidth::Short => 2,
            LengthWidth::Long => 4,
        }
    }

    /// The largest value length representable in this width.
    #[inline]
    pub const fn max_length(self) -> u32 {
        match self {
            LengthWidth::Short => u16::MAX as u32,
            LengthWidth::Long => u32::MAX,
        }
    }
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OV => "OV",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            SV => "SV",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
            UV => "UV",
        }
    }

    /// Check whether values of this representation are text.
    ///
    /// Returns `None` for `UN`,
    /// whose content may be either text or binary data.
    /// Callers deciding whether a value can be edited as a string
    /// should treat `None` as _not_ a string.
    pub const fn is_string(self) -> Option<bool> {
        use VR::*;
        match self {
            AE | AS | CS | DA | DS | DT | IS | LO | LT | PN | SH | ST | TM | UC | UI | UR | UT => {
                Some(true)
            }
            AT | FL | FD | OB | OD | OF | OL | OV | OW | SL | SQ | SS | SV | UL | US | UV => {
                Some(false)
            }
            UN => None,
        }
    }

    /// Retrieve the width of the length field
    /// of an explicit VR data element with this representation.
    ///
    /// Only `OB`, `OF`, `OW`, `SQ`, `UN` and `UT` have a 4-byte length field,
    /// as in the original edition of the explicit VR encoding.
    /// See [`standard_length_prefix_width`](VR::standard_length_prefix_width)
    /// for the representations added to the standard since.
    pub const fn length_prefix_width(self) -> LengthWidth {
        use VR::*;
        match self {
            OB | OF | OW | SQ | UN | UT => LengthWidth::Long,
            _ => LengthWidth::Short,
        }
    }

    /// Retrieve the width of the length field
    /// of an explicit VR data element with this representation,
    /// following the current edition of PS3.5,
    /// where `OD`, `OL`, `OV`, `SV`, `UC`, `UR` and `UV`
    /// also have a 4-byte length field.
    pub const fn standard_length_prefix_width(self) -> LengthWidth {
        use VR::*;
        match self {
            OD | OL | OV | SV | UC | UR | UV => LengthWidth::Long,
            _ => self.length_prefix_width(),
        }
    }

    /// Retrieve a copy of this VR's byte representation.
    /// The function returns two alphabetic characters in upper case.
    pub fn to_bytes(self) -> [u8; 2] {
        let bytes = self.to_string().as_bytes();
        [bytes[0], bytes[1]]
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two UTF-8 encoded alphabetic characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OV" => Ok(OV),
            "OW" => Ok(OW),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "SV" => Ok(SV),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            "UV" => Ok(UV),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

fn parse_vr(vr: &str) -> Result<VR> {
    VR::from_str(vr).ok().context(UnknownVrSnafu { vr })
}

/// Check whether the value representation with the given code is text.
///
/// Returns `Ok(None)` for `UN`.
/// Fails with [`UnknownVr`](crate::Error::UnknownVr)
/// if the code is not in the table.
pub fn is_string_vr(vr: &str) -> Result<Option<bool>> {
    parse_vr(vr).map(VR::is_string)
}

/// Retrieve the length field width
/// for the value representation with the given code.
///
/// Fails with [`UnknownVr`](crate::Error::UnknownVr)
/// if the code is not in the table.
pub fn length_prefix_width(vr: &str) -> Result<LengthWidth> {
    parse_vr(vr).map(VR::length_prefix_width)
}

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for DICOM data element tags.
///
/// Tags are usually written as 8 hexadecimal digits,
/// `GGGGEEEE`,
/// which is the only form accepted by [`FromStr`].
/// The `xGGGGEEEE` keys used by JavaScript DICOM parsers
/// are read with [`Tag::from_js_key`].
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// Check whether this is a private tag,
    /// which is the case when its group number is odd.
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 & 1 == 1
    }

    /// Render the tag in its canonical form of 8 upper case hexadecimal digits.
    pub fn to_hex_string(self) -> String {
        format!("{:04X}{:04X}", self.0, self.1)
    }
}

/// Validate that a textual tag is made of exactly 8 hexadecimal digits.
fn canonical_digits(tag: &str) -> Result<&str> {
    ensure!(
        tag.len() == 8 && tag.bytes().all(|b| b.is_ascii_hexdigit()),
        MalformedTagSnafu { tag }
    );
    Ok(tag)
}

impl Tag {
    /// Parse a tag from a data set key of the form `xGGGGEEEE`,
    /// as used by JavaScript DICOM parsers.
    pub fn from_js_key(key: &str) -> Result<Self> {
        match key.strip_prefix('x') {
            Some(digits) => digits.parse().ok().context(MalformedTagSnafu { tag: key }),
            None => MalformedTagSnafu { tag: key }.fail(),
        }
    }
}

impl FromStr for Tag {
    type Err = crate::error::Error;

    fn from_str(tag: &str) -> Result<Self> {
        let digits = canonical_digits(tag)?;
        let parse = |part: &str| u16::from_str_radix(part, 16).ok().context(MalformedTagSnafu { tag });
        Ok(Tag(parse(&digits[..4])?, parse(&digits[4..])?))
    }
}

/// Check whether the tag in the given text is private.
///
/// This only looks at the fourth hexadecimal digit,
/// the least significant digit of the group number,
/// and tests its parity.
/// Fails with [`MalformedTag`](crate::Error::MalformedTag)
/// if the text is not an 8-hex-digit tag.
pub fn is_private_tag(tag: &str) -> Result<bool> {
    let digits = canonical_digits(tag)?;
    let last_group_digit = digits.as_bytes()[3];
    let value = (last_group_digit as char)
        .to_digit(16)
        .context(MalformedTagSnafu { tag })?;
    Ok(value % 2 == 1)
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}
