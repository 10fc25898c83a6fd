//! Normalization of text values according to DICOM padding rules.
//!
//! Insignificant spaces are stripped per value representation:
//!
//! - `AE`, `CS`, `DS`, `IS`, `LO`, `SH`: leading and trailing spaces
//! - `DT`, `LT`, `PN`, `ST`, `TM`, `UT`: trailing spaces
//!
//! The value is then padded to an even length,
//! with a NUL byte for `UI` and a space for everything else.

use dicom_splice_core::VR;

/// Normalize a text value so that it can be written
/// into a data element of the given value representation.
pub fn normalize_text(vr: VR, text: &str) -> String {
    let stripped = match vr {
        VR::AE | VR::CS | VR::DS | VR::IS | VR::LO | VR::SH => text.trim_matches(' '),
        VR::DT | VR::LT | VR::PN | VR::ST | VR::TM | VR::UT => text.trim_end_matches(' '),
        _ => text,
    };
    let mut out = String::with_capacity(stripped.len() + 1);
    out.push_str(stripped);
    if encoded_len(&out) % 2 == 1 {
        out.push(pad_char(vr));
    }
    out
}

/// The character used to pad a value of this representation to even length.
pub fn pad_char(vr: VR) -> char {
    if vr == VR::UI {
        '\0'
    } else {
        ' '
    }
}

/// Trim the padding off the end of a text value read from a record.
pub(crate) fn trim_padding(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == ' ' || c == '\0')
}

// one byte per character, as written by `write_span`
fn encoded_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(VR::CS, " ORIGINAL ", "ORIGINAL")]
    #[case(VR::DS, " 1.5", "1.5 ")]
    #[case(VR::PN, "Doe^John  ", "Doe^John")]
    #[case(VR::PN, " Doe^Jane", " Doe^Jane ")]
    #[case(VR::UI, "1.2.840.10008.1.2", "1.2.840.10008.1.2\0")]
    #[case(VR::DA, "20240101", "20240101")]
    #[case(VR::LO, "Müller", "Müller")]
    #[case(VR::SH, "", "")]
    fn normalize(#[case] vr: VR, #[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_text(vr, input), expected);
    }

    #[test]
    fn trim() {
        assert_eq!(trim_padding("1.2.3\0"), "1.2.3");
        assert_eq!(trim_padding("ABC "), "ABC");
        assert_eq!(trim_padding(" ABC"), " ABC");
    }
}
