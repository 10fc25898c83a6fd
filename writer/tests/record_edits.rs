//! Edits on whole records,
//! checked against a fresh encoding of the expected data set.

use dicom_splice::{
    write_span, Endianness, Error, Field, FieldParser, LengthWidth, OffsetChange, RecordView,
    Tag, VR,
};
use matches::assert_matches;
use rstest::rstest;

const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
const MODALITY: Tag = Tag(0x0008, 0x0060);
const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
const PRIVATE_TEXT: Tag = Tag(0x0029, 0x1010);
const STUDY_COMMENTS: Tag = Tag(0x0032, 0x4000);
const ROWS: Tag = Tag(0x0028, 0x0010);

#[derive(Debug, Copy, Clone)]
enum Syntax {
    Explicit(Endianness),
    Implicit(Endianness),
}

/// Encode a flat data set, returning its bytes and its directory.
fn encode(syntax: Syntax, elements: &[(Tag, VR, &[u8])]) -> (Vec<u8>, Vec<Field>) {
    let mut buffer = Vec::new();
    let mut fields = Vec::new();
    for &(tag, vr, value) in elements {
        let offset = buffer.len();
        let len = value.len();
        let field = match syntax {
            Syntax::Explicit(Endianness::Little) => {
                buffer.extend_from_slice(&tag.group().to_le_bytes());
                buffer.extend_from_slice(&tag.element().to_le_bytes());
                buffer.extend_from_slice(&vr.to_bytes());
                match vr.length_prefix_width() {
                    LengthWidth::Short => buffer.extend_from_slice(&(len as u16).to_le_bytes()),
                    LengthWidth::Long => {
                        buffer.extend_from_slice(&[0, 0]);
                        buffer.extend_from_slice(&(len as u32).to_le_bytes());
                    }
                }
                FieldParser::explicit(Endianness::Little)
            }
            Syntax::Explicit(Endianness::Big) => {
                buffer.extend_from_slice(&tag.group().to_be_bytes());
                buffer.extend_from_slice(&tag.element().to_be_bytes());
                buffer.extend_from_slice(&vr.to_bytes());
                match vr.length_prefix_width() {
                    LengthWidth::Short => buffer.extend_from_slice(&(len as u16).to_be_bytes()),
                    LengthWidth::Long => {
                        buffer.extend_from_slice(&[0, 0]);
                        buffer.extend_from_slice(&(len as u32).to_be_bytes());
                    }
                }
                FieldParser::explicit(Endianness::Big)
            }
            Syntax::Implicit(Endianness::Little) => {
                buffer.extend_from_slice(&tag.group().to_le_bytes());
                buffer.extend_from_slice(&tag.element().to_le_bytes());
                buffer.extend_from_slice(&(len as u32).to_le_bytes());
                FieldParser::implicit(Endianness::Little)
            }
            Syntax::Implicit(Endianness::Big) => {
                buffer.extend_from_slice(&tag.group().to_be_bytes());
                buffer.extend_from_slice(&tag.element().to_be_bytes());
                buffer.extend_from_slice(&(len as u32).to_be_bytes());
                FieldParser::implicit(Endianness::Big)
            }
        };
        let data_offset = buffer.len();
        buffer.extend_from_slice(value);
        fields.push(Field::new(tag, vr, len as u32, offset, data_offset).with_parser(field));
    }
    (buffer, fields)
}

fn sample(syntax: Syntax, name: &[u8], comments: &[u8]) -> (Vec<u8>, Vec<Field>) {
    encode(
        syntax,
        &[
            (STUDY_DATE, VR::DA, b"20240101"),
            (MODALITY, VR::CS, b"MR"),
            (PATIENT_NAME, VR::PN, name),
            (PATIENT_ID, VR::LO, b"ID0001"),
            (ROWS, VR::US, &[0x00, 0x02]),
            (PRIVATE_TEXT, VR::UN, b"VENDOR"),
            (STUDY_COMMENTS, VR::UT, comments),
        ],
    )
}

fn open(syntax: Syntax, name: &[u8], comments: &[u8]) -> RecordView {
    let (buffer, fields) = sample(syntax, name, comments);
    RecordView::new(buffer, fields)
}

fn sorted_fields(record: &RecordView) -> Vec<Field> {
    let mut fields: Vec<Field> = record.fields().copied().collect();
    fields.sort_by_key(|f| f.offset);
    fields
}

/// Check that the record is byte for byte
/// the encoding of the expected data set.
fn assert_encodes(record: &RecordView, expected: (Vec<u8>, Vec<Field>)) {
    let (buffer, fields) = expected;
    assert_eq!(record.buffer(), &buffer[..]);
    assert_eq!(sorted_fields(record), fields);
}

#[rstest]
#[case(Syntax::Explicit(Endianness::Little))]
#[case(Syntax::Explicit(Endianness::Big))]
#[case(Syntax::Implicit(Endianness::Little))]
#[case(Syntax::Implicit(Endianness::Big))]
fn growing_a_value(#[case] syntax: Syntax) {
    let mut record = open(syntax, b"ABCD", b"NONE");
    let before = sorted_fields(&record);

    assert!(record.change_string(PATIENT_NAME, "ABCDEFGH").unwrap());
    record.finish_changes();

    assert_encodes(&record, sample(syntax, b"ABCDEFGH", b"NONE"));
    assert_eq!(record.field(PATIENT_NAME).unwrap().length, 8);
    for (old, new) in before.iter().zip(sorted_fields(&record)) {
        let shift = if old.offset > before[2].offset { 4 } else { 0 };
        assert_eq!(new.data_offset, old.data_offset + shift, "{}", old.tag);
    }
}

#[rstest]
#[case(Syntax::Explicit(Endianness::Little))]
#[case(Syntax::Explicit(Endianness::Big))]
#[case(Syntax::Implicit(Endianness::Little))]
fn shrinking_a_value(#[case] syntax: Syntax) {
    let mut record = open(syntax, b"ABCDEFGH", b"NONE");
    let before_id = *record.field(PATIENT_ID).unwrap();

    assert!(record.change_string(PATIENT_NAME, "AB").unwrap());
    record.finish_changes();

    assert_encodes(&record, sample(syntax, b"AB", b"NONE"));
    assert_eq!(
        record.field(PATIENT_ID).unwrap().data_offset,
        before_id.data_offset - 6
    );
}

#[test]
fn same_length_changes_no_positions() {
    let syntax = Syntax::Explicit(Endianness::Little);
    let mut record = open(syntax, b"ABCD", b"NONE");
    let before = sorted_fields(&record);

    assert!(record.change_string(PATIENT_NAME, "WXYZ").unwrap());
    record.finish_changes();

    let after = sorted_fields(&record);
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.offset, new.offset);
        assert_eq!(old.data_offset, new.data_offset);
    }
    assert!(record
        .total_offset_changes()
        .iter()
        .all(|change| change.change == 0));
    assert_encodes(&record, sample(syntax, b"WXYZ", b"NONE"));
}

#[test]
fn finishing_twice_is_harmless() {
    let syntax = Syntax::Explicit(Endianness::Little);
    let mut record = open(syntax, b"ABCD", b"NONE");
    record.change_string(PATIENT_NAME, "ABCDEF").unwrap();
    record.finish_changes();
    let once = sorted_fields(&record);

    record.finish_changes();
    assert_eq!(sorted_fields(&record), once);
    assert!(record.total_offset_changes().is_empty());
    assert_encodes(&record, sample(syntax, b"ABCDEF", b"NONE"));
}

#[test]
fn many_edits_in_one_batch() {
    let syntax = Syntax::Explicit(Endianness::Little);
    let mut record = open(syntax, b"ABCD", b"NONE");

    // later elements first, then earlier ones, then the same one again
    assert!(record.change_string(STUDY_COMMENTS, "NO COMMENTS").unwrap());
    assert!(record.change_string(PATIENT_ID, "ID").unwrap());
    assert!(record.change_string(MODALITY, "CT").unwrap());
    assert!(record.change_string(PATIENT_NAME, "Doe^John").unwrap());
    assert!(record.change_string(PATIENT_ID, "PATIENT-0042").unwrap());
    assert_eq!(record.offset_changes().len(), 5);

    // reads see the pending edits before the batch is finished
    assert_eq!(
        record.string(PATIENT_ID).unwrap().as_deref(),
        Some("PATIENT-0042")
    );
    assert_eq!(
        record.string(STUDY_COMMENTS).unwrap().as_deref(),
        Some("NO COMMENTS")
    );

    record.finish_changes();

    let expected = encode(
        syntax,
        &[
            (STUDY_DATE, VR::DA, b"20240101"),
            (MODALITY, VR::CS, b"CT"),
            (PATIENT_NAME, VR::PN, b"Doe^John"),
            (PATIENT_ID, VR::LO, b"PATIENT-0042"),
            (ROWS, VR::US, &[0x00, 0x02]),
            (PRIVATE_TEXT, VR::UN, b"VENDOR"),
            (STUDY_COMMENTS, VR::UT, b"NO COMMENTS"),
        ],
    );
    assert_encodes(&record, expected);
    assert_eq!(
        record.total_offset_changes().last().map(|c| c.change),
        Some(4 + 6 + 7)
    );
}

#[test]
fn consecutive_batches() {
    let syntax = Syntax::Explicit(Endianness::Big);
    let mut record = open(syntax, b"ABCD", b"NONE");

    record.change_string(PATIENT_NAME, "ABCDEFGH").unwrap();
    record.finish_changes();
    record.change_string(STUDY_COMMENTS, "NEW COMMENTS").unwrap();
    record.change_string(PATIENT_NAME, "AB").unwrap();
    assert_eq!(
        record.offset_changes(),
        &[
            OffsetChange {
                offset: record.field(STUDY_COMMENTS).unwrap().data_offset,
                change: 8,
            },
            OffsetChange {
                offset: record.field(PATIENT_NAME).unwrap().data_offset,
                change: -6,
            },
        ]
    );
    record.finish_changes();

    assert_encodes(&record, sample(syntax, b"AB", b"NEW COMMENTS"));
}

#[test]
fn inapplicable_edits_change_nothing() {
    let syntax = Syntax::Explicit(Endianness::Little);
    let mut record = open(syntax, b"ABCD", b"NONE");
    let before = record.buffer().to_vec();

    // binary VR
    assert!(!record.change_string(ROWS, "1024").unwrap());
    // VR of unknown nature
    assert!(!record.change_string(PRIVATE_TEXT, "OTHER!").unwrap());
    // absent element
    assert!(!record.change_string(Tag(0x0020, 0x000D), "1.2.3").unwrap());

    assert_eq!(record.buffer(), &before[..]);
    assert!(!record.has_pending_changes());
    record.finish_changes();
    assert_encodes(&record, sample(syntax, b"ABCD", b"NONE"));
}

#[test]
fn writing_past_the_end_fails() {
    let (buffer, _) = sample(Syntax::Explicit(Endianness::Little), b"ABCD", b"NONE");
    let len = buffer.len();
    assert_matches!(
        write_span(&buffer, len - 2, 4, "ABCD"),
        Err(Error::OutOfRange { .. })
    );

    // a directory which does not match the buffer is caught as well
    let mut record = RecordView::new(
        buffer.clone(),
        vec![Field::new(PATIENT_NAME, VR::PN, 8, len - 12, len - 4)],
    );
    assert_matches!(
        record.change_string(PATIENT_NAME, "ABCD"),
        Err(Error::OutOfRange { .. })
    );
    assert_eq!(record.buffer(), &buffer[..]);
}

#[test]
fn classification_helpers() {
    assert_eq!(dicom_splice::is_string_vr("PN").unwrap(), Some(true));
    assert_eq!(dicom_splice::is_string_vr("SQ").unwrap(), Some(false));
    assert_eq!(dicom_splice::is_string_vr("UN").unwrap(), None);
    assert!(dicom_splice::is_private_tag("00291010").unwrap());
    assert!(!dicom_splice::is_private_tag("00100010").unwrap());
    assert_matches!(
        dicom_splice::is_private_tag("x00190010"),
        Err(dicom_splice_core::Error::MalformedTag { .. })
    );
}
