//! IPTC decoding tests.

use jpeg_meta::format::{IptcRecord, IptcRecords};
use jpeg_meta::{decode_iptc, ByteView, IptcError, IptcValue, MetadataExtractor, MetadataResult};

use super::test_utils::{IptcBuilder, JpegBuilder};

fn decode(payload: Vec<u8>) -> (MetadataResult, Result<(), IptcError>) {
    let mut result = MetadataResult::default();
    let status = decode_iptc(&ByteView::new(payload), &mut result);
    (result, status)
}

#[test]
fn test_photoshop_wrapper_is_skipped() {
    let payload = IptcBuilder::new()
        .record(2, 5, b"Pier")
        .record(2, 90, b"Brighton")
        .record(2, 101, b"United Kingdom")
        .build();

    let (result, status) = decode(payload);
    assert_eq!(status, Ok(()));
    assert_eq!(result.iptc["ObjectName"], IptcValue::Text("Pier".into()));
    assert_eq!(result.iptc["City"], IptcValue::Text("Brighton".into()));
    assert_eq!(result.iptc["Country"], IptcValue::Text("United Kingdom".into()));
}

#[test]
fn test_keywords_in_encounter_order() {
    let payload = IptcBuilder::new()
        .record(2, 25, b"pier")
        .record(2, 105, b"Seaside")
        .record(2, 25, b"sea")
        .record(2, 25, b"gulls")
        .build();

    let (result, _) = decode(payload);
    assert_eq!(
        result.iptc["Keywords"],
        IptcValue::List(vec!["pier".into(), "sea".into(), "gulls".into()])
    );
    assert_eq!(result.iptc["Keywords"].to_string(), "pier, sea, gulls");
}

#[test]
fn test_extended_length() {
    let payload = IptcBuilder::new()
        .bare()
        .raw(&[0x1C, 0x02, 0x78, 0x80, 0x01, 0x05])
        .raw(b"hello")
        .record(2, 105, b"After")
        .build();

    let (result, status) = decode(payload);
    assert_eq!(status, Ok(()));
    assert_eq!(result.iptc["Description"], IptcValue::Text("hello".into()));
    assert_eq!(result.iptc["Headline"], IptcValue::Text("After".into()));
}

#[test]
fn test_extended_length_wide_count() {
    let value = vec![b'x'; 300];
    let payload = IptcBuilder::new()
        .extended_record(2, 120, 4, &value)
        .build();

    let (result, status) = decode(payload);
    assert_eq!(status, Ok(()));
    assert_eq!(result.iptc["Description"].to_string().len(), 300);
}

#[test]
fn test_extended_length_overflow() {
    let payload = IptcBuilder::new()
        .bare()
        .record(2, 105, b"Kept")
        .raw(&[0x1C, 0x02, 0x78, 0x80, 0x09, 1, 0, 0, 0, 0, 0, 0, 0, 0])
        .build();

    let (result, status) = decode(payload);
    assert_eq!(status, Err(IptcError::LengthOverflow { offset: 9 }));
    assert_eq!(result.iptc.len(), 1);
}

#[test]
fn test_unnamed_datasets_skipped() {
    let payload = IptcBuilder::new()
        .record(1, 90, &[0x1B, 0x25, 0x47])
        .record(2, 0, &[0x00, 0x04])
        .record(2, 116, b"(c) 2021")
        .build();

    let (result, status) = decode(payload);
    assert_eq!(status, Ok(()));
    assert_eq!(result.iptc.len(), 1);
    assert_eq!(result.iptc["CopyrightNotice"], IptcValue::Text("(c) 2021".into()));
}

#[test]
fn test_latin1_text() {
    let payload = IptcBuilder::new().record(2, 80, b"Ren\xe9 Caf\xe9").build();
    let (result, _) = decode(payload);
    assert_eq!(result.iptc["By-line"], IptcValue::Text("René Café".into()));
}

#[test]
fn test_utf8_text() {
    let payload = IptcBuilder::new().record(2, 90, "Zürich".as_bytes()).build();
    let (result, _) = decode(payload);
    assert_eq!(result.iptc["City"], IptcValue::Text("Zürich".into()));
}

#[test]
fn test_no_records() {
    let (result, status) = decode(b"Photoshop 3.0\0".to_vec());
    assert_eq!(status, Ok(()));
    assert!(result.iptc.is_empty());
}

#[test]
fn test_truncated_header() {
    let payload = IptcBuilder::new()
        .bare()
        .record(2, 105, b"Kept")
        .raw(&[0x1C, 0x02, 0x19])
        .build();

    let (result, status) = decode(payload);
    assert_eq!(status, Err(IptcError::TruncatedRecord { offset: 9 }));
    assert_eq!(result.iptc["Headline"], IptcValue::Text("Kept".into()));
}

#[test]
fn test_garbage_between_records() {
    let payload = IptcBuilder::new()
        .bare()
        .record(2, 105, b"Kept")
        .raw(&[0x00, 0x00])
        .record(2, 25, b"lost")
        .build();

    let (result, status) = decode(payload);
    assert_eq!(
        status,
        Err(IptcError::InvalidMarker {
            offset: 9,
            found: 0x00
        })
    );
    assert!(!result.iptc.contains_key("Keywords"));
}

#[test]
fn test_record_iterator() {
    let payload = IptcBuilder::new()
        .bare()
        .record(2, 25, b"a")
        .record(1, 90, b"")
        .build();

    let records: Vec<_> = IptcRecords::new(&payload).collect();
    assert_eq!(
        records,
        vec![
            Ok(IptcRecord {
                record: 2,
                dataset: 25,
                value: b"a"
            }),
            Ok(IptcRecord {
                record: 1,
                dataset: 90,
                value: b""
            }),
        ]
    );
}

#[test]
fn test_record_iterator_stops_after_error() {
    let payload = [0x1C, 0x02, 0x19, 0x00, 0x10, b'x', 0x1C, 0x02, 0x19, 0x00, 0x00];
    let records: Vec<_> = IptcRecords::new(&payload).collect();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_err());
}

#[test]
fn test_iptc_errors_never_fail_extraction() {
    let cases: Vec<Vec<u8>> = vec![
        vec![0x1C, 0x02],
        vec![0x1C, 0x02, 0x19, 0xFF, 0xFF],
        vec![0x1C, 0x02, 0x19, 0x80, 0x04, 0xFF],
        vec![0x1C, 0x02, 0x19, 0x80, 0x09, 1, 0, 0, 0, 0, 0, 0, 0, 0],
    ];

    for payload in cases {
        let data = JpegBuilder::new().segment(0xED, &payload).build();
        let result = MetadataExtractor::new().parse(data).unwrap();
        assert!(result.iptc.is_empty());
    }
}
