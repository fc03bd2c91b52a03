use anyhow::Result;
use docstore_client::{error::ClientError, xml};

fn record(pairs: &[(&str, &str)]) -> xml::Record {
    pairs
        .iter()
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .collect()
}

/// Test: Decoding an encoded record set returns the original records
#[test]
fn test_round_trip_preserves_records_and_order() -> Result<()> {
    let records = vec![
        record(&[
            ("id", "5bfbb1a0471dd0fc16ada146"),
            ("name", "Document"),
            ("color", "#C03B22"),
        ]),
        // Field order differs per record on purpose
        record(&[("name", "foo"), ("id", "6912059adeb0c2aa4cfc8ec4")]),
    ];

    let encoded = xml::encode(&records, "templates", "template")?;
    let decoded = xml::decode(&encoded, "templates", "template")?;

    assert_eq!(decoded, records);

    Ok(())
}

/// Test: Encoded documents carry the UTF-8 declaration and expected tags
#[test]
fn test_encoded_document_shape() -> Result<()> {
    let records = vec![record(&[("id", "abc123")])];

    let encoded = xml::encode(&records, "entities", "entity")?;

    assert!(encoded.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(encoded.contains("<entities>"));
    assert!(encoded.contains("<entity>"));
    assert!(encoded.contains("<id>abc123</id>"));

    Ok(())
}

/// Test: Reserved XML characters survive a round trip
#[test]
fn test_round_trip_escapes_reserved_characters() -> Result<()> {
    let records = vec![record(&[("title", "Smith & Jones <v2> \"draft\"")])];

    let encoded = xml::encode(&records, "entities", "entity")?;
    assert!(!encoded.contains("Smith & Jones <v2>"));

    let decoded = xml::decode(&encoded, "entities", "entity")?;
    assert_eq!(decoded, records);

    Ok(())
}

/// Test: Empty record sets and empty field values round-trip
#[test]
fn test_round_trip_empty_cases() -> Result<()> {
    let empty: Vec<xml::Record> = Vec::new();
    let encoded = xml::encode(&empty, "templates", "template")?;
    assert_eq!(xml::decode(&encoded, "templates", "template")?, empty);

    let records = vec![record(&[("id", "abc"), ("name", "")])];
    let encoded = xml::encode(&records, "templates", "template")?;
    assert_eq!(xml::decode(&encoded, "templates", "template")?, records);

    Ok(())
}

/// Test: Records with no fields round-trip as empty items
#[test]
fn test_round_trip_fieldless_record() -> Result<()> {
    let records = vec![record(&[]), record(&[("id", "x1")])];

    let encoded = xml::encode(&records, "entities", "entity")?;
    let decoded = xml::decode(&encoded, "entities", "entity")?;

    assert_eq!(decoded, records);

    Ok(())
}

/// Test: Non-XML input is rejected as a malformed document
#[test]
fn test_decode_rejects_invalid_xml() {
    let result = xml::decode("definitely not xml <", "templates", "template");

    assert!(matches!(
        result,
        Err(ClientError::MalformedDocument { .. })
    ));
}

/// Test: A document with the wrong root tag is rejected
#[test]
fn test_decode_rejects_wrong_root_tag() {
    let doc = r#"<?xml version="1.0" encoding="UTF-8"?><items><template><id>1</id></template></items>"#;

    let result = xml::decode(doc, "templates", "template");

    assert!(matches!(
        result,
        Err(ClientError::MalformedDocument { .. })
    ));
}

/// Test: A document with unexpected item tags is rejected
#[test]
fn test_decode_rejects_wrong_item_tag() {
    let doc =
        r#"<?xml version="1.0" encoding="UTF-8"?><templates><row><id>1</id></row></templates>"#;

    let result = xml::decode(doc, "templates", "template");

    assert!(matches!(
        result,
        Err(ClientError::MalformedDocument { .. })
    ));
}

/// Test: Truncated documents are rejected
#[test]
fn test_decode_rejects_truncated_document() {
    let doc = r#"<?xml version="1.0" encoding="UTF-8"?><templates><template><id>1</id>"#;

    let result = xml::decode(doc, "templates", "template");

    assert!(matches!(
        result,
        Err(ClientError::MalformedDocument { .. })
    ));
}

/// Test: Field names that cannot form XML element names fail encoding
#[test]
fn test_encode_rejects_invalid_field_name() {
    let records = vec![record(&[("bad name", "value")])];

    let result = xml::encode(&records, "templates", "template");

    assert!(matches!(
        result,
        Err(ClientError::MalformedDocument { .. })
    ));
}

/// Test: Counting goes through the structured decode path
#[test]
fn test_count_items_matches_decoded_length() -> Result<()> {
    let records = vec![
        record(&[("id", "a")]),
        record(&[("id", "b")]),
        record(&[("id", "c")]),
    ];

    let encoded = xml::encode(&records, "entities", "entity")?;

    assert_eq!(xml::count_items(&encoded, "entities", "entity")?, 3);

    // A value mentioning the item tag must not inflate the count
    let tricky = vec![record(&[("note", "one <entity> two")])];
    let encoded = xml::encode(&tricky, "entities", "entity")?;
    assert_eq!(xml::count_items(&encoded, "entities", "entity")?, 1);

    Ok(())
}
