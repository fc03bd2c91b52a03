use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::error::ClientError;

/// One listed item: field name/value pairs in emission order.
pub type Record = Vec<(String, String)>;

/// Serializes a record set as a UTF-8 XML document: declaration, one root
/// element, one item element per record, each field as a like-named child.
pub fn encode(records: &[Record], root_tag: &str, item_tag: &str) -> Result<String, ClientError> {
    for tag in [root_tag, item_tag] {
        if !is_valid_tag_name(tag) {
            return Err(ClientError::malformed(format!("invalid element name: {tag:?}")));
        }
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| ClientError::malformed(e.to_string()))?;
    writer
        .write_event(Event::Start(BytesStart::new(root_tag)))
        .map_err(|e| ClientError::malformed(e.to_string()))?;

    for record in records {
        writer
            .write_event(Event::Start(BytesStart::new(item_tag)))
            .map_err(|e| ClientError::malformed(e.to_string()))?;

        for (field, value) in record {
            if !is_valid_tag_name(field) {
                return Err(ClientError::malformed(format!(
                    "invalid element name: {field:?}"
                )));
            }

            if value.is_empty() {
                writer
                    .write_event(Event::Empty(BytesStart::new(field.as_str())))
                    .map_err(|e| ClientError::malformed(e.to_string()))?;
            } else {
                writer
                    .write_event(Event::Start(BytesStart::new(field.as_str())))
                    .map_err(|e| ClientError::malformed(e.to_string()))?;
                writer
                    .write_event(Event::Text(BytesText::new(value)))
                    .map_err(|e| ClientError::malformed(e.to_string()))?;
                writer
                    .write_event(Event::End(BytesEnd::new(field.as_str())))
                    .map_err(|e| ClientError::malformed(e.to_string()))?;
            }
        }

        writer
            .write_event(Event::End(BytesEnd::new(item_tag)))
            .map_err(|e| ClientError::malformed(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(root_tag)))
        .map_err(|e| ClientError::malformed(e.to_string()))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ClientError::malformed(e.to_string()))
}

/// Parses a document produced by [`encode`] back into its record set,
/// preserving item and field order. Anything that is not well-formed XML with
/// the expected root and item tags is rejected.
pub fn decode(xml: &str, root_tag: &str, item_tag: &str) -> Result<Vec<Record>, ClientError> {
    let mut reader = Reader::from_str(xml);

    let mut records: Vec<Record> = Vec::new();
    let mut current: Record = Vec::new();
    let mut field: Option<(String, String)> = None;
    let mut seen_root = false;
    // 0 = outside root, 1 = in root, 2 = in item, 3 = in field
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Err(e) => return Err(ClientError::malformed(e.to_string())),
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match depth {
                    0 => {
                        if seen_root || name != root_tag {
                            return Err(ClientError::malformed(format!(
                                "expected root element <{root_tag}>, found <{name}>"
                            )));
                        }
                        seen_root = true;
                        depth = 1;
                    }
                    1 => {
                        if name != item_tag {
                            return Err(ClientError::malformed(format!(
                                "expected item element <{item_tag}>, found <{name}>"
                            )));
                        }
                        current = Vec::new();
                        depth = 2;
                    }
                    2 => {
                        field = Some((name, String::new()));
                        depth = 3;
                    }
                    _ => {
                        return Err(ClientError::malformed(format!(
                            "unexpected nested element <{name}>"
                        )));
                    }
                }
            }
            Ok(Event::Empty(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                match depth {
                    0 => {
                        if seen_root || name != root_tag {
                            return Err(ClientError::malformed(format!(
                                "expected root element <{root_tag}>, found <{name}>"
                            )));
                        }
                        seen_root = true;
                    }
                    1 => {
                        if name != item_tag {
                            return Err(ClientError::malformed(format!(
                                "expected item element <{item_tag}>, found <{name}>"
                            )));
                        }
                        records.push(Vec::new());
                    }
                    2 => current.push((name, String::new())),
                    _ => {
                        return Err(ClientError::malformed(format!(
                            "unexpected nested element <{name}>"
                        )));
                    }
                }
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| ClientError::malformed(e.to_string()))?;
                if depth == 3 {
                    if let Some((_, buffer)) = field.as_mut() {
                        buffer.push_str(&value);
                    }
                } else if !value.trim().is_empty() {
                    return Err(ClientError::malformed("unexpected text content"));
                }
            }
            Ok(Event::CData(data)) => {
                if depth == 3 {
                    if let Some((_, buffer)) = field.as_mut() {
                        buffer.push_str(&String::from_utf8_lossy(&data));
                    }
                } else {
                    return Err(ClientError::malformed("unexpected CDATA content"));
                }
            }
            Ok(Event::End(_)) => match depth {
                3 => {
                    if let Some(done) = field.take() {
                        current.push(done);
                    }
                    depth = 2;
                }
                2 => {
                    records.push(std::mem::take(&mut current));
                    depth = 1;
                }
                1 => depth = 0,
                _ => return Err(ClientError::malformed("unbalanced end tag")),
            },
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions
            Ok(_) => {}
        }
    }

    if !seen_root {
        return Err(ClientError::malformed(format!(
            "missing root element <{root_tag}>"
        )));
    }
    if depth != 0 {
        return Err(ClientError::malformed("document ended with open elements"));
    }

    Ok(records)
}

/// The supported counting operation: structured decode, then length.
pub fn count_items(xml: &str, root_tag: &str, item_tag: &str) -> Result<usize, ClientError> {
    Ok(decode(xml, root_tag, item_tag)?.len())
}

fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}
