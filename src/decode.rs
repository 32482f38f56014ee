//! Fail-soft decoding of CMS JSON into blocks.

use serde::Deserialize;
use serde_json::Value;

use crate::block::ContentBlock;
use crate::error::{Error, Result};

/// A block that could not be decoded and was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub blocks: Vec<ContentBlock>,
    pub skipped: Vec<Skipped>,
}

/// Decode a block array. `null` is an empty document; each element is
/// decoded on its own so a malformed block only drops itself.
pub fn decode_value(value: &Value) -> Result<Decoded> {
    let items = match value {
        Value::Null => return Ok(Decoded::default()),
        Value::Array(items) => items,
        other => {
            return Err(Error::NotBlockArray {
                found: type_name(other),
            });
        }
    };

    let mut decoded = Decoded::default();
    for (index, item) in items.iter().enumerate() {
        match ContentBlock::deserialize(item) {
            Ok(block) => decoded.blocks.push(block),
            Err(e) => {
                log::warn!("skipping content block {index}: {e}");
                decoded.skipped.push(Skipped {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(decoded)
}

/// Parse JSON text and decode the block array found at `pointer`
/// (RFC 6901, e.g. `/data/content`). The whole document is used when no
/// pointer is given.
pub fn decode_str(json: &str, pointer: Option<&str>) -> Result<Decoded> {
    let document: Value = serde_json::from_str(json)?;
    let selected = match pointer {
        None | Some("") => &document,
        Some(pointer) => match document.pointer(pointer) {
            Some(value) => value,
            None => {
                log::warn!("no value at {pointer:?}, rendering nothing");
                return Ok(Decoded::default());
            }
        },
    };
    decode_value(selected)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Span;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn null_and_empty_are_empty() {
        assert_eq!(decode_value(&Value::Null).unwrap(), Decoded::default());
        assert_eq!(decode_value(&json!([])).unwrap(), Decoded::default());
    }

    #[test]
    fn malformed_block_is_skipped() {
        let decoded = decode_value(&json!([
            { "type": "paragraph", "children": [{ "text": "kept" }] },
            { "type": "paragraph", "children": "not an array" },
            42,
            { "type": "heading", "level": "two", "children": [] },
            { "type": "paragraph", "children": [{ "text": "also kept" }] }
        ]))
        .unwrap();

        assert_eq!(
            decoded.blocks,
            vec![
                ContentBlock::paragraph(vec![Span::text("kept")]),
                ContentBlock::paragraph(vec![Span::text("also kept")]),
            ]
        );
        let indices: Vec<usize> = decoded.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn object_is_rejected() {
        let err = decode_value(&json!({ "data": [] })).unwrap_err();
        assert!(matches!(err, Error::NotBlockArray { found: "an object" }));
    }

    #[test]
    fn pointer_selects_nested_array() {
        let json = r#"{"data":{"content":[{"type":"paragraph","children":[{"text":"Hi"}]}]}}"#;
        let decoded = decode_str(json, Some("/data/content")).unwrap();
        assert_eq!(
            decoded.blocks,
            vec![ContentBlock::paragraph(vec![Span::text("Hi")])]
        );
    }

    #[test]
    fn missing_pointer_target_is_empty() {
        let decoded = decode_str(r#"{"data":null}"#, Some("/data/content")).unwrap();
        assert!(decoded.blocks.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(decode_str("[{", None), Err(Error::Json(_))));
    }
}
