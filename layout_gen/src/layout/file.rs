/* Schema document loading: byte-order detection, shape detection, validation */

use crate::error::GenError;
use layout_types::{MultiTypeDocument, SchemaDocument, SingleStructDocument};
use std::fs;
use std::path::Path;

/* Read, decode and parse one document. The file handle is closed on return. */
pub fn load_document(path: &Path) -> Result<SchemaDocument, GenError> {
    let bytes = fs::read(path).map_err(|e| GenError::schema_parse(path, e))?;
    let text = decode_document_bytes(&bytes).map_err(|e| GenError::schema_parse(path, e))?;
    parse_document(&text).map_err(|e| GenError::schema_parse(path, e))
}

/* Decode document bytes, honoring UTF-8, UTF-16 and UTF-32 byte-order marks */
pub fn decode_document_bytes(bytes: &[u8]) -> Result<String, String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return utf8(rest);
    }
    /* UTF-32 marks must be tested first: FF FE 00 00 also starts with the UTF-16 LE mark */
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE, 0x00, 0x00]) {
        return utf32(rest, u32::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0x00, 0x00, 0xFE, 0xFF]) {
        return utf32(rest, u32::from_be_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return utf16(rest, u16::from_be_bytes);
    }
    utf8(bytes)
}

fn utf8(bytes: &[u8]) -> Result<String, String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| format!("invalid UTF-8: {}", e))
}

fn utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err("truncated UTF-16 input".to_string());
    }
    let units = bytes.chunks_exact(2).map(|c| unit([c[0], c[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| format!("invalid UTF-16: {}", e))
}

fn utf32(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> Result<String, String> {
    if bytes.len() % 4 != 0 {
        return Err("truncated UTF-32 input".to_string());
    }
    bytes
        .chunks_exact(4)
        .map(|c| {
            let code = unit([c[0], c[1], c[2], c[3]]);
            char::from_u32(code).ok_or_else(|| format!("invalid UTF-32 code point 0x{:X}", code))
        })
        .collect()
}

/* Detect which of the two document shapes the text holds and validate it */
pub fn parse_document(text: &str) -> Result<SchemaDocument, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON: {}", e))?;

    let Some(object) = value.as_object() else {
        return Err("top-level JSON value must be an object".to_string());
    };

    let document = if object.contains_key("types") {
        let doc: MultiTypeDocument = serde_json::from_value(value).map_err(|e| e.to_string())?;
        SchemaDocument::Multi(doc)
    } else if object.contains_key("struct") && object.contains_key("fields") {
        let doc: SingleStructDocument =
            serde_json::from_value(value).map_err(|e| e.to_string())?;
        SchemaDocument::Single(doc)
    } else {
        return Err("JSON not recognized (needs 'types' or 'struct' with 'fields')".to_string());
    };

    document.validate().map_err(|e| e.to_string())?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"{"struct": "Point", "size": 8, "fields": [
        {"name": "x", "type": "float", "offset": 0, "size": 4},
        {"name": "y", "type": "float", "offset": 4, "size": 4}
    ]}"#;

    #[test]
    fn test_single_struct_shorthand() {
        let doc = parse_document(SINGLE).unwrap();
        let entries = doc.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "Point");
        assert_eq!(entries[0].1.as_struct().unwrap().fields.len(), 2);
    }

    #[test]
    fn test_unrecognized_shape() {
        let err = parse_document(r#"{"name": "Point"}"#).unwrap_err();
        assert!(err.contains("needs 'types'"), "{}", err);
        assert!(parse_document("[1, 2]").is_err());
        assert!(parse_document("{not json").is_err());
    }

    #[test]
    fn test_bad_type_name_in_multi_document() {
        let err = parse_document(r#"{"types": {"bad name": {"fields": []}}}"#).unwrap_err();
        assert!(err.contains("bad name"), "{}", err);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(SINGLE.as_bytes());
        let text = decode_document_bytes(&bytes).unwrap();
        assert!(text.starts_with('{'));
    }

    #[test]
    fn test_utf16_le_and_be() {
        let mut le = vec![0xFF, 0xFE];
        let mut be = vec![0xFE, 0xFF];
        for unit in SINGLE.encode_utf16() {
            le.extend_from_slice(&unit.to_le_bytes());
            be.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_document_bytes(&le).unwrap(), SINGLE);
        assert_eq!(decode_document_bytes(&be).unwrap(), SINGLE);
    }

    #[test]
    fn test_utf32_le() {
        let mut le = vec![0xFF, 0xFE, 0x00, 0x00];
        for c in SINGLE.chars() {
            le.extend_from_slice(&(c as u32).to_le_bytes());
        }
        assert_eq!(decode_document_bytes(&le).unwrap(), SINGLE);
    }

    #[test]
    fn test_truncated_utf16() {
        assert!(decode_document_bytes(&[0xFF, 0xFE, 0x7B]).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_document(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
