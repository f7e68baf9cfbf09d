//! Byte payloads stored in layers, and their hex text form.
//!
//! Layers keep bytes as JSON arrays of integers (`[10, 27]`); editors show
//! them as lowercase hex (`"0a1b"`). A `null` payload reads as empty.

use serde_json::Value;

use crate::error::ParseError;

/// Formats bytes as contiguous lowercase hex.
pub fn format_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Parses hex text into bytes. Odd-length input is rejected before decoding
/// so a trailing nibble is never dropped. Lengths and positions count
/// characters, not bytes.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, ParseError> {
    let len = text.chars().count();
    if len % 2 != 0 {
        return Err(ParseError::OddLength(len));
    }
    if let Some((index, c)) = text.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(ParseError::InvalidHex { c, index });
    }
    hex::decode(text).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => ParseError::InvalidHex { c, index },
        _ => ParseError::OddLength(len),
    })
}

/// Reads a JSON byte array. `null` is the empty payload.
pub fn bytes_from_value(value: &Value) -> Result<Vec<u8>, ParseError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or(ParseError::NotBytes)
            })
            .collect(),
        _ => Err(ParseError::NotBytes),
    }
}

pub fn bytes_to_value(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
}

/// Short space-separated hex preview, at most `max` bytes.
pub fn preview(bytes: &[u8], max: usize) -> String {
    let mut out = bytes
        .iter()
        .take(max)
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");
    if bytes.len() > max {
        out.push_str(&format!("... ({} more)", bytes.len() - max));
    }
    out
}

/// Hex text being edited for one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexDraft {
    original: Vec<u8>,
    text: String,
}

impl HexDraft {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            original: bytes.to_vec(),
            text: format_hex(bytes),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Commit stays disabled while the text has odd length.
    pub fn can_commit(&self) -> bool {
        self.text.chars().count() % 2 == 0
    }

    pub fn is_dirty(&self) -> bool {
        self.text != format_hex(&self.original)
    }

    /// `len=N` label of the payload as it was when the draft started.
    pub fn len_label(&self) -> String {
        format!("len={}", self.original.len())
    }

    pub fn commit(&self) -> Result<Vec<u8>, ParseError> {
        parse_hex(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_hex_matrix() {
        assert_eq!(parse_hex("0a1b").unwrap(), vec![10, 27]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_hex("FF").unwrap(), vec![255]);
        assert_eq!(parse_hex("0a1"), Err(ParseError::OddLength(3)));
        assert_eq!(
            parse_hex("0g"),
            Err(ParseError::InvalidHex { c: 'g', index: 1 })
        );
    }

    #[test]
    fn non_ascii_hex_counts_characters() {
        assert_eq!(parse_hex("é"), Err(ParseError::OddLength(1)));
        assert_eq!(
            parse_hex("éa"),
            Err(ParseError::InvalidHex { c: 'é', index: 0 })
        );
        assert_eq!(
            parse_hex("0aé1"),
            Err(ParseError::InvalidHex { c: 'é', index: 2 })
        );
        let mut draft = HexDraft::new(&[]);
        draft.set_text("é");
        assert!(!draft.can_commit());
        draft.set_text("éa");
        assert!(draft.can_commit());
        assert!(draft.commit().is_err());
    }

    #[test]
    fn format_hex_pads_each_byte() {
        assert_eq!(format_hex(&[0, 10, 255]), "000aff");
    }

    #[test]
    fn bytes_from_value_matrix() {
        assert_eq!(bytes_from_value(&json!(null)).unwrap(), Vec::<u8>::new());
        assert_eq!(bytes_from_value(&json!([1, 2, 255])).unwrap(), vec![1, 2, 255]);
        assert_eq!(bytes_from_value(&json!([256])), Err(ParseError::NotBytes));
        assert_eq!(bytes_from_value(&json!([-1])), Err(ParseError::NotBytes));
        assert_eq!(bytes_from_value(&json!("0a")), Err(ParseError::NotBytes));
        assert_eq!(bytes_to_value(&[10, 27]), json!([10, 27]));
    }

    #[test]
    fn preview_truncates() {
        assert_eq!(preview(&[], 4), "");
        assert_eq!(preview(&[1, 2], 4), "01 02");
        assert_eq!(preview(&[1, 2, 3, 4, 5, 6], 4), "01 02 03 04... (2 more)");
    }

    #[test]
    fn draft_gates_commit_on_even_length() {
        let mut draft = HexDraft::new(&[0x0a]);
        assert_eq!(draft.text(), "0a");
        assert!(draft.can_commit());
        assert!(!draft.is_dirty());
        draft.set_text("0a1");
        assert!(!draft.can_commit());
        assert!(draft.commit().is_err());
        draft.set_text("0a1b");
        assert!(draft.can_commit());
        assert!(draft.is_dirty());
        assert_eq!(draft.commit().unwrap(), vec![10, 27]);
        assert_eq!(draft.len_label(), "len=1");
    }
}
