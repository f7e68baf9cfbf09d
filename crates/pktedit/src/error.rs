use pktedit_json_edit::EditError;
use thiserror::Error;

/// User-supplied text that does not parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("hex text has odd length {0}")]
    OddLength(usize),
    #[error("invalid hex character {c:?} at position {index}")]
    InvalidHex { c: char, index: usize },
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("value is not a byte sequence")]
    NotBytes,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json(err.to_string())
    }
}

/// A layer edit that was rejected. The layer is left unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayerError {
    #[error("layer {name:?} does not support {surface} edits")]
    NotEditable { name: String, surface: &'static str },
    #[error("layer {name:?} has no field {field:?}")]
    UnknownField { name: String, field: String },
    #[error("draft of layer {draft:?} cannot be committed over layer {layer:?}")]
    DraftMismatch { draft: String, layer: String },
    #[error("layer {name:?} field {field:?} changed since the draft was taken")]
    StaleDraft { name: String, field: String },
    #[error("field {field:?}: {source}")]
    Field { field: String, source: ParseError },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Edit(#[from] EditError),
}
