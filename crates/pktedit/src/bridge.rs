//! Boundary with external collaborators: capture import, packet replay,
//! ASN.1 text rendering and the clipboard.
//!
//! The collaborators themselves live outside this crate. A failing call
//! surfaces as [`BridgeError`] and never touches record state.

use log::{info, warn};
use pktedit_json_edit::to_pretty;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::layer::{classify, Capability, Layer, Record};
use crate::store::RecordStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("{0}")]
    Failed(String),
    #[error("invalid import: {0}")]
    InvalidImport(String),
    #[error("layer {0:?} carries no ASN.1 payload")]
    NotAsn1(String),
    #[error("no record selected")]
    NothingSelected,
}

/// Decodes a capture into record JSON. `None` means nothing was imported.
pub trait Importer {
    fn import(&mut self, capture: &[u8]) -> Result<Option<Value>, BridgeError>;
}

/// Sends one (possibly edited) record back onto the network.
pub trait Replayer {
    fn replay(&mut self, index: usize, record: &Record) -> Result<(), BridgeError>;
}

/// Renders an ASN.1 PDU, given as JSON, to ASN.1 value notation.
pub trait Asn1Renderer {
    fn render(&mut self, request: &Asn1Request) -> Result<String, BridgeError>;
}

pub trait Clipboard {
    fn copy(&mut self, text: &str);
}

/// Payload handed to an [`Asn1Renderer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asn1Request {
    pub name: String,
    pub data: Value,
}

impl Asn1Request {
    pub fn from_layer(layer: &Layer) -> Result<Self, BridgeError> {
        if classify(layer) != Capability::StructuredAsn1 {
            return Err(BridgeError::NotAsn1(layer.name.clone()));
        }
        let data = layer
            .get("data")
            .cloned()
            .ok_or_else(|| BridgeError::NotAsn1(layer.name.clone()))?;
        Ok(Self {
            name: layer.name.clone(),
            data,
        })
    }
}

/// Validates an import result. Absent, `null` and empty arrays mean nothing
/// was imported; an array of records is accepted; anything else is an error
/// for this import attempt only.
pub fn decode_import(value: Option<Value>) -> Result<Option<Vec<Record>>, BridgeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(value @ Value::Array(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(|err| BridgeError::InvalidImport(err.to_string())),
        Some(other) => Err(BridgeError::InvalidImport(format!(
            "expected an array of records, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Imports a capture into `store`. Returns the number of records loaded; the
/// store is left alone when nothing was imported or the import failed.
pub fn import_into<I: Importer + ?Sized>(
    store: &mut RecordStore,
    importer: &mut I,
    capture: &[u8],
) -> Result<usize, BridgeError> {
    let decoded = importer
        .import(capture)
        .and_then(decode_import)
        .inspect_err(|err| warn!("import failed: {err}"))?;
    match decoded {
        Some(records) => {
            let count = records.len();
            store.replace_all(records);
            Ok(count)
        }
        None => {
            info!("no records imported");
            Ok(0)
        }
    }
}

/// Replays the selected record.
pub fn replay_selected<R: Replayer + ?Sized>(
    store: &RecordStore,
    replayer: &mut R,
) -> Result<(), BridgeError> {
    let selected = store.selected().ok_or(BridgeError::NothingSelected)?;
    replayer
        .replay(selected.index, &selected.record)
        .inspect_err(|err| warn!("replay of record {} failed: {err}", selected.index))
}

/// Renders an ASN.1 layer and puts the text on the clipboard.
pub fn copy_asn1<R, C>(layer: &Layer, renderer: &mut R, clipboard: &mut C) -> Result<(), BridgeError>
where
    R: Asn1Renderer + ?Sized,
    C: Clipboard + ?Sized,
{
    let request = Asn1Request::from_layer(layer)?;
    let text = renderer.render(&request)?;
    clipboard.copy(&text);
    Ok(())
}

/// Puts two-space indented JSON of `value` on the clipboard.
pub fn copy_json<C: Clipboard + ?Sized>(value: &Value, clipboard: &mut C) {
    clipboard.copy(&to_pretty(value));
}

/// Importer for captures already exported as record JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonImporter;

impl Importer for JsonImporter {
    fn import(&mut self, capture: &[u8]) -> Result<Option<Value>, BridgeError> {
        if capture.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(capture)
            .map(Some)
            .map_err(|err| BridgeError::InvalidImport(err.to_string()))
    }
}
