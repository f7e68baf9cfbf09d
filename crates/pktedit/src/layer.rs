//! Records, layers and the editing capability of a layer.
//!
//! A [`Layer`] is a named, open map of fields; nothing about its shape is
//! declared up front. [`classify`] inspects the name and which fields are
//! present and picks exactly one [`Capability`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One decoded protocol frame inside a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a copy of this layer with `field` replaced.
    pub fn replaced(&self, field: &str, value: Value) -> Self {
        let mut out = self.clone();
        out.fields.insert(field.to_string(), value);
        out
    }

    /// The layer as one flat JSON object, `name` first.
    pub fn to_json(&self) -> Value {
        let mut map = Map::with_capacity(self.fields.len() + 1);
        map.insert("name".to_string(), Value::String(self.name.clone()));
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }
}

/// One captured packet: its layers are stacked outermost first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: String,
    pub length: u64,
    pub layers: Vec<Layer>,
}

impl Record {
    /// Returns a copy of this record with the layer at `layer_index` replaced.
    /// `None` when the index is out of range.
    pub fn with_layer(&self, layer_index: usize, layer: Layer) -> Option<Self> {
        if layer_index >= self.layers.len() {
            return None;
        }
        let mut out = self.clone();
        out.layers[layer_index] = layer;
        Some(out)
    }
}

/// A record together with its position in the record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedRecord {
    pub index: usize,
    pub record: Record,
}

// ── Capability ────────────────────────────────────────────────────────────

/// Editing surface a layer exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// ASN.1 PDU decoded to JSON under `data`; tree-editable.
    StructuredAsn1,
    /// HTTP message: tree-editable `headers`, raw-byte `body`.
    HeaderAndBody,
    /// Opaque payload bytes under `load`.
    RawBytes,
    /// Every non-name field edited as text.
    StructuredFields,
    ReadOnly,
}

pub const ASN1_LAYERS: [&str; 2] = ["NGAP", "F1 AP"];
pub const HTTP_LAYERS: [&str; 2] = ["HTTPRequest", "HTTPResponse"];
pub const PAYLOAD_LAYERS: [&str; 2] = ["Raw", "Padding"];
pub const FIELD_LAYERS: [&str; 6] = ["TCP", "UDP", "IP", "IPv6", "SCTP", "SCTPChunkData"];

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::StructuredAsn1 => "structured-asn1",
            Capability::HeaderAndBody => "header-and-body",
            Capability::RawBytes => "raw-bytes",
            Capability::StructuredFields => "structured-fields",
            Capability::ReadOnly => "read-only",
        }
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self, Capability::ReadOnly)
    }
}

/// Picks the editing capability of `layer`.
///
/// | name                                  | required fields   | capability         |
/// |---------------------------------------|-------------------|--------------------|
/// | `NGAP`, `F1 AP`                       | `data`            | `StructuredAsn1`   |
/// | `HTTPRequest`, `HTTPResponse`         | `headers`, `body` | `HeaderAndBody`    |
/// | `Raw`, `Padding`                      | `load`            | `RawBytes`         |
/// | `TCP` `UDP` `IP` `IPv6` `SCTP` `SCTPChunkData` | none     | `StructuredFields` |
///
/// Anything else, including a listed name missing its required field, is
/// `ReadOnly`.
pub fn classify(layer: &Layer) -> Capability {
    let name = layer.name.as_str();
    if ASN1_LAYERS.contains(&name) && layer.has("data") {
        Capability::StructuredAsn1
    } else if HTTP_LAYERS.contains(&name) && layer.has("headers") && layer.has("body") {
        Capability::HeaderAndBody
    } else if PAYLOAD_LAYERS.contains(&name) && layer.has("load") {
        Capability::RawBytes
    } else if FIELD_LAYERS.contains(&name) {
        Capability::StructuredFields
    } else {
        Capability::ReadOnly
    }
}
