//! Display fields resolved from a layer stack.
//!
//! Every lookup scans from the innermost layer (last) outwards.

use serde::Serialize;
use serde_json::Value;

use crate::layer::{IndexedRecord, Layer, PAYLOAD_LAYERS};

pub const UNKNOWN_PROTOCOL: &str = "Unknown";

/// Name of the innermost layer that is not a bare payload.
pub fn protocol(layers: &[Layer]) -> &str {
    layers
        .iter()
        .rev()
        .find(|layer| !PAYLOAD_LAYERS.contains(&layer.name.as_str()))
        .map(|layer| layer.name.as_str())
        .unwrap_or(UNKNOWN_PROTOCOL)
}

/// `src` / `sport` endpoint.
pub fn source(layers: &[Layer]) -> String {
    endpoint(layers, "src", "sport")
}

/// `dst` / `dport` endpoint.
pub fn destination(layers: &[Layer]) -> String {
    endpoint(layers, "dst", "dport")
}

fn present<'a>(layer: &'a Layer, field: &str) -> Option<&'a Value> {
    layer.get(field).filter(|v| !v.is_null())
}

// Address and port latch independently, so they may come from different
// layers.
fn endpoint(layers: &[Layer], addr_field: &str, port_field: &str) -> String {
    let mut addr = None;
    let mut port = None;
    for layer in layers.iter().rev() {
        if addr.is_none() {
            addr = present(layer, addr_field);
        }
        if port.is_none() {
            port = present(layer, port_field);
        }
        if addr.is_some() && port.is_some() {
            break;
        }
    }
    match (addr, port) {
        (Some(a), Some(p)) => format!("{}:{}", render(a), render(p)),
        (Some(a), None) => render(a),
        (None, Some(p)) => render(p),
        (None, None) => String::new(),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One row of the record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    /// 1-based position shown to the user.
    pub number: usize,
    pub timestamp: String,
    pub source: String,
    pub destination: String,
    pub length: u64,
    pub protocol: String,
}

impl RecordRow {
    pub fn from_indexed(indexed: &IndexedRecord) -> Self {
        let layers = &indexed.record.layers;
        Self {
            number: indexed.index + 1,
            timestamp: indexed.record.timestamp.clone(),
            source: source(layers),
            destination: destination(layers),
            length: indexed.record.length,
            protocol: protocol(layers).to_string(),
        }
    }
}
