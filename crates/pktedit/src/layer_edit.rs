//! Edit surfaces of a layer.
//!
//! Each function checks the layer's [`Capability`] first, works on a copy,
//! and either returns the complete new layer or an error with the input
//! untouched.

use indexmap::IndexMap;
use log::{debug, warn};
use pktedit_json_edit::{to_compact, Edit, InsertOptions};
use serde_json::{Map, Value};

use crate::error::{LayerError, ParseError};
use crate::layer::{classify, Capability, Layer};
use crate::raw_bytes::{bytes_from_value, bytes_to_value, parse_hex};

/// Tree-shaped field of a layer that takes structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeTarget {
    /// `data` of an ASN.1 layer.
    Data,
    /// `headers` of an HTTP layer.
    Headers,
}

impl TreeTarget {
    pub fn field_name(&self) -> &'static str {
        match self {
            TreeTarget::Data => "data",
            TreeTarget::Headers => "headers",
        }
    }

    fn capability(&self) -> Capability {
        match self {
            TreeTarget::Data => Capability::StructuredAsn1,
            TreeTarget::Headers => Capability::HeaderAndBody,
        }
    }
}

/// Byte payload field of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BytesTarget {
    /// `load` of a `Raw` / `Padding` layer.
    Load,
    /// `body` of an HTTP layer.
    Body,
}

impl BytesTarget {
    pub fn field_name(&self) -> &'static str {
        match self {
            BytesTarget::Load => "load",
            BytesTarget::Body => "body",
        }
    }

    fn capability(&self) -> Capability {
        match self {
            BytesTarget::Load => Capability::RawBytes,
            BytesTarget::Body => Capability::HeaderAndBody,
        }
    }
}

fn require(layer: &Layer, capability: Capability) -> Result<(), LayerError> {
    if classify(layer) == capability {
        Ok(())
    } else {
        Err(LayerError::NotEditable {
            name: layer.name.clone(),
            surface: capability.as_str(),
        })
    }
}

fn field<'a>(layer: &'a Layer, name: &str) -> Result<&'a Value, LayerError> {
    layer.get(name).ok_or_else(|| LayerError::UnknownField {
        name: layer.name.clone(),
        field: name.to_string(),
    })
}

/// Parses user-entered JSON text for a set or insert.
pub fn parse_json_text(text: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(text)?)
}

// ── Tree edits ────────────────────────────────────────────────────────────

/// The document under `target`.
pub fn tree_of(layer: &Layer, target: TreeTarget) -> Result<&Value, LayerError> {
    require(layer, target.capability())?;
    field(layer, target.field_name())
}

/// Applies a structural edit to the tree under `target`.
pub fn edit_tree(
    layer: &Layer,
    target: TreeTarget,
    edit: &Edit,
    options: InsertOptions,
) -> Result<Layer, LayerError> {
    let doc = tree_of(layer, target)?;
    let updated = edit.apply(doc, options).inspect_err(|err| {
        warn!(
            "{} rejected on {}.{} at {}: {err}",
            edit.op_name(),
            layer.name,
            target.field_name(),
            edit.path()
        );
    })?;
    debug!(
        "{} applied to {}.{} at {}",
        edit.op_name(),
        layer.name,
        target.field_name(),
        edit.path()
    );
    Ok(layer.replaced(target.field_name(), updated))
}

// ── Raw-byte edits ────────────────────────────────────────────────────────

/// Current bytes under `target`; a `null` body reads as empty.
pub fn bytes_of(layer: &Layer, target: BytesTarget) -> Result<Vec<u8>, LayerError> {
    require(layer, target.capability())?;
    Ok(bytes_from_value(field(layer, target.field_name())?)?)
}

/// Replaces the payload under `target`.
pub fn set_bytes(layer: &Layer, target: BytesTarget, bytes: &[u8]) -> Result<Layer, LayerError> {
    require(layer, target.capability())?;
    debug!(
        "{}.{} set to {} bytes",
        layer.name,
        target.field_name(),
        bytes.len()
    );
    Ok(layer.replaced(target.field_name(), bytes_to_value(bytes)))
}

/// Replaces the payload under `target` with hex-decoded `hex_text`.
pub fn edit_bytes(layer: &Layer, target: BytesTarget, hex_text: &str) -> Result<Layer, LayerError> {
    require(layer, target.capability())?;
    let bytes = parse_hex(hex_text)?;
    set_bytes(layer, target, &bytes)
}

// ── Structured field edits ────────────────────────────────────────────────

/// Text drafts of every non-name field of a [`Capability::StructuredFields`]
/// layer, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDraft {
    name: String,
    fields: IndexMap<String, String>,
}

impl FieldDraft {
    pub fn from_layer(layer: &Layer) -> Result<Self, LayerError> {
        require(layer, Capability::StructuredFields)?;
        let fields = layer
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), to_compact(v)))
            .collect();
        Ok(Self {
            name: layer.name.clone(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Replaces the draft text of an existing field.
    pub fn set_field(&mut self, field: &str, text: impl Into<String>) -> Result<(), LayerError> {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = text.into();
                Ok(())
            }
            None => Err(LayerError::UnknownField {
                name: self.name.clone(),
                field: field.to_string(),
            }),
        }
    }

    /// Parses every field into a replacement for `layer`, the layer the
    /// draft is committed over. `layer` must be a structured-fields layer of
    /// the same name with exactly the drafted fields; a layer changed since
    /// the draft was taken is rejected. The first field that fails to parse
    /// aborts the whole commit.
    pub fn commit_onto(&self, layer: &Layer) -> Result<Layer, LayerError> {
        require(layer, Capability::StructuredFields)?;
        if layer.name != self.name {
            return Err(LayerError::DraftMismatch {
                draft: self.name.clone(),
                layer: layer.name.clone(),
            });
        }
        let stale = layer
            .fields
            .keys()
            .find(|key| !self.fields.contains_key(key.as_str()))
            .or_else(|| self.fields.keys().find(|key| !layer.has(key)));
        if let Some(field) = stale {
            warn!("{} commit rejected, field {field:?} changed since the draft", self.name);
            return Err(LayerError::StaleDraft {
                name: self.name.clone(),
                field: field.clone(),
            });
        }
        let mut fields = Map::with_capacity(self.fields.len());
        for (key, text) in &self.fields {
            let value = parse_json_text(text).map_err(|source| {
                warn!("{} commit rejected, field {key:?}: {source}", self.name);
                LayerError::Field {
                    field: key.clone(),
                    source,
                }
            })?;
            fields.insert(key.clone(), value);
        }
        debug!("{} committed {} fields", self.name, fields.len());
        Ok(Layer {
            name: self.name.clone(),
            fields,
        })
    }
}

/// `key=<json>` pairs separated by two spaces, as shown beside a layer name.
pub fn field_summary(layer: &Layer) -> String {
    let mut out = String::new();
    for (key, value) in &layer.fields {
        out.push_str(key);
        out.push('=');
        out.push_str(&to_compact(value));
        out.push_str("  ");
    }
    out
}
