//! Inspect and edit captured protocol records.
//!
//! A [`Record`] is a stack of [`Layer`]s, outermost first, each a named bag of
//! schema-less JSON fields. This crate provides:
//!
//! - [`classify`]: which editing surface a layer exposes ([`Capability`]).
//! - [`layer_edit`]: tree, raw-byte and structured-field edits that return a
//!   new layer or reject the edit without side effects.
//! - [`resolve`]: protocol name and `addr:port` endpoints for a layer stack.
//! - [`RecordStore`]: the record list and selection, updated by whole-record
//!   replacement.
//! - [`bridge`]: traits for the import, replay, ASN.1 and clipboard
//!   collaborators.
//!
//! # Example
//!
//! ```
//! use pktedit::{classify, resolve, Capability, Layer};
//! use serde_json::json;
//!
//! let layers: Vec<Layer> = serde_json::from_value(json!([
//!     {"name": "IP", "src": "10.0.0.1", "dst": "10.0.0.2"},
//!     {"name": "SCTP", "sport": 38412, "dport": 38412},
//!     {"name": "NGAP"}
//! ])).unwrap();
//!
//! assert_eq!(resolve::protocol(&layers), "NGAP");
//! assert_eq!(resolve::source(&layers), "10.0.0.1:38412");
//! assert_eq!(classify(&layers[2]), Capability::ReadOnly);
//! ```

pub mod bridge;
mod error;
mod layer;
pub mod layer_edit;
pub mod raw_bytes;
pub mod resolve;
mod store;

pub use error::{LayerError, ParseError};
pub use layer::{
    classify, Capability, IndexedRecord, Layer, Record, ASN1_LAYERS, FIELD_LAYERS, HTTP_LAYERS,
    PAYLOAD_LAYERS,
};
pub use resolve::RecordRow;
pub use store::{RecordStore, StoreError, StoreOptions};

pub use pktedit_json_edit as json_edit;
