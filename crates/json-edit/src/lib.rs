//! Structural edits on schema-less JSON documents.
//!
//! - [`get`], [`set`], [`insert`], [`delete`] address nodes with a
//!   [`KeyPath`] and never mutate their input.
//! - [`Edit`] bundles one of those operations as a value.
//! - [`walk_paths`] enumerates nodes with their paths, for tree views.
//!
//! # Example
//!
//! ```
//! use pktedit_json_edit::{delete, get, key_path};
//! use serde_json::json;
//!
//! let doc = json!({"ies": [1, 2, 3]});
//! let out = delete(&doc, &key_path!["ies", 0usize]).unwrap();
//! assert_eq!(get(&out, &key_path!["ies"]).unwrap(), &json!([2, 3]));
//! assert_eq!(doc, json!({"ies": [1, 2, 3]}));
//! ```

mod mutate;
mod pretty;
mod types;
mod walk;

pub use mutate::{delete, get, insert, segment_for, set};
pub use pktedit_key_path::{key_path, KeyPath, KeyPathError, PathSegment};
pub use pretty::{parse_value, to_compact, to_pretty};
pub use types::{Edit, EditError, InsertOptions};
pub use walk::{leaf_paths, walk_paths};
