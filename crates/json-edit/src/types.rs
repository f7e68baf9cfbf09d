//! Error, option and operation types for document edits.

use pktedit_key_path::{KeyPath, KeyPathError, PathSegment};
use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("path not found: {path}")]
    PathNotFound { path: String },
    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("invalid JSON: {0}")]
    Parse(String),
}

impl EditError {
    pub(crate) fn not_found(path: &KeyPath) -> Self {
        EditError::PathNotFound {
            path: path.to_string(),
        }
    }

    pub(crate) fn invalid(path: &KeyPath, reason: impl Into<String>) -> Self {
        EditError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<KeyPathError> for EditError {
    fn from(err: KeyPathError) -> Self {
        EditError::InvalidPath {
            path: String::new(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for EditError {
    fn from(err: serde_json::Error) -> Self {
        EditError::Parse(err.to_string())
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// Options for [`crate::insert`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOptions {
    /// Materialize missing intermediate map entries as empty maps instead of
    /// failing with [`EditError::PathNotFound`]. Array gaps are never filled.
    pub create_missing: bool,
}

// ── Edit enum ─────────────────────────────────────────────────────────────

/// One structural edit against a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Overwrite the node at `path`.
    Set { path: KeyPath, value: Value },
    /// Add `value` under `parent` at `key`.
    Insert {
        parent: KeyPath,
        key: PathSegment,
        value: Value,
    },
    /// Remove the node at `path`.
    Delete { path: KeyPath },
}

impl Edit {
    pub fn op_name(&self) -> &'static str {
        match self {
            Edit::Set { .. } => "set",
            Edit::Insert { .. } => "insert",
            Edit::Delete { .. } => "delete",
        }
    }

    /// Path of the node the edit targets. For inserts this is the parent.
    pub fn path(&self) -> &KeyPath {
        match self {
            Edit::Set { path, .. } => path,
            Edit::Insert { parent, .. } => parent,
            Edit::Delete { path } => path,
        }
    }

    /// Applies the edit to a copy of `doc`.
    pub fn apply(&self, doc: &Value, options: InsertOptions) -> Result<Value, EditError> {
        match self {
            Edit::Set { path, value } => crate::set(doc, path, value.clone()),
            Edit::Insert { parent, key, value } => {
                crate::insert(doc, parent, key.clone(), value.clone(), options)
            }
            Edit::Delete { path } => crate::delete(doc, path),
        }
    }
}
