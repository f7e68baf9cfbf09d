//! Key paths into JSON documents.
//!
//! A [`KeyPath`] is an ordered walk from a document root to one node: map keys
//! for object nodes, indices for array nodes. Paths are only meaningful
//! against the snapshot they were taken from.
//!
//! Tree views hand paths out leaf-first (innermost segment first); use
//! [`KeyPath::from_leaf_first`] or [`KeyPath::from_tree_view`] to turn them
//! into root-to-leaf order before resolving them.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Label tree views put on the synthetic document root.
pub const TREE_ROOT_LABEL: &str = "root";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyPathError {
    #[error("key path pointer must be absolute or empty")]
    NotAbsolute,
    #[error("invalid key path segment: {0}")]
    InvalidSegment(String),
}

/// One step of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// Decodes a segment from its JSON form: a string is a key, a
    /// non-negative integer is an index.
    pub fn from_json(value: &Value) -> Result<Self, KeyPathError> {
        match value {
            Value::String(s) => Ok(Self::Key(s.clone())),
            Value::Number(n) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .map(Self::Index)
                .ok_or_else(|| KeyPathError::InvalidSegment(n.to_string())),
            other => Err(KeyPathError::InvalidSegment(other.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Key(k) => Value::String(k.clone()),
            Self::Index(i) => Value::from(*i),
        }
    }

    /// Parses one unescaped pointer token. Only canonical non-negative
    /// integers become indices; `"01"` and `"-1"` stay keys.
    pub fn from_token(token: &str) -> Self {
        if is_canonical_index(token) {
            if let Ok(i) = token.parse::<usize>() {
                return Self::Index(i);
            }
        }
        Self::Key(token.to_string())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(k) => Some(k),
            Self::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Key(_) => None,
            Self::Index(i) => Some(*i),
        }
    }
}

fn is_canonical_index(token: &str) -> bool {
    match token.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Root-to-leaf sequence of [`PathSegment`]s. The empty path is the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<PathSegment>,
}

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Builds a root-to-leaf path from segments listed innermost first.
    pub fn from_leaf_first<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = PathSegment>,
    {
        let mut segments: Vec<PathSegment> = segments.into_iter().collect();
        segments.reverse();
        Self { segments }
    }

    /// Like [`KeyPath::from_leaf_first`], but drops the synthetic
    /// [`TREE_ROOT_LABEL`] segment a tree view appends after the outermost
    /// real key.
    pub fn from_tree_view<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = PathSegment>,
    {
        let mut segments: Vec<PathSegment> = segments.into_iter().collect();
        if segments.last().and_then(PathSegment::as_key) == Some(TREE_ROOT_LABEL) {
            segments.pop();
        }
        Self::from_leaf_first(segments)
    }

    /// Decodes a JSON array of segments (`["a", 0, "b"]`).
    pub fn from_json(value: &Value) -> Result<Self, KeyPathError> {
        let items = value
            .as_array()
            .ok_or_else(|| KeyPathError::InvalidSegment(value.to_string()))?;
        let segments = items
            .iter()
            .map(PathSegment::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.segments.iter().map(PathSegment::to_json).collect())
    }

    /// Parses an RFC 6901 pointer (`""` is the root, `"/a/0"` two segments).
    pub fn parse_pointer(pointer: &str) -> Result<Self, KeyPathError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        if !pointer.starts_with('/') {
            return Err(KeyPathError::NotAbsolute);
        }
        let segments = pointer
            .split('/')
            .skip(1)
            .map(|token| PathSegment::from_token(&unescape_component(token)))
            .collect();
        Ok(Self { segments })
    }

    /// Accepts pointers without the leading slash as well.
    pub fn parse_pointer_relaxed(pointer: &str) -> Result<Self, KeyPathError> {
        match pointer {
            "" => Ok(Self::root()),
            p if p.starts_with('/') => Self::parse_pointer(p),
            p => Self::parse_pointer(&format!("/{p}")),
        }
    }

    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                PathSegment::Key(k) => out.push_str(&escape_component(k)),
                PathSegment::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path one level deeper.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// Splits into the parent path and the final segment. `None` for the root.
    pub fn split_last(&self) -> Option<(KeyPath, &PathSegment)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            KeyPath {
                segments: parent.to_vec(),
            },
            last,
        ))
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        f.write_str(&self.to_pointer())
    }
}

impl From<Vec<PathSegment>> for KeyPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<PathSegment> for KeyPath {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Reverses [`escape_component`]. `~1` is decoded before `~0` so `~01`
/// yields `~1`, not `/`.
pub fn unescape_component(component: &str) -> String {
    if component.contains('~') {
        component.replace("~1", "/").replace("~0", "~")
    } else {
        component.to_owned()
    }
}

/// Escapes `~` as `~0` and `/` as `~1`.
pub fn escape_component(component: &str) -> String {
    if component.contains(['~', '/']) {
        component.replace('~', "~0").replace('/', "~1")
    } else {
        component.to_owned()
    }
}

/// Builds a [`KeyPath`] from a mix of keys and indices.
///
/// ```
/// use pktedit_key_path::{key_path, PathSegment};
///
/// let path = key_path!["value", 0usize, "id"];
/// assert_eq!(path.segments()[1], PathSegment::Index(0));
/// ```
#[macro_export]
macro_rules! key_path {
    () => { $crate::KeyPath::root() };
    ($($seg:expr),+ $(,)?) => {
        $crate::KeyPath::new(vec![$($crate::PathSegment::from($seg)),+])
    };
}
