//! Get/set/insert/delete on JSON documents.
//!
//! Every mutating function works on a deep copy and returns the new document;
//! the caller's value is never touched, and a failed edit returns no document
//! at all. Arrays get sequence semantics (index, shift on insert/delete), maps
//! get keyed semantics (create or overwrite, remove). An index segment against
//! a map addresses the key with the same decimal text.

use pktedit_key_path::{KeyPath, PathSegment};
use serde_json::{Map, Value};

use crate::types::{EditError, InsertOptions};

fn prefix(path: &KeyPath, depth: usize) -> KeyPath {
    path.segments()[..=depth].iter().cloned().collect()
}

fn map_key(segment: &PathSegment) -> String {
    match segment {
        PathSegment::Key(k) => k.clone(),
        PathSegment::Index(i) => i.to_string(),
    }
}

fn step<'a>(
    node: &'a Value,
    segment: &PathSegment,
    path: &KeyPath,
    depth: usize,
) -> Result<&'a Value, EditError> {
    match (node, segment) {
        (Value::Object(map), seg) => map
            .get(&map_key(seg))
            .ok_or_else(|| EditError::not_found(&prefix(path, depth))),
        (Value::Array(arr), PathSegment::Index(i)) => arr
            .get(*i)
            .ok_or_else(|| EditError::not_found(&prefix(path, depth))),
        (Value::Array(_), PathSegment::Key(k)) => Err(EditError::invalid(
            &prefix(path, depth),
            format!("key {k:?} used on a sequence"),
        )),
        _ => Err(EditError::not_found(&prefix(path, depth))),
    }
}

fn step_mut<'a>(
    node: &'a mut Value,
    segment: &PathSegment,
    path: &KeyPath,
    depth: usize,
    create_missing: bool,
) -> Result<&'a mut Value, EditError> {
    match (node, segment) {
        (Value::Object(map), seg) => {
            let key = map_key(seg);
            if create_missing && !map.contains_key(&key) {
                map.insert(key.clone(), Value::Object(Map::new()));
            }
            map.get_mut(&key)
                .ok_or_else(|| EditError::not_found(&prefix(path, depth)))
        }
        (Value::Array(arr), PathSegment::Index(i)) => arr
            .get_mut(*i)
            .ok_or_else(|| EditError::not_found(&prefix(path, depth))),
        (Value::Array(_), PathSegment::Key(k)) => Err(EditError::invalid(
            &prefix(path, depth),
            format!("key {k:?} used on a sequence"),
        )),
        _ => Err(EditError::not_found(&prefix(path, depth))),
    }
}

fn resolve_mut<'a>(
    doc: &'a mut Value,
    path: &KeyPath,
    create_missing: bool,
) -> Result<&'a mut Value, EditError> {
    let mut node = doc;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = step_mut(node, segment, path, depth, create_missing)?;
    }
    Ok(node)
}

/// Returns the node at `path`. The empty path is the document itself.
pub fn get<'a>(doc: &'a Value, path: &KeyPath) -> Result<&'a Value, EditError> {
    let mut node = doc;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = step(node, segment, path, depth)?;
    }
    Ok(node)
}

/// Returns a copy of `doc` with the node at `path` replaced by `value`.
///
/// Map parents gain the key if it is absent. Array parents must already hold
/// the index; arrays never grow through `set`.
pub fn set(doc: &Value, path: &KeyPath, value: Value) -> Result<Value, EditError> {
    let Some((parent, last)) = path.split_last() else {
        return Ok(value);
    };
    let mut out = doc.clone();
    let node = resolve_mut(&mut out, &parent, false)?;
    match (node, last) {
        (Value::Object(map), seg) => {
            map.insert(map_key(seg), value);
        }
        (Value::Array(arr), PathSegment::Index(i)) => {
            let slot = arr.get_mut(*i).ok_or_else(|| EditError::not_found(path))?;
            *slot = value;
        }
        (Value::Array(_), PathSegment::Key(k)) => {
            return Err(EditError::invalid(
                path,
                format!("key {k:?} used on a sequence"),
            ));
        }
        _ => return Err(EditError::not_found(path)),
    }
    Ok(out)
}

/// Returns a copy of `doc` with `value` added under `parent` at `key`.
///
/// For an array parent `key` must be an index in `0..=len`; later elements
/// shift right and `len` appends. For a map parent an existing key is
/// overwritten in place.
pub fn insert(
    doc: &Value,
    parent: &KeyPath,
    key: PathSegment,
    value: Value,
    options: InsertOptions,
) -> Result<Value, EditError> {
    let mut out = doc.clone();
    let node = resolve_mut(&mut out, parent, options.create_missing)?;
    let target = parent.child(key.clone());
    match (node, key) {
        (Value::Object(map), seg) => {
            map.insert(map_key(&seg), value);
        }
        (Value::Array(arr), PathSegment::Index(i)) => {
            if i > arr.len() {
                return Err(EditError::invalid(
                    &target,
                    format!("index {i} past end of sequence of length {}", arr.len()),
                ));
            }
            arr.insert(i, value);
        }
        (Value::Array(_), PathSegment::Key(k)) => {
            return Err(EditError::invalid(
                &target,
                format!("key {k:?} used on a sequence"),
            ));
        }
        _ => return Err(EditError::not_found(parent)),
    }
    Ok(out)
}

/// Returns a copy of `doc` without the node at `path`.
///
/// Array elements are spliced out, map keys removed with the remaining order
/// kept. A path that does not exist yields an unchanged copy.
pub fn delete(doc: &Value, path: &KeyPath) -> Result<Value, EditError> {
    let Some((parent, last)) = path.split_last() else {
        return Err(EditError::invalid(path, "cannot delete the document root"));
    };
    let mut out = doc.clone();
    let node = match resolve_mut(&mut out, &parent, false) {
        Ok(node) => node,
        Err(EditError::PathNotFound { .. }) => return Ok(doc.clone()),
        Err(err) => return Err(err),
    };
    match (node, last) {
        (Value::Object(map), seg) => {
            map.shift_remove(&map_key(seg));
        }
        (Value::Array(arr), PathSegment::Index(i)) => {
            if *i < arr.len() {
                arr.remove(*i);
            }
        }
        (Value::Array(_), PathSegment::Key(k)) => {
            return Err(EditError::invalid(
                path,
                format!("key {k:?} used on a sequence"),
            ));
        }
        _ => {}
    }
    Ok(out)
}

/// Turns user-entered insert-key text into a segment for the node at
/// `parent`: sequence parents take a non-negative integer, map parents take
/// the text verbatim.
pub fn segment_for(doc: &Value, parent: &KeyPath, text: &str) -> Result<PathSegment, EditError> {
    match get(doc, parent)? {
        Value::Array(_) => {
            let index: i64 = text.trim().parse().map_err(|_| {
                EditError::invalid(parent, format!("{text:?} is not a sequence index"))
            })?;
            usize::try_from(index)
                .map(PathSegment::Index)
                .map_err(|_| EditError::invalid(parent, format!("negative index {index}")))
        }
        Value::Object(_) => Ok(PathSegment::Key(text.to_string())),
        _ => Err(EditError::not_found(parent)),
    }
}
