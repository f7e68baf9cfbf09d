//! Recursive visitor that reports each node together with its key path.

use pktedit_key_path::KeyPath;
use serde_json::Value;

/// Walk every node in `value`, root first, calling `callback` with the node's
/// root-to-leaf path. Arrays and maps are descended in order.
pub fn walk_paths<F>(value: &Value, callback: &mut F)
where
    F: FnMut(&KeyPath, &Value),
{
    walk_inner(value, &KeyPath::root(), callback);
}

fn walk_inner<F>(value: &Value, path: &KeyPath, callback: &mut F)
where
    F: FnMut(&KeyPath, &Value),
{
    callback(path, value);
    match value {
        Value::Array(arr) => {
            for (index, item) in arr.iter().enumerate() {
                walk_inner(item, &path.child(index), callback);
            }
        }
        Value::Object(obj) => {
            for (key, val) in obj {
                walk_inner(val, &path.child(key.as_str()), callback);
            }
        }
        _ => {}
    }
}

/// Paths of every scalar (non-container) node, in walk order.
pub fn leaf_paths(value: &Value) -> Vec<KeyPath> {
    let mut out = Vec::new();
    walk_paths(value, &mut |path, node| {
        if !node.is_array() && !node.is_object() {
            out.push(path.clone());
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pktedit_key_path::key_path;
    use serde_json::json;

    #[test]
    fn walks_scalar() {
        let mut visited = vec![];
        walk_paths(&json!(42), &mut |p, v| visited.push((p.clone(), v.clone())));
        assert_eq!(visited, vec![(KeyPath::root(), json!(42))]);
    }

    #[test]
    fn walks_nested_object_in_order() {
        let val = json!({"a": 1, "b": [2, {"c": 3}]});
        let mut paths = vec![];
        walk_paths(&val, &mut |p, _| paths.push(p.to_string()));
        // root, a, b, b/0, b/1, b/1/c
        assert_eq!(paths, vec!["/", "/a", "/b", "/b/0", "/b/1", "/b/1/c"]);
    }

    #[test]
    fn leaf_paths_skip_containers() {
        let val = json!({"a": 1, "b": [2, {}], "c": null});
        assert_eq!(
            leaf_paths(&val),
            vec![key_path!["a"], key_path!["b", 0usize], key_path!["c"]]
        );
    }
}
