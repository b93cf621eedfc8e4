//! Path lookup across layered value maps
use crate::value::Value;

/// Find the value at `path` in the first layer that defines it
///
/// `None` means no layer defines the path. A layer whose path ends on [Value::Null] does define
/// it and stops the search; a null (or any other non-object) met halfway only skips the layer.
pub fn lookup<'v>(layers: &'v [Value], path: &[String]) -> Option<&'v Value> {
    layers.iter().find_map(|layer| search_layer(layer, path))
}

fn search_layer<'v>(layer: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter().try_fold(layer, |node, segment| match node {
        Value::Object(entries) => entries.get(segment),
        _ => None,
    })
}
