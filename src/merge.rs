//! Deep-merge of parsed registry fragments.
//!
//! Precedence: source wins field-level conflicts, `args` arrays are replaced
//! wholesale (never concatenated), and server names unknown to the target
//! accumulate at the end of its order. Folding a candidate list left to right
//! therefore keeps first-seen ordering for non-conflicting names while later
//! fragments win conflicts.

use crate::config::SERVERS_KEY;
use crate::extract::extract_objects;
use serde_json::{Map, Value};
use tracing::debug;

/// Merge `source` into `target`, returning the combined object.
///
/// Pure: neither input is mutated; the target's top-level map is
/// shallow-copied first. Server entries present on both sides get a shallow
/// field merge where source fields override, which in particular replaces an
/// `args` sequence in full. Any other top-level source field overwrites the
/// same-named target field.
pub fn merge_fragments(target: &Value, source: &Value) -> Value {
    let mut merged = target.as_object().cloned().unwrap_or_default();

    if let Some(source_servers) = source.get(SERVERS_KEY).and_then(Value::as_object) {
        let target_servers = merged
            .entry(SERVERS_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if let Some(existing) = target_servers.as_object_mut() {
            for (name, incoming) in source_servers {
                match existing.get(name) {
                    None => {
                        existing.insert(name.clone(), incoming.clone());
                    },
                    Some(current) => {
                        let combined = merge_entry(current, incoming);
                        existing.insert(name.clone(), combined);
                    },
                }
            }
        }
    }

    for (key, value) in source.as_object().into_iter().flatten() {
        if key != SERVERS_KEY {
            merged.insert(key.clone(), value.clone());
        }
    }

    Value::Object(merged)
}

/// Shallow field merge of one server entry; source fields win. Non-object
/// entries are replaced outright.
fn merge_entry(existing: &Value, incoming: &Value) -> Value {
    match (existing.as_object(), incoming.as_object()) {
        (Some(current), Some(overlay)) => {
            let mut combined = current.clone();
            for (key, value) in overlay {
                combined.insert(key.clone(), value.clone());
            }
            Value::Object(combined)
        },
        _ => incoming.clone(),
    }
}

/// Fold extracted candidates left to right into a single object.
///
/// Returns `None` for an empty candidate list so callers can distinguish
/// "nothing to merge" from a merged result with zero servers.
pub fn fold_objects(objects: &[Value]) -> Option<Value> {
    let (first, rest) = objects.split_first()?;
    Some(rest.iter().fold(first.clone(), |acc, next| merge_fragments(&acc, next)))
}

/// Extract every JSON object from raw text and fold them into one
/// pretty-printed document.
///
/// Runs the extraction strategies in their fallback order; `None` when no
/// strategy yields a valid candidate.
pub fn merge_document(text: &str) -> Option<String> {
    let objects = extract_objects(text)?;
    debug!("Folding {} candidate object(s)", objects.len());

    let merged = fold_objects(&objects)?;
    serde_json::to_string_pretty(&merged).ok()
}
