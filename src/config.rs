#![allow(clippy::self_named_module_files)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub mod reader;
pub mod writer;

/// Top-level key holding the named server entries in a registry document.
pub const SERVERS_KEY: &str = "servers";

/// Typed projection of a single server entry.
///
/// The merge and persistence paths operate on raw `serde_json::Value` so that
/// unknown fields survive untouched; this struct exists for listing and
/// filtering, where a command string and argument list are what matter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl ServerEntry {
    /// Best-effort typed view of a raw entry value. Entries whose shape does
    /// not fit (for example a non-string `command`) come back as `None`; the
    /// raw value is still preserved in the registry.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// The in-memory ordered registry for one file.
///
/// `servers` is a `serde_json::Map`, which with the `preserve_order` feature
/// keeps insertion order; that order is the persisted order. Top-level fields
/// other than `servers` are kept verbatim in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Registry {
    #[serde(default)]
    pub servers: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Registry {
    /// Parse a registry from a merged document value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Server names in their maintained order.
    pub fn names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }

    /// Position of a named entry in the full ordered list.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.servers.keys().position(|k| k == name)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Rebuild the servers map in the given name order. Names absent from the
    /// current map are skipped; names not listed are dropped, so callers must
    /// pass a complete permutation.
    pub fn reorder(&mut self, order: &[String]) {
        let mut reordered = Map::new();
        for name in order {
            if let Some(value) = self.servers.get(name) {
                reordered.insert(name.clone(), value.clone());
            }
        }
        self.servers = reordered;
    }
}
