#![allow(missing_docs)]

pub mod cli;
pub mod config;
pub mod extract;
pub mod merge;
pub mod paths;
pub mod registry;

pub use config::{Registry, ServerEntry};
pub use merge::{fold_objects, merge_fragments};
pub use registry::{AddOutcome, Direction, RegistryStore};

#[derive(Debug, thiserror::Error)]
pub enum McpregError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no JSON object candidates found in text")]
    NoCandidates,

    #[error("server '{0}' not found in registry")]
    NotFound(String),

    #[error("server '{0}' is already at the boundary")]
    AtBoundary(String),
}
