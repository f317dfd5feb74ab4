//! Ordered registry store: one loaded registry tied to one file.
//!
//! Every mutating operation is read-whole-file, transform in memory,
//! write-whole-file, then reload. There is no locking and no partial-write
//! recovery; the read always happens before any write, so a failed write
//! leaves the prior on-disk content untouched.

use crate::config::{reader, writer, Registry, ServerEntry};
use crate::extract::extract_objects;
use crate::merge::{fold_objects, merge_document, merge_fragments};
use crate::McpregError;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Direction for reordering a server entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

/// Caller-supplied yes/no gate for destructive operations.
///
/// The CLI wires an interactive prompt through this; non-interactive
/// embeddings use [`AlwaysConfirm`] or [`NeverConfirm`].
pub trait ConfirmPolicy {
    /// Whether the named entry may be deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy cannot reach its decision source, for
    /// example when an interactive prompt fails to read stdin.
    fn confirm(&self, name: &str) -> Result<bool>;
}

/// Policy that confirms every request.
pub struct AlwaysConfirm;

impl ConfirmPolicy for AlwaysConfirm {
    fn confirm(&self, _name: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Policy that declines every request.
pub struct NeverConfirm;

impl ConfirmPolicy for NeverConfirm {
    fn confirm(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Outcome of an add operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The fragment was merged into the registry document.
    Merged,
    /// No strategy could make sense of the existing text; the fragment was
    /// appended as raw text after it so the user's input is not lost.
    AppendedRaw,
}

/// A single loaded registry bound to a file path.
///
/// Replaces the original design's ambient "current file" global with an
/// explicit context object, so multiple registries can coexist.
#[derive(Debug)]
pub struct RegistryStore {
    path: PathBuf,
    registry: Registry,
    query: Option<String>,
}

impl RegistryStore {
    /// Bind a store to a path without touching the file yet.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), registry: Registry::default(), query: None }
    }

    /// Bind a store to a path and load it.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or no parse strategy
    /// yields a registry. Use [`Self::new`] plus [`Self::load`] to keep the
    /// store (with an empty registry) when loading fails.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Read the file and populate the ordered entry list.
    ///
    /// A missing or empty file loads as an empty registry. Non-JSON text
    /// falls back to the extraction strategies; when they also fail the
    /// registry is left empty and the error is surfaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or if the text is not a
    /// single JSON object and no extraction strategy finds one.
    pub fn load(&mut self) -> Result<()> {
        self.registry = Registry::default();

        let text = reader::read_text(&self.path)?;
        if text.trim().is_empty() {
            return Ok(());
        }

        let value = match reader::parse_single_object(&text) {
            Ok(value) => value,
            Err(e) => {
                debug!("Single-object parse failed ({e}), trying extraction strategies");
                extract_objects(&text)
                    .as_deref()
                    .and_then(fold_objects)
                    .ok_or(McpregError::NoCandidates)
                    .with_context(|| {
                        format!("Failed to load registry from {}", self.path.display())
                    })?
            },
        };

        self.registry = Registry::from_value(value)
            .with_context(|| format!("Registry in {} has unexpected shape", self.path.display()))?;

        Ok(())
    }

    /// Set the case-insensitive search query; an empty query restores the
    /// full ordered view. Only the visible projection changes, never the
    /// underlying order.
    pub fn set_filter(&mut self, query: &str) {
        self.query = if query.is_empty() { None } else { Some(query.to_lowercase()) };
    }

    /// The visible entries in registry order, honoring the current filter.
    /// Matches on entry name or command substring.
    pub fn visible(&self) -> Vec<(&String, &Value)> {
        self.registry
            .servers
            .iter()
            .filter(|&(name, value)| self.matches(name, value))
            .collect()
    }

    fn matches(&self, name: &str, value: &Value) -> bool {
        let Some(query) = &self.query else {
            return true;
        };

        if name.to_lowercase().contains(query) {
            return true;
        }

        value
            .get("command")
            .and_then(Value::as_str)
            .is_some_and(|command| command.to_lowercase().contains(query))
    }

    /// Typed view of a named entry, where its shape permits.
    pub fn entry(&self, name: &str) -> Option<ServerEntry> {
        self.registry.servers.get(name).and_then(ServerEntry::from_value)
    }

    /// Remove a named entry, gated by the confirmation policy.
    ///
    /// Returns `Ok(false)` when the policy declined; nothing has been
    /// touched at that point. On confirmation the full file is rewritten
    /// with the remaining entries in their existing relative order.
    ///
    /// # Errors
    ///
    /// Returns [`McpregError::NotFound`] for an unknown name (file
    /// unchanged), or an error when persisting or reloading fails.
    pub fn delete(&mut self, name: &str, policy: &dyn ConfirmPolicy) -> Result<bool> {
        if !self.registry.servers.contains_key(name) {
            return Err(McpregError::NotFound(name.to_string()).into());
        }

        if !policy.confirm(name)? {
            debug!("Deletion of '{name}' cancelled before any write");
            return Ok(false);
        }

        self.registry.servers.shift_remove(name);
        self.persist()?;
        self.load()?;

        Ok(true)
    }

    /// Move a named entry one position up or down in the full (unfiltered)
    /// order, then persist and reload.
    ///
    /// # Errors
    ///
    /// Returns [`McpregError::NotFound`] for an unknown name and
    /// [`McpregError::AtBoundary`] when the entry is already first or last;
    /// the file is unchanged in both cases.
    pub fn move_entry(&mut self, name: &str, direction: Direction) -> Result<()> {
        let mut order = self.registry.names();
        let position = order
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| McpregError::NotFound(name.to_string()))?;

        let target = match direction {
            Direction::Up => position.saturating_sub(1),
            Direction::Down => (position + 1).min(order.len() - 1),
        };

        if target == position {
            return Err(McpregError::AtBoundary(name.to_string()).into());
        }

        order.swap(position, target);
        self.registry.reorder(&order);
        self.persist()?;
        self.load()
    }

    /// Fold a parsed fragment into the file's current content and write the
    /// result back.
    ///
    /// Pipeline: empty file takes the fragment verbatim; a single-object
    /// file is merged directly; otherwise the combined text goes through the
    /// extraction strategies. When even those fail, the fragment is appended
    /// after the existing content as raw text rather than dropped.
    ///
    /// # Errors
    ///
    /// Returns an error when reading or writing the file fails, or when the
    /// reload after a successful merge fails.
    pub fn add(&mut self, fragment: &Value) -> Result<AddOutcome> {
        let current = reader::read_text(&self.path)?;
        let pretty_fragment = serde_json::to_string_pretty(fragment)?;

        if current.trim().is_empty() {
            writer::write_text(&self.path, &pretty_fragment)?;
            self.load()?;
            return Ok(AddOutcome::Merged);
        }

        if let Ok(existing) = reader::parse_single_object(&current) {
            let merged = merge_fragments(&existing, fragment);
            writer::write_pretty_json(&self.path, &merged)?;
            self.load()?;
            return Ok(AddOutcome::Merged);
        }

        let combined = format!("{current}\n\n{pretty_fragment}");
        match merge_document(&combined) {
            Some(merged) => {
                writer::write_text(&self.path, &merged)?;
                self.load()?;
                Ok(AddOutcome::Merged)
            },
            None => {
                // Never drop the user's input, even unmergeable
                warn!(
                    "Could not merge into {}; appending content as raw text",
                    self.path.display()
                );
                writer::write_text(&self.path, &combined)?;
                Ok(AddOutcome::AppendedRaw)
            },
        }
    }

    /// Extract and merge every JSON object already in the file, rewriting it
    /// as one canonical document.
    ///
    /// # Errors
    ///
    /// Returns [`McpregError::NoCandidates`] when no strategy finds a valid
    /// object, or an error when file IO fails.
    pub fn merge_in_place(&mut self) -> Result<()> {
        let text = reader::read_text(&self.path)?;
        if text.trim().is_empty() {
            return Ok(());
        }

        let merged = merge_document(&text)
            .ok_or(McpregError::NoCandidates)
            .with_context(|| format!("Failed to merge {}", self.path.display()))?;

        writer::write_text(&self.path, &merged)?;
        self.load()
    }

    fn persist(&self) -> Result<()> {
        writer::write_pretty_json(&self.path, &self.registry)
    }
}
