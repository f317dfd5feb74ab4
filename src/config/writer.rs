use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write a value to disk as pretty-printed JSON (2-space indentation).
///
/// # Errors
///
/// Returns an error if:
/// - Unable to create parent directories
/// - Unable to serialize the value
/// - Unable to write to the file
pub fn write_pretty_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> anyhow::Result<()> {
    let path_ref = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path_ref, json)?;

    Ok(())
}

/// Write raw text to disk, creating parent directories as needed.
///
/// Used by the degraded add path, which appends unmergeable content verbatim
/// instead of dropping it.
///
/// # Errors
///
/// Returns an error if directory creation or the write fails.
pub fn write_text<P: AsRef<Path>>(path: P, text: &str) -> anyhow::Result<()> {
    let path_ref = path.as_ref();

    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path_ref, text)?;

    Ok(())
}

/// Create a backup of a file with timestamp
///
/// # Errors
///
/// Returns an error if unable to copy the file
pub fn backup_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<String>> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = path_ref.with_file_name(format!(
        "{}.backup.{}",
        path_ref.file_name().and_then(|n| n.to_str()).unwrap_or("registry.json"),
        timestamp
    ));

    fs::copy(path_ref, &backup_path)?;

    Ok(Some(backup_path.to_string_lossy().to_string()))
}
