use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read a file's raw text, treating a missing file as empty content.
///
/// Mutating operations build on this: an absent registry file behaves like an
/// empty one rather than an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_text<P: AsRef<Path>>(path: P) -> anyhow::Result<String> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Ok(String::new());
    }

    fs::read_to_string(path_ref)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path_ref.display(), e))
}

/// Parse text as a single top-level JSON object.
///
/// # Errors
///
/// Returns an error if the text is not one syntactically valid JSON object;
/// callers fall back to the extraction strategies in that case.
pub fn parse_single_object(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_missing_file_is_empty() {
        let result = read_text("/nonexistent/registry.json")
            .expect("read_text should succeed for missing file");
        assert!(result.is_empty());
    }

    #[test]
    fn test_read_text_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("registry.json");
        fs::write(&path, "{\"servers\": {}}").expect("Failed to write file");

        let content = read_text(&path).expect("read_text should succeed");
        assert_eq!(content, "{\"servers\": {}}");
    }

    #[test]
    fn test_parse_single_object_valid() {
        let value = parse_single_object(r#"{"servers": {"a": {"command": "x"}}}"#)
            .expect("parse should succeed");
        assert!(value.get("servers").is_some());
    }

    #[test]
    fn test_parse_single_object_trailing_garbage() {
        assert!(parse_single_object("{\"a\": 1}\n{\"b\": 2}").is_err());
    }
}
