use std::path::{Path, PathBuf};

/// Fixed file name of the canonical registry. Watch-style triggers key off
/// this suffix.
pub const REGISTRY_FILE_NAME: &str = "registry.json";

/// Gets the configuration directory path.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    // Use XDG_CONFIG_HOME or fallback to ~/.config
    let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("mcpreg")
    } else {
        directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .home_dir()
            .join(".config")
            .join("mcpreg")
    };
    Ok(config_dir)
}

/// Canonical path of the implicit global registry file, creating its
/// containing directory when absent.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or the
/// directory cannot be created.
pub fn default_registry_path() -> anyhow::Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(REGISTRY_FILE_NAME))
}

/// Whether a path refers to a registry file, by fixed-filename suffix match.
pub fn is_registry_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == REGISTRY_FILE_NAME)
}
