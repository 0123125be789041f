use std::path::{Path, PathBuf};

/// Application name used for config and data directories.
pub const APP_NAME: &str = "predizer";

/// Gets the absolute path to the workspace root directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("Error parsing workspace directory from crate `common`") // crates/
        .parent() // workspace root
        .expect("Failed to get workspace root")
        .to_path_buf()
}

/// Default location of `config.toml`, e.g. `~/.config/predizer/config.toml` on Linux.
///
/// Falls back to the current directory when the platform has no config dir.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("config.toml")
}

/// Default directory for the rolling log files.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_NAME).join("logs"))
        .unwrap_or_else(|| workspace_root().join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_holds_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn config_path_is_namespaced() {
        let p = default_config_path();
        assert!(p.ends_with("predizer/config.toml"));
    }

    #[test]
    fn log_dir_is_namespaced() {
        let p = default_log_dir();
        assert!(p.ends_with("logs"));
    }
}
