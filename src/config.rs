use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "casebook.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where test cases come from.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Glob patterns (relative to the workspace root) of catalog files.
    /// Example: ["cases/**/*.toml", "cases/**/*.json"]
    #[serde(default)]
    pub paths: Vec<String>,
    /// Whether the built-in demo cases are listed alongside catalog files.
    #[serde(default = "default_true")]
    pub include_builtin: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            include_builtin: true,
        }
    }
}

/// Overrides the editor used when opening catalog files.
#[derive(Debug, Default, Deserialize)]
pub struct EditorConfig {
    /// Command line to use instead of `$EDITOR`, split like a shell would.
    /// Example: "nvim" or "code --wait"
    pub command: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// Directory for `casebook.log`. Defaults to the platform data directory.
    pub directory: Option<PathBuf>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load `casebook.toml` from the workspace root. A missing file yields defaults.
    pub fn load(workspace: &Path) -> Result<Self> {
        let path = workspace.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load an explicitly named config file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.catalog.paths.is_empty());
        assert!(config.catalog.include_builtin);
        assert!(config.editor.command.is_none());
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join(CONFIG_FILE);
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn reads_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[catalog]
paths = ["cases/*.toml"]
include_builtin = false

[editor]
command = "code --wait"

[logging]
directory = "/tmp/casebook-logs"
filter = "casebook=debug"
"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.catalog.paths, vec!["cases/*.toml".to_string()]);
        assert!(!config.catalog.include_builtin);
        assert_eq!(config.editor.command.as_deref(), Some("code --wait"));
        assert_eq!(
            config.logging.directory.as_deref(),
            Some(Path::new("/tmp/casebook-logs"))
        );
        assert_eq!(config.logging.filter.as_deref(), Some("casebook=debug"));
    }

    #[test]
    fn partial_catalog_section_keeps_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[catalog]\npaths = [\"a.json\"]\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.catalog.include_builtin);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[catalog\n").unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
