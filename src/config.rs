//! Configuration loading for mdpress.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::press::PressContext;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("{0}")]
    Validation(String),
}

/// Root configuration for a press run, usually read from `press.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressConfig {
    /// Directory tree the walker discovers pages in
    #[serde(default = "default_content")]
    pub content: PathBuf,

    /// Root directory template names resolve against
    #[serde(default = "default_templates")]
    pub templates: PathBuf,

    /// Where the build command writes the pages + context manifest
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

fn default_content() -> PathBuf {
    PathBuf::from("content")
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("press.json")
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            content: default_content(),
            templates: default_templates(),
            manifest: default_manifest(),
        }
    }
}

impl PressConfig {
    /// Load the config from the command line argument, defaulting to `press.yaml`
    pub async fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new("press.yaml"));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file).await
    }

    /// Load the config from a file path
    pub(crate) async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Validation(format!("failed to read config file: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Validation(format!("failed to parse config: {}", e)))
    }

    /// Resolve the configured paths against a base directory (typically the
    /// config file's directory).
    pub fn resolved_against(&self, base: &Path) -> Self {
        Self {
            content: resolve_path(&self.content, base),
            templates: resolve_path(&self.templates, base),
            manifest: resolve_path(&self.manifest, base),
        }
    }

    /// The stage context for this configuration.
    pub fn press_context(&self) -> PressContext {
        PressContext::new(self.templates.clone())
    }
}

fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn loads_config_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("press.yaml");
        std::fs::write(&path, "content: pages\n").unwrap();

        let config = PressConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.content, PathBuf::from("pages"));
        assert_eq!(config.templates, PathBuf::from("templates"));
        assert_eq!(config.manifest, PathBuf::from("press.json"));
    }

    #[tokio::test]
    async fn missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = PressConfig::load_from_file(&dir.path().join("press.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn resolves_relative_paths_against_the_base() {
        let config = PressConfig::default().resolved_against(Path::new("/project"));
        assert_eq!(config.content, PathBuf::from("/project/content"));
        assert_eq!(config.templates, PathBuf::from("/project/templates"));
        assert_eq!(config.manifest, PathBuf::from("/project/press.json"));
    }

    #[test]
    fn absolute_paths_stay_put() {
        let config = PressConfig {
            templates: PathBuf::from("/themes/default"),
            ..PressConfig::default()
        };
        let config = config.resolved_against(Path::new("/project"));
        assert_eq!(config.templates, PathBuf::from("/themes/default"));
    }

    #[test]
    fn test_base_path_from_config() {
        assert_eq!(
            base_path_from_config(Path::new("/project/press.yaml")),
            PathBuf::from("/project")
        );
        assert_eq!(
            base_path_from_config(Path::new("press.yaml")),
            PathBuf::from("")
        );
    }
}
