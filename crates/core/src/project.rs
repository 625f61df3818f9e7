//! Project configuration loading
//!
//! A small TOML file seeds the build environment: which directory holds
//! the sources and, when known ahead of time, which platform the build
//! targets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::env::BuildEnv;
use crate::error::CoreError;
use crate::select::PLATFORM_VAR;

/// Default project config file name
pub const DEFAULT_CONFIG: &str = "srcsel.toml";

/// Parsed project configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub env: EnvSection,
}

/// The `[project]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Directory scanned for sources, relative to the project root
    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
        }
    }
}

fn default_src_dir() -> PathBuf {
    PathBuf::from("src")
}

/// The `[env]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvSection {
    /// Declared platform identifier, if the project pins one
    #[serde(default)]
    pub platform: Option<String>,
}

impl ProjectConfig {
    /// Load a config file
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CoreError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Seed a build environment from this config
    pub fn build_env(&self) -> BuildEnv {
        let mut env = BuildEnv::new();
        if let Some(platform) = &self.env.platform {
            env.set_str(PLATFORM_VAR, platform);
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_full_config() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(
            temp,
            r#"
            [project]
            src_dir = "firmware/src"

            [env]
            platform = "espressif32"
        "#
        )
        .unwrap();

        let config = ProjectConfig::from_path(temp.path()).unwrap();
        assert_eq!(config.project.src_dir, PathBuf::from("firmware/src"));
        assert_eq!(config.env.platform.as_deref(), Some("espressif32"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let temp = NamedTempFile::new().unwrap();

        let config = ProjectConfig::from_path(temp.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.project.src_dir, PathBuf::from("src"));
        assert!(config.env.platform.is_none());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = ProjectConfig::from_path(Path::new("/nonexistent/srcsel.toml")).unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[project").unwrap();

        let err = ProjectConfig::from_path(temp.path()).unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse { .. }));
    }

    #[test]
    fn test_build_env_seeds_platform() {
        let config = ProjectConfig {
            env: EnvSection {
                platform: Some("espressif32".to_string()),
            },
            ..Default::default()
        };

        let env = config.build_env();
        assert_eq!(env.get_str(PLATFORM_VAR), Some("espressif32"));
    }

    #[test]
    fn test_build_env_without_platform() {
        let env = ProjectConfig::default().build_env();
        assert!(env.is_empty());
    }
}
