use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::memory::DEFAULT_MAX_MESSAGES;
use crate::namespace::DEFAULT_IGNORE_FILE;

/// Top-level configuration loaded from `config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Namespace root.  Relative paths resolve against the working directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Ignore file name, relative to the root.
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,
    /// Chat memory directory.  Relative paths resolve against `root`.
    #[serde(default = "default_memory_dir")]
    pub memory_dir: PathBuf,
    /// Window size for chat memories created from this config.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

fn default_root() -> PathBuf {
    PathBuf::from("./generated-project")
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}

fn default_memory_dir() -> PathBuf {
    PathBuf::from(".agent-memory")
}

fn default_max_messages() -> usize {
    DEFAULT_MAX_MESSAGES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            ignore_file: default_ignore_file(),
            memory_dir: default_memory_dir(),
            max_messages: default_max_messages(),
        }
    }
}

impl Config {
    /// Read, parse and validate a YAML configuration file.
    pub async fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("invalid config file: {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            root = %config.root.display(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml(contents: &str) -> anyhow::Result<Config> {
        let config: Config =
            serde_yaml_ng::from_str(contents).context("failed to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config to use.
    ///
    /// Resolution order:
    /// 1. `explicit`, which must exist
    /// 2. `<agentfs_home>/config.yaml` if present
    /// 3. built-in defaults
    pub async fn discover(explicit: Option<&Path>) -> anyhow::Result<Config> {
        if let Some(path) = explicit {
            return Self::load(path).await;
        }
        let home_config = crate::agentfs_home().join("config.yaml");
        if tokio::fs::try_exists(&home_config).await.unwrap_or(false) {
            return Self::load(&home_config).await;
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate semantic constraints that serde cannot enforce.
    fn validate(&self) -> anyhow::Result<()> {
        if self.max_messages == 0 {
            anyhow::bail!("config: max_messages must be at least 1");
        }
        if self.ignore_file.trim().is_empty() {
            anyhow::bail!("config: ignore_file must not be empty");
        }
        let ignore = Path::new(&self.ignore_file);
        if ignore.is_absolute()
            || ignore
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            anyhow::bail!(
                "config: ignore_file '{}' must be a path inside the root",
                self.ignore_file
            );
        }
        Ok(())
    }

    /// Absolute-or-relative memory directory with `root` applied.
    pub fn memory_path(&self) -> PathBuf {
        if self.memory_dir.is_absolute() {
            self.memory_dir.clone()
        } else {
            self.root.join(&self.memory_dir)
        }
    }

    /// Serialize and write the configuration back to a YAML file.
    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = serde_yaml_ng::to_string(self).context("serialize config YAML")?;
        tokio::fs::write(path, &contents)
            .await
            .with_context(|| format!("failed to write config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.memory_path(),
            PathBuf::from("./generated-project/.agent-memory")
        );
    }

    #[test]
    fn absolute_memory_dir_is_kept() {
        let config = Config::from_yaml("root: /srv/ws\nmemory_dir: /var/mem\n").unwrap();
        assert_eq!(config.memory_path(), PathBuf::from("/var/mem"));
    }

    #[test]
    fn rejects_zero_window() {
        let err = Config::from_yaml("max_messages: 0").unwrap_err();
        assert!(err.to_string().contains("max_messages"));
    }

    #[test]
    fn rejects_escaping_ignore_file() {
        assert!(Config::from_yaml("ignore_file: ../.gitignore").is_err());
        assert!(Config::from_yaml("ignore_file: \"\"").is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Config::from_yaml("roots: x").is_err());
    }
}
