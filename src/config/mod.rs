//! Configuration loading for psmv.
//!
//! The vault base path is resolved in order from the `PSMV_PATH` environment
//! variable, the `[vault] path` key of config.toml, and finally the default
//! `~/Persistent-Semantic-Memory-Vault`. The config file itself is found via
//! `PSMV_CONFIG` or the platform config directory.

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

use crate::vault::Vault;

/// Environment variable overriding the vault base path.
pub const VAULT_PATH_ENV: &str = "PSMV_PATH";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "PSMV_CONFIG";

/// Curated collection, relative to the vault base.
pub const CROWN_JEWELS_DIR: &str = "SPONTANEOUS_PREACHING_PROTOCOL/crown_jewels";

/// Stream collection, relative to the vault base.
pub const RESIDUAL_STREAM_DIR: &str = "AGENT_EMERGENT_WORKSPACES/residual_stream";

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
}

/// Location of the vault on disk.
#[derive(Debug, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_vault_path")]
    pub path: String,
}

fn default_vault_path() -> String {
    "~/Persistent-Semantic-Memory-Vault".to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: default_vault_path(),
        }
    }
}

/// Resolved collection roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub base: PathBuf,
    pub crown_jewels: PathBuf,
    pub residual_stream: PathBuf,
}

impl VaultPaths {
    #[must_use]
    pub fn from_base(base: PathBuf) -> Self {
        Self {
            crown_jewels: base.join(CROWN_JEWELS_DIR),
            residual_stream: base.join(RESIDUAL_STREAM_DIR),
            base,
        }
    }

    #[must_use]
    pub fn into_vault(self) -> Vault {
        Vault::new(self.crown_jewels, self.residual_stream)
    }
}

impl Config {
    /// Load config from `PSMV_CONFIG` or ~/.config/psmv/config.toml, or
    /// return defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let contents = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        Ok(Config::default())
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "psmv").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolve the collection roots, letting `PSMV_PATH` win over the file.
    #[must_use]
    pub fn vault_paths(&self) -> VaultPaths {
        let base = match std::env::var(VAULT_PATH_ENV) {
            Ok(path) if !path.is_empty() => expand_tilde(&path),
            _ => expand_tilde(&self.vault.path),
        };
        VaultPaths::from_base(base)
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}
