use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compress::DEFAULT_LEVEL;
use crate::error::{IoResultExt, Result};

/// repository configuration stored in `.git/config.toml`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// identity stamped on commits
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub compression: CompressionConfig,
}

impl Config {
    /// load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// load config from file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }
}

/// author / committer identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new("grove", "grove@localhost")
    }
}

/// tree building options
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// sort entries in git order before encoding; when false, entries keep
    /// the order the directory listing returned them in
    #[serde(default = "default_true")]
    pub sort_entries: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { sort_entries: true }
    }
}

/// object compression options
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// zlib level 0-9
    #[serde(default = "default_level")]
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_level() -> u32 {
    DEFAULT_LEVEL
}
