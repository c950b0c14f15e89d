use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};

/// name of the metadata directory inside a working tree
pub const METADATA_DIR: &str = ".git";

/// contents of the bootstrap HEAD file
pub const HEAD_CONTENTS: &str = "ref: refs/heads/main\n";

/// a grove repository: a working tree with an object store under `.git`
pub struct Repo {
    root: PathBuf,
    config: Config,
}

impl Repo {
    /// initialize a new repository in the given working tree
    pub fn init(path: &Path) -> Result<Self> {
        let repo = Self {
            root: path.to_path_buf(),
            config: Config::default(),
        };
        if repo.objects_path().is_dir() {
            return Err(Error::RepoExists(path.to_path_buf()));
        }

        // create directory structure
        for dir in [repo.objects_path(), repo.refs_path()] {
            std::fs::create_dir_all(&dir).with_path(&dir)?;
        }

        let head = repo.head_path();
        std::fs::write(&head, HEAD_CONTENTS).with_path(&head)?;

        repo.save_config()?;

        tracing::debug!(path = %path.display(), "initialized repository");

        Ok(repo)
    }

    /// open an existing repository
    ///
    /// a missing config.toml is not an error; defaults apply.
    pub fn open(path: &Path) -> Result<Self> {
        let mut repo = Self {
            root: path.to_path_buf(),
            config: Config::default(),
        };
        if !repo.objects_path().is_dir() {
            return Err(Error::NoRepo(path.to_path_buf()));
        }

        repo.config = Config::load_or_default(&repo.config_path())?;
        Ok(repo)
    }

    /// working tree root
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// save configuration changes
    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path())
    }

    /// path to the metadata directory
    pub fn git_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    /// path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.git_dir().join("config.toml")
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.git_dir().join("objects")
    }

    /// path to refs directory
    pub fn refs_path(&self) -> PathBuf {
        self.git_dir().join("refs")
    }

    /// path to HEAD
    pub fn head_path(&self) -> PathBuf {
        self.git_dir().join("HEAD")
    }
}
