use std::path::PathBuf;

use crate::Digest;

/// error type for grove operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a grove repository (no objects directory under {0})")]
    NoRepo(PathBuf),

    #[error("repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(Digest),

    #[error("corrupt object {digest}: {reason}")]
    CorruptObject { digest: Digest, reason: String },

    #[error("malformed object: {0}")]
    MalformedObject(String),

    #[error("object {digest} is a {actual}, not a {expected}")]
    TypeMismatch {
        digest: Digest,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid digest hex: {0:?}")]
    InvalidDigestHex(String),

    #[error("ambiguous digest prefix: {0}")]
    AmbiguousDigest(String),

    #[error("no object matches digest prefix: {0}")]
    PrefixNotFound(String),

    #[error("invalid tree entry name: {0}")]
    InvalidEntryName(String),

    #[error("duplicate tree entry name: {0}")]
    DuplicateEntryName(String),

    #[error("unsupported file type at {0}")]
    UnsupportedFileType(PathBuf),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
