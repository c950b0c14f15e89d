use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};
use crate::hash::{self, Digest};
use crate::object::write_blob;
use crate::repo::Repo;
use crate::types::ObjectKind;

/// hash a file's contents as a blob, storing it when a repository is given
pub fn hash_object(path: &Path, store: Option<&Repo>) -> Result<Digest> {
    let content = fs::read(path).with_path(path)?;

    match store {
        Some(repo) => write_blob(repo, &content),
        None => Ok(hash::hash_object(ObjectKind::Blob, &content)),
    }
}
