use crate::codec::{decode_body, parse_header};
use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::object::{object_exists, read_raw};
use crate::ops::{format_ls_tree, ls_tree_flat};
use crate::repo::Repo;
use crate::types::{Object, ObjectKind};

/// what `cat_file` reports about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// contents: raw blob bytes, a tree listing, or the commit text
    Pretty,
    /// kind name
    Type,
    /// body size in bytes
    Size,
    /// nothing; fails if the object is missing
    Exists,
}

/// show an object
pub fn cat_file(repo: &Repo, digest: &Digest, mode: CatFileMode) -> Result<Vec<u8>> {
    let raw = match mode {
        CatFileMode::Exists if object_exists(repo, digest) => return Ok(Vec::new()),
        CatFileMode::Exists => return Err(Error::ObjectNotFound(*digest)),
        _ => read_raw(repo, digest)?,
    };
    let (kind, body) = parse_header(&raw)?;

    match mode {
        CatFileMode::Type => Ok(format!("{}\n", kind).into_bytes()),
        CatFileMode::Size => Ok(format!("{}\n", body.len()).into_bytes()),
        _ => pretty(kind, body),
    }
}

fn pretty(kind: ObjectKind, body: &[u8]) -> Result<Vec<u8>> {
    match decode_body(kind, body)? {
        Object::Blob(content) => Ok(content),
        Object::Tree(tree) => {
            let entries: Vec<_> = ls_tree_flat(&tree).collect();
            Ok(format_ls_tree(&entries, false).into_bytes())
        }
        // commit text is already human readable
        Object::Commit(_) => Ok(body.to_vec()),
    }
}
