use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::object::store::{read_object, write_object};
use crate::repo::Repo;
use crate::types::{Object, Tree};

/// write a tree to the object store
///
/// entries are encoded in the order the tree holds them; the entries'
/// targets are expected to be stored already.
pub fn write_tree(repo: &Repo, tree: &Tree) -> Result<Digest> {
    write_object(repo, &Object::Tree(tree.clone()))
}

/// read a tree from the object store
pub fn read_tree(repo: &Repo, digest: &Digest) -> Result<Tree> {
    match read_object(repo, digest)? {
        Object::Tree(tree) => Ok(tree),
        other => Err(Error::TypeMismatch {
            digest: *digest,
            expected: "tree",
            actual: other.kind().as_str(),
        }),
    }
}
