use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::object::store::{read_object, write_object};
use crate::repo::Repo;
use crate::types::{Commit, Object};

/// write a commit to the object store
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Digest> {
    write_object(repo, &Object::Commit(commit.clone()))
}

/// read a commit from the object store
pub fn read_commit(repo: &Repo, digest: &Digest) -> Result<Commit> {
    match read_object(repo, digest)? {
        Object::Commit(commit) => Ok(commit),
        other => Err(Error::TypeMismatch {
            digest: *digest,
            expected: "commit",
            actual: other.kind().as_str(),
        }),
    }
}
