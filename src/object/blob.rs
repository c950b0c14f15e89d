use crate::codec;
use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::object::store::{read_verified, write_raw};
use crate::repo::Repo;
use crate::types::{Object, ObjectKind};

/// write a blob to the object store
///
/// returns the blob digest, which can be used to reference this blob.
pub fn write_blob(repo: &Repo, content: &[u8]) -> Result<Digest> {
    write_raw(repo, ObjectKind::Blob, content)
}

/// read blob content with the header stripped
///
/// stored bytes without a `<kind> <len>\0` header are `MalformedObject`.
pub fn read_blob(repo: &Repo, digest: &Digest) -> Result<Vec<u8>> {
    match codec::decode(&read_verified(repo, digest)?)? {
        Object::Blob(content) => Ok(content),
        other => Err(Error::TypeMismatch {
            digest: *digest,
            expected: "blob",
            actual: other.kind().as_str(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{object_path, write_tree};
    use crate::types::Tree;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_write_and_read_blob() {
        let (_dir, repo) = test_repo();

        let content = b"hello, world!";
        let digest = write_blob(&repo, content).unwrap();

        assert_eq!(read_blob(&repo, &digest).unwrap(), content);
    }

    #[test]
    fn test_binary_blob() {
        let (_dir, repo) = test_repo();

        let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let digest = write_blob(&repo, &content).unwrap();

        assert_eq!(read_blob(&repo, &digest).unwrap(), content);
    }

    #[test]
    fn test_read_blob_of_tree_is_type_mismatch() {
        let (_dir, repo) = test_repo();

        let digest = write_tree(&repo, &Tree::empty()).unwrap();
        let result = read_blob(&repo, &digest);

        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                expected: "blob",
                actual: "tree",
                ..
            })
        ));
    }

    #[test]
    fn test_read_blob_without_header_is_malformed() {
        let (_dir, repo) = test_repo();

        let content = b"no header at all";
        let digest = crate::hash::digest(content);
        let path = object_path(&repo, &digest);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, crate::compress::compress(content, 6).unwrap()).unwrap();

        assert!(matches!(
            read_blob(&repo, &digest),
            Err(Error::MalformedObject(_))
        ));
    }
}
