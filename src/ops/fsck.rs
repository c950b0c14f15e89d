use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::object::{list_objects, object_exists, read_object};
use crate::repo::Repo;
use crate::types::{Object, ObjectKind};

/// fsck report
#[derive(Debug, Default)]
pub struct FsckReport {
    /// objects checked
    pub objects_checked: usize,
    /// objects that fail to decompress, hash, or decode
    pub corrupt_objects: Vec<CorruptObject>,
    /// objects referenced by other objects but absent from the store
    pub missing_objects: Vec<MissingObject>,
}

impl FsckReport {
    pub fn is_ok(&self) -> bool {
        self.corrupt_objects.is_empty() && self.missing_objects.is_empty()
    }
}

#[derive(Debug)]
pub struct CorruptObject {
    pub digest: Digest,
    pub message: String,
}

#[derive(Debug)]
pub struct MissingObject {
    pub digest: Digest,
    pub kind: ObjectKind,
    pub referenced_by: String,
}

/// verify every stored object
///
/// each object is re-hashed and decoded, then the trees and commits it
/// points at are checked for presence. a missing object is reported once
/// even when several objects reference it.
pub fn fsck(repo: &Repo) -> Result<FsckReport> {
    let mut report = FsckReport::default();
    let mut reported_missing = HashSet::new();

    for digest in list_objects(repo)? {
        report.objects_checked += 1;

        let object = match read_object(repo, &digest) {
            Ok(object) => object,
            Err(Error::CorruptObject { reason, .. }) => {
                report.corrupt_objects.push(CorruptObject {
                    digest,
                    message: reason,
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut check = |target: Digest, kind: ObjectKind, referenced_by: String| {
            if !object_exists(repo, &target) && reported_missing.insert(target) {
                report.missing_objects.push(MissingObject {
                    digest: target,
                    kind,
                    referenced_by,
                });
            }
        };

        match object {
            Object::Blob(_) => {}
            Object::Tree(tree) => {
                for entry in tree.entries() {
                    check(
                        entry.digest,
                        entry.object_kind(),
                        format!("tree {} entry {}", digest, entry.name),
                    );
                }
            }
            Object::Commit(commit) => {
                check(commit.tree, ObjectKind::Tree, format!("commit {}", digest));
                if let Some(parent) = commit.parent {
                    check(parent, ObjectKind::Commit, format!("commit {}", digest));
                }
            }
        }
    }

    tracing::debug!(
        checked = report.objects_checked,
        corrupt = report.corrupt_objects.len(),
        missing = report.missing_objects.len(),
        "fsck finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{object_path, write_blob, write_tree};
    use crate::ops::{build_tree, CommitBuilder};
    use crate::types::{FileMode, Tree, TreeEntry};
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_fsck_clean_repo() {
        let (dir, repo) = test_repo();

        let source = dir.path().join("source");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("a.txt"), "a\n").unwrap();
        fs::write(source.join("sub/b.txt"), "b\n").unwrap();
        let build = build_tree(&repo, &source).unwrap();
        CommitBuilder::new(&repo).build(build.digest, None, "init").unwrap();

        let report = fsck(&repo).unwrap();
        assert!(report.is_ok());
        // two blobs, two trees, one commit
        assert_eq!(report.objects_checked, 5);
    }

    #[test]
    fn test_fsck_empty_repo() {
        let (_dir, repo) = test_repo();

        let report = fsck(&repo).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.objects_checked, 0);
    }

    #[test]
    fn test_fsck_detects_corrupt_object() {
        let (_dir, repo) = test_repo();

        let good = write_blob(&repo, b"good").unwrap();
        let bad = write_blob(&repo, b"bad").unwrap();
        fs::write(object_path(&repo, &bad), b"not zlib at all").unwrap();

        let report = fsck(&repo).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.objects_checked, 2);
        assert_eq!(report.corrupt_objects.len(), 1);
        assert_eq!(report.corrupt_objects[0].digest, bad);
        assert_ne!(report.corrupt_objects[0].digest, good);
    }

    #[test]
    fn test_fsck_detects_headerless_object() {
        let (_dir, repo) = test_repo();

        let content = b"no header at all";
        let digest = crate::hash::digest(content);
        let path = object_path(&repo, &digest);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, crate::compress::compress(content, 6).unwrap()).unwrap();

        let report = fsck(&repo).unwrap();
        assert_eq!(report.corrupt_objects.len(), 1);
        assert_eq!(report.corrupt_objects[0].digest, digest);
    }

    #[test]
    fn test_fsck_detects_swapped_content() {
        let (_dir, repo) = test_repo();

        let first = write_blob(&repo, b"first").unwrap();
        let second = write_blob(&repo, b"second").unwrap();
        let second_bytes = fs::read(object_path(&repo, &second)).unwrap();
        fs::write(object_path(&repo, &first), second_bytes).unwrap();

        let report = fsck(&repo).unwrap();
        assert_eq!(report.corrupt_objects.len(), 1);
        assert_eq!(report.corrupt_objects[0].digest, first);
    }

    #[test]
    fn test_fsck_detects_missing_references() {
        let (_dir, repo) = test_repo();

        let absent_blob = Digest::from_bytes([1; 20]);
        let tree = Tree::new(vec![
            TreeEntry::new(FileMode::Regular, "gone.txt", absent_blob),
            TreeEntry::new(FileMode::Regular, "again.txt", absent_blob),
        ])
        .unwrap();
        let tree_digest = write_tree(&repo, &tree).unwrap();

        let absent_parent = Digest::from_bytes([2; 20]);
        CommitBuilder::new(&repo)
            .build(tree_digest, Some(absent_parent), "orphan")
            .unwrap();

        let report = fsck(&repo).unwrap();
        assert!(report.corrupt_objects.is_empty());
        assert_eq!(report.missing_objects.len(), 2);

        let blob = report
            .missing_objects
            .iter()
            .find(|m| m.digest == absent_blob)
            .unwrap();
        assert_eq!(blob.kind, ObjectKind::Blob);
        assert!(blob.referenced_by.starts_with(&format!("tree {}", tree_digest)));

        let parent = report
            .missing_objects
            .iter()
            .find(|m| m.digest == absent_parent)
            .unwrap();
        assert_eq!(parent.kind, ObjectKind::Commit);
    }
}
