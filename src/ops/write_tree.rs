use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, IoResultExt, Result};
use crate::fs::{list_dir, read_symlink_target, DirEntry, FileMetadata, FileType};
use crate::hash::Digest;
use crate::object::{write_blob, write_tree};
use crate::repo::{Repo, METADATA_DIR};
use crate::types::{validate_entry_name, FileMode, Tree, TreeEntry};

/// outcome of building a tree from a directory
#[derive(Debug)]
pub struct TreeBuild {
    /// digest of the root tree
    pub digest: Digest,
    /// the root tree as stored
    pub tree: Tree,
    /// entries that could not be stored, anywhere below the root
    pub skipped: Vec<SkippedEntry>,
}

impl TreeBuild {
    /// true when every entry under the root made it into the tree
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// an entry left out of a tree because storing it failed
#[derive(Debug)]
pub struct SkippedEntry {
    /// path relative to the directory the build started from
    pub path: PathBuf,
    pub error: Error,
}

/// snapshots a directory into tree and blob objects
///
/// children are stored before the tree that references them. a file or
/// subdirectory that fails is logged, recorded in `TreeBuild::skipped` and
/// left out; its siblings are still stored.
pub struct TreeBuilder<'r> {
    repo: &'r Repo,
    sort_entries: bool,
}

impl<'r> TreeBuilder<'r> {
    /// builder using the repository's tree configuration
    pub fn new(repo: &'r Repo) -> Self {
        Self {
            repo,
            sort_entries: repo.config().tree.sort_entries,
        }
    }

    /// sort entries in git order (true) or keep listing order (false)
    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// build and store the tree for `dir`
    pub fn build(&self, dir: &Path) -> Result<TreeBuild> {
        let meta = fs::metadata(dir).with_path(dir)?;
        if !meta.is_dir() {
            return Err(Error::Io {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        let mut skipped = Vec::new();
        let (digest, tree) = self.build_dir(dir, Path::new(""), &mut skipped)?;

        tracing::debug!(
            %digest,
            entries = tree.len(),
            skipped = skipped.len(),
            "built tree for {}",
            dir.display()
        );

        Ok(TreeBuild {
            digest,
            tree,
            skipped,
        })
    }

    fn build_dir(
        &self,
        dir: &Path,
        prefix: &Path,
        skipped: &mut Vec<SkippedEntry>,
    ) -> Result<(Digest, Tree)> {
        let mut entries = Vec::new();

        for entry in list_dir(dir)? {
            if entry.name == METADATA_DIR {
                continue;
            }

            let logical_path = prefix.join(&entry.name);
            match self.build_entry(&entry, &logical_path, skipped) {
                Ok(tree_entry) => entries.push(tree_entry),
                Err(error) => {
                    tracing::warn!(
                        path = %logical_path.display(),
                        %error,
                        "skipping entry"
                    );
                    skipped.push(SkippedEntry {
                        path: logical_path,
                        error,
                    });
                }
            }
        }

        let mut tree = Tree::new(entries)?;
        if self.sort_entries {
            tree.sort_canonical();
        }

        let digest = write_tree(self.repo, &tree)?;
        Ok((digest, tree))
    }

    fn build_entry(
        &self,
        entry: &DirEntry,
        logical_path: &Path,
        skipped: &mut Vec<SkippedEntry>,
    ) -> Result<TreeEntry> {
        let name = entry.name.to_str().ok_or_else(|| {
            Error::InvalidEntryName(format!("non UTF-8 name {:?}", entry.name))
        })?;
        validate_entry_name(name)?;

        let (mode, digest) = match entry.file_type {
            FileType::Directory => {
                // recurse
                let (digest, _) = self.build_dir(&entry.path, logical_path, skipped)?;
                (FileMode::Directory, digest)
            }

            FileType::Symlink => {
                // never followed: the blob is the link target itself
                let target = read_symlink_target(&entry.path)?;
                (FileMode::Symlink, write_blob(self.repo, &target)?)
            }

            FileType::Regular => {
                let meta = FileMetadata::from_path(&entry.path)?;
                let content = fs::read(&entry.path).with_path(&entry.path)?;
                let mode = if meta.is_executable() {
                    FileMode::Executable
                } else {
                    FileMode::Regular
                };
                (mode, write_blob(self.repo, &content)?)
            }

            FileType::Other => return Err(Error::UnsupportedFileType(entry.path.clone())),
        };

        Ok(TreeEntry::new(mode, name, digest))
    }
}

/// build and store the tree for `dir` using the repository's configuration
pub fn build_tree(repo: &Repo, dir: &Path) -> Result<TreeBuild> {
    TreeBuilder::new(repo).build(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_object;
    use crate::object::{object_exists, read_blob, read_tree};
    use crate::types::ObjectKind;
    use std::os::unix::fs::{symlink, PermissionsExt};
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_build_single_file() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("hello.txt"), "hi\n").unwrap();

        let build = build_tree(&repo, dir.path()).unwrap();

        assert!(build.is_complete());
        assert_eq!(build.tree.len(), 1);
        let entry = &build.tree.entries()[0];
        assert_eq!(entry.mode, FileMode::Regular);
        assert_eq!(entry.name, "hello.txt");
        assert_eq!(entry.digest, hash_object(ObjectKind::Blob, b"hi\n"));
        assert_eq!(
            build.digest.to_hex(),
            "7a2871192d49caaff5451df37b27afc373d8298b"
        );
    }

    #[test]
    fn test_build_matches_git_for_nested_tree() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("a.txt"), "a\n").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.txt"), "b\n").unwrap();

        let build = build_tree(&repo, dir.path()).unwrap();

        assert_eq!(
            build.digest.to_hex(),
            "972b5b8f25e6b64dc9a3033af8cb531ff783879a"
        );
    }

    #[test]
    fn test_build_stores_children() {
        let (dir, repo) = test_repo();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::write(dir.path().join("a/b/c/file.txt"), "deep").unwrap();
        fs::write(dir.path().join("top.txt"), "top").unwrap();

        let build = build_tree(&repo, dir.path()).unwrap();
        assert!(object_exists(&repo, &build.digest));

        let a = build.tree.get("a").unwrap();
        assert_eq!(a.mode, FileMode::Directory);
        let a_tree = read_tree(&repo, &a.digest).unwrap();
        let b_tree = read_tree(&repo, &a_tree.get("b").unwrap().digest).unwrap();
        let c_tree = read_tree(&repo, &b_tree.get("c").unwrap().digest).unwrap();

        let file = c_tree.get("file.txt").unwrap();
        assert_eq!(read_blob(&repo, &file.digest).unwrap(), b"deep");

        let top = build.tree.get("top.txt").unwrap();
        assert!(object_exists(&repo, &top.digest));
    }

    #[test]
    fn test_build_skips_metadata_dir() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("file"), "x").unwrap();
        fs::create_dir_all(dir.path().join("nested/.git")).unwrap();
        fs::write(dir.path().join("nested/.git/HEAD"), "junk").unwrap();

        let build = build_tree(&repo, dir.path()).unwrap();

        assert!(build.tree.get(".git").is_none());
        let nested = read_tree(&repo, &build.tree.get("nested").unwrap().digest).unwrap();
        assert!(nested.is_empty());
    }

    #[test]
    fn test_build_modes() {
        let (dir, repo) = test_repo();
        let script = dir.path().join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.path().join("plain"), "p").unwrap();
        symlink("does/not/exist", dir.path().join("link")).unwrap();

        let build = build_tree(&repo, dir.path()).unwrap();

        assert_eq!(build.tree.get("run.sh").unwrap().mode, FileMode::Executable);
        assert_eq!(build.tree.get("plain").unwrap().mode, FileMode::Regular);

        let link = build.tree.get("link").unwrap();
        assert_eq!(link.mode, FileMode::Symlink);
        assert_eq!(read_blob(&repo, &link.digest).unwrap(), b"does/not/exist");
    }

    #[test]
    fn test_build_sorted_order() {
        let (dir, repo) = test_repo();
        fs::create_dir(dir.path().join("foo")).unwrap();
        fs::write(dir.path().join("foo/x"), "x").unwrap();
        fs::write(dir.path().join("foo.txt"), "f").unwrap();
        fs::write(dir.path().join("bar"), "b").unwrap();

        let build = build_tree(&repo, dir.path()).unwrap();
        let names: Vec<_> = build.tree.entries().iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, ["bar", "foo.txt", "foo"]);
    }

    #[test]
    fn test_build_unsorted_keeps_listing_order() {
        let (dir, repo) = test_repo();
        for name in ["c", "a", "b"] {
            fs::write(dir.path().join(name), name).unwrap();
        }

        let listing: Vec<_> = list_dir(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name.to_string_lossy().into_owned())
            .filter(|n| n != METADATA_DIR)
            .collect();

        let build = TreeBuilder::new(&repo)
            .sort_entries(false)
            .build(dir.path())
            .unwrap();
        let names: Vec<_> = build.tree.entries().iter().map(|e| e.name.clone()).collect();

        assert_eq!(names, listing);
    }

    #[test]
    fn test_build_empty_directory() {
        let (dir, repo) = test_repo();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let build = build_tree(&repo, dir.path()).unwrap();
        let empty = build.tree.get("empty").unwrap();

        assert_eq!(empty.digest.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
    }

    #[test]
    fn test_build_skips_unsupported_and_continues() {
        let (dir, repo) = test_repo();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/ok.txt"), "ok").unwrap();
        let _listener =
            std::os::unix::net::UnixListener::bind(dir.path().join("sub/sock")).unwrap();
        fs::write(dir.path().join("sibling"), "s").unwrap();

        let build = build_tree(&repo, dir.path()).unwrap();

        assert!(!build.is_complete());
        assert_eq!(build.skipped.len(), 1);
        assert_eq!(build.skipped[0].path, Path::new("sub/sock"));
        assert!(matches!(
            build.skipped[0].error,
            Error::UnsupportedFileType(_)
        ));

        // siblings and the partial subtree are still stored
        assert!(build.tree.get("sibling").is_some());
        let sub = read_tree(&repo, &build.tree.get("sub").unwrap().digest).unwrap();
        assert_eq!(sub.len(), 1);
        assert!(sub.get("ok.txt").is_some());
    }

    #[test]
    fn test_build_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (dir, repo) = test_repo();
        fs::write(dir.path().join("good"), "g").unwrap();
        let bad = dir.path().join(OsStr::from_bytes(b"bad\xff"));
        if fs::write(&bad, "b").is_err() {
            // filesystem refuses non UTF-8 names
            return;
        }

        let build = build_tree(&repo, dir.path()).unwrap();

        assert_eq!(build.tree.len(), 1);
        assert_eq!(build.skipped.len(), 1);
        assert!(matches!(
            build.skipped[0].error,
            Error::InvalidEntryName(_)
        ));
    }

    #[test]
    fn test_build_rejects_missing_or_file_root() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("file"), "x").unwrap();

        assert!(build_tree(&repo, &dir.path().join("absent")).is_err());
        assert!(build_tree(&repo, &dir.path().join("file")).is_err());
    }

    #[test]
    fn test_build_is_deterministic() {
        let (dir, repo) = test_repo();
        fs::create_dir(dir.path().join("d")).unwrap();
        fs::write(dir.path().join("d/f"), "same").unwrap();

        let first = build_tree(&repo, dir.path()).unwrap();
        let second = build_tree(&repo, dir.path()).unwrap();

        assert_eq!(first.digest, second.digest);
    }
}
