use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};

/// file type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Regular,
    Directory,
    Symlink,
    /// fifo, socket or device node
    Other,
}

impl FileType {
    /// detect file type from metadata (symlinks are not followed)
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self::from_std(meta.file_type())
    }

    fn from_std(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            FileType::Symlink
        } else if ft.is_dir() {
            FileType::Directory
        } else if ft.is_file() {
            FileType::Regular
        } else {
            FileType::Other
        }
    }
}

/// one entry of a directory listing
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: OsString,
    pub path: PathBuf,
    pub file_type: FileType,
}

/// list the immediate children of a directory
///
/// entries come back in whatever order the filesystem yields them.
pub fn list_dir(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::Io {
                path,
                source: e.into(),
            }
        })?;

        entries.push(DirEntry {
            name: entry.file_name().to_os_string(),
            path: entry.path().to_path_buf(),
            file_type: FileType::from_std(entry.file_type()),
        });
    }

    Ok(entries)
}

/// metadata for a filesystem entry
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub file_type: FileType,
    /// full st_mode including permission bits
    pub mode: u32,
    pub size: u64,
}

impl FileMetadata {
    /// read metadata from path (does not follow symlinks)
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = fs::symlink_metadata(path).with_path(path)?;
        Ok(Self {
            file_type: FileType::from_metadata(&meta),
            mode: meta.mode(),
            size: meta.len(),
        })
    }

    /// any of the owner/group/other execute bits set
    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// read the raw bytes of a symlink target
pub fn read_symlink_target(path: &Path) -> Result<Vec<u8>> {
    let target = fs::read_link(path).with_path(path)?;
    Ok(target.as_os_str().as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::{symlink, PermissionsExt};
    use tempfile::tempdir;

    #[test]
    fn test_list_dir_types() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/nested"), "y").unwrap();
        symlink("file", dir.path().join("link")).unwrap();

        let mut entries = list_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        // only immediate children
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "file");
        assert_eq!(entries[0].file_type, FileType::Regular);
        assert_eq!(entries[1].name, "link");
        assert_eq!(entries[1].file_type, FileType::Symlink);
        assert_eq!(entries[2].name, "sub");
        assert_eq!(entries[2].file_type, FileType::Directory);
    }

    #[test]
    fn test_list_dir_missing() {
        let dir = tempdir().unwrap();
        let result = list_dir(&dir.path().join("absent"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_file_metadata_executable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.sh");
        fs::write(&path, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!FileMetadata::from_path(&path).unwrap().is_executable());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let meta = FileMetadata::from_path(&path).unwrap();
        assert!(meta.is_executable());
        assert_eq!(meta.file_type, FileType::Regular);
        assert_eq!(meta.size, 10);
    }

    #[test]
    fn test_read_symlink_target() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("link");
        symlink("../some/target", &link).unwrap();

        assert_eq!(read_symlink_target(&link).unwrap(), b"../some/target");
        assert_eq!(
            FileMetadata::from_path(&link).unwrap().file_type,
            FileType::Symlink
        );
    }
}
