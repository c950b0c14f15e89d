use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::hash::Digest;
use crate::types::ObjectKind;

/// a directory tree - entries kept in the order they were given
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// create a new tree, validating entry names
    ///
    /// entries are not reordered; use `sort_canonical` for git ordering.
    pub fn new(entries: Vec<TreeEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            validate_entry_name(&entry.name)?;
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::DuplicateEntryName(entry.name.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// create an empty tree
    pub fn empty() -> Self {
        Self { entries: vec![] }
    }

    /// sort entries the way git does: byte-wise by name, with directory
    /// names compared as if they ended in '/'
    pub fn sort_canonical(&mut self) {
        self.entries.sort_by(canonical_cmp);
    }

    /// get entries slice
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// look up entry by name
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// is tree empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn canonical_cmp(a: &TreeEntry, b: &TreeEntry) -> Ordering {
    let a_key = a.name.bytes().chain(a.mode.is_directory().then_some(b'/'));
    let b_key = b.name.bytes().chain(b.mode.is_directory().then_some(b'/'));
    a_key.cmp(b_key)
}

/// validate an entry name
pub(crate) fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidEntryName("empty name".to_string()));
    }
    if name.contains('/') {
        return Err(Error::InvalidEntryName(format!(
            "name contains '/': {}",
            name
        )));
    }
    if name.contains('\0') {
        return Err(Error::InvalidEntryName(format!(
            "name contains null byte: {:?}",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(Error::InvalidEntryName(format!("reserved name: {}", name)));
    }
    Ok(())
}

/// a single entry in a tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: String,
    pub digest: Digest,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<String>, digest: Digest) -> Self {
        Self {
            mode,
            name: name.into(),
            digest,
        }
    }

    /// kind of object this entry points at
    pub fn object_kind(&self) -> ObjectKind {
        self.mode.object_kind()
    }
}

/// file mode of a tree entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// regular file: 100644
    Regular,
    /// executable file: 100755
    Executable,
    /// symbolic link: 120000
    Symlink,
    /// subdirectory: 40000
    Directory,
}

impl FileMode {
    /// token written into tree bodies
    pub fn as_token(&self) -> &'static str {
        match self {
            FileMode::Regular => "100644",
            FileMode::Executable => "100755",
            FileMode::Symlink => "120000",
            FileMode::Directory => "40000",
        }
    }

    /// parse a mode token as found in a tree body
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "100644" | "100664" => Some(FileMode::Regular),
            "100755" => Some(FileMode::Executable),
            "120000" => Some(FileMode::Symlink),
            "40000" | "040000" => Some(FileMode::Directory),
            _ => None,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FileMode::Directory)
    }

    /// blob for files and links, tree for directories
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            FileMode::Directory => ObjectKind::Tree,
            _ => ObjectKind::Blob,
        }
    }
}

impl fmt::Display for FileMode {
    /// zero-padded to six digits, as listings show it
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>6}", self.as_token())
    }
}
