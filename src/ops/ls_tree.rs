use std::fmt;

use crate::error::Result;
use crate::hash::Digest;
use crate::object::read_tree;
use crate::repo::Repo;
use crate::types::{Tree, TreeEntry};

/// list tree entry with full path
#[derive(Debug, Clone)]
pub struct LsTreeEntry {
    pub path: String,
    pub entry: TreeEntry,
}

/// list a tree's entries in stored order
///
/// with `recursive`, subtrees are expanded in place and only their leaf
/// entries are listed, with paths relative to the root tree.
pub fn ls_tree(repo: &Repo, digest: &Digest, recursive: bool) -> Result<Vec<LsTreeEntry>> {
    let tree = read_tree(repo, digest)?;

    let mut entries = Vec::new();
    if recursive {
        ls_tree_recursive_impl(repo, &tree, "", &mut entries)?;
    } else {
        entries.extend(ls_tree_flat(&tree));
    }
    Ok(entries)
}

/// entries of an already loaded tree, non-recursive
pub fn ls_tree_flat(tree: &Tree) -> impl Iterator<Item = LsTreeEntry> + '_ {
    tree.entries().iter().map(|entry| LsTreeEntry {
        path: entry.name.clone(),
        entry: entry.clone(),
    })
}

fn ls_tree_recursive_impl(
    repo: &Repo,
    tree: &Tree,
    prefix: &str,
    entries: &mut Vec<LsTreeEntry>,
) -> Result<()> {
    for entry in tree.entries() {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", prefix, entry.name)
        };

        if entry.mode.is_directory() {
            let subtree = read_tree(repo, &entry.digest)?;
            ls_tree_recursive_impl(repo, &subtree, &path, entries)?;
        } else {
            entries.push(LsTreeEntry {
                path,
                entry: entry.clone(),
            });
        }
    }

    Ok(())
}

/// render a listing, one line per entry
///
/// `name_only` prints just the path; otherwise
/// `<mode> <kind> <digest>\t<path>`.
pub fn format_ls_tree(entries: &[LsTreeEntry], name_only: bool) -> String {
    let mut out = String::new();
    for entry in entries {
        if name_only {
            out.push_str(&entry.path);
        } else {
            out.push_str(&entry.to_string());
        }
        out.push('\n');
    }
    out
}

/// read a tree and render its listing
pub fn list_tree(repo: &Repo, digest: &Digest, name_only: bool) -> Result<String> {
    let entries = ls_tree(repo, digest, false)?;
    Ok(format_ls_tree(&entries, name_only))
}

impl fmt::Display for LsTreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}\t{}",
            self.entry.mode,
            self.entry.object_kind(),
            self.entry.digest,
            self.path
        )
    }
}
