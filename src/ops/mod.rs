//! high-level operations on a grove repository

mod cat_file;
mod commit_tree;
mod fsck;
mod hash_object;
mod ls_tree;
mod write_tree;

pub use cat_file::{cat_file, CatFileMode};
pub use commit_tree::{Clock, CommitBuilder, FixedClock, SystemClock, Timestamp};
pub use fsck::{fsck, CorruptObject, FsckReport, MissingObject};
pub use hash_object::hash_object;
pub use ls_tree::{format_ls_tree, list_tree, ls_tree, ls_tree_flat, LsTreeEntry};
pub use write_tree::{build_tree, SkippedEntry, TreeBuild, TreeBuilder};
