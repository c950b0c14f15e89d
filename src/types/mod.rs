mod commit;
mod object;
mod tree;

pub use commit::{Commit, Signature};
pub use object::{Object, ObjectKind};
pub use tree::{FileMode, Tree, TreeEntry};

pub(crate) use tree::validate_entry_name;
