pub mod blob;
pub mod commit;
pub mod store;
pub mod tree;

pub use blob::{read_blob, write_blob};
pub use commit::{read_commit, write_commit};
pub use store::{
    list_objects, object_exists, object_path, read_object, read_raw, resolve_prefix, write_object,
    write_raw,
};
pub use tree::{read_tree, write_tree};
