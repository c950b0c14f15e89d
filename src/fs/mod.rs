pub mod read;
pub mod write;

pub use read::{list_dir, read_symlink_target, DirEntry, FileMetadata, FileType};
pub use write::{fsync_dir, write_atomic, TMP_PREFIX};
