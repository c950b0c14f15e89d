//! grove - git-compatible object store
//!
//! a content-addressed store for file snapshots using git's loose object format,
//! so repositories written by grove can be read by git and vice versa.
//!
//! # Core concepts
//!
//! - **Blob**: raw file content
//! - **Tree**: a directory listing of `(mode, name, digest)` entries
//! - **Commit**: a tree snapshot with an optional parent, author, committer and message
//!
//! # Object format
//!
//! every object is framed as `"<kind> <len>\0<body>"`. the digest is the
//! SHA-1 of the framed bytes; the zlib-compressed frame is stored at
//! `.git/objects/<2 hex>/<38 hex>`.
//!
//! # Example usage
//!
//! ```no_run
//! use grove::{ops, Repo};
//! use std::path::Path;
//!
//! // initialize a repository
//! let repo = Repo::init(Path::new("/path/to/repo")).unwrap();
//!
//! // snapshot a directory
//! let build = ops::build_tree(&repo, Path::new("/source")).unwrap();
//!
//! // and commit it
//! let commit = ops::CommitBuilder::new(&repo)
//!     .build(build.digest, None, "initial commit")
//!     .unwrap();
//! println!("{}", commit);
//! ```

mod config;
mod error;
mod hash;
mod repo;

pub mod codec;
pub mod compress;
pub mod fs;
pub mod object;
pub mod ops;
pub mod types;

pub use config::{CompressionConfig, Config, Identity, TreeConfig};
pub use error::{Error, Result};
pub use hash::{digest, hash_object, Digest, ObjectHasher, DIGEST_HEX_LEN, DIGEST_LEN};
pub use object::{
    list_objects, object_exists, read_blob, read_commit, read_object, read_tree, resolve_prefix,
    write_blob, write_commit, write_object, write_tree,
};
pub use repo::Repo;
pub use types::{Commit, FileMode, Object, ObjectKind, Signature, Tree, TreeEntry};
