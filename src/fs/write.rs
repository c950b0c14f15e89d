use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{Error, IoResultExt, Result};

/// prefix for in-flight temporary files
pub const TMP_PREFIX: &str = "tmp_obj_";

/// write a file atomically: temp file in the same directory -> fsync -> rename
///
/// the writer closure receives the open temp file and must hand it back once
/// everything is written so it can be synced.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> std::io::Result<File>,
{
    let dir = path
        .parent()
        .ok_or_else(|| Error::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent"),
        })?;

    let tmp_path = tmp_path_in(dir);
    let result = (|| {
        let file = File::create(&tmp_path).with_path(&tmp_path)?;
        let file = write(file).with_path(&tmp_path)?;
        file.sync_all().with_path(&tmp_path)?;
        fs::rename(&tmp_path, path).with_path(path)
    })();

    if result.is_err() {
        // leftover temp file is harmless but untidy
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    fsync_dir(dir)
}

fn tmp_path_in(dir: &Path) -> PathBuf {
    dir.join(format!("{}{}", TMP_PREFIX, uuid::Uuid::new_v4().simple()))
}

/// fsync a directory
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}
