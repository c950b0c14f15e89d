use std::fs;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::codec;
use crate::compress;
use crate::error::{Error, IoResultExt, Result};
use crate::fs::write_atomic;
use crate::hash::{digest, Digest, DIGEST_HEX_LEN};
use crate::repo::Repo;
use crate::types::{Object, ObjectKind};

/// shortest abbreviated digest accepted by `resolve_prefix`
pub const MIN_PREFIX_LEN: usize = 4;

/// get the filesystem path to an object: objects/<2 hex>/<38 hex>
pub fn object_path(repo: &Repo, digest: &Digest) -> PathBuf {
    let (dir, file) = digest.to_path_components();
    repo.objects_path().join(dir).join(file)
}

/// check if an object exists in the store
pub fn object_exists(repo: &Repo, digest: &Digest) -> bool {
    object_path(repo, digest).is_file()
}

/// encode, hash, compress and persist an object
pub fn write_object(repo: &Repo, object: &Object) -> Result<Digest> {
    write_raw(repo, object.kind(), &codec::encode_body(object))
}

/// persist a body of the given kind
///
/// writing content that is already stored is a no-op returning the same digest.
pub fn write_raw(repo: &Repo, kind: ObjectKind, body: &[u8]) -> Result<Digest> {
    let framed = codec::frame(kind, body);
    let digest = digest(&framed);

    let (dir, file) = digest.to_path_components();
    let object_dir = repo.objects_path().join(&dir);
    let path = object_dir.join(&file);

    // dedup: if object already exists, we're done
    if path.exists() {
        tracing::debug!(%digest, %kind, "object already stored");
        return Ok(digest);
    }

    fs::create_dir_all(&object_dir).with_path(&object_dir)?;

    let level = repo.config().compression.level;
    write_atomic(&path, |file| compress::compress_to(&framed, level, file))?;

    tracing::debug!(%digest, %kind, size = body.len(), "wrote object");
    Ok(digest)
}

/// read an object's canonical bytes (header included), decompressed
///
/// the bytes are checked against the digest they were requested by and
/// must carry a well-formed `<kind> <len>\0` header; either failure is
/// `CorruptObject`.
pub fn read_raw(repo: &Repo, digest: &Digest) -> Result<Vec<u8>> {
    let raw = read_verified(repo, digest)?;

    if let Err(e) = codec::parse_header(&raw) {
        return Err(Error::CorruptObject {
            digest: *digest,
            reason: e.to_string(),
        });
    }

    tracing::debug!(%digest, size = raw.len(), "read object");
    Ok(raw)
}

/// decompress and hash-check an object without looking at its framing
pub(crate) fn read_verified(repo: &Repo, digest: &Digest) -> Result<Vec<u8>> {
    let path = object_path(repo, digest);

    let compressed = fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*digest)
        } else {
            Error::Io {
                path: path.clone(),
                source: e,
            }
        }
    })?;

    let raw = compress::decompress(&compressed).map_err(|e| Error::CorruptObject {
        digest: *digest,
        reason: format!("decompression failed: {}", e),
    })?;

    let actual = crate::hash::digest(&raw);
    if actual != *digest {
        return Err(Error::CorruptObject {
            digest: *digest,
            reason: format!("content hashes to {}", actual),
        });
    }

    Ok(raw)
}

/// read and decode an object
///
/// a stored body the codec cannot parse is `CorruptObject`.
pub fn read_object(repo: &Repo, digest: &Digest) -> Result<Object> {
    let raw = read_raw(repo, digest)?;
    codec::decode(&raw).map_err(|e| Error::CorruptObject {
        digest: *digest,
        reason: e.to_string(),
    })
}

/// enumerate every object stored under objects/
pub fn list_objects(repo: &Repo) -> Result<Vec<Digest>> {
    let objects = repo.objects_path();
    let mut digests = Vec::new();

    for entry in WalkDir::new(&objects).min_depth(2).max_depth(2).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&objects).to_path_buf();
            Error::Io {
                path,
                source: e.into(),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let dir = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());
        let file = entry.file_name().to_str();

        // skips temp files and anything that isn't a loose object (pack/, info/)
        if let (Some(dir), Some(file)) = (dir, file) {
            if dir.len() == 2 && file.len() == DIGEST_HEX_LEN - 2 {
                if let Ok(digest) = Digest::from_hex(&format!("{}{}", dir, file)) {
                    digests.push(digest);
                }
            }
        }
    }

    Ok(digests)
}

/// resolve a full or abbreviated hex digest to a stored object
pub fn resolve_prefix(repo: &Repo, prefix: &str) -> Result<Digest> {
    if prefix.len() == DIGEST_HEX_LEN {
        return Digest::from_hex(prefix);
    }
    if prefix.len() < MIN_PREFIX_LEN
        || prefix.len() > DIGEST_HEX_LEN
        || !prefix.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(Error::InvalidDigestHex(prefix.to_string()));
    }

    let prefix = prefix.to_ascii_lowercase();
    let (dir, rest) = prefix.split_at(2);
    let fan_out = repo.objects_path().join(dir);

    let read_dir = match fs::read_dir(&fan_out) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::PrefixNotFound(prefix))
        }
        Err(e) => {
            return Err(Error::Io {
                path: fan_out,
                source: e,
            })
        }
    };

    let mut found = None;
    for entry in read_dir {
        let entry = entry.with_path(&fan_out)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.len() != DIGEST_HEX_LEN - 2 || !name.starts_with(rest) {
            continue;
        }
        let Ok(digest) = Digest::from_hex(&format!("{}{}", dir, name)) else {
            continue;
        };
        if found.replace(digest).is_some() {
            return Err(Error::AmbiguousDigest(prefix));
        }
    }

    found.ok_or(Error::PrefixNotFound(prefix))
}
