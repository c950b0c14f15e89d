//! canonical byte encoding of objects
//!
//! every object is framed as `<kind> <body-len>\0<body>`. tree bodies are a
//! run of `<mode> <name>\0<20 raw digest bytes>` records; commit bodies are
//! line-oriented text followed by a blank line and the message.

use crate::error::{Error, Result};
use crate::hash::{Digest, DIGEST_LEN};
use crate::types::{Commit, FileMode, Object, ObjectKind, Signature, Tree, TreeEntry};

/// encode an object to its canonical framed bytes
pub fn encode(object: &Object) -> Vec<u8> {
    frame(object.kind(), &encode_body(object))
}

/// encode only the body of an object (no header)
pub fn encode_body(object: &Object) -> Vec<u8> {
    match object {
        Object::Blob(content) => content.clone(),
        Object::Tree(tree) => encode_tree_body(tree),
        Object::Commit(commit) => encode_commit_body(commit).into_bytes(),
    }
}

/// prepend the `<kind> <len>\0` header to a body
pub fn frame(kind: ObjectKind, body: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind, body.len());
    let mut out = Vec::with_capacity(header.len() + body.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(body);
    out
}

/// split framed bytes into kind and body
///
/// fails when there is no NUL, the kind is unknown, or the declared length
/// disagrees with the body.
pub fn parse_header(bytes: &[u8]) -> Result<(ObjectKind, &[u8])> {
    let nul = bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::MalformedObject("missing NUL after header".to_string()))?;

    let header = std::str::from_utf8(&bytes[..nul])
        .map_err(|_| Error::MalformedObject("header is not valid UTF-8".to_string()))?;
    let (kind, len) = header
        .split_once(' ')
        .ok_or_else(|| Error::MalformedObject(format!("invalid header {:?}", header)))?;

    let kind: ObjectKind = kind.parse()?;
    let declared: usize = len
        .parse()
        .map_err(|_| Error::MalformedObject(format!("invalid length {:?}", len)))?;

    let body = &bytes[nul + 1..];
    if body.len() != declared {
        return Err(Error::MalformedObject(format!(
            "declared length {} but body is {} bytes",
            declared,
            body.len()
        )));
    }

    Ok((kind, body))
}

/// decode canonical framed bytes into an object
pub fn decode(bytes: &[u8]) -> Result<Object> {
    let (kind, body) = parse_header(bytes)?;
    decode_body(kind, body)
}

/// decode a body whose kind is already known
pub fn decode_body(kind: ObjectKind, body: &[u8]) -> Result<Object> {
    match kind {
        ObjectKind::Blob => Ok(Object::Blob(body.to_vec())),
        ObjectKind::Tree => decode_tree_body(body).map(Object::Tree),
        ObjectKind::Commit => decode_commit_body(body).map(Object::Commit),
    }
}

fn encode_tree_body(tree: &Tree) -> Vec<u8> {
    let mut out = Vec::new();
    for entry in tree.entries() {
        out.extend_from_slice(entry.mode.as_token().as_bytes());
        out.push(b' ');
        out.extend_from_slice(entry.name.as_bytes());
        out.push(0);
        out.extend_from_slice(entry.digest.as_bytes());
    }
    out
}

/// parse tree records by offset: the text part ends at the first NUL, then
/// exactly 20 raw bytes follow. digest bytes may contain NUL or space, so the
/// scan for the next record resumes after them rather than splitting on NUL.
fn decode_tree_body(body: &[u8]) -> Result<Tree> {
    let mut entries = Vec::new();
    let mut pos = 0;

    while pos < body.len() {
        let nul = body[pos..]
            .iter()
            .position(|&b| b == 0)
            .map(|i| pos + i)
            .ok_or_else(|| {
                Error::MalformedObject(format!("tree entry at offset {} has no NUL", pos))
            })?;

        let record = &body[pos..nul];
        let space = record.iter().position(|&b| b == b' ').ok_or_else(|| {
            Error::MalformedObject(format!("tree entry at offset {} has no mode", pos))
        })?;

        let token = std::str::from_utf8(&record[..space])
            .map_err(|_| Error::MalformedObject("mode is not valid UTF-8".to_string()))?;
        let mode = FileMode::from_token(token)
            .ok_or_else(|| Error::MalformedObject(format!("unknown mode {:?}", token)))?;
        let name = std::str::from_utf8(&record[space + 1..])
            .map_err(|_| Error::MalformedObject("entry name is not valid UTF-8".to_string()))?;

        let digest_start = nul + 1;
        let digest_end = digest_start + DIGEST_LEN;
        let digest = body
            .get(digest_start..digest_end)
            .and_then(Digest::from_slice)
            .ok_or_else(|| {
                Error::MalformedObject(format!("tree entry {:?} has a truncated digest", name))
            })?;

        entries.push(TreeEntry::new(mode, name, digest));
        pos = digest_end;
    }

    Tree::new(entries).map_err(|e| Error::MalformedObject(e.to_string()))
}

fn encode_commit_body(commit: &Commit) -> String {
    let mut out = format!("tree {}\n", commit.tree);
    if let Some(parent) = &commit.parent {
        out.push_str(&format!("parent {}\n", parent));
    }
    out.push_str(&format!("author {}\n", commit.author));
    out.push_str(&format!("committer {}\n", commit.committer));
    out.push('\n');
    out.push_str(&commit.message);
    out.push('\n');
    out
}

fn decode_commit_body(body: &[u8]) -> Result<Commit> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::MalformedObject("commit is not valid UTF-8".to_string()))?;
    let (headers, message) = text
        .split_once("\n\n")
        .ok_or_else(|| Error::MalformedObject("commit has no message separator".to_string()))?;

    let mut tree = None;
    let mut parent = None;
    let mut author = None;
    let mut committer = None;

    for line in headers.lines() {
        if let Some(value) = line.strip_prefix("tree ") {
            tree = Some(Digest::from_hex(value).map_err(malformed_digest)?);
        } else if let Some(value) = line.strip_prefix("parent ") {
            if parent.is_some() {
                return Err(Error::MalformedObject(
                    "commit has more than one parent".to_string(),
                ));
            }
            parent = Some(Digest::from_hex(value).map_err(malformed_digest)?);
        } else if let Some(value) = line.strip_prefix("author ") {
            author = Some(Signature::parse(value)?);
        } else if let Some(value) = line.strip_prefix("committer ") {
            committer = Some(Signature::parse(value)?);
        }
        // other headers (gpgsig, encoding, continuation lines) are ignored
    }

    let missing = |field: &str| Error::MalformedObject(format!("commit is missing {}", field));
    let message = message.strip_suffix('\n').unwrap_or(message);

    Ok(Commit {
        tree: tree.ok_or_else(|| missing("tree"))?,
        parent,
        author: author.ok_or_else(|| missing("author"))?,
        committer: committer.ok_or_else(|| missing("committer"))?,
        message: message.to_string(),
    })
}

fn malformed_digest(e: Error) -> Error {
    Error::MalformedObject(e.to_string())
}
