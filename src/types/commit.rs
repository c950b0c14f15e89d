use std::fmt;

use crate::error::{Error, Result};
use crate::hash::Digest;

/// who made a change and when
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    /// unix timestamp (seconds since epoch)
    pub timestamp: i64,
    /// offset from UTC in minutes (east positive)
    pub tz_offset_minutes: i32,
}

impl Signature {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: i64,
        tz_offset_minutes: i32,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            timestamp,
            tz_offset_minutes,
        }
    }

    /// parse `Name <email> 1700000000 +0100`
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedObject(format!("invalid signature: {:?}", s));

        let open = s.find('<').ok_or_else(malformed)?;
        let close = s[open..].find('>').map(|i| open + i).ok_or_else(malformed)?;

        let name = s[..open].trim_end().to_string();
        let email = s[open + 1..close].to_string();

        let mut rest = s[close + 1..].split_whitespace();
        let timestamp = rest
            .next()
            .and_then(|t| t.parse::<i64>().ok())
            .ok_or_else(malformed)?;
        let tz_offset_minutes = rest.next().and_then(parse_tz_offset).ok_or_else(malformed)?;
        if rest.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            name,
            email,
            timestamp,
            tz_offset_minutes,
        })
    }

    /// timezone rendered as `+HHMM` / `-HHMM`
    pub fn tz_string(&self) -> String {
        format_tz_offset(self.tz_offset_minutes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp,
            self.tz_string()
        )
    }
}

pub(crate) fn format_tz_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    format!("{}{:02}{:02}", sign, abs / 60, abs % 60)
}

fn parse_tz_offset(s: &str) -> Option<i32> {
    let [sign, h1, h2, m1, m2] = <[u8; 5]>::try_from(s.as_bytes()).ok()?;
    let sign = match sign {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };

    let digit = |b: u8| b.is_ascii_digit().then(|| i32::from(b - b'0'));
    let hours = digit(h1)? * 10 + digit(h2)?;
    let minutes = digit(m1)? * 10 + digit(m2)?;
    Some(sign * (hours * 60 + minutes))
}

/// a commit object pointing to a tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    /// root tree digest
    pub tree: Digest,
    /// parent commit (none for a root commit)
    pub parent: Option<Digest>,
    pub author: Signature,
    pub committer: Signature,
    /// commit message, without the newline appended on encode
    pub message: String,
}

impl Commit {
    /// create a commit where author and committer are the same signature
    pub fn new(
        tree: Digest,
        parent: Option<Digest>,
        signature: Signature,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tree,
            parent,
            author: signature.clone(),
            committer: signature,
            message: message.into(),
        }
    }

    /// is this an initial commit (no parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// first line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}
