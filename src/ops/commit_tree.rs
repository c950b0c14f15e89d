use crate::config::Identity;
use crate::error::Result;
use crate::hash::Digest;
use crate::object::write_commit;
use crate::repo::Repo;
use crate::types::{Commit, Signature};

/// a point in time with the UTC offset it was observed in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestamp {
    /// seconds since the unix epoch
    pub seconds: i64,
    /// offset from UTC in minutes (east positive)
    pub tz_offset_minutes: i32,
}

/// source of commit timestamps
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// wall clock in the local timezone
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = chrono::Local::now();
        Timestamp {
            seconds: now.timestamp(),
            tz_offset_minutes: now.offset().local_minus_utc() / 60,
        }
    }
}

/// always returns the same instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// assembles and stores commit objects
pub struct CommitBuilder<'r> {
    repo: &'r Repo,
    identity: Identity,
    clock: Box<dyn Clock>,
}

impl<'r> CommitBuilder<'r> {
    /// builder using the configured identity and the system clock
    pub fn new(repo: &'r Repo) -> Self {
        Self {
            repo,
            identity: repo.config().identity.clone(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// assemble a commit without storing it
    ///
    /// the clock is read once; author and committer carry the same stamp.
    pub fn assemble(&self, tree: Digest, parent: Option<Digest>, message: &str) -> Commit {
        let now = self.clock.now();
        let signature = Signature::new(
            self.identity.name.clone(),
            self.identity.email.clone(),
            now.seconds,
            now.tz_offset_minutes,
        );
        Commit::new(tree, parent, signature, message)
    }

    /// assemble and store a commit
    pub fn build(&self, tree: Digest, parent: Option<Digest>, message: &str) -> Result<Digest> {
        let commit = self.assemble(tree, parent, message);
        let digest = write_commit(self.repo, &commit)?;
        tracing::debug!(%digest, %tree, ?parent, summary = commit.summary(), "wrote commit");
        Ok(digest)
    }

    /// like `build`, taking hex digests; an empty parent means a root commit
    ///
    /// malformed hex is rejected before anything is written. the referenced
    /// objects are not required to exist.
    pub fn build_from_hex(
        &self,
        tree_hex: &str,
        parent_hex: &str,
        message: &str,
    ) -> Result<Digest> {
        let tree = Digest::from_hex(tree_hex.trim())?;
        let parent = match parent_hex.trim() {
            "" => None,
            hex => Some(Digest::from_hex(hex)?),
        };
        self.build(tree, parent, message)
    }
}
