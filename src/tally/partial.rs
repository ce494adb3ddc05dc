use crate::model::CommitId;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// A tally that can be combined with other tallies.
///
/// Commits are deduplicated through `commits`, so the same commit reaching an
/// author through several paths still counts once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialTally {
    commits: HashSet<CommitId>,
    added: u64,
    removed: u64,
    last_commit_time: Option<DateTime<Utc>>,
    num_tallied: usize,
}

impl PartialTally {
    pub fn new(num_tallied: usize) -> Self {
        Self {
            num_tallied,
            ..Self::default()
        }
    }

    /// The contribution of a single commit to one path.
    pub fn for_commit(
        id: CommitId,
        added: u32,
        removed: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut commits = HashSet::with_capacity(1);
        commits.insert(id);
        Self {
            commits,
            added: added as u64,
            removed: removed as u64,
            last_commit_time: Some(timestamp),
            num_tallied: 1,
        }
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn added(&self) -> u64 {
        self.added
    }

    pub fn removed(&self) -> u64 {
        self.removed
    }

    pub fn last_commit_time(&self) -> Option<DateTime<Utc>> {
        self.last_commit_time
    }

    pub fn num_tallied(&self) -> usize {
        self.num_tallied
    }

    /// Returns the combination of `self` and `other`, leaving both untouched.
    pub fn combine(&self, other: &PartialTally) -> PartialTally {
        let (larger, smaller) = if self.commits.len() >= other.commits.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut commits = larger.commits.clone();
        commits.extend(smaller.commits.iter().copied());

        PartialTally {
            commits,
            added: self.added + other.added,
            removed: self.removed + other.removed,
            last_commit_time: self.last_commit_time.max(other.last_commit_time),
            num_tallied: self.num_tallied + other.num_tallied,
        }
    }

    /// Owned form of [`combine`](Self::combine); reuses the larger commit set.
    pub fn merge(self, other: PartialTally) -> PartialTally {
        let num_tallied = self.num_tallied + other.num_tallied;
        self.absorb(other, num_tallied)
    }

    /// Merges two partials describing the same path.
    ///
    /// A path is one file however many commits touched it, so the tallied
    /// count stays at the larger of the two instead of summing.
    pub fn merge_same_path(self, other: PartialTally) -> PartialTally {
        let num_tallied = self.num_tallied.max(other.num_tallied);
        self.absorb(other, num_tallied)
    }

    fn absorb(self, other: PartialTally, num_tallied: usize) -> PartialTally {
        let (mut larger, smaller) = if self.commits.len() >= other.commits.len() {
            (self, other)
        } else {
            (other, self)
        };
        larger.commits.extend(smaller.commits);
        larger.added += smaller.added;
        larger.removed += smaller.removed;
        larger.last_commit_time = larger.last_commit_time.max(smaller.last_commit_time);
        larger.num_tallied = num_tallied;
        larger
    }
}
