use super::TallyMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Final per-author statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub author_name: String,
    pub author_email: String,
    /// Commits editing counted paths
    pub commits: usize,
    pub lines_added: u64,
    pub lines_removed: u64,
    /// Distinct counted paths touched
    pub file_count: usize,
    pub last_commit_time: Option<DateTime<Utc>>,
}

impl Tally {
    pub fn sort_key(&self, mode: TallyMode) -> i64 {
        match mode {
            TallyMode::Commits => i64::try_from(self.commits).unwrap_or(i64::MAX),
            TallyMode::Files => i64::try_from(self.file_count).unwrap_or(i64::MAX),
            TallyMode::Lines => i64::try_from(self.lines_changed()).unwrap_or(i64::MAX),
            TallyMode::LastModified => self.last_commit_timestamp(),
        }
    }

    /// Ascending order by metric, ties broken by last commit time.
    pub fn compare(&self, other: &Tally, mode: TallyMode) -> Ordering {
        self.sort_key(mode)
            .cmp(&other.sort_key(mode))
            .then_with(|| self.last_commit_time.cmp(&other.last_commit_time))
    }

    pub fn last_commit_timestamp(&self) -> i64 {
        self.last_commit_time.map_or(i64::MIN, |t| t.timestamp())
    }

    pub fn lines_changed(&self) -> u64 {
        self.lines_added.saturating_add(self.lines_removed)
    }
}

/// Display identity observed for an author: when, and under which spelling.
pub(crate) type Identity<'a> = (Option<DateTime<Utc>>, &'a str, &'a str);

/// Whether `candidate` should replace `current` as an author's display
/// identity. Later commits win; equal timestamps fall back to the greater
/// name then email, so the winner is the maximum over all observations.
pub(crate) fn supersedes(candidate: Identity<'_>, current: Identity<'_>) -> bool {
    candidate > current
}

/// Sorts tallies in descending order by `mode`, most recent first on ties.
///
/// Entries that compare equal fall back to email then name so the output is
/// deterministic regardless of the map iteration order that produced them.
pub fn rank<I>(tallies: I, mode: TallyMode) -> Vec<Tally>
where
    I: IntoIterator<Item = Tally>,
{
    let mut sorted: Vec<Tally> = tallies.into_iter().collect();
    sorted.sort_by(|a, b| {
        b.compare(a, mode)
            .then_with(|| a.author_email.cmp(&b.author_email))
            .then_with(|| a.author_name.cmp(&b.author_name))
    });
    sorted
}
