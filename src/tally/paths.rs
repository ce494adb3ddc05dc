use super::record::supersedes;
use super::{PartialTally, Tally, TallyOpts};
use crate::error::{Result, SourceError, TallyError};
use crate::model::Commit;
use crate::worktree::WorktreeFilter;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One author's per-path tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorPaths {
    name: String,
    email: String,
    /// Timestamp of the commit the name and email were taken from
    seen_at: Option<DateTime<Utc>>,
    paths: HashMap<String, PartialTally>,
}

impl AuthorPaths {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn paths(&self) -> &HashMap<String, PartialTally> {
        &self.paths
    }

    fn observe(&mut self, commit: &Commit) {
        let candidate = (
            Some(commit.timestamp),
            commit.author_name.as_str(),
            commit.author_email.as_str(),
        );
        if supersedes(candidate, (self.seen_at, &self.name, &self.email)) {
            self.name.clone_from(&commit.author_name);
            self.email.clone_from(&commit.author_email);
            self.seen_at = Some(commit.timestamp);
        }
    }

    fn tally_commit(&mut self, commit: &Commit) {
        self.observe(commit);
        for file in &commit.files {
            let contribution = PartialTally::for_commit(
                commit.id,
                file.added_lines,
                file.deleted_lines,
                commit.timestamp,
            );
            let merged = match self.paths.remove(&file.path) {
                Some(existing) => existing.merge_same_path(contribution),
                None => contribution,
            };
            self.paths.insert(file.path.clone(), merged);
        }
    }

    /// Combines two authors' path maps entrywise.
    pub fn union(self, other: AuthorPaths) -> AuthorPaths {
        let (mut larger, smaller) = if self.paths.len() >= other.paths.len() {
            (self, other)
        } else {
            (other, self)
        };

        if supersedes(
            (smaller.seen_at, &smaller.name, &smaller.email),
            (larger.seen_at, &larger.name, &larger.email),
        ) {
            larger.name = smaller.name;
            larger.email = smaller.email;
            larger.seen_at = smaller.seen_at;
        }

        for (path, tally) in smaller.paths {
            let merged = match larger.paths.remove(&path) {
                Some(existing) => existing.merge_same_path(tally),
                None => tally,
            };
            larger.paths.insert(path, merged);
        }
        larger
    }

    /// Collapses the path map into author-wide figures, counting only the
    /// paths the filter admits.
    pub fn sum(&self, filter: &WorktreeFilter) -> Tally {
        let running = self
            .paths
            .iter()
            .filter(|(path, _)| filter.admits(path))
            .fold(PartialTally::new(0), |acc, (_, tally)| acc.combine(tally));

        Tally {
            author_name: self.name.clone(),
            author_email: self.email.clone(),
            commits: running.commit_count(),
            lines_added: running.added(),
            lines_removed: running.removed(),
            file_count: running.num_tallied(),
            last_commit_time: running.last_commit_time(),
        }
    }
}

/// Author key to that author's per-path tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorPathsTable {
    authors: HashMap<String, AuthorPaths>,
}

impl AuthorPathsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&AuthorPaths> {
        self.authors.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AuthorPaths)> {
        self.authors.iter()
    }

    pub fn add_commit(&mut self, commit: &Commit, opts: &TallyOpts) {
        self.authors
            .entry(opts.key(commit))
            .or_default()
            .tally_commit(commit);
    }

    /// Keys present in one table pass through; shared keys union their paths.
    pub fn union(self, other: AuthorPathsTable) -> AuthorPathsTable {
        let (mut larger, smaller) = if self.authors.len() >= other.authors.len() {
            (self, other)
        } else {
            (other, self)
        };

        for (key, author) in smaller.authors {
            let merged = match larger.authors.remove(&key) {
                Some(existing) => existing.union(author),
                None => author,
            };
            larger.authors.insert(key, merged);
        }
        larger
    }
}

/// Builds the author-paths table from a commit sequence.
pub fn tally_by_paths<I, E>(commits: I, opts: &TallyOpts) -> Result<AuthorPathsTable>
where
    I: IntoIterator<Item = std::result::Result<Commit, E>>,
    E: Into<SourceError>,
{
    let mut table = AuthorPathsTable::new();
    for commit in commits {
        let commit = commit.map_err(TallyError::iteration)?;
        table.add_commit(&commit, opts);
    }
    Ok(table)
}

/// Reduces every author in `table` to a final tally.
pub fn sum_over_paths(table: &AuthorPathsTable, filter: &WorktreeFilter) -> HashMap<String, Tally> {
    table
        .iter()
        .map(|(key, author)| (key.clone(), author.sum(filter)))
        .collect()
}
