use super::paths::{sum_over_paths, tally_by_paths};
use super::record::supersedes;
use super::{rank, Tally, TallyOpts};
use crate::error::{Result, SourceError, TallyError};
use crate::model::Commit;
use crate::worktree::WorktreeFilter;
use log::debug;
use std::collections::HashMap;
use std::time::Instant;

/// Tallies `commits` and returns one entry per author, in descending order
/// by the metric `opts.mode` selects.
pub fn tally_commits<I, E>(
    commits: I,
    filter: &WorktreeFilter,
    opts: &TallyOpts,
) -> Result<Vec<Tally>>
where
    I: IntoIterator<Item = std::result::Result<Commit, E>>,
    E: Into<SourceError>,
{
    let tallies = tally_commits_unranked(commits, filter, opts)?;
    Ok(rank(tallies.into_values(), opts.mode))
}

/// Whether the commit-count strategy can stand in for the path-aware one.
pub(crate) fn uses_simple_strategy(filter: &WorktreeFilter, opts: &TallyOpts) -> bool {
    !opts.is_diff_mode() && filter.allows_outside_worktree()
}

/// Map of author key to final tally.
pub fn tally_commits_unranked<I, E>(
    commits: I,
    filter: &WorktreeFilter,
    opts: &TallyOpts,
) -> Result<HashMap<String, Tally>>
where
    I: IntoIterator<Item = std::result::Result<Commit, E>>,
    E: Into<SourceError>,
{
    let start = Instant::now();

    let tallies = if uses_simple_strategy(filter, opts) {
        count_commits(commits, opts)?
    } else {
        let table = tally_by_paths(commits, opts)?;
        sum_over_paths(&table, filter)
    };

    debug!(
        "tallied commits for {} authors in {} ms",
        tallies.len(),
        start.elapsed().as_millis()
    );
    Ok(tallies)
}

/// Counts commits per author without looking at diffs.
pub(crate) fn count_commits<I, E>(commits: I, opts: &TallyOpts) -> Result<HashMap<String, Tally>>
where
    I: IntoIterator<Item = std::result::Result<Commit, E>>,
    E: Into<SourceError>,
{
    let mut tallies: HashMap<String, Tally> = HashMap::new();

    for commit in commits {
        let commit = commit.map_err(TallyError::iteration)?;
        let tally = tallies.entry(opts.key(&commit)).or_default();

        let candidate = (
            Some(commit.timestamp),
            commit.author_name.as_str(),
            commit.author_email.as_str(),
        );
        if supersedes(
            candidate,
            (tally.last_commit_time, &tally.author_name, &tally.author_email),
        ) {
            tally.author_name.clone_from(&commit.author_name);
            tally.author_email.clone_from(&commit.author_email);
            tally.last_commit_time = Some(commit.timestamp);
        }
        tally.commits += 1;
    }

    Ok(tallies)
}

/// Entrywise sum of commit counts; the superseding identity and time win.
pub(crate) fn merge_counts(
    a: HashMap<String, Tally>,
    b: HashMap<String, Tally>,
) -> HashMap<String, Tally> {
    let (mut larger, smaller) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    for (key, tally) in smaller {
        match larger.get_mut(&key) {
            Some(existing) => {
                existing.commits += tally.commits;
                if supersedes(
                    (tally.last_commit_time, &tally.author_name, &tally.author_email),
                    (existing.last_commit_time, &existing.author_name, &existing.author_email),
                ) {
                    existing.author_name = tally.author_name;
                    existing.author_email = tally.author_email;
                    existing.last_commit_time = tally.last_commit_time;
                }
            }
            None => {
                larger.insert(key, tally);
            }
        }
    }
    larger
}
