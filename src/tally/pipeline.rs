//! Map/merge/finalize form of the tally engine.
//!
//! A scheduler splits the commit sequence into shards, calls
//! [`TallyPipeline::apply`] on each (in any order, on any thread), folds the
//! partials together with [`TallyPipeline::merge`] in any order or tree shape,
//! and hands the result to [`TallyPipeline::finalize`] once. The outcome equals
//! [`tally_commits`](super::tally_commits) over the unsharded sequence.

use super::engine::{count_commits, merge_counts, uses_simple_strategy};
use super::paths::{sum_over_paths, tally_by_paths, AuthorPathsTable};
use super::{rank, Tally, TallyOpts};
use crate::error::{Result, SourceError, TallyError};
use crate::model::Commit;
use crate::worktree::WorktreeFilter;
use log::trace;
use std::collections::HashMap;
use std::sync::Arc;

pub trait TallyPipeline: Send + Sync {
    /// Accumulator produced per shard. `Default` is the empty partial.
    type Partial: Default + Send;

    fn apply<I, E>(&self, commits: I) -> Result<Self::Partial>
    where
        I: IntoIterator<Item = std::result::Result<Commit, E>>,
        E: Into<SourceError>;

    /// Consumes both operands; neither may be used again.
    fn merge(&self, a: Self::Partial, b: Self::Partial) -> Self::Partial;

    fn finalize(&self, partial: Self::Partial) -> Vec<Tally>;
}

/// Counts commits per author. Only valid for non-diff modes with the
/// working-tree filter disabled.
#[derive(Debug, Clone)]
pub struct CommitCountPipeline {
    opts: TallyOpts,
}

impl CommitCountPipeline {
    /// Takes the filter in the same form as [`PathsPipeline::new`] so callers
    /// can hand either constructor the shared filter; it is only checked.
    pub fn new(opts: TallyOpts, filter: Arc<WorktreeFilter>) -> Result<Self> {
        if opts.is_diff_mode() {
            return Err(TallyError::UnsupportedMode(opts.mode));
        }
        if !filter.allows_outside_worktree() {
            return Err(TallyError::FilterUnsupported);
        }
        Ok(Self { opts })
    }
}

impl TallyPipeline for CommitCountPipeline {
    type Partial = HashMap<String, Tally>;

    fn apply<I, E>(&self, commits: I) -> Result<Self::Partial>
    where
        I: IntoIterator<Item = std::result::Result<Commit, E>>,
        E: Into<SourceError>,
    {
        let counts = count_commits(commits, &self.opts)?;
        trace!("counted commits for {} authors in shard", counts.len());
        Ok(counts)
    }

    fn merge(&self, a: Self::Partial, b: Self::Partial) -> Self::Partial {
        merge_counts(a, b)
    }

    fn finalize(&self, partial: Self::Partial) -> Vec<Tally> {
        rank(partial.into_values(), self.opts.mode)
    }
}

/// Builds author-paths tables per shard and applies the working-tree filter
/// on finalize.
#[derive(Debug, Clone)]
pub struct PathsPipeline {
    opts: TallyOpts,
    filter: Arc<WorktreeFilter>,
}

impl PathsPipeline {
    pub fn new(opts: TallyOpts, filter: Arc<WorktreeFilter>) -> Self {
        Self { opts, filter }
    }
}

impl TallyPipeline for PathsPipeline {
    type Partial = AuthorPathsTable;

    fn apply<I, E>(&self, commits: I) -> Result<Self::Partial>
    where
        I: IntoIterator<Item = std::result::Result<Commit, E>>,
        E: Into<SourceError>,
    {
        let table = tally_by_paths(commits, &self.opts)?;
        trace!("tallied paths for {} authors in shard", table.len());
        Ok(table)
    }

    fn merge(&self, a: Self::Partial, b: Self::Partial) -> Self::Partial {
        a.union(b)
    }

    fn finalize(&self, partial: Self::Partial) -> Vec<Tally> {
        let tallies = sum_over_paths(&partial, &self.filter);
        trace!("finalized {} authors", tallies.len());
        rank(tallies.into_values(), self.opts.mode)
    }
}

/// The pipeline variant matching the strategy the sequential engine picks.
#[derive(Debug, Clone)]
pub enum Pipeline {
    Commits(CommitCountPipeline),
    Paths(PathsPipeline),
}

impl Pipeline {
    pub fn for_opts(opts: TallyOpts, filter: Arc<WorktreeFilter>) -> Self {
        if uses_simple_strategy(&filter, &opts) {
            Pipeline::Commits(CommitCountPipeline { opts })
        } else {
            Pipeline::Paths(PathsPipeline::new(opts, filter))
        }
    }
}
