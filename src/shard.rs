use crate::error::Result;
use crate::model::Commit;
use crate::tally::{Pipeline, Tally, TallyOpts, TallyPipeline};
use crate::worktree::WorktreeFilter;
use log::debug;
use rayon::prelude::*;
use std::convert::Infallible;
use std::sync::Arc;

/// Tallies `commits` in shards of `shard_size` on the rayon pool.
pub fn tally_sharded(
    commits: &[Commit],
    shard_size: usize,
    filter: Arc<WorktreeFilter>,
    opts: TallyOpts,
) -> Result<Vec<Tally>> {
    match Pipeline::for_opts(opts, filter) {
        Pipeline::Commits(pipeline) => run_pipeline(&pipeline, commits, shard_size),
        Pipeline::Paths(pipeline) => run_pipeline(&pipeline, commits, shard_size),
    }
}

pub fn run_pipeline<P: TallyPipeline>(
    pipeline: &P,
    commits: &[Commit],
    shard_size: usize,
) -> Result<Vec<Tally>> {
    let shard_size = shard_size.max(1);
    debug!(
        "tallying {} commits in {} shards",
        commits.len(),
        commits.len().div_ceil(shard_size)
    );

    let combined = commits
        .par_chunks(shard_size)
        .map(|shard| pipeline.apply(shard.iter().cloned().map(Ok::<_, Infallible>)))
        .try_reduce(Default::default, |a, b| Ok(pipeline.merge(a, b)))?;

    Ok(pipeline.finalize(combined))
}

/// Shard size that spreads `total` commits over `jobs` workers.
pub fn shard_size_for(total: usize, jobs: usize) -> usize {
    total.div_ceil(jobs.max(1)).max(1)
}
