//! Per-author authorship statistics over a stream of commit records.
//!
//! The [`tally`] module is the engine: it folds commits into per-author
//! tallies either sequentially ([`tally::tally_commits`]) or through the
//! map/merge/finalize [`tally::TallyPipeline`] for sharded runs. Everything
//! else adapts input and output around it.

pub mod cli;
pub mod error;
pub mod input;
pub mod model;
pub mod output;
pub mod shard;
pub mod tally;
pub mod worktree;

pub use error::{Result, TallyError};
pub use model::{Commit, CommitId, FileStats};
pub use tally::{rank, tally_commits, Tally, TallyMode, TallyOpts};
pub use worktree::WorktreeFilter;
