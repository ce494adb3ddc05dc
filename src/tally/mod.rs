pub mod engine;
pub mod mode;
pub mod partial;
pub mod paths;
pub mod pipeline;
pub mod record;

pub use engine::{tally_commits, tally_commits_unranked};
pub use mode::{AuthorKey, TallyMode, TallyOpts};
pub use partial::PartialTally;
pub use paths::{sum_over_paths, tally_by_paths, AuthorPaths, AuthorPathsTable};
pub use pipeline::{CommitCountPipeline, PathsPipeline, Pipeline, TallyPipeline};
pub use record::{rank, Tally};
