use crate::input::{read_commits, read_worktree_paths};
use crate::model::Commit;
use crate::output::{output_json, output_ndjson, output_table};
use crate::shard::{shard_size_for, tally_sharded};
use crate::tally::{tally_commits, AuthorKey, Tally, TallyMode, TallyOpts};
use crate::worktree::WorktreeFilter;
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gwho")]
#[command(about = "Rank authors of a git repository by commits, lines, files, or recency")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        default_value = "-",
        help = "NDJSON commit records, one per line (`-` for stdin)"
    )]
    pub commits: PathBuf,

    #[arg(
        long,
        required_unless_present = "all",
        help = "File listing paths present in the working tree, one per line"
    )]
    pub worktree: Option<PathBuf>,

    #[arg(long, help = "Count paths no longer present in the working tree")]
    pub all: bool,

    #[arg(long, value_enum, default_value_t = TallyMode::Commits, help = "Metric to rank authors by")]
    pub mode: TallyMode,

    #[arg(long, value_enum, default_value_t = AuthorKey::Email, help = "How commits are grouped into authors")]
    pub key: AuthorKey,

    #[arg(long, default_value_t = 1, help = "Number of shards to tally in parallel")]
    pub jobs: usize,

    #[arg(long, help = "Commits per shard (overrides the size derived from --jobs)")]
    pub shard_size: Option<usize>,

    #[arg(short = 'n', long, help = "Show only the top N authors")]
    pub limit: Option<usize>,

    #[arg(short = 'e', long, help = "Show author emails in the table")]
    pub email: bool,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, help = "Output as NDJSON")]
    pub ndjson: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let filter = self.load_filter()?;
        let opts = TallyOpts::with_author_key(self.mode, self.key);
        let reader = open_input(&self.commits)
            .with_context(|| format!("Failed to open commit records at {}", self.commits.display()))?;

        let pb = if self.json || self.ndjson {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        };
        pb.set_message("Tallying commits...");

        let mut tallies = if self.jobs > 1 || self.shard_size.is_some() {
            let commits: Vec<Commit> = read_commits(reader)
                .collect::<crate::error::Result<_>>()
                .context("Failed to read commit records")?;
            let shard_size = self
                .shard_size
                .unwrap_or_else(|| shard_size_for(commits.len(), self.jobs));
            tally_sharded(&commits, shard_size, Arc::new(filter), opts)
                .context("Failed to tally commits")?
        } else {
            tally_commits(read_commits(reader), &filter, &opts).context("Failed to tally commits")?
        };

        pb.finish_and_clear();

        if let Some(limit) = self.limit {
            tallies.truncate(limit);
        }

        self.output(&tallies)
    }

    fn load_filter(&self) -> Result<WorktreeFilter> {
        let filter = match &self.worktree {
            Some(path) => {
                let reader = open_input(path)
                    .with_context(|| format!("Failed to open worktree listing at {}", path.display()))?;
                let paths = read_worktree_paths(reader).context("Failed to read worktree listing")?;
                WorktreeFilter::new(paths)
            }
            None => WorktreeFilter::default(),
        };
        debug!(
            "working tree lists {} paths (count outside worktree: {})",
            filter.path_count(),
            self.all
        );
        Ok(filter.with_allow_outside_worktree(self.all))
    }

    fn output(&self, tallies: &[Tally]) -> Result<()> {
        if self.json {
            output_json(tallies, self.mode)
        } else if self.ndjson {
            output_ndjson(tallies)
        } else {
            output_table(tallies, self.mode, self.email)
        }
    }
}

fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}
