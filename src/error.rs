use crate::tally::TallyMode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TallyError>;

/// Error type carried by a commit sequence element.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("error iterating commits: {0}")]
    Iteration(#[source] SourceError),
    #[error("unsupported tally mode for commit-count pipeline: {0}")]
    UnsupportedMode(TallyMode),
    #[error("commit-count pipeline cannot apply the working-tree filter")]
    FilterUnsupported,
    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid commit id: {0}")]
    InvalidCommitId(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TallyError {
    pub fn iteration<E: Into<SourceError>>(err: E) -> Self {
        TallyError::Iteration(err.into())
    }
}
