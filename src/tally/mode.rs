use crate::model::Commit;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Metric used to rank authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TallyMode {
    Commits,
    Lines,
    Files,
    LastModified,
}

impl TallyMode {
    /// Whether this mode needs per-path diff stats.
    pub fn is_diff_mode(self) -> bool {
        matches!(self, TallyMode::Lines | TallyMode::Files)
    }
}

impl fmt::Display for TallyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TallyMode::Commits => "commits",
            TallyMode::Lines => "lines",
            TallyMode::Files => "files",
            TallyMode::LastModified => "last-modified",
        };
        f.write_str(name)
    }
}

/// Built-in author identity policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AuthorKey {
    #[default]
    Email,
    Name,
    NameEmail,
}

impl AuthorKey {
    pub fn key(self, commit: &Commit) -> String {
        match self {
            AuthorKey::Email => commit.author_email.clone(),
            AuthorKey::Name => commit.author_name.clone(),
            AuthorKey::NameEmail => format!("{} <{}>", commit.author_name, commit.author_email),
        }
    }
}

pub type KeyFn = Arc<dyn Fn(&Commit) -> String + Send + Sync>;

#[derive(Clone)]
pub struct TallyOpts {
    pub mode: TallyMode,
    key: KeyFn,
}

impl TallyOpts {
    /// Groups authors by email.
    pub fn new(mode: TallyMode) -> Self {
        Self::with_author_key(mode, AuthorKey::default())
    }

    pub fn with_author_key(mode: TallyMode, policy: AuthorKey) -> Self {
        Self {
            mode,
            key: Arc::new(move |c: &Commit| policy.key(c)),
        }
    }

    pub fn with_key<F>(mode: TallyMode, key: F) -> Self
    where
        F: Fn(&Commit) -> String + Send + Sync + 'static,
    {
        Self {
            mode,
            key: Arc::new(key),
        }
    }

    pub fn key(&self, commit: &Commit) -> String {
        (self.key)(commit)
    }

    pub fn is_diff_mode(&self) -> bool {
        self.mode.is_diff_mode()
    }
}

impl fmt::Debug for TallyOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TallyOpts")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
