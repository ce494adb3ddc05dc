use std::collections::HashSet;

/// Paths present in the working tree, plus the override that admits every path.
#[derive(Debug, Clone, Default)]
pub struct WorktreeFilter {
    paths: HashSet<String>,
    allow_outside_worktree: bool,
}

impl WorktreeFilter {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            allow_outside_worktree: false,
        }
    }

    /// A filter that admits every historically touched path.
    pub fn allow_all() -> Self {
        Self {
            paths: HashSet::new(),
            allow_outside_worktree: true,
        }
    }

    pub fn with_allow_outside_worktree(mut self, allow: bool) -> Self {
        self.allow_outside_worktree = allow;
        self
    }

    pub fn allows_outside_worktree(&self) -> bool {
        self.allow_outside_worktree
    }

    pub fn admits(&self, path: &str) -> bool {
        self.allow_outside_worktree || self.paths.contains(path)
    }

    /// Number of working-tree paths listed, regardless of the override.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }
}
