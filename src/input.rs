use crate::error::{Result, TallyError};
use crate::model::Commit;
use std::collections::HashSet;
use std::io::BufRead;

/// Lazily parses newline-delimited JSON commit records. Blank lines are skipped.
pub fn read_commits<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Commit>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                serde_json::from_str::<Commit>(&line)
                    .map_err(|source| TallyError::Parse { line: idx + 1, source }),
            ),
            Err(e) => Some(Err(TallyError::Io(e))),
        })
}

/// Reads one repo-relative path per line, as `git ls-files` prints them.
pub fn read_worktree_paths<R: BufRead>(reader: R) -> Result<HashSet<String>> {
    let mut paths = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let path = line.trim_end_matches('\r');
        if !path.is_empty() {
            paths.insert(path.to_string());
        }
    }
    Ok(paths)
}
