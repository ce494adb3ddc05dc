use chrono::{TimeZone, Utc};
use gwho::shard::run_pipeline;
use gwho::tally::{tally_by_paths, tally_commits_unranked, AuthorKey, Pipeline};
use gwho::{tally_commits, Commit, CommitId, FileStats, Tally, TallyError, TallyMode, TallyOpts, WorktreeFilter};
use pretty_assertions::assert_eq;
use std::convert::Infallible;
use std::sync::Arc;

fn commit(n: u32, name: &str, email: &str, secs: i64, files: &[(&str, u32, u32)]) -> Commit {
    Commit {
        id: CommitId::from_bytes(&n.to_be_bytes()).unwrap(),
        author_name: name.to_string(),
        author_email: email.to_string(),
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        files: files
            .iter()
            .map(|(path, added, deleted)| FileStats {
                path: path.to_string(),
                added_lines: *added,
                deleted_lines: *deleted,
            })
            .collect(),
    }
}

fn ok(commits: &[Commit]) -> impl Iterator<Item = Result<Commit, Infallible>> + '_ {
    commits.iter().cloned().map(Ok)
}

fn scenario() -> Vec<Commit> {
    vec![
        commit(1, "Ann", "a@example.com", 1_000, &[("x.go", 10, 0), ("y.go", 5, 0)]),
        commit(2, "Ben", "b@example.com", 2_000, &[("z.go", 3, 0)]),
    ]
}

fn find<'a>(tallies: &'a [Tally], email: &str) -> &'a Tally {
    tallies.iter().find(|t| t.author_email == email).unwrap()
}

#[test]
fn scenario_with_worktree_filter() {
    let commits = scenario();
    let filter = WorktreeFilter::new(["x.go", "y.go"]);
    let tallies = tally_commits(ok(&commits), &filter, &TallyOpts::new(TallyMode::Lines)).unwrap();

    assert_eq!(tallies.len(), 2);
    assert_eq!(tallies[0].author_email, "a@example.com");
    assert_eq!(tallies[1].author_email, "b@example.com");

    let ann = find(&tallies, "a@example.com");
    assert_eq!(ann.commits, 1);
    assert_eq!(ann.lines_added, 15);
    assert_eq!(ann.file_count, 2);

    // z.go is gone from the tree, so nothing of Ben's commit is counted
    let ben = find(&tallies, "b@example.com");
    assert_eq!(ben.commits, 0);
    assert_eq!(ben.lines_added, 0);
    assert_eq!(ben.file_count, 0);
    assert_eq!(ben.last_commit_time, None);
    assert_eq!(ben.author_name, "Ben");
}

#[test]
fn scenario_with_override() {
    let commits = scenario();
    let filter = WorktreeFilter::new(["x.go", "y.go"]).with_allow_outside_worktree(true);
    let tallies = tally_commits(ok(&commits), &filter, &TallyOpts::new(TallyMode::Lines)).unwrap();

    let ben = find(&tallies, "b@example.com");
    assert_eq!(ben.commits, 1);
    assert_eq!(ben.lines_added, 3);
    assert_eq!(ben.file_count, 1);
}

#[test]
fn commit_touching_many_files_counts_once() {
    let commits = vec![
        commit(1, "Ann", "a@x", 10, &[("a", 1, 0), ("b", 1, 0), ("c", 1, 0), ("d", 1, 0)]),
        commit(2, "Ann", "a@x", 20, &[("a", 2, 2)]),
    ];
    let filter = WorktreeFilter::new(["a", "b", "c", "d"]);
    for mode in [TallyMode::Commits, TallyMode::Lines, TallyMode::Files, TallyMode::LastModified] {
        let tallies = tally_commits(ok(&commits), &filter, &TallyOpts::new(mode)).unwrap();
        assert_eq!(tallies[0].commits, 2, "mode {mode}");
        assert_eq!(tallies[0].file_count, 4, "mode {mode}");
    }
}

#[test]
fn commit_with_deleted_and_present_file() {
    let commits = vec![commit(1, "Ann", "a@x", 10, &[("kept.rs", 4, 1), ("gone.rs", 9, 9)])];
    let filter = WorktreeFilter::new(["kept.rs"]);
    let tallies = tally_commits(ok(&commits), &filter, &TallyOpts::new(TallyMode::Files)).unwrap();

    assert_eq!(
        tallies[0],
        Tally {
            author_name: "Ann".to_string(),
            author_email: "a@x".to_string(),
            commits: 1,
            lines_added: 4,
            lines_removed: 1,
            file_count: 1,
            last_commit_time: Some(Utc.timestamp_opt(10, 0).unwrap()),
        }
    );
}

#[test]
fn last_modified_only_sees_present_paths() {
    let commits = vec![
        commit(1, "Ann", "a@x", 10, &[("kept.rs", 1, 0)]),
        commit(2, "Ann", "a@x", 99, &[("gone.rs", 1, 0)]),
        commit(3, "Ben", "b@x", 50, &[("kept.rs", 1, 0)]),
    ];
    let filter = WorktreeFilter::new(["kept.rs"]);
    let tallies =
        tally_commits(ok(&commits), &filter, &TallyOpts::new(TallyMode::LastModified)).unwrap();

    assert_eq!(tallies[0].author_email, "b@x");
    assert_eq!(tallies[1].last_commit_time, Some(Utc.timestamp_opt(10, 0).unwrap()));
}

#[test]
fn key_policy_controls_grouping() {
    let commits = vec![
        commit(1, "Ann", "ann@work", 10, &[("a", 1, 0)]),
        commit(2, "Ann", "ann@home", 20, &[("b", 1, 0)]),
    ];
    let filter = WorktreeFilter::allow_all();

    let by_email = tally_commits(ok(&commits), &filter, &TallyOpts::new(TallyMode::Lines)).unwrap();
    assert_eq!(by_email.len(), 2);

    let by_name = tally_commits(
        ok(&commits),
        &filter,
        &TallyOpts::with_author_key(TallyMode::Lines, AuthorKey::Name),
    )
    .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].commits, 2);
    assert_eq!(by_name[0].author_email, "ann@home");

    let custom = tally_commits(
        ok(&commits),
        &filter,
        &TallyOpts::with_key(TallyMode::Lines, |c: &Commit| {
            c.author_email.split('@').next().unwrap_or_default().to_string()
        }),
    )
    .unwrap();
    assert_eq!(custom.len(), 1);
}

#[test]
fn ties_rank_most_recent_first() {
    let commits = vec![
        commit(1, "Old", "old@x", 10, &[("a", 5, 0)]),
        commit(2, "New", "new@x", 20, &[("b", 5, 0)]),
    ];
    let tallies =
        tally_commits(ok(&commits), &WorktreeFilter::allow_all(), &TallyOpts::new(TallyMode::Lines)).unwrap();
    assert_eq!(tallies[0].author_email, "new@x");
    assert_eq!(tallies[1].author_email, "old@x");
}

#[test]
fn iteration_error_is_fatal_in_both_strategies() {
    let items = || -> Vec<Result<Commit, std::io::Error>> {
        vec![
            Ok(commit(1, "Ann", "a@x", 10, &[("a", 1, 0)])),
            Err(std::io::Error::other("log truncated")),
            Ok(commit(2, "Ben", "b@x", 20, &[("b", 1, 0)])),
        ]
    };

    let simple = tally_commits(items(), &WorktreeFilter::allow_all(), &TallyOpts::new(TallyMode::Commits));
    assert!(matches!(simple, Err(TallyError::Iteration(_))));

    let paths = tally_commits_unranked(items(), &WorktreeFilter::new(["a"]), &TallyOpts::new(TallyMode::Files));
    let err = paths.unwrap_err();
    assert_eq!(err.to_string(), "error iterating commits: log truncated");
}

#[test]
fn empty_sequence_yields_no_authors() {
    let tallies = tally_commits(ok(&[]), &WorktreeFilter::allow_all(), &TallyOpts::new(TallyMode::Files)).unwrap();
    assert!(tallies.is_empty());

    let table = tally_by_paths(ok(&[]), &TallyOpts::new(TallyMode::Files)).unwrap();
    assert!(table.is_empty());
}

#[test]
fn same_second_spellings_settle_independent_of_order() {
    let ann = commit(1, "Ann", "a@x", 100, &[("a.rs", 1, 0)]);
    let ann_b = commit(2, "Ann B.", "a@x", 100, &[("b.rs", 2, 0)]);
    let filter = Arc::new(WorktreeFilter::allow_all());

    for mode in [TallyMode::Commits, TallyMode::Lines] {
        let opts = TallyOpts::new(mode);
        for commits in [vec![ann.clone(), ann_b.clone()], vec![ann_b.clone(), ann.clone()]] {
            let sequential = tally_commits(ok(&commits), &filter, &opts).unwrap();
            assert_eq!(sequential[0].author_name, "Ann B.");

            let sharded = match Pipeline::for_opts(opts.clone(), filter.clone()) {
                Pipeline::Commits(p) => run_pipeline(&p, &commits, 1).unwrap(),
                Pipeline::Paths(p) => run_pipeline(&p, &commits, 1).unwrap(),
            };
            assert_eq!(sharded, sequential);
        }
    }
}
