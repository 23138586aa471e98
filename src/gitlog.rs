use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::{
    git::{Commit, Commits},
    options::LogOptions,
};

/// The structured history: every kept commit in input order, plus the same
/// commits grouped by the `group_by` field and sorted inside each group by
/// the `sort_by` field.
///
/// Groups appear in the order their key is first seen in `commits`. Commits
/// with an unset group field land in the group with the empty key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GitLog {
    /// All kept commits, in the order they were supplied
    pub commits: Commits,
    /// Group key -> commits, each group sorted ascending by the sort field
    pub groups: IndexMap<String, Commits>,
    /// Number of commits dropped because their header was not recognized
    pub excluded: usize,
    /// Number of commits dropped because their hash was already seen
    pub duplicates: usize,
}

impl GitLog {
    /// Groups and sorts already parsed commits.
    ///
    /// Sorting compares the field values byte-wise and is stable, so commits
    /// with equal sort keys keep their relative input order. Only the first
    /// commit with a given hash is kept.
    ///
    /// # Example
    ///
    /// ```
    /// # use cclog::{GitLog, LogOptions, LogParser, RawCommit};
    /// let options = LogOptions::default();
    /// let parser = LogParser::new(options.clone());
    /// let commits = [
    ///     RawCommit::new("1", "feat(b): one"),
    ///     RawCommit::new("2", "fix(a): two"),
    ///     RawCommit::new("3", "feat(a): three"),
    /// ]
    /// .iter()
    /// .filter_map(|raw| parser.parse_commit(raw))
    /// .collect::<Vec<_>>();
    ///
    /// let log = GitLog::from_commits(&options, commits);
    /// let feats = log.group("feat").unwrap();
    /// assert_eq!("3", feats[0].hash);
    /// assert_eq!("1", feats[1].hash);
    /// ```
    pub fn from_commits<I>(options: &LogOptions, commits: I) -> GitLog
    where
        I: IntoIterator<Item = Commit>,
    {
        let mut seen = HashSet::new();
        let mut duplicates = 0;
        let mut kept = Vec::new();
        for commit in commits {
            if !seen.insert(commit.hash.clone()) {
                debug!("Skipping duplicate commit {}", commit.hash);
                duplicates += 1;
                continue;
            }
            kept.push(commit);
        }

        let group_by = options.group_by();
        let mut groups: IndexMap<String, Commits> = IndexMap::new();
        for commit in &kept {
            groups
                .entry(group_by.value_of(commit).to_owned())
                .or_insert_with(Vec::new)
                .push(commit.clone());
        }

        let sort_by = options.sort_by();
        for group in groups.values_mut() {
            group.sort_by(|a, b| sort_by.value_of(a).cmp(sort_by.value_of(b)));
        }

        debug!(
            "Grouped {} commits by {} into {} groups sorted by {}",
            kept.len(),
            group_by,
            groups.len(),
            sort_by
        );

        GitLog {
            commits: kept,
            groups,
            excluded: 0,
            duplicates,
        }
    }

    // Takes the per-commit parse results, counting the misses
    pub(crate) fn from_parsed<I>(options: &LogOptions, parsed: I) -> GitLog
    where
        I: IntoIterator<Item = Option<Commit>>,
    {
        let mut excluded = 0;
        let commits = parsed
            .into_iter()
            .filter_map(|commit| {
                if commit.is_none() {
                    excluded += 1;
                }
                commit
            })
            .collect::<Vec<_>>();

        if excluded > 0 {
            debug!("Excluded {} commits with an invalid header", excluded);
        }

        GitLog {
            excluded,
            ..GitLog::from_commits(options, commits)
        }
    }

    /// The commits of one group, sorted
    pub fn group(&self, key: &str) -> Option<&[Commit]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Whether any commit carries a note, i.e. the history contains a
    /// breaking change
    pub fn is_breaking(&self) -> bool {
        self.commits.iter().any(Commit::is_breaking)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}
