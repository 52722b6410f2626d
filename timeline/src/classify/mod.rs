//! Sorting commits into PR branches, heuristically named branches and mainline.

use crate::axis::DateRange;
use crate::core::{Commit, PullRequest};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;
use tracing::trace;

static BRANCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:from|branch|feature|fix)/(\S+)").expect("branch pattern is valid")
});

/// Where a commit belongs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Matched a known pull request
    PullRequest(u64),
    /// Branch name guessed from the message
    Branch(String),
    Mainline,
}

/// Pull the branch token out of messages such as `Merge branch 'x' from feature/login`.
///
/// Best effort: messages that don't follow the `<prefix>/<name>` convention
/// end up on the mainline.
pub fn branch_name_from_message(message: &str) -> Option<&str> {
    BRANCH_PATTERN
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Commits grouped by classification, each group in chronological order
#[derive(Debug, Default)]
pub struct ClassifiedCommits<'a> {
    pub pull_requests: BTreeMap<u64, Vec<&'a Commit>>,
    pub branches: BTreeMap<String, Vec<&'a Commit>>,
    pub mainline: Vec<&'a Commit>,
}

impl ClassifiedCommits<'_> {
    pub fn is_empty(&self) -> bool {
        self.pull_requests.is_empty() && self.branches.is_empty() && self.mainline.is_empty()
    }

    pub fn commit_count(&self) -> usize {
        self.pull_requests.values().map(Vec::len).sum::<usize>()
            + self.branches.values().map(Vec::len).sum::<usize>()
            + self.mainline.len()
    }
}

pub struct CommitClassifier<'a> {
    /// Sorted by number, duplicates dropped
    pull_requests: Vec<&'a PullRequest>,
}

impl<'a> CommitClassifier<'a> {
    pub fn new(pull_requests: &'a [PullRequest]) -> Self {
        let mut sorted: Vec<&PullRequest> = pull_requests.iter().collect();
        sorted.sort_by_key(|pr| pr.number);
        sorted.dedup_by_key(|pr| pr.number);
        Self { pull_requests: sorted }
    }

    /// Look a PR up by number
    pub fn pull_request(&self, number: u64) -> Option<&'a PullRequest> {
        self.pull_requests
            .binary_search_by_key(&number, |pr| pr.number)
            .ok()
            .map(|idx| self.pull_requests[idx])
    }

    /// Lowest-numbered PR the commit belongs to
    pub fn match_pull_request(&self, commit: &Commit) -> Option<&'a PullRequest> {
        let lowered = commit.message.to_lowercase();
        self.pull_requests
            .iter()
            .copied()
            .find(|pr| Self::belongs_to(commit, &lowered, pr))
    }

    fn belongs_to(commit: &Commit, lowered_message: &str, pr: &PullRequest) -> bool {
        if pr.merge_commit_sha.as_deref() == Some(commit.sha.as_str()) {
            return true;
        }
        if lowered_message.contains(&format!("merge pull request #{}", pr.number)) {
            return true;
        }
        commit.message.contains(&format!("(#{})", pr.number))
    }

    pub fn classify(&self, commit: &Commit) -> Classification {
        let class = if let Some(pr) = self.match_pull_request(commit) {
            Classification::PullRequest(pr.number)
        } else if let Some(name) = branch_name_from_message(&commit.message) {
            Classification::Branch(name.to_string())
        } else {
            Classification::Mainline
        };
        trace!(sha = %commit.short_sha(), ?class, "classified commit");
        class
    }

    /// Classify the commits dated within `range`.
    ///
    /// A repeated SHA counts once (first occurrence). Commits on the same
    /// instant keep their input order.
    pub fn partition<'c>(&self, commits: &'c [Commit], range: &DateRange) -> ClassifiedCommits<'c> {
        let mut seen = HashSet::new();
        let mut relevant: Vec<&Commit> = commits
            .iter()
            .filter(|c| range.contains(c.date))
            .filter(|c| seen.insert(c.sha.as_str()))
            .collect();
        relevant.sort_by_key(|c| c.date);

        let mut classified = ClassifiedCommits::default();
        for commit in relevant {
            match self.classify(commit) {
                Classification::PullRequest(number) => {
                    classified.pull_requests.entry(number).or_default().push(commit)
                }
                Classification::Branch(name) => classified.branches.entry(name).or_default().push(commit),
                Classification::Mainline => classified.mainline.push(commit),
            }
        }
        classified
    }
}
