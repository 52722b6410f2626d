use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a feature branch drawn on its own lane.
///
/// PR branches order before heuristically named ones, then by number or name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BranchKey {
    PullRequest(u64),
    Named(String),
}

impl BranchKey {
    pub fn pr_number(&self) -> Option<u64> {
        match self {
            BranchKey::PullRequest(number) => Some(*number),
            BranchKey::Named(_) => None,
        }
    }
}

impl fmt::Display for BranchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchKey::PullRequest(number) => write!(f, "pr-{}", number),
            BranchKey::Named(name) => write!(f, "ref-{}", name),
        }
    }
}

/// A branch key together with its display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchRef {
    pub key: BranchKey,
    pub name: String,
}

impl BranchRef {
    pub fn new(key: BranchKey, name: impl Into<String>) -> Self {
        Self { key, name: name.into() }
    }
}
