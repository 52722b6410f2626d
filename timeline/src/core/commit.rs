use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as listed by the hosting provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Unique commit ID (SHA)
    pub sha: String,
    /// Full commit message
    pub message: String,
    /// Author name
    #[serde(default)]
    pub author: String,
    /// Commit timestamp
    pub date: DateTime<Utc>,
    /// Parent commit IDs
    #[serde(default)]
    pub parents: Vec<String>,
    /// Link to the commit page
    #[serde(default)]
    pub url: String,
}

impl Commit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
            author: String::new(),
            date,
            parents: Vec::new(),
            url: String::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// First 7 characters of the SHA
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// A pull request; only the fields the layout needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    /// Source branch
    #[serde(default)]
    pub head_ref: Option<String>,
    /// Target branch
    #[serde(default)]
    pub base_ref: Option<String>,
    /// Set once merged
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    pub fn new(number: u64) -> Self {
        Self {
            number,
            title: String::new(),
            head_ref: None,
            base_ref: None,
            merge_commit_sha: None,
            merged_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_head_ref(mut self, head_ref: impl Into<String>) -> Self {
        self.head_ref = Some(head_ref.into());
        self
    }

    pub fn with_base_ref(mut self, base_ref: impl Into<String>) -> Self {
        self.base_ref = Some(base_ref.into());
        self
    }

    /// Mark as merged at `merged_at`, optionally through a known merge commit
    pub fn merged(mut self, merge_commit_sha: Option<&str>, merged_at: DateTime<Utc>) -> Self {
        self.merge_commit_sha = merge_commit_sha.map(str::to_string);
        self.merged_at = Some(merged_at);
        self
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Name shown for the PR's lane: the head ref, or `PR-<number>` without one
    pub fn branch_label(&self) -> String {
        match self.head_ref.as_deref() {
            Some(head) if !head.is_empty() => head.to_string(),
            _ => format!("PR-{}", self.number),
        }
    }
}
