use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use timeline::{Commit, DateRange, PullRequest, RangePreset};

/// Everything one layout run needs, as fetched by the caller
#[derive(Debug, Deserialize)]
pub struct TimelineInput {
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default)]
    pub range: Option<DateRange>,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,
}

fn default_branch() -> String {
    "main".to_string()
}

impl TimelineInput {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse timeline input {}", path.display()))
    }

    /// A preset wins over the document's own range
    pub fn resolve_range(&self, preset: Option<RangePreset>, as_of: DateTime<Utc>) -> Result<DateRange> {
        match (preset, self.range) {
            (Some(preset), _) => Ok(DateRange::preset(preset, as_of)?),
            (None, Some(range)) => Ok(range),
            (None, None) => bail!("No date range: add \"range\" to the input or pass --preset"),
        }
    }
}
