use super::branch::BranchRef;
use super::commit::Commit;
use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Ids of the line-only markers that bound the main and dev lanes
pub const MAIN_START: &str = "main-start";
pub const MAIN_END: &str = "main-end";
pub const DEV_START: &str = "dev-start";
pub const DEV_END: &str = "dev-end";

pub const BOUNDARY_IDS: [&str; 4] = [MAIN_START, MAIN_END, DEV_START, DEV_END];

/// Which track a commit point sits on
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Unclassified commit, drawn on the development lane
    Mainline,
    Feature(BranchRef),
}

/// What a point stands for. The boolean views (`is_pr`, `is_main_branch`,
/// `is_synthetic`) are derived from this and cannot disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointRole {
    /// End of a main/dev lane line
    Boundary,
    Commit { track: Track },
    /// Fork on the development lane
    BranchOut { branch: BranchRef },
    /// Open end of an unmerged PR lane
    BranchTip { branch: BranchRef },
    /// PR landing on the development lane
    PrMerge { pr: u64 },
    /// Dev side of a weekly dev -> main marker
    WeeklySource { date: NaiveDate },
    /// Main side of a weekly dev -> main marker
    WeeklyMerge { date: NaiveDate },
}

/// A positioned node of the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct BranchPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Source commit; `None` for boundary and synthetic markers
    pub commit: Option<Commit>,
    pub branch_name: Option<String>,
    pub role: PointRole,
}

impl BranchPoint {
    pub fn new(id: impl Into<String>, x: f64, y: f64, role: PointRole) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            commit: None,
            branch_name: None,
            role,
        }
    }

    pub fn with_commit(mut self, commit: &Commit) -> Self {
        self.commit = Some(commit.clone());
        self
    }

    pub fn with_branch_name(mut self, name: impl Into<String>) -> Self {
        self.branch_name = Some(name.into());
        self
    }

    pub fn is_main_branch(&self) -> bool {
        matches!(
            self.role,
            PointRole::Boundary
                | PointRole::Commit { track: Track::Mainline }
                | PointRole::PrMerge { .. }
                | PointRole::WeeklySource { .. }
                | PointRole::WeeklyMerge { .. }
        )
    }

    /// Only merge-back points count as PR points
    pub fn is_pr(&self) -> bool {
        matches!(self.role, PointRole::PrMerge { .. })
    }

    pub fn pr_number(&self) -> Option<u64> {
        match &self.role {
            PointRole::PrMerge { pr } => Some(*pr),
            _ => self.branch().and_then(|branch| branch.key.pr_number()),
        }
    }

    /// Fabricated scaffolding, not derived from repository history
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self.role,
            PointRole::WeeklySource { .. } | PointRole::WeeklyMerge { .. }
        )
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self.role, PointRole::Boundary)
    }

    /// Feature branch this point belongs to, if any
    pub fn branch(&self) -> Option<&BranchRef> {
        match &self.role {
            PointRole::Commit { track: Track::Feature(branch) }
            | PointRole::BranchOut { branch }
            | PointRole::BranchTip { branch } => Some(branch),
            _ => None,
        }
    }

    pub fn commit_sha(&self) -> Option<&str> {
        self.commit.as_ref().map(|c| c.sha.as_str())
    }
}

impl Serialize for BranchPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BranchPoint", 10)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.serialize_field("commit", &self.commit)?;
        state.serialize_field("branch_name", &self.branch_name)?;
        state.serialize_field("role", &self.role)?;
        state.serialize_field("is_main_branch", &self.is_main_branch())?;
        state.serialize_field("is_pr", &self.is_pr())?;
        state.serialize_field("pr_number", &self.pr_number())?;
        state.serialize_field("synthetic", &self.is_synthetic())?;
        state.end()
    }
}
