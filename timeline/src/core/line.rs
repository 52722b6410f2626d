use super::point::BranchPoint;
use serde::Serialize;

/// An edge connecting two timeline points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchLine {
    pub from: BranchPoint,
    pub to: BranchPoint,
    #[serde(rename = "type")]
    pub line_type: LineType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// Continuation within one lane
    Straight,
    /// Development lane out to a feature lane
    Branch,
    /// Back into the development or main lane
    Merge,
}

impl BranchLine {
    pub fn straight(from: &BranchPoint, to: &BranchPoint) -> Self {
        Self::with_type(from, to, LineType::Straight)
    }

    pub fn branch(from: &BranchPoint, to: &BranchPoint) -> Self {
        Self::with_type(from, to, LineType::Branch)
    }

    pub fn merge(from: &BranchPoint, to: &BranchPoint) -> Self {
        Self::with_type(from, to, LineType::Merge)
    }

    fn with_type(from: &BranchPoint, to: &BranchPoint, line_type: LineType) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            line_type,
        }
    }
}
