use super::line::{BranchLine, LineType};
use super::point::{BranchPoint, PointRole, BOUNDARY_IDS};
use serde::Serialize;
use std::collections::HashSet;

/// Axis annotation at the pixel row of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeLabel {
    pub y: f64,
    pub text: String,
}

/// Positioned timeline, ready for a renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineGraph {
    pub points: Vec<BranchPoint>,
    pub lines: Vec<BranchLine>,
    pub time_labels: Vec<TimeLabel>,
    /// Canvas height in pixels
    pub height: f64,
    /// Distinct feature lanes in use
    pub lane_count: usize,
}

impl TimelineGraph {
    /// A graph with axis labels only
    pub fn empty(time_labels: Vec<TimeLabel>, height: f64) -> Self {
        Self {
            points: Vec::new(),
            lines: Vec::new(),
            time_labels,
            height,
            lane_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }

    /// Look up a point by id
    pub fn point(&self, id: &str) -> Option<&BranchPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Lines ending at the point `id`
    pub fn lines_into<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a BranchLine> + 'a {
        self.lines.iter().filter(move |line| line.to.id == id)
    }

    /// Line endpoint ids that match neither a point nor a boundary marker
    pub fn unresolved_endpoints(&self) -> Vec<&str> {
        let known: HashSet<&str> = self
            .points
            .iter()
            .map(|p| p.id.as_str())
            .chain(BOUNDARY_IDS)
            .collect();

        self.lines
            .iter()
            .flat_map(|line| [line.from.id.as_str(), line.to.id.as_str()])
            .filter(|id| !known.contains(id))
            .collect()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let count_lines = |kind: LineType| self.lines.iter().filter(|l| l.line_type == kind).count();

        GraphStats {
            total_points: self.points.len(),
            total_lines: self.lines.len(),
            straight_lines: count_lines(LineType::Straight),
            branch_lines: count_lines(LineType::Branch),
            merge_lines: count_lines(LineType::Merge),
            pr_merges: self.points.iter().filter(|p| p.is_pr()).count(),
            synthetic_points: self.points.iter().filter(|p| p.is_synthetic()).count(),
            commit_points: self
                .points
                .iter()
                .filter(|p| matches!(p.role, PointRole::Commit { .. }))
                .count(),
            lanes: self.lane_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub total_points: usize,
    pub total_lines: usize,
    pub straight_lines: usize,
    pub branch_lines: usize,
    pub merge_lines: usize,
    pub pr_merges: usize,
    pub synthetic_points: usize,
    pub commit_points: usize,
    pub lanes: usize,
}
