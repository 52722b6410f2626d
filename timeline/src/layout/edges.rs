use super::lanes::{BranchSpan, LanePosition};
use crate::axis::DateAxis;
use crate::config::LayoutConfig;
use crate::core::{
    BranchLine, BranchPoint, Commit, PointRole, Track, DEV_END, DEV_START, MAIN_END, MAIN_START,
};
use chrono::{DateTime, Datelike, Utc};

/// How a branch's lane ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchEnding {
    /// PR merged inside the window
    Merged { pr: u64, at: DateTime<Utc> },
    /// PR not merged inside the window; the lane runs on until `until`
    Open { until: DateTime<Utc> },
    /// Heuristic branch; stops at its last commit
    Untracked,
}

/// A branch with its lane and in-window commits (oldest first, never empty)
#[derive(Debug, Clone)]
pub struct PlacedBranch<'c> {
    pub span: BranchSpan,
    pub lane: LanePosition,
    pub commits: Vec<&'c Commit>,
    pub ending: BranchEnding,
}

/// Collects points and the lines between them
pub struct EdgeSynthesizer<'a> {
    axis: &'a DateAxis<'a>,
    config: &'a LayoutConfig,
    default_branch: &'a str,
    points: Vec<BranchPoint>,
    lines: Vec<BranchLine>,
}

impl<'a> EdgeSynthesizer<'a> {
    pub fn new(axis: &'a DateAxis<'a>, config: &'a LayoutConfig, default_branch: &'a str) -> Self {
        Self {
            axis,
            config,
            default_branch,
            points: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Full-height main and dev lane lines. Their endpoints are line-only.
    pub fn boundaries(&mut self) {
        let range = self.axis.range();
        let top = self.axis.date_to_y(range.start());
        let bottom = self.axis.date_to_y(range.end());

        let main_start = BranchPoint::new(MAIN_START, self.config.main_x, top, PointRole::Boundary)
            .with_branch_name("main");
        let main_end = BranchPoint::new(MAIN_END, self.config.main_x, bottom, PointRole::Boundary)
            .with_branch_name("main");
        self.lines.push(BranchLine::straight(&main_start, &main_end));

        let dev_start = BranchPoint::new(DEV_START, self.config.dev_x, top, PointRole::Boundary)
            .with_branch_name(self.default_branch);
        let dev_end = BranchPoint::new(DEV_END, self.config.dev_x, bottom, PointRole::Boundary)
            .with_branch_name(self.default_branch);
        self.lines.push(BranchLine::straight(&dev_start, &dev_end));
    }

    /// Unclassified commits sit on the dev lane line
    pub fn mainline(&mut self, commits: &[&Commit]) {
        for commit in commits {
            let point = BranchPoint::new(
                commit.sha.clone(),
                self.config.dev_x,
                self.axis.date_to_y(commit.date),
                PointRole::Commit { track: Track::Mainline },
            )
            .with_commit(commit)
            .with_branch_name(self.default_branch);
            self.points.push(point);
        }
    }

    /// Fork, in-lane chain, and merge-back or open tail for one branch
    pub fn branch(&mut self, placed: &PlacedBranch<'_>) {
        let (Some(first), Some(last)) = (placed.commits.first(), placed.commits.last()) else {
            return;
        };
        let branch = &placed.span.branch;
        let key = &branch.key;

        let out = BranchPoint::new(
            format!("branch-out-{}", key),
            self.config.dev_x,
            self.axis.date_to_y(placed.span.start),
            PointRole::BranchOut { branch: branch.clone() },
        )
        .with_commit(first)
        .with_branch_name(&branch.name);
        self.points.push(out.clone());

        let mut previous = out;
        for (idx, commit) in placed.commits.iter().enumerate() {
            let point = BranchPoint::new(
                commit.sha.clone(),
                placed.lane.x,
                self.axis.date_to_y(commit.date),
                PointRole::Commit { track: Track::Feature(branch.clone()) },
            )
            .with_commit(commit)
            .with_branch_name(&branch.name);

            let line = if idx == 0 {
                BranchLine::branch(&previous, &point)
            } else {
                BranchLine::straight(&previous, &point)
            };
            self.lines.push(line);
            self.points.push(point.clone());
            previous = point;
        }

        match placed.ending {
            BranchEnding::Merged { pr, at } => {
                let merge = BranchPoint::new(
                    format!("merge-{}", pr),
                    self.config.dev_x,
                    self.axis.date_to_y(at),
                    PointRole::PrMerge { pr },
                )
                .with_commit(last)
                .with_branch_name(self.default_branch);
                self.lines.push(BranchLine::merge(&previous, &merge));
                self.points.push(merge);
            }
            BranchEnding::Open { until } => {
                let tip_y = self.axis.date_to_y(until.min(self.axis.range().end()));
                if tip_y > previous.y {
                    let tip = BranchPoint::new(
                        format!("branch-tip-{}", key),
                        placed.lane.x,
                        tip_y,
                        PointRole::BranchTip { branch: branch.clone() },
                    )
                    .with_branch_name(&branch.name);
                    self.lines.push(BranchLine::straight(&previous, &tip));
                    self.points.push(tip);
                }
            }
            BranchEnding::Untracked => {}
        }
    }

    /// Fabricated dev -> main merges on the configured weekday, for rhythm only
    pub fn weekly_markers(&mut self) {
        let days: Vec<DateTime<Utc>> = self
            .axis
            .range()
            .days()
            .filter(|day| day.weekday() == self.config.weekly_merge_day)
            .collect();

        for day in days {
            let date = day.date_naive();
            let y = self.axis.date_to_y(day);

            let source = BranchPoint::new(
                format!("weekly-dev-{}", date),
                self.config.dev_x,
                y,
                PointRole::WeeklySource { date },
            )
            .with_branch_name(self.default_branch);
            let target = BranchPoint::new(
                format!("weekly-merge-{}", date),
                self.config.main_x,
                y,
                PointRole::WeeklyMerge { date },
            )
            .with_branch_name("main");

            self.lines.push(BranchLine::merge(&source, &target));
            self.points.push(source);
            self.points.push(target);
        }
    }

    pub fn finish(self) -> (Vec<BranchPoint>, Vec<BranchLine>) {
        (self.points, self.lines)
    }
}
