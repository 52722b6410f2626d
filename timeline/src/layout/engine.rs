use super::edges::{BranchEnding, EdgeSynthesizer, PlacedBranch};
use super::lanes::{BranchSpan, LaneAssigner, LaneStrategy};
use crate::axis::{DateAxis, DateRange};
use crate::classify::CommitClassifier;
use crate::config::LayoutConfig;
use crate::core::{BranchKey, BranchRef, Commit, PullRequest, TimelineGraph};
use crate::error::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Runs axis mapping, classification, lane assignment and edge synthesis.
///
/// Holds only configuration; every call lays the graph out from scratch and
/// never reads the clock, so equal inputs give equal output.
#[derive(Debug, Clone, Default)]
pub struct TimelineEngine {
    config: LayoutConfig,
}

/// A branch that passed the window check, before it has a lane
struct Candidate<'c> {
    span: BranchSpan,
    commits: Vec<&'c Commit>,
    ending: BranchEnding,
}

impl TimelineEngine {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out with the lane policy from the config.
    ///
    /// `as_of` stands in for "now": unmerged PR lanes run until then.
    pub fn layout(
        &self,
        commits: &[Commit],
        pull_requests: &[PullRequest],
        default_branch: &str,
        range: &DateRange,
        as_of: DateTime<Utc>,
    ) -> TimelineGraph {
        let mut strategy = self.config.lane_policy.build(self.config.max_concurrent_lanes);
        self.layout_with(commits, pull_requests, default_branch, range, as_of, strategy.as_mut())
    }

    /// Lay out with a caller-supplied lane strategy
    pub fn layout_with(
        &self,
        commits: &[Commit],
        pull_requests: &[PullRequest],
        default_branch: &str,
        range: &DateRange,
        as_of: DateTime<Utc>,
        strategy: &mut dyn LaneStrategy,
    ) -> TimelineGraph {
        let axis = DateAxis::new(*range, &self.config);
        let time_labels = axis.labels();
        let height = axis.height();

        if commits.is_empty() {
            debug!(labels = time_labels.len(), "no commits, labels only");
            return TimelineGraph::empty(time_labels, height);
        }

        let classifier = CommitClassifier::new(pull_requests);
        let classified = classifier.partition(commits, range);
        if classified.is_empty() {
            debug!(total = commits.len(), "no commits inside the window, drawing lane scaffolding");
        }

        let mut candidates = Vec::new();
        for (&number, pr_commits) in &classified.pull_requests {
            let Some(pr) = classifier.pull_request(number) else {
                continue;
            };
            let start = pr_commits[0].date;
            let end = pr.merged_at.unwrap_or(as_of);
            if end < range.start() {
                debug!(pr = number, %end, "branch ended before the window, skipping");
                continue;
            }
            let ending = match pr.merged_at {
                Some(at) if range.contains(at) => BranchEnding::Merged { pr: number, at },
                _ => BranchEnding::Open { until: end },
            };
            candidates.push(Candidate {
                span: BranchSpan {
                    branch: BranchRef::new(BranchKey::PullRequest(number), pr.branch_label()),
                    start,
                    end,
                },
                commits: pr_commits.clone(),
                ending,
            });
        }
        for (name, branch_commits) in &classified.branches {
            let start = branch_commits[0].date;
            let end = branch_commits[branch_commits.len() - 1].date;
            candidates.push(Candidate {
                span: BranchSpan {
                    branch: BranchRef::new(BranchKey::Named(name.clone()), name.clone()),
                    start,
                    end,
                },
                commits: branch_commits.clone(),
                ending: BranchEnding::Untracked,
            });
        }
        candidates.sort_by(|a, b| {
            (a.span.start, &a.span.branch.key).cmp(&(b.span.start, &b.span.branch.key))
        });

        let mut lanes = LaneAssigner::new(&self.config, strategy);
        let placed: Vec<PlacedBranch<'_>> = candidates
            .into_iter()
            .map(|candidate| PlacedBranch {
                lane: lanes.assign(&candidate.span),
                span: candidate.span,
                commits: candidate.commits,
                ending: candidate.ending,
            })
            .collect();
        let lane_count = lanes.lanes_used();

        let mut synth = EdgeSynthesizer::new(&axis, &self.config, default_branch);
        synth.boundaries();
        synth.mainline(&classified.mainline);
        for branch in &placed {
            synth.branch(branch);
        }
        if self.config.weekly_merges {
            synth.weekly_markers();
        }
        let (points, lines) = synth.finish();

        debug!(
            points = points.len(),
            lines = lines.len(),
            branches = placed.len(),
            lanes = lane_count,
            "timeline laid out"
        );

        TimelineGraph {
            points,
            lines,
            time_labels,
            height,
            lane_count,
        }
    }
}

/// Lay out with the default configuration
pub fn layout(
    commits: &[Commit],
    pull_requests: &[PullRequest],
    default_branch: &str,
    range: &DateRange,
    as_of: DateTime<Utc>,
) -> TimelineGraph {
    TimelineEngine::default().layout(commits, pull_requests, default_branch, range, as_of)
}
