use crate::config::LayoutConfig;
use crate::core::{BranchKey, BranchRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A branch waiting for a lane, with the time it occupies one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSpan {
    pub branch: BranchRef,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Latest occupant of a feature lane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneSlot {
    pub index: usize,
    pub occupant: BranchKey,
    pub until: DateTime<Utc>,
}

/// Policy deciding which feature lane a branch gets.
///
/// Branches arrive in start order. `active_lanes` holds one slot per lane
/// handed out so far, ordered by index. Returned indices past the lane budget
/// are clamped by the caller.
pub trait LaneStrategy {
    fn assign_lane(&mut self, branch: &BranchSpan, active_lanes: &[LaneSlot]) -> usize;
}

/// Hands out lanes 0, 1, .. max-1 and then starts over at 0, whether or not
/// the branch on that lane has finished. Unrelated branches can overlap.
pub struct RoundRobinLanes {
    max_lanes: usize,
    next: usize,
}

impl RoundRobinLanes {
    pub fn new(max_lanes: usize) -> Self {
        Self { max_lanes: max_lanes.max(1), next: 0 }
    }
}

impl LaneStrategy for RoundRobinLanes {
    fn assign_lane(&mut self, _branch: &BranchSpan, _active_lanes: &[LaneSlot]) -> usize {
        let lane = self.next;
        self.next = (self.next + 1) % self.max_lanes;
        lane
    }
}

/// Reuses the lowest lane whose branch ended before this one starts; when
/// all are busy, takes the lane that frees up first.
pub struct FirstFreeLanes {
    max_lanes: usize,
}

impl FirstFreeLanes {
    pub fn new(max_lanes: usize) -> Self {
        Self { max_lanes: max_lanes.max(1) }
    }
}

impl LaneStrategy for FirstFreeLanes {
    fn assign_lane(&mut self, branch: &BranchSpan, active_lanes: &[LaneSlot]) -> usize {
        let free = (0..self.max_lanes).find(|&idx| {
            active_lanes
                .iter()
                .find(|slot| slot.index == idx)
                .map_or(true, |slot| slot.until < branch.start)
        });

        free.unwrap_or_else(|| {
            active_lanes
                .iter()
                .min_by_key(|slot| (slot.until, slot.index))
                .map(|slot| slot.index)
                .unwrap_or(0)
        })
    }
}

/// Named lane policies, selectable from config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanePolicy {
    #[default]
    RoundRobin,
    FirstFree,
}

impl LanePolicy {
    pub fn build(self, max_lanes: usize) -> Box<dyn LaneStrategy> {
        match self {
            LanePolicy::RoundRobin => Box::new(RoundRobinLanes::new(max_lanes)),
            LanePolicy::FirstFree => Box::new(FirstFreeLanes::new(max_lanes)),
        }
    }
}

/// Where a branch was placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanePosition {
    pub index: usize,
    pub x: f64,
}

/// Tracks lane occupancy and turns strategy picks into pixel positions
pub struct LaneAssigner<'a> {
    config: &'a LayoutConfig,
    strategy: &'a mut dyn LaneStrategy,
    slots: Vec<LaneSlot>,
}

impl<'a> LaneAssigner<'a> {
    pub fn new(config: &'a LayoutConfig, strategy: &'a mut dyn LaneStrategy) -> Self {
        Self {
            config,
            strategy,
            slots: Vec::new(),
        }
    }

    pub fn assign(&mut self, span: &BranchSpan) -> LanePosition {
        let max_lanes = self.config.max_concurrent_lanes.max(1);
        let index = self.strategy.assign_lane(span, &self.slots).min(max_lanes - 1);

        let slot = LaneSlot {
            index,
            occupant: span.branch.key.clone(),
            until: span.end,
        };
        match self.slots.binary_search_by_key(&index, |s| s.index) {
            Ok(pos) => {
                let previous = &self.slots[pos];
                if previous.until >= span.start {
                    debug!(
                        lane = index,
                        branch = %span.branch.key,
                        overlaps = %previous.occupant,
                        "recycling a lane that is still occupied"
                    );
                }
                self.slots[pos] = slot;
            }
            Err(pos) => self.slots.insert(pos, slot),
        }

        LanePosition {
            index,
            x: self.config.lane_x(index),
        }
    }

    /// Distinct lanes handed out so far
    pub fn lanes_used(&self) -> usize {
        self.slots.len()
    }
}
