pub mod edges;
pub mod engine;
pub mod lanes;

pub use edges::{BranchEnding, EdgeSynthesizer, PlacedBranch};
pub use engine::{layout, TimelineEngine};
pub use lanes::{
    BranchSpan, FirstFreeLanes, LaneAssigner, LanePolicy, LanePosition, LaneSlot, LaneStrategy,
    RoundRobinLanes,
};
