pub mod branch;
pub mod commit;
pub mod graph;
pub mod line;
pub mod point;

pub use branch::{BranchKey, BranchRef};
pub use commit::{Commit, PullRequest};
pub use graph::{GraphStats, TimeLabel, TimelineGraph};
pub use line::{BranchLine, LineType};
pub use point::{BranchPoint, PointRole, Track, BOUNDARY_IDS, DEV_END, DEV_START, MAIN_END, MAIN_START};
