//! Timeline layout: turns commits and pull requests inside a date window into
//! positioned points, lines and axis labels for a lanes diagram.

pub mod axis;
pub mod classify;
pub mod config;
pub mod core;
pub mod error;
pub mod layout;

pub use axis::{DateAxis, DateRange, RangePreset};
pub use classify::{Classification, CommitClassifier};
pub use config::LayoutConfig;
pub use crate::core::{
    BranchKey, BranchLine, BranchPoint, BranchRef, Commit, GraphStats, LineType, PointRole,
    PullRequest, TimeLabel, TimelineGraph, Track,
};
pub use error::{Error, Result};
pub use layout::{layout, LanePolicy, LaneStrategy, TimelineEngine};
