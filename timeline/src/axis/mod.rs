pub mod mapper;
pub mod range;

pub use mapper::DateAxis;
pub use range::{DateRange, RangePreset};
