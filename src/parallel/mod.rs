pub mod lanes;

pub use lanes::{partition_bounds, LanePool};
