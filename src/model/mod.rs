pub mod adapters;
pub mod bid;
pub mod placements;
