//! Spatial indexing for pointer hit testing and placement occupancy checks.

mod rtree;

pub use rtree::SpatialIndex;
