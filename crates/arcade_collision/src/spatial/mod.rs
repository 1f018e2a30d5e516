//! Spatial partitioning data structures
//!
//! Provides the broad-phase index used by the collision registry to find
//! candidate pairs in 2D space.

mod quadtree;
pub mod spatial_query;

pub use quadtree::{Quadtree, QuadtreeConfig, MAX_LEVELS, MAX_OBJECTS};
pub use spatial_query::SpatialIndex;
