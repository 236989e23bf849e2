//! Bounding volumes and overlap detection
//!
//! World-space AABBs rebuilt per frame from mesh vertices, plus the pairwise
//! overlap test the scene runs over them.

pub mod aabb;
pub mod bounding_volume;
pub mod collision;

pub use aabb::Aabb;
pub use bounding_volume::{compute_world_extents, BoundingVolume, BoundsError};
pub use collision::{computed_overlap, overlaps, volumes_overlap, CollisionLayers, CollisionPair};
