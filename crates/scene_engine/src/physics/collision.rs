//! Overlap tests and collision layer filtering
//!
//! The tests themselves are pure and O(1). Which pairs get tested is up to the
//! caller; [`CollisionLayers`] is the filter the scene uses for that.

use bitflags::bitflags;

use super::{Aabb, BoundingVolume};

/// Whether two closed boxes share at least one point
///
/// The boxes are disjoint only if on some axis one lies strictly beyond the
/// other. Touching faces, edges or corners count as overlapping.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    (0..3).all(|axis| a.highest[axis] >= b.lowest[axis] && a.lowest[axis] <= b.highest[axis])
}

/// Overlap test on boxes that may not have been computed yet
///
/// A missing box overlaps nothing.
pub fn computed_overlap(a: Option<&Aabb>, b: Option<&Aabb>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => overlaps(a, b),
        _ => false,
    }
}

/// Overlap test on bounding volumes; a volume never recomputed overlaps nothing
pub fn volumes_overlap(a: &BoundingVolume, b: &BoundingVolume) -> bool {
    computed_overlap(a.extents().as_ref(), b.extents().as_ref())
}

bitflags! {
    /// Collision layer bits
    ///
    /// An object sits on `layer` and tests against anything whose layer is in
    /// its `mask`. Both sides must accept each other.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Drifting asteroids
        const ASTEROID = 1 << 0;
        /// Articulated robots
        const ROBOT = 1 << 1;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 2;
    }
}

impl CollisionLayers {
    /// Check if two objects should be tested based on their layers and masks
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        mask_b.intersects(layer_a) && mask_a.intersects(layer_b)
    }
}

/// Pair of objects whose boxes overlapped in a frame, `first < second`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair<K> {
    /// Lower-ordered object
    pub first: K,
    /// Higher-ordered object
    pub second: K,
}

impl<K: Ord> CollisionPair<K> {
    /// Build a pair with its members in canonical order
    pub fn new(a: K, b: K) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }
}

impl<K: PartialEq> CollisionPair<K> {
    /// Whether `key` is one of the pair
    pub fn involves(&self, key: &K) -> bool {
        self.first == *key || self.second == *key
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::assets::MeshData;
    use crate::foundation::math::{Mat4, Vec2, Vec3};

    fn cube(lowest: f32, highest: f32) -> Aabb {
        Aabb::new(Vec3::repeat(lowest), Vec3::repeat(highest))
    }

    #[test]
    fn test_disjoint_boxes() {
        assert!(!overlaps(&cube(0.0, 1.0), &cube(2.0, 3.0)));
        assert!(!overlaps(&cube(2.0, 3.0), &cube(0.0, 1.0)));
    }

    #[test]
    fn test_touching_boxes_overlap() {
        let a = cube(0.0, 1.0);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_separated_on_single_axis() {
        let a = cube(0.0, 1.0);
        let b = Aabb::new(Vec3::new(0.5, 0.5, 1.5), Vec3::new(0.7, 0.7, 2.0));
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_contained_box_overlaps() {
        assert!(overlaps(&cube(0.0, 10.0), &cube(4.0, 5.0)));
    }

    fn unit_volume() -> BoundingVolume {
        let mesh = MeshData::from_corners(
            vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 1.0), Vec3::repeat(1.0)],
            vec![Vec3::y(); 3],
            vec![Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
        )
        .unwrap();
        BoundingVolume::new(Arc::new(mesh))
    }

    #[test]
    fn test_uncomputed_volume_overlaps_nothing() {
        let mut computed = unit_volume();
        computed.recompute(&Mat4::identity()).unwrap();
        let fresh = unit_volume();

        assert!(!volumes_overlap(&fresh, &fresh));
        assert!(!volumes_overlap(&computed, &fresh));
        assert!(!volumes_overlap(&fresh, &computed));
        assert!(computed_overlap(computed.extents().as_ref(), computed.extents().as_ref()));
    }

    #[test]
    fn test_recomputed_touching_volumes_overlap() {
        let mut a = unit_volume();
        let mut b = unit_volume();
        a.recompute(&Mat4::identity()).unwrap();
        b.recompute(&Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0))).unwrap();
        assert!(volumes_overlap(&a, &b));

        b.recompute(&Mat4::new_translation(&Vec3::new(1.5, 0.0, 0.0))).unwrap();
        assert!(!volumes_overlap(&a, &b));
    }

    #[test]
    fn test_should_collide_mutual() {
        let asteroid = CollisionLayers::ASTEROID;
        let robot = CollisionLayers::ROBOT;
        assert!(CollisionLayers::should_collide(
            asteroid,
            CollisionLayers::all(),
            robot,
            CollisionLayers::ASTEROID
        ));
        assert!(!CollisionLayers::should_collide(
            asteroid,
            CollisionLayers::ROBOT,
            robot,
            CollisionLayers::ENVIRONMENT
        ));
    }

    #[test]
    fn test_pair_is_canonical() {
        let pair = CollisionPair::new(7, 3);
        assert_eq!(pair, CollisionPair { first: 3, second: 7 });
        assert!(pair.involves(&7));
        assert!(!pair.involves(&5));
    }
}
