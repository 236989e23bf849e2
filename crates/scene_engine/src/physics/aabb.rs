//! Axis-aligned bounding box
//!
//! Closed-interval box described by its `lowest` and `highest` corners.

use crate::foundation::math::Vec3;

/// Axis-Aligned Bounding Box in whatever space its corners were computed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Componentwise minimum corner
    pub lowest: Vec3,
    /// Componentwise maximum corner
    pub highest: Vec3,
}

impl Aabb {
    /// Create a new AABB from its corners
    pub fn new(lowest: Vec3, highest: Vec3) -> Self {
        Self { lowest, highest }
    }

    /// Degenerate box holding a single point
    pub fn from_point(point: Vec3) -> Self {
        Self {
            lowest: point,
            highest: point,
        }
    }

    /// Smallest box enclosing every point, or `None` when there are none
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut aabb = Self::from_point(*points.next()?);
        for point in points {
            aabb.include(point);
        }
        Some(aabb)
    }

    /// Grow the box to enclose `point`
    pub fn include(&mut self, point: &Vec3) {
        self.lowest = self.lowest.inf(point);
        self.highest = self.highest.sup(point);
    }

    /// Smallest box enclosing both boxes
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            lowest: self.lowest.inf(&other.lowest),
            highest: self.highest.sup(&other.highest),
        }
    }

    /// Midpoint of the box
    pub fn center(&self) -> Vec3 {
        (self.lowest + self.highest) * 0.5
    }

    /// Half-size of the box along each axis
    pub fn extents(&self) -> Vec3 {
        (self.highest - self.lowest) * 0.5
    }

    /// Check if this AABB contains a point (boundary included)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        (0..3).all(|axis| point[axis] >= self.lowest[axis] && point[axis] <= self.highest[axis])
    }

    /// The eight corners, lowest first, x varying fastest
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.lowest, self.highest);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }
}
