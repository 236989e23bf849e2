//! Debug line drawing for bounding boxes
//!
//! Boxes are turned into line lists (two endpoints per edge) and batched per
//! frame, then handed to the render target in a single call.

use crate::foundation::math::Vec3;
use crate::physics::Aabb;
use crate::render::RenderTarget;

/// Endpoint count of one box wireframe
pub const BOX_WIREFRAME_ENDPOINTS: usize = 24;

/// The 12 edges of a box as 24 line endpoints
///
/// Edges are grouped by direction: the four X-parallel edges first, then the
/// Y-parallel ones, then the Z-parallel ones.
pub fn wireframe_segments(aabb: &Aabb) -> [Vec3; BOX_WIREFRAME_ENDPOINTS] {
    let (lo, hi) = (aabb.lowest, aabb.highest);
    [
        // X
        Vec3::new(lo.x, lo.y, lo.z),
        Vec3::new(hi.x, lo.y, lo.z),
        Vec3::new(lo.x, lo.y, hi.z),
        Vec3::new(hi.x, lo.y, hi.z),
        Vec3::new(lo.x, hi.y, lo.z),
        Vec3::new(hi.x, hi.y, lo.z),
        Vec3::new(lo.x, hi.y, hi.z),
        Vec3::new(hi.x, hi.y, hi.z),
        // Y
        Vec3::new(lo.x, lo.y, lo.z),
        Vec3::new(lo.x, hi.y, lo.z),
        Vec3::new(lo.x, lo.y, hi.z),
        Vec3::new(lo.x, hi.y, hi.z),
        Vec3::new(hi.x, lo.y, lo.z),
        Vec3::new(hi.x, hi.y, lo.z),
        Vec3::new(hi.x, lo.y, hi.z),
        Vec3::new(hi.x, hi.y, hi.z),
        // Z
        Vec3::new(lo.x, lo.y, lo.z),
        Vec3::new(lo.x, lo.y, hi.z),
        Vec3::new(lo.x, hi.y, lo.z),
        Vec3::new(lo.x, hi.y, hi.z),
        Vec3::new(hi.x, lo.y, lo.z),
        Vec3::new(hi.x, lo.y, hi.z),
        Vec3::new(hi.x, hi.y, lo.z),
        Vec3::new(hi.x, hi.y, hi.z),
    ]
}

/// Per-frame batch of debug line endpoints
#[derive(Debug, Default)]
pub struct DebugLineBatch {
    enabled: bool,
    endpoints: Vec<Vec3>,
}

impl DebugLineBatch {
    /// Create a batch; a disabled batch ignores everything pushed to it
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            endpoints: Vec::new(),
        }
    }

    /// Enable or disable drawing
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.endpoints.clear();
        }
    }

    /// Check if drawing is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queue the wireframe of a box
    pub fn push_box(&mut self, aabb: &Aabb) {
        if self.enabled {
            self.endpoints.extend_from_slice(&wireframe_segments(aabb));
        }
    }

    /// Endpoints queued so far
    pub fn endpoints(&self) -> &[Vec3] {
        &self.endpoints
    }

    /// Send queued lines to the target and start over
    pub fn flush(&mut self, target: &mut dyn RenderTarget) {
        if !self.endpoints.is_empty() {
            target.draw_debug_lines(&self.endpoints);
            self.endpoints.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingTarget;

    fn sample() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0))
    }

    #[test]
    fn test_segments_grouped_by_axis() {
        let segments = wireframe_segments(&sample());

        for (group, axis) in [(0usize, 0usize), (1, 1), (2, 2)] {
            for pair in segments[group * 8..group * 8 + 8].chunks_exact(2) {
                let delta = pair[1] - pair[0];
                for other in (0..3).filter(|&a| a != axis) {
                    assert_eq!(delta[other], 0.0);
                }
                assert!(delta[axis] > 0.0);
            }
        }
    }

    #[test]
    fn test_segments_touch_every_corner() {
        let aabb = sample();
        let segments = wireframe_segments(&aabb);
        for corner in aabb.corners() {
            assert_eq!(segments.iter().filter(|&&p| p == corner).count(), 3);
        }
    }

    #[test]
    fn test_disabled_batch_ignores_boxes() {
        let mut batch = DebugLineBatch::new(false);
        batch.push_box(&sample());
        assert!(batch.endpoints().is_empty());
    }

    #[test]
    fn test_flush_hands_lines_to_target() {
        let mut batch = DebugLineBatch::new(true);
        batch.push_box(&sample());
        batch.push_box(&sample());

        let mut target = RecordingTarget::new();
        batch.flush(&mut target);

        assert_eq!(target.debug_lines().len(), 2 * BOX_WIREFRAME_ENDPOINTS);
        assert!(batch.endpoints().is_empty());
    }
}
