//! In-memory render target
//!
//! Keeps uploaded geometry and the draw list of the most recent frame. Used
//! for headless runs and for checking what the scene submits.

use std::collections::HashMap;

use log::trace;

use super::target::{GeometryHandle, GeometryUpload, RenderError, RenderTarget};
use crate::foundation::math::{Mat4, Vec3};

/// Summary of one uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRecord {
    /// Number of vertices uploaded
    pub vertex_count: usize,
    /// Number of indices uploaded
    pub index_count: usize,
}

/// Draw submitted during a frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// Geometry drawn
    pub handle: GeometryHandle,
    /// Model-to-world matrix it was drawn with
    pub world: Mat4,
}

/// Render target that records instead of drawing
#[derive(Debug, Default)]
pub struct RecordingTarget {
    next_handle: u64,
    uploads: HashMap<GeometryHandle, UploadRecord>,
    released: Vec<GeometryHandle>,
    draws: Vec<DrawRecord>,
    debug_lines: Vec<Vec3>,
    frames_completed: u64,
    in_frame: bool,
}

impl RecordingTarget {
    /// Create an empty recording target
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry currently stored, by handle
    pub fn uploads(&self) -> &HashMap<GeometryHandle, UploadRecord> {
        &self.uploads
    }

    /// Handles released so far, in release order
    pub fn released(&self) -> &[GeometryHandle] {
        &self.released
    }

    /// Draws of the current (or last completed) frame
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Draws of one handle in the current (or last completed) frame
    pub fn draws_of(&self, handle: GeometryHandle) -> impl Iterator<Item = &DrawRecord> {
        self.draws.iter().filter(move |draw| draw.handle == handle)
    }

    /// Debug line endpoints of the current (or last completed) frame
    pub fn debug_lines(&self) -> &[Vec3] {
        &self.debug_lines
    }

    /// Number of frames that reached `end_frame`
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }
}

impl RenderTarget for RecordingTarget {
    fn upload_geometry(&mut self, geometry: &GeometryUpload<'_>) -> Result<GeometryHandle, RenderError> {
        let vertex_count = geometry.vertex_count();
        let streams = [
            geometry.normals.len(),
            geometry.uvs.len(),
            geometry.tangents.len(),
            geometry.bitangents.len(),
        ];
        if streams.iter().any(|&len| len != vertex_count) {
            return Err(RenderError::UploadFailed(format!(
                "vertex streams disagree: {vertex_count} positions vs {streams:?}"
            )));
        }

        let handle = GeometryHandle(self.next_handle);
        self.next_handle += 1;
        self.uploads.insert(
            handle,
            UploadRecord {
                vertex_count,
                index_count: geometry.indices.len(),
            },
        );
        trace!("Recorded upload {handle:?}: {vertex_count} vertices");
        Ok(handle)
    }

    fn set_world_matrix(&mut self, handle: GeometryHandle, world: &Mat4) {
        self.draws.push(DrawRecord {
            handle,
            world: *world,
        });
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        if self.uploads.remove(&handle).is_some() {
            self.released.push(handle);
        }
    }

    fn begin_frame(&mut self) {
        self.draws.clear();
        self.debug_lines.clear();
        self.in_frame = true;
    }

    fn end_frame(&mut self) {
        if self.in_frame {
            self.frames_completed += 1;
            self.in_frame = false;
        }
    }

    fn draw_debug_lines(&mut self, endpoints: &[Vec3]) {
        self.debug_lines.extend_from_slice(endpoints);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;

    fn upload(target: &mut RecordingTarget) -> GeometryHandle {
        let positions = [Vec3::zeros(), Vec3::x(), Vec3::y()];
        let normals = [Vec3::z(); 3];
        let uvs = [Vec2::zeros(); 3];
        let indices = [0, 1, 2];
        target
            .upload_geometry(&GeometryUpload {
                positions: &positions,
                normals: &normals,
                uvs: &uvs,
                tangents: &normals,
                bitangents: &normals,
                indices: &indices,
            })
            .unwrap()
    }

    #[test]
    fn test_handles_are_distinct() {
        let mut target = RecordingTarget::new();
        let a = upload(&mut target);
        let b = upload(&mut target);
        assert_ne!(a, b);
        assert_eq!(target.uploads()[&a].index_count, 3);
    }

    #[test]
    fn test_frame_resets_draw_list() {
        let mut target = RecordingTarget::new();
        let handle = upload(&mut target);

        target.begin_frame();
        target.set_world_matrix(handle, &Mat4::identity());
        target.set_world_matrix(handle, &Mat4::identity());
        target.end_frame();
        assert_eq!(target.draws_of(handle).count(), 2);

        target.begin_frame();
        target.set_world_matrix(handle, &Mat4::identity());
        target.end_frame();
        assert_eq!(target.draws().len(), 1);
        assert_eq!(target.frames_completed(), 2);
    }

    #[test]
    fn test_mismatched_streams_rejected() {
        let mut target = RecordingTarget::new();
        let positions = [Vec3::zeros(); 3];
        let short = [Vec3::z(); 2];
        let uvs = [Vec2::zeros(); 3];
        let result = target.upload_geometry(&GeometryUpload {
            positions: &positions,
            normals: &short,
            uvs: &uvs,
            tangents: &positions,
            bitangents: &positions,
            indices: &[],
        });
        assert!(matches!(result, Err(RenderError::UploadFailed(_))));
    }
}
