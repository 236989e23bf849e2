//! Render collaborator abstraction
//!
//! The scene core never issues GPU commands. It hands geometry to a
//! [`RenderTarget`] once, gets an opaque [`GeometryHandle`] back, and from
//! then on only tells the target which world matrix to draw each handle with.

use thiserror::Error;

use crate::assets::MeshData;
use crate::foundation::math::{Mat4, Vec2, Vec3};

/// Handle to geometry stored by the render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

/// Errors reported by a render target
#[derive(Error, Debug)]
pub enum RenderError {
    /// The target refused or failed to store geometry
    #[error("geometry upload failed: {0}")]
    UploadFailed(String),
}

/// Borrowed vertex streams for one mesh, one array per attribute
#[derive(Debug, Clone, Copy)]
pub struct GeometryUpload<'a> {
    /// Model-space positions
    pub positions: &'a [Vec3],
    /// Unit normals
    pub normals: &'a [Vec3],
    /// Texture coordinates
    pub uvs: &'a [Vec2],
    /// Normal-mapping tangents
    pub tangents: &'a [Vec3],
    /// Normal-mapping bitangents
    pub bitangents: &'a [Vec3],
    /// Triangle list indices
    pub indices: &'a [u32],
}

impl<'a> GeometryUpload<'a> {
    /// Borrow every stream of a mesh
    pub fn from_mesh(mesh: &'a MeshData) -> Self {
        Self {
            positions: mesh.positions(),
            normals: mesh.normals(),
            uvs: mesh.uvs(),
            tangents: mesh.tangents(),
            bitangents: mesh.bitangents(),
            indices: mesh.indices(),
        }
    }

    /// Number of vertices in each stream
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Interleave the streams for backends that take a single vertex buffer
    pub fn interleaved(&self) -> Vec<GpuVertex> {
        (0..self.vertex_count())
            .map(|i| GpuVertex {
                position: self.positions[i].into(),
                normal: self.normals[i].into(),
                uv: self.uvs[i].into(),
                tangent: self.tangents[i].into(),
                bitangent: self.bitangents[i].into(),
            })
            .collect()
    }
}

/// Interleaved vertex layout, locations 0..=4 in attribute order
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Unit normal
    pub normal: [f32; 3],
    /// Texture coordinate
    pub uv: [f32; 2],
    /// Tangent
    pub tangent: [f32; 3],
    /// Bitangent
    pub bitangent: [f32; 3],
}

impl GpuVertex {
    /// View a vertex slice as raw bytes for buffer uploads
    pub fn as_bytes(vertices: &[Self]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Rendering collaborator consumed by the scene
pub trait RenderTarget {
    /// Store geometry and return a handle for later draws
    fn upload_geometry(&mut self, geometry: &GeometryUpload<'_>) -> Result<GeometryHandle, RenderError>;

    /// Queue a draw of `handle` with the given model-to-world matrix
    fn set_world_matrix(&mut self, handle: GeometryHandle, world: &Mat4);

    /// Free geometry that nothing references any more
    fn release_geometry(&mut self, _handle: GeometryHandle) {}

    /// Called before the first `set_world_matrix` of a frame
    fn begin_frame(&mut self) {}

    /// Called after the last `set_world_matrix` of a frame
    fn end_frame(&mut self) {}

    /// Debug line list, two endpoints per segment, in world space
    fn draw_debug_lines(&mut self, _endpoints: &[Vec3]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_layout() {
        let mesh = MeshData::from_corners(
            vec![Vec3::zeros(), Vec3::x(), Vec3::y()],
            vec![Vec3::z(); 3],
            vec![Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        )
        .unwrap();

        let vertices = GeometryUpload::from_mesh(&mesh).interleaved();

        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].tangent, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].uv, [0.0, 1.0]);
        assert_eq!(GpuVertex::as_bytes(&vertices).len(), 3 * 14 * 4);
    }
}
