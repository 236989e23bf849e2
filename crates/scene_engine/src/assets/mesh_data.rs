//! Immutable mesh geometry
//!
//! A [`MeshData`] is built once, either by the OBJ loader or from generated
//! corner arrays, and only read afterwards. Corner arrays are parallel: entry
//! `i` of positions, normals, uvs, tangents and bitangents all describe the
//! same vertex, and every three consecutive vertices form one triangle.

use log::warn;

use super::tangents::compute_tangent_basis;
use super::MeshError;
use crate::foundation::math::{Mat4, Vec2, Vec3};
use crate::physics::Aabb;

/// Geometry ready for ingestion by the render target and bounding volumes
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    tangents: Vec<Vec3>,
    bitangents: Vec<Vec3>,
    indices: Vec<u32>,
    center_offset: Vec3,
    local_extents: Option<Aabb>,
    degenerate_triangles: Vec<usize>,
}

impl MeshData {
    /// Build a mesh from per-corner attributes, three corners per triangle
    ///
    /// The centre offset is taken from the extents of `positions`. Empty
    /// arrays give an empty mesh centred on the origin.
    pub fn from_corners(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
    ) -> Result<Self, MeshError> {
        let center = Aabb::from_points(&positions).map_or_else(Vec3::zeros, |e| e.center());
        Self::with_center(positions, normals, uvs, center)
    }

    /// Build a mesh whose centre offset was measured elsewhere (e.g. over every
    /// `v` record of a file, referenced or not)
    pub(crate) fn with_center(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
        center_offset: Vec3,
    ) -> Result<Self, MeshError> {
        if positions.len() != normals.len()
            || positions.len() != uvs.len()
            || positions.len() % 3 != 0
        {
            return Err(MeshError::AttributeMismatch {
                positions: positions.len(),
                normals: normals.len(),
                uvs: uvs.len(),
            });
        }
        let local_extents = Aabb::from_points(&positions);

        let vertex_count = u32::try_from(positions.len())
            .map_err(|_| MeshError::TooManyVertices(positions.len()))?;
        let indices: Vec<u32> = (0..vertex_count).collect();

        let basis = compute_tangent_basis(&positions, &uvs);
        if !basis.degenerate_triangles.is_empty() {
            warn!(
                "{} triangle(s) have zero UV area; their tangent basis is zeroed",
                basis.degenerate_triangles.len()
            );
        }

        Ok(Self {
            positions,
            normals,
            uvs,
            tangents: basis.tangents,
            bitangents: basis.bitangents,
            indices,
            center_offset,
            local_extents,
            degenerate_triangles: basis.degenerate_triangles,
        })
    }

    /// Vertex positions in model space
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Unit normals, parallel to positions
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Texture coordinates, parallel to positions
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Tangents, parallel to positions
    pub fn tangents(&self) -> &[Vec3] {
        &self.tangents
    }

    /// Bitangents, parallel to positions
    pub fn bitangents(&self) -> &[Vec3] {
        &self.bitangents
    }

    /// Triangle list indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Whether the mesh has no vertices at all
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Midpoint of the model-space extents
    pub fn center_offset(&self) -> Vec3 {
        self.center_offset
    }

    /// Model-space extents of the vertices, `None` for an empty mesh
    pub fn local_extents(&self) -> Option<Aabb> {
        self.local_extents
    }

    /// Triangles whose tangent basis fell back to zero
    pub fn degenerate_triangles(&self) -> &[usize] {
        &self.degenerate_triangles
    }

    /// Matrix that moves the mesh so its centre offset sits at the origin
    pub fn recenter_matrix(&self) -> Mat4 {
        Mat4::new_translation(&-self.center_offset)
    }
}
