//! World-space bounding volumes
//!
//! A [`BoundingVolume`] keeps a shared reference to the model-space vertices of
//! its mesh and rebuilds a world-space [`Aabb`] from scratch whenever the
//! object's composed world matrix changes. The box is never updated
//! incrementally.

use std::sync::Arc;

use thiserror::Error;

use super::Aabb;
use crate::assets::MeshData;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Errors from bounding volume computation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundsError {
    /// The mesh has no vertices to enclose
    #[error("cannot bound a mesh with no vertices")]
    EmptyMesh,
}

/// Smallest world-space box enclosing `vertices` transformed by `world`
///
/// Each vertex is treated as a point (w = 1).
pub fn compute_world_extents(vertices: &[Vec3], world: &Mat4) -> Result<Aabb, BoundsError> {
    let (first, rest) = vertices.split_first().ok_or(BoundsError::EmptyMesh)?;
    let mut extents = Aabb::from_point(world.transform_position(first));
    for vertex in rest {
        extents.include(&world.transform_position(vertex));
    }
    Ok(extents)
}

/// Per-object world-space AABB derived from a shared mesh
#[derive(Debug, Clone)]
pub struct BoundingVolume {
    mesh: Arc<MeshData>,
    extents: Option<Aabb>,
}

impl BoundingVolume {
    /// Create a volume for `mesh`; it has no extents until the first recompute
    pub fn new(mesh: Arc<MeshData>) -> Self {
        Self { mesh, extents: None }
    }

    /// Rebuild the world-space box from the mesh vertices and `world`
    pub fn recompute(&mut self, world: &Mat4) -> Result<Aabb, BoundsError> {
        let extents = self.compute(world)?;
        self.extents = Some(extents);
        Ok(extents)
    }

    /// Box the mesh would have under `world`, leaving the stored box alone
    pub fn compute(&self, world: &Mat4) -> Result<Aabb, BoundsError> {
        compute_world_extents(self.mesh.positions(), world)
    }

    pub(crate) fn store(&mut self, extents: Aabb) {
        self.extents = Some(extents);
    }

    /// Box from the most recent recompute, if any
    pub fn extents(&self) -> Option<Aabb> {
        self.extents
    }

    /// Mesh this volume encloses
    pub fn mesh(&self) -> &Arc<MeshData> {
        &self.mesh
    }
}
