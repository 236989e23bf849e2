//! Shared mesh registry
//!
//! Every mesh file is parsed and uploaded once. Objects that use the same file
//! share one [`MeshData`] through an `Arc` and one [`GeometryHandle`] on the
//! render target. The context is created before the scene is populated and
//! torn down explicitly after the last frame.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use super::{MeshData, MeshError, ObjLoader};
use crate::render::{GeometryHandle, GeometryUpload, RenderError, RenderTarget};

/// Errors raised while acquiring shared meshes
#[derive(Error, Debug)]
pub enum AssetError {
    /// The mesh file could not be loaded
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// The render target refused the geometry
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Mesh data plus its uploaded geometry
#[derive(Debug, Clone)]
pub struct SharedMesh {
    /// CPU-side geometry, read-only
    pub data: Arc<MeshData>,
    /// Handle of the uploaded copy
    pub geometry: GeometryHandle,
}

/// Explicit owner of every shared mesh in a scene
#[derive(Debug, Default)]
pub struct ResourceContext {
    meshes: HashMap<PathBuf, SharedMesh>,
}

impl ResourceContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an OBJ file, or reuse it if it was loaded before
    pub fn load_mesh(
        &mut self,
        path: impl AsRef<Path>,
        target: &mut dyn RenderTarget,
    ) -> Result<SharedMesh, AssetError> {
        let path = path.as_ref();
        if let Some(shared) = self.meshes.get(path) {
            debug!("Reusing mesh {}", path.display());
            return Ok(shared.clone());
        }
        let mesh = ObjLoader::load(path)?;
        self.insert(path.to_path_buf(), mesh, target)
    }

    /// Register generated geometry under a name, or reuse the existing entry
    pub fn register_mesh(
        &mut self,
        name: &str,
        build: impl FnOnce() -> Result<MeshData, MeshError>,
        target: &mut dyn RenderTarget,
    ) -> Result<SharedMesh, AssetError> {
        let key = PathBuf::from(name);
        if let Some(shared) = self.meshes.get(&key) {
            return Ok(shared.clone());
        }
        let mesh = build()?;
        self.insert(key, mesh, target)
    }

    fn insert(
        &mut self,
        key: PathBuf,
        mesh: MeshData,
        target: &mut dyn RenderTarget,
    ) -> Result<SharedMesh, AssetError> {
        let geometry = target.upload_geometry(&GeometryUpload::from_mesh(&mesh))?;
        info!(
            "Registered mesh {} ({} triangles) as {:?}",
            key.display(),
            mesh.triangle_count(),
            geometry
        );
        let shared = SharedMesh {
            data: Arc::new(mesh),
            geometry,
        };
        self.meshes.insert(key, shared.clone());
        Ok(shared)
    }

    /// Shared mesh registered under `path`, if any
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&SharedMesh> {
        self.meshes.get(path.as_ref())
    }

    /// Number of registered meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether no meshes are registered
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Release meshes no object holds any more, returning how many were freed
    pub fn collect_unused(&mut self, target: &mut dyn RenderTarget) -> usize {
        let before = self.meshes.len();
        self.meshes.retain(|path, shared| {
            let in_use = Arc::strong_count(&shared.data) > 1;
            if !in_use {
                debug!("Releasing unused mesh {}", path.display());
                target.release_geometry(shared.geometry);
            }
            in_use
        });
        before - self.meshes.len()
    }

    /// Release every mesh regardless of outstanding references
    pub fn teardown(&mut self, target: &mut dyn RenderTarget) {
        for (_, shared) in self.meshes.drain() {
            target.release_geometry(shared.geometry);
        }
        info!("Resource context torn down");
    }
}
