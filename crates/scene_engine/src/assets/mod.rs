//! Mesh assets
//!
//! OBJ ingestion, the immutable [`MeshData`] it produces, tangent basis
//! generation, and the [`ResourceContext`] that shares meshes between objects.

pub mod mesh_data;
pub mod obj_loader;
pub mod registry;
pub mod tangents;

pub use mesh_data::MeshData;
pub use obj_loader::{MeshError, ObjLoader};
pub use registry::{AssetError, ResourceContext, SharedMesh};
pub use tangents::{compute_tangent_basis, triangle_tangent, TangentBasis};
