//! Skybox cube
//!
//! The cube is generated rather than loaded: eight corners at ±2, two
//! triangles per face, normals facing inwards. It hangs directly off the scene
//! root and is never tested for overlaps.

use super::object::{ObjectBody, Part, SceneTree};
use super::transform_tree::NodeKey;
use super::SceneError;
use crate::assets::{MeshData, MeshError, SharedMesh};
use crate::foundation::math::{Mat4, Vec2, Vec3};

/// Registry name of the generated cube
pub const SKYBOX_MESH_NAME: &str = "builtin:skybox-cube";

const HALF_SIZE: f32 = 2.0;

const CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

// Each face as a quad (a, b, c, d), wound counter-clockwise seen from outside
const FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [1, 5, 6, 2],
    [7, 6, 5, 4],
    [4, 0, 3, 7],
    [4, 5, 1, 0],
    [3, 2, 6, 7],
];

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Generate the ±2 cube, two triangles per face, inward normals
pub fn skybox_mesh() -> Result<MeshData, MeshError> {
    let mut positions = Vec::with_capacity(36);
    let mut normals = Vec::with_capacity(36);
    let mut uvs = Vec::with_capacity(36);

    for face in FACES {
        let corner = |i: usize| Vec3::from(CORNERS[face[i]]) * HALF_SIZE;
        let inward = -(corner(1) - corner(0)).cross(&(corner(2) - corner(0))).normalize();
        // (a, b, c) then (c, d, a)
        for i in [0, 1, 2, 2, 3, 0] {
            positions.push(corner(i));
            normals.push(inward);
            uvs.push(Vec2::from(QUAD_UVS[i]));
        }
    }

    MeshData::from_corners(positions, normals, uvs)
}

/// Environment cube around the scene
#[derive(Debug)]
pub struct Skybox {
    scale: f32,
    body: ObjectBody,
}

impl Skybox {
    /// Hang the cube off `parent`, scaled uniformly by `scale`
    pub(crate) fn new(tree: &mut SceneTree, parent: NodeKey, mesh: &SharedMesh, scale: f32) -> Result<Self, SceneError> {
        let part = Part::attach(tree, parent, mesh, Mat4::new_scaling(scale), false)?;
        let root = part.node();
        Ok(Self {
            scale,
            body: ObjectBody::new(root, vec![part]),
        })
    }

    /// Uniform scale of the cube
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub(crate) fn body(&self) -> &ObjectBody {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut ObjectBody {
        &mut self.body
    }
}
