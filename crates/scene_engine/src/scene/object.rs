//! Scene objects and their drawable parts
//!
//! Every object is one or more [`Part`]s hung off the scene's transform tree.
//! A part pairs a tree node with a shared mesh, the mesh's uploaded geometry
//! and a bounding volume. The matrix handed to the renderer and the matrix
//! the bounding volume is computed from are the same: the node's world
//! matrix followed by the optional recentring matrix of the mesh.

use slotmap::new_key_type;

use super::asteroid::Asteroid;
use super::robot::Robot;
use super::skybox::Skybox;
use super::transform_tree::{NodeKey, TransformError, TransformTree};
use super::SceneError;
use crate::assets::SharedMesh;
use crate::foundation::math::Mat4;
use crate::foundation::time::FrameContext;
use crate::physics::{Aabb, BoundingVolume, BoundsError, CollisionLayers};
use crate::render::GeometryHandle;

new_key_type! {
    /// Key of an object in a [`Scene`](super::Scene)
    pub struct ObjectId;
}

/// Node payload telling the render phase what to draw at a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    /// Uploaded geometry
    pub geometry: GeometryHandle,
    /// Applied after the node's world matrix
    pub recenter: Mat4,
}

impl Drawable {
    /// Matrix the renderer and the bounding volume both use
    pub fn compose(&self, world: &Mat4) -> Mat4 {
        world * self.recenter
    }
}

/// Tree type shared by every object in a scene
pub type SceneTree = TransformTree<Drawable>;

/// One drawable piece of an object
#[derive(Debug)]
pub struct Part {
    node: NodeKey,
    drawable: Drawable,
    volume: BoundingVolume,
}

impl Part {
    /// Create a node for `mesh` under `parent` with the given local transform
    pub(crate) fn attach(
        tree: &mut SceneTree,
        parent: NodeKey,
        mesh: &SharedMesh,
        local: Mat4,
        recenter: bool,
    ) -> Result<Self, SceneError> {
        if mesh.data.is_empty() {
            return Err(BoundsError::EmptyMesh.into());
        }
        let drawable = Drawable {
            geometry: mesh.geometry,
            recenter: if recenter {
                mesh.data.recenter_matrix()
            } else {
                Mat4::identity()
            },
        };
        let node = tree.create_node(local);
        tree.attach_child(parent, node)?;
        tree.set_payload(node, drawable)?;
        Ok(Self {
            node,
            drawable,
            volume: BoundingVolume::new(mesh.data.clone()),
        })
    }

    /// Tree node this part hangs from
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// Geometry and recentring of this part
    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }

    /// Bounding volume of this part
    pub fn volume(&self) -> &BoundingVolume {
        &self.volume
    }

    /// Matrix sent to the renderer, from the last tree update
    pub fn composed_world(&self, tree: &SceneTree) -> Result<Mat4, TransformError> {
        Ok(self.drawable.compose(&tree.world_transform(self.node)?))
    }

    fn compute_bounds(&self, tree: &SceneTree) -> Result<Aabb, SceneError> {
        let world = self.composed_world(tree)?;
        Ok(self.volume.compute(&world)?)
    }
}

/// Boxes computed for one object but not yet visible to queries
#[derive(Debug)]
pub(crate) struct StagedBounds {
    world: Mat4,
    parts: Vec<Aabb>,
    extents: Option<Aabb>,
}

/// State every object kind carries
#[derive(Debug)]
pub struct ObjectBody {
    root: NodeKey,
    parts: Vec<Part>,
    world: Mat4,
    extents: Option<Aabb>,
}

impl ObjectBody {
    pub(crate) fn new(root: NodeKey, parts: Vec<Part>) -> Self {
        Self {
            root,
            parts,
            world: Mat4::identity(),
            extents: None,
        }
    }

    /// Topmost node of the object
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Drawable parts
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Union of the part boxes as of the last bounds refresh
    pub fn extents(&self) -> Option<Aabb> {
        self.extents
    }

    /// Compute every part box from the current world matrices; the object box
    /// is their union. Nothing is stored until [`commit_bounds`](Self::commit_bounds).
    pub(crate) fn stage_bounds(&self, tree: &SceneTree) -> Result<StagedBounds, SceneError> {
        let world = tree.world_transform(self.root)?;
        let mut parts = Vec::with_capacity(self.parts.len());
        let mut extents: Option<Aabb> = None;
        for part in &self.parts {
            let part_extents = part.compute_bounds(tree)?;
            extents = Some(extents.map_or(part_extents, |e| e.union(&part_extents)));
            parts.push(part_extents);
        }
        Ok(StagedBounds { world, parts, extents })
    }

    pub(crate) fn commit_bounds(&mut self, staged: StagedBounds) {
        self.world = staged.world;
        for (part, extents) in self.parts.iter_mut().zip(staged.parts) {
            part.volume.store(extents);
        }
        self.extents = staged.extents;
    }
}

/// The closed set of object kinds a scene can hold
#[derive(Debug)]
pub enum SceneObject {
    /// Tumbling rigid body
    Asteroid(Asteroid),
    /// Articulated walker
    Robot(Robot),
    /// Environment cube around the camera
    Skybox(Skybox),
}

impl SceneObject {
    /// Advance the object's own state and write its local transforms
    pub fn update(&mut self, frame: &FrameContext, tree: &mut SceneTree) -> Result<(), TransformError> {
        match self {
            Self::Asteroid(asteroid) => asteroid.update(frame, tree),
            Self::Robot(robot) => robot.update(frame, tree),
            Self::Skybox(_) => Ok(()),
        }
    }

    /// World matrix of the object's root node as of the last bounds refresh
    pub fn world_transform(&self) -> Mat4 {
        self.body().world
    }

    /// World-space box of the whole object as of the last bounds refresh
    pub fn world_extents(&self) -> Option<Aabb> {
        self.body().extents()
    }

    /// Layer the object sits on
    pub fn layer(&self) -> CollisionLayers {
        match self {
            Self::Asteroid(_) => CollisionLayers::ASTEROID,
            Self::Robot(_) => CollisionLayers::ROBOT,
            Self::Skybox(_) => CollisionLayers::empty(),
        }
    }

    /// Layers the object tests against
    pub fn default_mask(&self) -> CollisionLayers {
        match self {
            Self::Asteroid(_) => CollisionLayers::ASTEROID | CollisionLayers::ROBOT,
            Self::Robot(_) => CollisionLayers::ASTEROID,
            Self::Skybox(_) => CollisionLayers::empty(),
        }
    }

    /// Whether the object takes part in overlap testing at all
    pub fn is_collidable(&self) -> bool {
        !matches!(self, Self::Skybox(_))
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Asteroid(_) => "asteroid",
            Self::Robot(_) => "robot",
            Self::Skybox(_) => "skybox",
        }
    }

    /// Shared object state
    pub fn body(&self) -> &ObjectBody {
        match self {
            Self::Asteroid(asteroid) => asteroid.body(),
            Self::Robot(robot) => robot.body(),
            Self::Skybox(skybox) => skybox.body(),
        }
    }

    pub(crate) fn body_mut(&mut self) -> &mut ObjectBody {
        match self {
            Self::Asteroid(asteroid) => asteroid.body_mut(),
            Self::Robot(robot) => robot.body_mut(),
            Self::Skybox(skybox) => skybox.body_mut(),
        }
    }
}

impl From<Asteroid> for SceneObject {
    fn from(asteroid: Asteroid) -> Self {
        Self::Asteroid(asteroid)
    }
}

impl From<Robot> for SceneObject {
    fn from(robot: Robot) -> Self {
        Self::Robot(robot)
    }
}

impl From<Skybox> for SceneObject {
    fn from(skybox: Skybox) -> Self {
        Self::Skybox(skybox)
    }
}
