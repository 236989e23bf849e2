//! Scene - frame driver over the transform tree, objects and render target
//!
//! [`Scene::advance`] runs one frame in a fixed order:
//! 1. every object finalises its state and writes its local transforms
//! 2. the transform tree is propagated from the scene root
//! 3. every bounding volume is recomputed from the fresh world matrices
//! 4. overlapping pairs are collected (naive O(n²) over collidable objects)
//! 5. world matrices, then optional debug lines, go to the render target
//!
//! Bounding boxes are committed only once every object's boxes computed, and
//! the collision list is replaced only once phase 4 has finished, so a frame
//! that fails part-way leaves the previous frame's boxes and pairs visible.

use log::{debug, info};
use slotmap::SlotMap;

use super::asteroid::{Asteroid, AsteroidField, AsteroidMotion};
use super::object::{ObjectId, SceneObject, SceneTree};
use super::robot::{Robot, RobotMeshes};
use super::skybox::{skybox_mesh, Skybox, SKYBOX_MESH_NAME};
use super::transform_tree::NodeKey;
use super::SceneError;
use crate::assets::{ResourceContext, SharedMesh};
use crate::config::{DebugConfig, RobotConfig, SceneConfig};
use crate::debug::DebugLineBatch;
use crate::foundation::math::Mat4;
use crate::foundation::time::FrameContext;
use crate::physics::{computed_overlap, overlaps, Aabb, CollisionLayers, CollisionPair};
use crate::render::{GeometryHandle, RenderTarget};

/// Last phase a frame completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FramePhase {
    /// No frame has run yet
    Idle,
    /// Object state finalised and local transforms written
    ObjectsUpdated,
    /// World matrices refreshed
    TransformsPropagated,
    /// Bounding volumes recomputed
    BoundsComputed,
    /// Overlapping pairs collected
    CollisionsEvaluated,
    /// Render target received the frame
    Rendered,
}

#[derive(Debug)]
struct SceneEntry {
    object: SceneObject,
    layer: CollisionLayers,
    mask: CollisionLayers,
}

/// A populated scene and its per-frame driver
///
/// Objects enter a scene only through [`populate`](Self::populate) and the
/// `add_*` methods, so their nodes always live in the scene's own tree:
///
/// ```compile_fail
/// let _ = scene_engine::scene::Asteroid::new;
/// ```
#[derive(Debug)]
pub struct Scene {
    tree: SceneTree,
    root: NodeKey,
    objects: SlotMap<ObjectId, SceneEntry>,
    collisions: Vec<CollisionPair<ObjectId>>,
    draw_list: Vec<(GeometryHandle, Mat4)>,
    debug_lines: DebugLineBatch,
    recenter_meshes: bool,
    phase: FramePhase,
    last_frame: Option<FrameContext>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(debug: &DebugConfig) -> Self {
        let mut tree = SceneTree::new();
        let root = tree.create_node(Mat4::identity());
        Self {
            tree,
            root,
            objects: SlotMap::with_key(),
            collisions: Vec::new(),
            draw_list: Vec::new(),
            debug_lines: DebugLineBatch::new(debug.draw_bounds),
            recenter_meshes: debug.recenter_meshes,
            phase: FramePhase::Idle,
            last_frame: None,
        }
    }

    /// Build the configured scene, loading every mesh through `resources`
    pub fn populate(
        config: &SceneConfig,
        resources: &mut ResourceContext,
        target: &mut dyn RenderTarget,
    ) -> Result<Self, SceneError> {
        config.validate()?;
        let mut scene = Self::new(&config.debug);

        if config.skybox.enabled {
            let cube = resources.register_mesh(SKYBOX_MESH_NAME, skybox_mesh, target)?;
            scene.add_skybox(&cube, config.skybox.scale)?;
        }

        if config.asteroids.count > 0 {
            let mut templates = Vec::with_capacity(config.assets.asteroid_meshes.len());
            for path in &config.assets.asteroid_meshes {
                templates.push(resources.load_mesh(path, target)?);
            }
            let mut field = AsteroidField::new(&config.asteroids);
            let asteroids = field.spawn(&mut scene.tree, scene.root, &templates, scene.recenter_meshes)?;
            for asteroid in asteroids {
                scene.add_object(asteroid);
            }
        }

        if config.robot.enabled {
            let assets = &config.assets;
            let meshes = RobotMeshes {
                body: resources.load_mesh(&assets.robot_body, target)?,
                head: resources.load_mesh(&assets.robot_head, target)?,
                arm: resources.load_mesh(&assets.robot_arm, target)?,
                leg: resources.load_mesh(&assets.robot_leg, target)?,
                eye: resources.load_mesh(&assets.robot_eye, target)?,
                antenna: resources.load_mesh(&assets.robot_antenna, target)?,
            };
            scene.add_robot(&meshes, &config.robot)?;
        }

        info!(
            "Scene populated: {} objects, {} transform nodes, {} shared meshes",
            scene.objects.len(),
            scene.tree.len(),
            resources.len()
        );
        Ok(scene)
    }

    /// Add an asteroid under the scene root
    pub fn add_asteroid(&mut self, mesh: &SharedMesh, motion: AsteroidMotion) -> Result<ObjectId, SceneError> {
        let asteroid = Asteroid::new(&mut self.tree, self.root, mesh, motion, self.recenter_meshes)?;
        Ok(self.add_object(asteroid))
    }

    /// Add a robot under the scene root
    pub fn add_robot(&mut self, meshes: &RobotMeshes, config: &RobotConfig) -> Result<ObjectId, SceneError> {
        let robot = Robot::new(&mut self.tree, self.root, meshes, config, self.recenter_meshes)?;
        Ok(self.add_object(robot))
    }

    /// Add a skybox under the scene root
    pub fn add_skybox(&mut self, mesh: &SharedMesh, scale: f32) -> Result<ObjectId, SceneError> {
        let skybox = Skybox::new(&mut self.tree, self.root, mesh, scale)?;
        Ok(self.add_object(skybox))
    }

    fn add_object(&mut self, object: impl Into<SceneObject>) -> ObjectId {
        let object = object.into();
        let layer = object.layer();
        let mask = object.default_mask();
        debug!("Adding {} to scene", object.kind());
        self.objects.insert(SceneEntry { object, layer, mask })
    }

    /// Remove an object and its transform nodes
    ///
    /// Meshes it used stay registered until
    /// [`ResourceContext::collect_unused`] runs.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<SceneObject, SceneError> {
        let entry = self.objects.remove(id).ok_or(SceneError::UnknownObject(id))?;
        self.tree.remove(entry.object.body().root())?;
        self.collisions.retain(|pair| !pair.involves(&id));
        Ok(entry.object)
    }

    /// Override the layer and mask an object is filtered with
    pub fn set_collision_layers(
        &mut self,
        id: ObjectId,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Result<(), SceneError> {
        let entry = self.objects.get_mut(id).ok_or(SceneError::UnknownObject(id))?;
        entry.layer = layer;
        entry.mask = mask;
        Ok(())
    }

    /// Toggle bounding box wireframes
    pub fn set_draw_bounds(&mut self, enabled: bool) {
        self.debug_lines.set_enabled(enabled);
    }

    /// Run one frame
    pub fn advance(&mut self, frame: &FrameContext, target: &mut dyn RenderTarget) -> Result<(), SceneError> {
        self.phase = FramePhase::Idle;

        for entry in self.objects.values_mut() {
            entry.object.update(frame, &mut self.tree)?;
        }
        self.phase = FramePhase::ObjectsUpdated;

        let draw_list = &mut self.draw_list;
        draw_list.clear();
        self.tree.update_with(self.root, &Mat4::identity(), |_, world, drawable| {
            if let Some(drawable) = drawable {
                draw_list.push((drawable.geometry, drawable.compose(world)));
            }
        })?;
        self.phase = FramePhase::TransformsPropagated;

        let mut staged = Vec::with_capacity(self.objects.len());
        for (id, entry) in &self.objects {
            staged.push((id, entry.object.body().stage_bounds(&self.tree)?));
        }
        for (id, bounds) in staged {
            if let Some(entry) = self.objects.get_mut(id) {
                entry.object.body_mut().commit_bounds(bounds);
            }
        }
        self.phase = FramePhase::BoundsComputed;

        self.collisions = self.find_collisions();
        self.phase = FramePhase::CollisionsEvaluated;

        target.begin_frame();
        for (geometry, world) in &self.draw_list {
            target.set_world_matrix(*geometry, world);
        }
        if self.debug_lines.is_enabled() {
            for entry in self.objects.values().filter(|e| e.object.is_collidable()) {
                if let Some(extents) = entry.object.world_extents() {
                    self.debug_lines.push_box(&extents);
                }
            }
            self.debug_lines.flush(target);
        }
        target.end_frame();
        self.phase = FramePhase::Rendered;
        self.last_frame = Some(*frame);

        debug!(
            "Frame {}: {} draws, {} overlapping pairs",
            frame.frame_index,
            self.draw_list.len(),
            self.collisions.len()
        );
        Ok(())
    }

    fn find_collisions(&self) -> Vec<CollisionPair<ObjectId>> {
        let candidates: Vec<(ObjectId, Aabb, CollisionLayers, CollisionLayers)> = self
            .objects
            .iter()
            .filter(|(_, entry)| entry.object.is_collidable())
            .filter_map(|(id, entry)| {
                entry
                    .object
                    .world_extents()
                    .map(|extents| (id, extents, entry.layer, entry.mask))
            })
            .collect();

        let mut pairs = Vec::new();
        for (i, (id_a, box_a, layer_a, mask_a)) in candidates.iter().enumerate() {
            for (id_b, box_b, layer_b, mask_b) in &candidates[i + 1..] {
                if CollisionLayers::should_collide(*layer_a, *mask_a, *layer_b, *mask_b)
                    && overlaps(box_a, box_b)
                {
                    pairs.push(CollisionPair::new(*id_a, *id_b));
                }
            }
        }
        pairs
    }

    /// World-space box of an object as of the last bounds phase
    pub fn current_world_extents(&self, id: ObjectId) -> Option<Aabb> {
        self.objects.get(id)?.object.world_extents()
    }

    /// Overlapping pairs from the last frame that reached collision evaluation
    pub fn collisions(&self) -> &[CollisionPair<ObjectId>] {
        &self.collisions
    }

    /// Direct overlap test between two objects' current boxes
    ///
    /// Objects without computed extents overlap nothing.
    pub fn objects_overlap(&self, a: ObjectId, b: ObjectId) -> Result<bool, SceneError> {
        let first = self.objects.get(a).ok_or(SceneError::UnknownObject(a))?;
        let second = self.objects.get(b).ok_or(SceneError::UnknownObject(b))?;
        Ok(computed_overlap(
            first.object.world_extents().as_ref(),
            second.object.world_extents().as_ref(),
        ))
    }

    /// Object by id
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id).map(|entry| &entry.object)
    }

    /// Mutable object by id
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id).map(|entry| &mut entry.object)
    }

    /// Every object with its id
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, entry)| (id, &entry.object))
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Last phase reached by the most recent frame
    pub fn frame_phase(&self) -> FramePhase {
        self.phase
    }

    /// Context of the last frame that completed every phase
    pub fn last_frame(&self) -> Option<&FrameContext> {
        self.last_frame.as_ref()
    }

    /// Transform tree shared by every object
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Mutable tree; removing an object's nodes here makes its next frame fail
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Node every object hangs from
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Whether meshes are recentred about their extents
    pub fn recenter_meshes(&self) -> bool {
        self.recenter_meshes
    }
}
