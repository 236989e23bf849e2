//! Asteroids and procedural asteroid fields

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::object::{ObjectBody, Part, SceneTree};
use super::transform_tree::{NodeKey, TransformError};
use super::SceneError;
use crate::assets::SharedMesh;
use crate::config::AsteroidFieldConfig;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::foundation::time::FrameContext;

/// Kinematic state of one asteroid
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidMotion {
    /// World position
    pub position: Vec3,
    /// Units per second
    pub velocity: Vec3,
    /// Axis the asteroid tumbles about
    pub spin_axis: Vec3,
    /// Radians per second about `spin_axis`
    pub spin_speed: f32,
    /// Accumulated rotation in radians
    pub rotation: f32,
    /// Per-axis scale
    pub scale: Vec3,
}

impl Default for AsteroidMotion {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            spin_axis: Vec3::y(),
            spin_speed: 0.0,
            rotation: 0.0,
            scale: Vec3::repeat(1.0),
        }
    }
}

impl AsteroidMotion {
    /// Integrate position and rotation over `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.rotation += self.spin_speed * dt;
    }

    /// `T(position) * R(spin_axis, rotation) * S(scale)`
    pub fn local_matrix(&self) -> Mat4 {
        Transform::from_position(self.position)
            .with_axis_angle(self.spin_axis, self.rotation)
            .with_scale(self.scale)
            .to_matrix()
    }
}

/// A single tumbling rigid body
#[derive(Debug)]
pub struct Asteroid {
    motion: AsteroidMotion,
    body: ObjectBody,
}

impl Asteroid {
    /// Hang a new asteroid off `parent`
    pub(crate) fn new(
        tree: &mut SceneTree,
        parent: NodeKey,
        mesh: &SharedMesh,
        motion: AsteroidMotion,
        recenter: bool,
    ) -> Result<Self, SceneError> {
        let part = Part::attach(tree, parent, mesh, motion.local_matrix(), recenter)?;
        let root = part.node();
        Ok(Self {
            motion,
            body: ObjectBody::new(root, vec![part]),
        })
    }

    /// Current kinematic state
    pub fn motion(&self) -> &AsteroidMotion {
        &self.motion
    }

    /// Replace the kinematic state; takes effect at the next update
    pub fn set_motion(&mut self, motion: AsteroidMotion) {
        self.motion = motion;
    }

    pub(crate) fn update(&mut self, frame: &FrameContext, tree: &mut SceneTree) -> Result<(), TransformError> {
        self.motion.step(frame.delta_time);
        tree.set_local_transform(self.body.root(), self.motion.local_matrix())
    }

    pub(crate) fn body(&self) -> &ObjectBody {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut ObjectBody {
        &mut self.body
    }
}

/// Seeded generator of asteroid starting states
pub struct AsteroidField {
    config: AsteroidFieldConfig,
    rng: StdRng,
}

impl AsteroidField {
    /// Create a generator; an unset seed draws one from the OS
    pub fn new(config: &AsteroidFieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config: config.clone(),
            rng,
        }
    }

    /// Random starting state inside the configured bounds
    pub fn next_motion(&mut self) -> AsteroidMotion {
        let radius = self.config.spawn_radius;
        let speed = self.config.max_speed;
        let axis = Vec3::new(
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
        );

        AsteroidMotion {
            position: self.random_vector(radius),
            velocity: self.random_vector(speed),
            spin_axis: axis.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y),
            spin_speed: self.rng.gen_range(-self.config.max_spin..=self.config.max_spin),
            rotation: 0.0,
            scale: Vec3::repeat(self.rng.gen_range(self.config.min_scale..=self.config.max_scale)),
        }
    }

    /// Random index into `count` template meshes
    pub fn pick_template(&mut self, count: usize) -> usize {
        if count <= 1 {
            0
        } else {
            self.rng.gen_range(0..count)
        }
    }

    /// Spawn `config.count` asteroids choosing among `templates`
    pub(crate) fn spawn(
        &mut self,
        tree: &mut SceneTree,
        parent: NodeKey,
        templates: &[SharedMesh],
        recenter: bool,
    ) -> Result<Vec<Asteroid>, SceneError> {
        if templates.is_empty() {
            return Ok(Vec::new());
        }
        let mut asteroids = Vec::with_capacity(self.config.count as usize);
        for _ in 0..self.config.count {
            let template = &templates[self.pick_template(templates.len())];
            let motion = self.next_motion();
            debug!("Spawning asteroid at {:?}", motion.position);
            asteroids.push(Asteroid::new(tree, parent, template, motion, recenter)?);
        }
        Ok(asteroids)
    }

    fn random_vector(&mut self, half_size: f32) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-half_size..=half_size),
            self.rng.gen_range(-half_size..=half_size),
            self.rng.gen_range(-half_size..=half_size),
        )
    }
}
