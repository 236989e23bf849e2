//! # Scene Engine
//!
//! Core of an interactive 3D scene: OBJ mesh ingestion with tangent-space
//! generation, a hierarchical transform tree, per-frame world-space bounding
//! boxes with pairwise overlap tests, and a frame driver that runs them in a
//! fixed order against a pluggable render target.
//!
//! ## Features
//!
//! - **Mesh ingestion**: triangulated OBJ subset, unit normals, tangents and bitangents
//! - **Transform tree**: arena of nodes, top-down world matrix propagation
//! - **Bounding volumes**: world AABBs rebuilt from mesh vertices every frame
//! - **Scene objects**: tumbling asteroids, an articulated robot, a skybox
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SceneConfig::load_from_file("scene.toml")?;
//!     scene_engine::foundation::logging::init_with_level(&config.logging.level);
//!
//!     let mut target = RecordingTarget::new();
//!     let mut resources = ResourceContext::new();
//!     let mut scene = Scene::populate(&config, &mut resources, &mut target)?;
//!
//!     let mut timer = Timer::new();
//!     for _ in 0..60 {
//!         scene.advance(&timer.tick(), &mut target)?;
//!         for pair in scene.collisions() {
//!             println!("{:?} overlaps {:?}", pair.first, pair.second);
//!         }
//!     }
//!
//!     resources.teardown(&mut target);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]

pub mod assets;
pub mod config;
pub mod debug;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{MeshData, MeshError, ObjLoader, ResourceContext, SharedMesh},
        config::{Config, ConfigError, SceneConfig},
        foundation::{
            math::{Mat4, Transform, Vec2, Vec3},
            time::{FrameContext, Timer},
        },
        physics::{overlaps, Aabb, BoundingVolume, BoundsError, CollisionLayers, CollisionPair},
        render::{GeometryHandle, RecordingTarget, RenderTarget},
        scene::{
            FramePhase, NodeKey, ObjectId, Scene, SceneError, SceneObject, TransformError,
            TransformTree,
        },
    };
}
