//! Scene graph and frame driver
//!
//! ## Architecture
//!
//! ```text
//! Scene (frame driver)
//!      ↓ update / propagate / bound / pair
//! SceneObject (asteroid, robot, skybox) → Parts → TransformTree nodes
//!      ↓ world matrices
//! RenderTarget
//! ```
//!
//! Objects own keys into one shared [`TransformTree`]. The driver is the only
//! place that decides when world matrices, bounding volumes and collision
//! pairs are refreshed.

mod asteroid;
mod error;
mod object;
mod robot;
mod scene_manager;
mod skybox;
pub mod transform_tree;

pub use asteroid::{Asteroid, AsteroidField, AsteroidMotion};
pub use error::SceneError;
pub use object::{Drawable, ObjectBody, ObjectId, Part, SceneObject, SceneTree};
pub use robot::{Robot, RobotMeshes};
pub use scene_manager::{FramePhase, Scene};
pub use skybox::{skybox_mesh, Skybox, SKYBOX_MESH_NAME};
pub use transform_tree::{NodeKey, TransformError, TransformTree};
