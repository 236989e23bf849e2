//! Scene-level error type

use thiserror::Error;

use super::object::ObjectId;
use super::transform_tree::TransformError;
use crate::assets::{AssetError, MeshError};
use crate::config::ConfigError;
use crate::physics::BoundsError;
use crate::render::RenderError;

/// Any failure while building or stepping a scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// Mesh loading failed
    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// Transform tree edit failed
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// A bounding volume could not be computed
    #[error("bounds error: {0}")]
    Bounds(#[from] BoundsError),

    /// The render target failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration was rejected
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An object id that is not in the scene
    #[error("unknown scene object {0:?}")]
    UnknownObject(ObjectId),
}

impl From<AssetError> for SceneError {
    fn from(error: AssetError) -> Self {
        match error {
            AssetError::Mesh(e) => Self::Mesh(e),
            AssetError::Render(e) => Self::Render(e),
        }
    }
}
