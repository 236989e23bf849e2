//! Debug visualization

pub mod draw;

pub use draw::{wireframe_segments, DebugLineBatch, BOX_WIREFRAME_ENDPOINTS};
