//! Rendering collaborator
//!
//! The scene talks to rendering only through [`RenderTarget`]. A real backend
//! implements it over its graphics API; [`RecordingTarget`] keeps everything
//! in memory.

pub mod recording;
pub mod target;

pub use recording::{DrawRecord, RecordingTarget, UploadRecord};
pub use target::{GeometryHandle, GeometryUpload, GpuVertex, RenderError, RenderTarget};
