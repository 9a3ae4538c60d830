//! GPU rendering subsystem.
//!
//! `GraphRenderer` owns its GPU resources (pipelines, uniform, static
//! geometry, depth texture) and draws whatever a `GraphSource` currently
//! holds. Instance buffers come from a size-bucketed `BufferPool`.
//!
//! Convention:
//! - instance data is in world units; the vertex stage applies the camera's
//!   view-projection matrix (bind group 0, binding 0).
//! - shader sources are assembled with `shader::preprocess` before compiling.

mod common;
mod ctx;
mod error;
pub mod graph;
pub mod pool;
pub mod shader;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::RenderError;
pub use graph::{GraphRenderer, RendererInit, RendererPhase};
pub use pool::{BufferAllocator, BufferPool, PoolStats, PooledBuffer};
pub use shader::ShaderError;
