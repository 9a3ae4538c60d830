//! Instanced graph renderer.

mod combined;
mod depth;
mod plan;
mod renderer;

pub use depth::DepthTarget;
pub use plan::{DrawCall, DrawPass, DrawPlan, EDGE_VERTICES, NODE_VERTICES};
pub use renderer::{GraphRenderer, RendererInit, RendererPhase};
