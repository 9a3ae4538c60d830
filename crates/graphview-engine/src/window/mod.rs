//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the window, wires them to the GPU layer,
//! and redraws only when the app asks for a frame.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use winit::window::CursorIcon;
