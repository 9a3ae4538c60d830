//! graphview engine crate.
//!
//! GPU graph rendering: a 2D camera, the graph wire formats, a pooled
//! instanced renderer, and the platform runtime (window, device, input)
//! that drives it.

pub mod camera;
pub mod graph;
pub mod render;

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod logging;
