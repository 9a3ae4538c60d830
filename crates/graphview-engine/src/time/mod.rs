//! Frame timing and redraw scheduling.
//!
//! - `FrameClock`: one per window, ticked once per presented frame
//! - `RedrawScheduler`: coalesces redraw requests from input handlers

mod frame_clock;
mod redraw;

pub use frame_clock::{FrameClock, FrameTime};
pub use redraw::RedrawScheduler;
