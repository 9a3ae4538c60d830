//! Input subsystem.
//!
//! Public types are platform-agnostic; `platform::winit` translates window
//! events into `InputEvent`s and `PointerNavigator` turns those into camera
//! commands.

mod navigator;
pub mod platform;
mod state;
mod types;

pub use navigator::{NavigatorConfig, PointerNavigator};
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, KeyState, Modifiers, MouseButton, WheelDelta};
