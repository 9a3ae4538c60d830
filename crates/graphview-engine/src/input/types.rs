/// Keys the viewer reacts to. Everything else maps to `Unknown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Home,
    Space,
    R,
    Plus,
    Minus,
    /// Platform key code not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Wheel delta. Positive `y` scrolls away from the user.
///
/// `Line` is notch-based; `Pixel` comes from touchpads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f64, y: f64 },
}

impl WheelDelta {
    #[inline]
    pub fn y(&self) -> f64 {
        match *self {
            WheelDelta::Line { y, .. } => y as f64,
            WheelDelta::Pixel { y, .. } => y,
        }
    }
}

/// Platform-agnostic input events. Positions are device pixels, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Focused(bool),

    PointerMoved { x: f64, y: f64 },
    PointerLeft,
    PointerButton {
        button: MouseButton,
        state: ButtonState,
        x: f64,
        y: f64,
    },
    Wheel { delta: WheelDelta, x: f64, y: f64 },

    Key { key: Key, state: KeyState, repeat: bool },
}
