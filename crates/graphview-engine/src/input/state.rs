use std::collections::HashSet;

use super::types::{ButtonState, InputEvent, Modifiers, MouseButton};

/// Current pointer/modifier state for a window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Last known pointer position in device pixels.
    pub pointer_pos: Option<(f64, f64)>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // A release delivered while unfocused never reaches us.
                    self.buttons_down.clear();
                }
            }
            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((*x, *y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::PointerButton {
                button,
                state,
                x,
                y,
            } => {
                self.pointer_pos = Some((*x, *y));
                match state {
                    ButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    ButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }
            InputEvent::Wheel { .. } | InputEvent::Key { .. } => {}
        }
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}
