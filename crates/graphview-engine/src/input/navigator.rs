use crate::camera::{Camera, CameraCommand};
use crate::time::RedrawScheduler;

use super::types::{ButtonState, InputEvent, MouseButton};

/// Pointer-to-camera mapping.
#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    /// Button that pans while held.
    pub drag_button: MouseButton,
    /// Zoom multiplier per wheel step away from the user.
    pub zoom_in_factor: f64,
    /// Zoom multiplier per wheel step towards the user.
    pub zoom_out_factor: f64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            drag_button: MouseButton::Left,
            zoom_in_factor: 1.01,
            zoom_out_factor: 0.99,
        }
    }
}

/// Turns pointer input into camera commands.
///
/// Drag with the configured button pans, the wheel zooms around the pointer.
/// Every command that changes the camera also requests a frame.
#[derive(Debug, Default)]
pub struct PointerNavigator {
    config: NavigatorConfig,
    drag_from: Option<(f64, f64)>,
}

impl PointerNavigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            drag_from: None,
        }
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Maps one input event to a camera command, tracking drag state.
    pub fn handle(&mut self, event: &InputEvent) -> Option<CameraCommand> {
        match *event {
            InputEvent::PointerButton {
                button,
                state,
                x,
                y,
            } if button == self.config.drag_button => {
                self.drag_from = match state {
                    ButtonState::Pressed => Some((x, y)),
                    ButtonState::Released => None,
                };
                None
            }

            InputEvent::PointerMoved { x, y } => {
                let (px, py) = self.drag_from.replace((x, y))?;
                Some(CameraCommand::Pan {
                    dx: x - px,
                    dy: y - py,
                })
            }

            InputEvent::PointerLeft | InputEvent::Focused(false) => {
                self.drag_from = None;
                None
            }

            InputEvent::Wheel { delta, x, y } => {
                let dy = delta.y();
                let factor = if dy > 0.0 {
                    self.config.zoom_in_factor
                } else if dy < 0.0 {
                    self.config.zoom_out_factor
                } else {
                    return None;
                };
                Some(CameraCommand::Zoom { factor, x, y })
            }

            _ => None,
        }
    }

    /// Handles `event` and applies the resulting command.
    ///
    /// Returns `true` if the camera changed (a frame was requested).
    pub fn drive(
        &mut self,
        event: &InputEvent,
        camera: &mut Camera,
        redraw: &mut RedrawScheduler,
    ) -> bool {
        match self.handle(event) {
            Some(cmd) => dispatch(cmd, camera, redraw),
            None => false,
        }
    }

    /// Applies a viewport resize in device pixels.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        camera: &mut Camera,
        redraw: &mut RedrawScheduler,
    ) -> bool {
        let cmd = CameraCommand::Resize {
            width: width as f64,
            height: height as f64,
        };
        dispatch(cmd, camera, redraw)
    }
}

fn dispatch(cmd: CameraCommand, camera: &mut Camera, redraw: &mut RedrawScheduler) -> bool {
    let changed = cmd.apply(camera);
    if changed {
        redraw.request();
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use crate::input::WheelDelta;

    fn press(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerButton {
            button: MouseButton::Left,
            state: ButtonState::Pressed,
            x,
            y,
        }
    }

    fn release(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerButton {
            button: MouseButton::Left,
            state: ButtonState::Released,
            x,
            y,
        }
    }

    fn wheel(y: f32) -> InputEvent {
        InputEvent::Wheel {
            delta: WheelDelta::Line { x: 0.0, y },
            x: 10.0,
            y: 20.0,
        }
    }

    #[test]
    fn drag_emits_incremental_pans() {
        let mut nav = PointerNavigator::default();
        assert_eq!(nav.handle(&InputEvent::PointerMoved { x: 0.0, y: 0.0 }), None);

        assert_eq!(nav.handle(&press(5.0, 5.0)), None);
        assert!(nav.is_dragging());
        assert_eq!(
            nav.handle(&InputEvent::PointerMoved { x: 8.0, y: 1.0 }),
            Some(CameraCommand::Pan { dx: 3.0, dy: -4.0 })
        );
        assert_eq!(
            nav.handle(&InputEvent::PointerMoved { x: 9.0, y: 1.0 }),
            Some(CameraCommand::Pan { dx: 1.0, dy: 0.0 })
        );

        nav.handle(&release(9.0, 1.0));
        assert_eq!(nav.handle(&InputEvent::PointerMoved { x: 20.0, y: 20.0 }), None);
    }

    #[test]
    fn other_buttons_do_not_drag() {
        let mut nav = PointerNavigator::default();
        nav.handle(&InputEvent::PointerButton {
            button: MouseButton::Right,
            state: ButtonState::Pressed,
            x: 0.0,
            y: 0.0,
        });
        assert!(!nav.is_dragging());
    }

    #[test]
    fn leaving_the_window_ends_drag() {
        let mut nav = PointerNavigator::default();
        nav.handle(&press(0.0, 0.0));
        nav.handle(&InputEvent::PointerLeft);
        assert!(!nav.is_dragging());
    }

    #[test]
    fn wheel_direction_picks_factor() {
        let mut nav = PointerNavigator::default();
        assert_eq!(
            nav.handle(&wheel(1.0)),
            Some(CameraCommand::Zoom { factor: 1.01, x: 10.0, y: 20.0 })
        );
        assert_eq!(
            nav.handle(&wheel(-3.0)),
            Some(CameraCommand::Zoom { factor: 0.99, x: 10.0, y: 20.0 })
        );
        assert_eq!(nav.handle(&wheel(0.0)), None);
    }

    #[test]
    fn changes_request_one_coalesced_frame() {
        let mut nav = PointerNavigator::default();
        let mut cam = Camera::new(CameraConfig::default());
        let mut redraw = RedrawScheduler::new();

        assert!(nav.resize(800, 600, &mut cam, &mut redraw));
        assert!(nav.drive(&wheel(1.0), &mut cam, &mut redraw));
        nav.drive(&press(0.0, 0.0), &mut cam, &mut redraw);
        assert!(nav.drive(&InputEvent::PointerMoved { x: 4.0, y: 0.0 }, &mut cam, &mut redraw));

        assert!((cam.zoom() - 1.01).abs() < 1e-12);
        assert_eq!(redraw.requested(), 3);
        assert!(redraw.take());
        assert!(!redraw.is_pending());
    }

    #[test]
    fn no_op_input_requests_nothing() {
        let mut nav = PointerNavigator::default();
        let mut cam = Camera::default();
        let mut redraw = RedrawScheduler::new();
        assert!(!nav.drive(&InputEvent::PointerMoved { x: 1.0, y: 1.0 }, &mut cam, &mut redraw));
        assert!(!redraw.is_pending());
    }
}
