use super::Camera;

/// Camera mutation produced by the input adapter.
///
/// Commands are applied on the render thread before the next frame is drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraCommand {
    /// Screen-space pan delta in device pixels.
    Pan { dx: f64, dy: f64 },
    /// Anchored zoom around a device-pixel point.
    Zoom { factor: f64, x: f64, y: f64 },
    /// New viewport size in device pixels.
    Resize { width: f64, height: f64 },
}

impl CameraCommand {
    /// Applies the command. Returns `true` if the camera changed.
    pub fn apply(self, camera: &mut Camera) -> bool {
        match self {
            CameraCommand::Pan { dx, dy } => {
                if dx == 0.0 && dy == 0.0 {
                    return false;
                }
                camera.move_by(dx, dy);
                true
            }
            CameraCommand::Zoom { factor, x, y } => camera.zoom_around_point(factor, x, y),
            CameraCommand::Resize { width, height } => {
                camera.set_viewport(width, height);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pan_is_not_a_change() {
        let mut cam = Camera::default();
        assert!(!CameraCommand::Pan { dx: 0.0, dy: 0.0 }.apply(&mut cam));
        assert!(CameraCommand::Pan { dx: 1.0, dy: 0.0 }.apply(&mut cam));
        assert_eq!(cam.position().x, -1.0);
    }

    #[test]
    fn rejected_zoom_is_not_a_change() {
        let mut cam = Camera::default();
        let cmd = CameraCommand::Zoom { factor: -1.0, x: 0.0, y: 0.0 };
        assert!(!cmd.apply(&mut cam));
    }

    #[test]
    fn resize_updates_viewport() {
        let mut cam = Camera::default();
        CameraCommand::Resize { width: 640.0, height: 480.0 }.apply(&mut cam);
        assert_eq!(cam.viewport_width(), 640.0);
        assert_eq!(cam.viewport_height(), 480.0);
    }
}
