use glam::DVec2;

use super::ViewProj;

/// Camera configuration.
///
/// Zoom is expressed in device pixels per world unit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            min_zoom: 0.01,
            max_zoom: 100.0,
        }
    }
}

/// 2D orthographic camera over the graph's world plane.
///
/// Screen space is device pixels with the origin top-left and +Y down.
/// World space has +Y up; `position` is the world point at the viewport center.
///
/// Invariants:
/// - `min_zoom <= zoom <= max_zoom`, all strictly positive
/// - viewport width/height are finite and `>= 0`
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: DVec2,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    viewport_width: f64,
    viewport_height: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    /// Creates a camera centered on the world origin with an empty viewport.
    ///
    /// Invalid bounds fall back to the defaults.
    pub fn new(config: CameraConfig) -> Self {
        let (min_zoom, max_zoom) = if valid_bounds(config.min_zoom, config.max_zoom) {
            (config.min_zoom, config.max_zoom)
        } else {
            log::warn!(
                "invalid zoom bounds [{}, {}]; using defaults",
                config.min_zoom,
                config.max_zoom
            );
            let d = CameraConfig::default();
            (d.min_zoom, d.max_zoom)
        };

        let zoom = if config.zoom.is_finite() && config.zoom > 0.0 {
            config.zoom.clamp(min_zoom, max_zoom)
        } else {
            1.0_f64.clamp(min_zoom, max_zoom)
        };

        Self {
            position: DVec2::ZERO,
            zoom,
            min_zoom,
            max_zoom,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = DVec2::new(x, y);
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[inline]
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    #[inline]
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Sets the zoom directly, clamped to the bounds.
    ///
    /// Returns `false` (and leaves the camera untouched) for non-positive or
    /// non-finite values.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !(zoom.is_finite() && zoom > 0.0) {
            log::warn!("rejected zoom {zoom}");
            return false;
        }
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        true
    }

    /// Replaces the zoom bounds and re-clamps the current zoom.
    pub fn set_zoom_bounds(&mut self, min_zoom: f64, max_zoom: f64) -> bool {
        if !valid_bounds(min_zoom, max_zoom) {
            log::warn!("rejected zoom bounds [{min_zoom}, {max_zoom}]");
            return false;
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
        true
    }

    #[inline]
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    #[inline]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = sanitize_extent(width);
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = sanitize_extent(height);
    }

    /// Sets the viewport size in device pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.set_viewport_width(width);
        self.set_viewport_height(height);
    }

    /// Returns `width / height`, or 0 for a degenerate viewport.
    pub fn aspect(&self) -> f64 {
        if self.viewport_height > 0.0 {
            self.viewport_width / self.viewport_height
        } else {
            0.0
        }
    }

    /// Vertical half-extent of the visible world, in world units.
    ///
    /// The horizontal half-extent is `scale() * aspect()`. Returns 0 while the
    /// viewport is empty.
    pub fn scale(&self) -> f64 {
        if self.viewport_width.min(self.viewport_height) <= 0.0 {
            return 0.0;
        }
        self.viewport_height / (2.0 * self.zoom)
    }

    /// Maps a device-pixel point to world space.
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> DVec2 {
        let cx = self.viewport_width / 2.0;
        let cy = self.viewport_height / 2.0;
        DVec2::new(
            (sx - cx) / self.zoom + self.position.x,
            -(sy - cy) / self.zoom + self.position.y,
        )
    }

    /// Maps a world point to device pixels.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> DVec2 {
        let cx = self.viewport_width / 2.0;
        let cy = self.viewport_height / 2.0;
        DVec2::new(
            (wx - self.position.x) * self.zoom + cx,
            cy - (wy - self.position.y) * self.zoom,
        )
    }

    /// Pans by a screen-space delta so the content follows the pointer.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.position.x -= dx / self.zoom;
        self.position.y += dy / self.zoom;
    }

    /// Multiplies zoom by `factor`, keeping the world point under `(sx, sy)` fixed.
    ///
    /// The anchor must be captured before zoom changes and recaptured after the
    /// clamp; correcting first makes the view jitter at the bounds.
    ///
    /// Returns `false` for non-positive or non-finite factors.
    pub fn zoom_around_point(&mut self, factor: f64, sx: f64, sy: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("rejected zoom factor {factor}");
            return false;
        }

        let before = self.screen_to_world(sx, sy);
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        let after = self.screen_to_world(sx, sy);

        self.position += before - after;
        true
    }

    /// Builds the orthographic view-projection matrix.
    ///
    /// With the camera's own aspect, a world point lands on the same device
    /// pixel that `world_to_screen` reports for it.
    ///
    /// Returns `None` while the viewport or `aspect` cannot produce a finite
    /// matrix; callers keep the previous upload in that case.
    pub fn view_proj_matrix(&self, aspect: f64) -> Option<ViewProj> {
        let scale = self.scale();
        if scale <= 0.0 || !(aspect.is_finite() && aspect > 0.0) {
            return None;
        }

        let sx = scale * aspect;
        #[rustfmt::skip]
        let cols = [
            (1.0 / sx) as f32, 0.0, 0.0, 0.0,
            0.0, (1.0 / scale) as f32, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            (-self.position.x / sx) as f32, (-self.position.y / scale) as f32, 0.0, 1.0,
        ];

        Some(ViewProj::from_cols_array(cols))
    }

    /// Matrix for the camera's own viewport aspect.
    pub fn current_view_proj(&self) -> Option<ViewProj> {
        self.view_proj_matrix(self.aspect())
    }
}

fn valid_bounds(min_zoom: f64, max_zoom: f64) -> bool {
    min_zoom.is_finite() && max_zoom.is_finite() && min_zoom > 0.0 && min_zoom <= max_zoom
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).abs().max_element() < 1e-6 * (1.0 + a.abs().max_element())
    }

    fn camera(w: f64, h: f64, zoom: f64, x: f64, y: f64) -> Camera {
        let mut cam = Camera::default();
        cam.set_viewport(w, h);
        cam.set_zoom(zoom);
        cam.set_position(x, y);
        cam
    }

    fn states() -> Vec<Camera> {
        vec![
            camera(800.0, 600.0, 1.0, 0.0, 0.0),
            camera(1920.0, 1080.0, 0.2, 13.5, -7.25),
            camera(300.0, 900.0, 42.0, -1000.0, 250.0),
            camera(0.0, 0.0, 3.0, 1.0, 1.0),
        ]
    }

    // ── conversions ───────────────────────────────────────────────────────

    #[test]
    fn screen_world_round_trip() {
        let points = [(0.0, 0.0), (12.5, -3.0), (-400.0, 900.0), (1e4, 1e-3)];
        for cam in states() {
            for &(wx, wy) in &points {
                let s = cam.world_to_screen(wx, wy);
                let w = cam.screen_to_world(s.x, s.y);
                assert!(close(w, DVec2::new(wx, wy)), "{w:?} vs ({wx}, {wy})");
            }
        }
    }

    #[test]
    fn viewport_center_maps_to_position() {
        let cam = camera(800.0, 600.0, 2.0, 5.0, -3.0);
        let w = cam.screen_to_world(400.0, 300.0);
        assert!(close(w, DVec2::new(5.0, -3.0)));
    }

    #[test]
    fn y_axis_is_flipped() {
        let cam = camera(800.0, 600.0, 1.0, 0.0, 0.0);
        // Screen row above center is world +Y.
        let w = cam.screen_to_world(400.0, 200.0);
        assert!((w.y - 100.0).abs() < EPS);
    }

    // ── pan ───────────────────────────────────────────────────────────────

    #[test]
    fn move_keeps_content_under_pointer() {
        let mut cam = camera(800.0, 600.0, 2.5, 10.0, 20.0);
        let grabbed = cam.screen_to_world(100.0, 150.0);
        cam.move_by(30.0, -45.0);
        let now = cam.screen_to_world(130.0, 105.0);
        assert!(close(grabbed, now));
    }

    #[test]
    fn drag_down_moves_view_up() {
        let mut cam = camera(800.0, 600.0, 1.0, 0.0, 0.0);
        cam.move_by(0.0, 10.0);
        assert!(cam.position().y > 0.0);
    }

    // ── anchored zoom ─────────────────────────────────────────────────────

    #[test]
    fn zoom_around_point_keeps_anchor() {
        for mut cam in states().into_iter().take(3) {
            let anchor = cam.screen_to_world(123.0, 77.0);
            assert!(cam.zoom_around_point(1.7, 123.0, 77.0));
            let after = cam.screen_to_world(123.0, 77.0);
            assert!(close(anchor, after), "{anchor:?} vs {after:?}");
        }
    }

    #[test]
    fn zoom_stays_clamped() {
        let mut cam = camera(800.0, 600.0, 1.0, 0.0, 0.0);
        for _ in 0..2000 {
            cam.zoom_around_point(1.01, 10.0, 10.0);
            assert!(cam.zoom() <= cam.max_zoom());
        }
        assert_eq!(cam.zoom(), cam.max_zoom());

        for _ in 0..4000 {
            cam.zoom_around_point(0.99, 700.0, 500.0);
            assert!(cam.zoom() >= cam.min_zoom());
        }
        assert_eq!(cam.zoom(), cam.min_zoom());
    }

    #[test]
    fn zoom_at_max_bound_does_not_drift() {
        let mut cam = camera(800.0, 600.0, 100.0, 3.0, 4.0);
        assert_eq!(cam.zoom(), cam.max_zoom());
        let before = cam.position();
        assert!(cam.zoom_around_point(1.5, 17.0, 590.0));
        assert_eq!(cam.zoom(), cam.max_zoom());
        assert!(close(cam.position(), before));
    }

    #[test]
    fn zoom_at_min_bound_does_not_drift() {
        let mut cam = camera(800.0, 600.0, 0.01, -3.0, 4.0);
        assert_eq!(cam.zoom(), cam.min_zoom());
        let before = cam.position();
        assert!(cam.zoom_around_point(0.5, 799.0, 1.0));
        assert_eq!(cam.zoom(), cam.min_zoom());
        assert!(close(cam.position(), before));
    }

    #[test]
    fn clamped_zoom_still_keeps_anchor() {
        let mut cam = camera(800.0, 600.0, 90.0, 0.0, 0.0);
        let anchor = cam.screen_to_world(50.0, 50.0);
        cam.zoom_around_point(10.0, 50.0, 50.0);
        assert_eq!(cam.zoom(), 100.0);
        assert!(close(anchor, cam.screen_to_world(50.0, 50.0)));
    }

    #[test]
    fn invalid_zoom_factor_is_rejected() {
        let mut cam = camera(800.0, 600.0, 2.0, 1.0, 1.0);
        let before = cam.clone();
        assert!(!cam.zoom_around_point(0.0, 10.0, 10.0));
        assert!(!cam.zoom_around_point(-2.0, 10.0, 10.0));
        assert!(!cam.zoom_around_point(f64::NAN, 10.0, 10.0));
        assert!(!cam.zoom_around_point(f64::INFINITY, 10.0, 10.0));
        assert_eq!(cam, before);
    }

    #[test]
    fn set_zoom_rejects_non_positive() {
        let mut cam = Camera::default();
        assert!(!cam.set_zoom(0.0));
        assert!(!cam.set_zoom(-1.0));
        assert_eq!(cam.zoom(), 1.0);
        assert!(cam.set_zoom(1e9));
        assert_eq!(cam.zoom(), cam.max_zoom());
    }

    #[test]
    fn narrowing_bounds_reclamps_zoom() {
        let mut cam = camera(800.0, 600.0, 50.0, 0.0, 0.0);
        assert!(cam.set_zoom_bounds(0.5, 10.0));
        assert_eq!(cam.zoom(), 10.0);
        assert!(!cam.set_zoom_bounds(5.0, 1.0));
        assert!(!cam.set_zoom_bounds(0.0, 1.0));
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn view_proj_layout() {
        let cam = camera(800.0, 600.0, 2.0, 30.0, -60.0);
        let aspect = 800.0 / 600.0;
        let scale = 150.0;
        let m = cam.view_proj_matrix(aspect).unwrap().to_cols_array();

        let expected = [
            (1.0 / (scale * aspect)) as f32, 0.0, 0.0, 0.0,
            0.0, (1.0 / scale) as f32, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            (-30.0 / (scale * aspect)) as f32, (60.0 / scale) as f32, 0.0, 1.0,
        ];
        for (i, (a, b)) in m.iter().zip(expected.iter()).enumerate() {
            assert!((a - b).abs() < 1e-7, "entry {i}: {a} != {b}");
        }
    }

    #[test]
    fn visible_extent_shrinks_as_zoom_grows() {
        let mut cam = camera(800.0, 600.0, 1.0, 0.0, 0.0);
        assert!((cam.scale() - 300.0).abs() < EPS);
        cam.set_zoom(2.0);
        assert!((cam.scale() - 150.0).abs() < EPS);
        cam.set_zoom(0.2);
        assert!((cam.scale() - 1500.0).abs() < EPS);
    }

    fn ndc_to_pixels(cam: &Camera, ndc: glam::Vec2) -> DVec2 {
        let (w, h) = (cam.viewport_width(), cam.viewport_height());
        DVec2::new(
            (ndc.x as f64 + 1.0) * w / 2.0,
            (1.0 - ndc.y as f64) * h / 2.0,
        )
    }

    #[test]
    fn drawn_position_matches_pointer_mapping() {
        let pixels = [(700.0, 100.0), (0.0, 0.0), (400.0, 300.0), (13.0, 590.0)];
        for (w, h) in [(800.0, 600.0), (600.0, 800.0)] {
            for zoom in [0.2, 0.5, 1.0, 2.0, 7.5] {
                let cam = camera(w, h, zoom, 12.0, -34.0);
                let vp = cam.current_view_proj().unwrap();
                for &(sx, sy) in &pixels {
                    let world = cam.screen_to_world(sx, sy);
                    let drawn = ndc_to_pixels(&cam, vp.project(world.x as f32, world.y as f32));
                    assert!(
                        (drawn - DVec2::new(sx, sy)).abs().max_element() < 0.05,
                        "{w}x{h} zoom {zoom}: ({sx}, {sy}) drawn at {drawn:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn anchored_zoom_keeps_drawn_anchor() {
        let mut cam = camera(800.0, 600.0, 0.2, 5.0, 5.0);
        let anchor = cam.screen_to_world(700.0, 100.0);
        cam.zoom_around_point(1.01, 700.0, 100.0);
        let vp = cam.current_view_proj().unwrap();
        let drawn = ndc_to_pixels(&cam, vp.project(anchor.x as f32, anchor.y as f32));
        assert!((drawn - DVec2::new(700.0, 100.0)).abs().max_element() < 0.05, "{drawn:?}");
    }

    #[test]
    fn zero_viewport_skips_matrix() {
        let mut cam = Camera::default();
        assert_eq!(cam.scale(), 0.0);
        assert!(cam.view_proj_matrix(1.0).is_none());
        assert!(cam.current_view_proj().is_none());

        cam.set_viewport(640.0, 0.0);
        assert_eq!(cam.scale(), 0.0);
        assert!(cam.view_proj_matrix(1.0).is_none());

        cam.set_viewport(640.0, 480.0);
        assert!(cam.current_view_proj().is_some());
        assert!(cam.view_proj_matrix(0.0).is_none());
    }

    #[test]
    fn negative_viewport_is_sanitized() {
        let mut cam = Camera::default();
        cam.set_viewport(-5.0, f64::NAN);
        assert_eq!(cam.viewport_width(), 0.0);
        assert_eq!(cam.viewport_height(), 0.0);
    }
}
