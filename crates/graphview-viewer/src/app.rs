use anyhow::Context;
use winit::dpi::PhysicalSize;

use graphview_engine::camera::{Camera, CameraCommand, CameraConfig, ViewProj};
use graphview_engine::core::{App, AppControl, FrameCtx};
use graphview_engine::device::Gpu;
use graphview_engine::graph::{GraphSource, MemoryGraph};
use graphview_engine::input::{InputEvent, Key, KeyState, NavigatorConfig, PointerNavigator};
use graphview_engine::render::{GraphRenderer, RenderCtx, RendererInit, RendererPhase};
use graphview_engine::window::{CursorIcon, RuntimeCtx};

use crate::config::ViewerConfig;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.07,
    a: 1.0,
};

/// Frames between frame-timing debug lines.
const FRAME_LOG_INTERVAL: u64 = 120;

/// Keyboard zoom step, applied around the viewport center.
const KEY_ZOOM_STEP: f64 = 1.1;

pub struct ViewerApp {
    graph: MemoryGraph,
    camera: Camera,
    camera_config: CameraConfig,
    navigator: PointerNavigator,

    renderer: Option<GraphRenderer>,
    phase: RendererPhase,
    renderer_init: RendererInit,
}

impl ViewerApp {
    pub fn new(graph: MemoryGraph, config: &ViewerConfig) -> Self {
        let camera_config = CameraConfig {
            zoom: config.zoom,
            ..CameraConfig::default()
        };

        Self {
            graph,
            camera: Camera::new(camera_config),
            camera_config,
            navigator: PointerNavigator::new(NavigatorConfig::default()),
            renderer: None,
            phase: RendererPhase::Uninitialized,
            renderer_init: RendererInit {
                pool_max_age: config.pool_max_age(),
                ..RendererInit::default()
            },
        }
    }

    fn reset_camera(&mut self) {
        let (w, h) = (self.camera.viewport_width(), self.camera.viewport_height());
        self.camera = Camera::new(self.camera_config);
        self.camera.set_viewport(w, h);
    }

    fn on_key(&mut self, key: Key, runtime: &mut RuntimeCtx) -> AppControl {
        let (cx, cy) = (
            self.camera.viewport_width() / 2.0,
            self.camera.viewport_height() / 2.0,
        );
        let changed = match key {
            Key::Escape => return AppControl::Exit,
            Key::Home | Key::R => {
                self.reset_camera();
                true
            }
            Key::Plus => CameraCommand::Zoom {
                factor: KEY_ZOOM_STEP,
                x: cx,
                y: cy,
            }
            .apply(&mut self.camera),
            Key::Minus => CameraCommand::Zoom {
                factor: 1.0 / KEY_ZOOM_STEP,
                x: cx,
                y: cy,
            }
            .apply(&mut self.camera),
            _ => false,
        };
        if changed {
            runtime.request_redraw();
        }
        AppControl::Continue
    }
}

impl App for ViewerApp {
    fn on_start(&mut self, gpu: &Gpu<'_>, runtime: &mut RuntimeCtx) -> anyhow::Result<()> {
        self.phase = RendererPhase::Initializing;

        let size = gpu.size();
        self.navigator
            .resize(size.width, size.height, &mut self.camera, runtime.scheduler());

        let init = RendererInit {
            view_proj: self.camera.current_view_proj().unwrap_or(ViewProj::IDENTITY),
            width: size.width,
            height: size.height,
            ..self.renderer_init.clone()
        };
        let initial: &dyn GraphSource = &self.graph;
        let renderer = GraphRenderer::new(&gpu.render_ctx(), init, Some(initial))
            .context("failed to build graph renderer")?;

        self.renderer = Some(renderer);
        self.phase = RendererPhase::Ready;
        log::info!(
            "viewing {} nodes, {} edges",
            self.graph.nodes().len(),
            self.graph.edges().len()
        );

        runtime.request_redraw();
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        if let InputEvent::Key {
            key,
            state: KeyState::Pressed,
            ..
        } = *event
        {
            return self.on_key(key, runtime);
        }

        self.navigator
            .drive(event, &mut self.camera, runtime.scheduler());
        AppControl::Continue
    }

    fn on_resize(
        &mut self,
        ctx: &RenderCtx<'_>,
        size: PhysicalSize<u32>,
        runtime: &mut RuntimeCtx,
    ) -> AppControl {
        self.navigator
            .resize(size.width, size.height, &mut self.camera, runtime.scheduler());
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(ctx, size.width, size.height);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.phase != RendererPhase::Ready {
            return AppControl::Continue;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        if ctx.time.frame_index % FRAME_LOG_INTERVAL == 0 {
            log::debug!(
                "frame {}: {:.2} ms since previous ({:.0} fps)",
                ctx.time.frame_index,
                ctx.time.dt * 1e3,
                ctx.time.fps()
            );
        }

        ctx.window.set_cursor(if self.navigator.is_dragging() {
            CursorIcon::Grabbing
        } else {
            CursorIcon::Default
        });

        // A degenerate viewport keeps the last uploaded matrix.
        if let Some(vp) = self.camera.current_view_proj() {
            renderer.update_view_projection(&ctx.gpu.render_ctx(), &vp);
        }

        let graph = &self.graph;
        ctx.render(CLEAR, |rctx, target| match renderer.draw(rctx, target, graph) {
            Ok(()) => AppControl::Continue,
            Err(e) => {
                log::error!("graph draw failed: {e}");
                AppControl::Exit
            }
        })
    }

    fn on_exit(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            log::debug!("buffer pool at exit: {}", renderer.pool_stats());
            renderer.dispose();
            self.phase = renderer.phase();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn app() -> ViewerApp {
        let cfg = ViewerConfig::try_parse_from(["graphview", "--zoom", "0.5"]).unwrap();
        ViewerApp::new(MemoryGraph::new(), &cfg)
    }

    #[test]
    fn starts_uninitialized_with_configured_zoom() {
        let app = app();
        assert_eq!(app.phase, RendererPhase::Uninitialized);
        assert!(app.renderer.is_none());
        assert_eq!(app.camera.zoom(), 0.5);
    }

    #[test]
    fn keys_zoom_reset_and_exit() {
        let mut app = app();
        let mut rt = RuntimeCtx::default();
        app.camera.set_viewport(800.0, 600.0);

        assert_eq!(app.on_key(Key::Plus, &mut rt), AppControl::Continue);
        assert!((app.camera.zoom() - 0.55).abs() < 1e-12);
        assert!(rt.redraw_pending());

        app.camera.set_position(30.0, 40.0);
        app.on_key(Key::Home, &mut rt);
        assert_eq!(app.camera.zoom(), 0.5);
        assert_eq!(app.camera.position().x, 0.0);
        assert_eq!(app.camera.viewport_width(), 800.0);

        assert_eq!(app.on_key(Key::Escape, &mut rt), AppControl::Exit);
    }

    #[test]
    fn unhandled_keys_do_not_redraw() {
        let mut app = app();
        let mut rt = RuntimeCtx::default();
        app.on_key(Key::Unknown(7), &mut rt);
        assert!(!rt.redraw_pending());
    }
}
