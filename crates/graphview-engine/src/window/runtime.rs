use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::time::{FrameClock, RedrawScheduler};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "graphview".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Handed to app callbacks to schedule frames or stop the loop.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    redraw: RedrawScheduler,
    exit: bool,
}

impl RuntimeCtx {
    /// Asks for a frame; repeated requests before it is drawn coalesce.
    pub fn request_redraw(&mut self) {
        self.redraw.request();
    }

    pub fn cancel_redraw(&mut self) {
        self.redraw.cancel();
    }

    /// Direct access for helpers that schedule frames themselves.
    pub fn scheduler(&mut self) -> &mut RedrawScheduler {
        &mut self.redraw
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Entry point for the runtime: one window, frames on demand.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = AppState {
            config,
            gpu_init,
            app,
            window: None,
            runtime: RuntimeCtx::default(),
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A: CoreApp + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    runtime: RuntimeCtx,
    /// First fatal error; returned from `Runtime::run`.
    failure: Option<anyhow::Error>,
}

impl<A: CoreApp + 'static> AppState<A> {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let (app, runtime) = (&mut self.app, &mut self.runtime);
        entry
            .with_gpu(|gpu| app.on_start(gpu, runtime))
            .context("application failed to start")?;

        self.window = Some(entry);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.take().is_some() {
            self.app.on_exit();
        }
        event_loop.exit();
    }

    /// Applies what callbacks asked for: exit, or one redraw.
    fn flush(&mut self, event_loop: &ActiveEventLoop, control: AppControl) {
        if control == AppControl::Exit || self.runtime.exit {
            self.shutdown(event_loop);
            return;
        }
        if self.runtime.redraw.take()
            && let Some(entry) = self.window.as_ref()
        {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> AppControl {
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Continue;
        };
        let (app, runtime) = (&mut self.app, &mut self.runtime);
        entry.with_gpu_mut(|gpu| gpu.resize(size));
        entry.with_gpu(|gpu| app.on_resize(&gpu.render_ctx(), size, runtime))
    }

    fn draw_frame(&mut self, window_id: WindowId) -> AppControl {
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Continue;
        };
        let (app, runtime) = (&mut self.app, &mut self.runtime);

        entry.with_mut(|fields| {
            let size = fields.gpu.size();
            if size.width == 0 || size.height == 0 {
                return AppControl::Continue;
            }

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: fields.input,
                time: fields.clock.tick(),
                runtime,
            };
            app.on_frame(&mut ctx)
        })
    }
}

impl<A: CoreApp + 'static> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        self.runtime.request_redraw();
        self.flush(event_loop, AppControl::Continue);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        let mut control = AppControl::Continue;

        let (app, runtime) = (&mut self.app, &mut self.runtime);
        entry.with_input_mut(|input| {
            if let Some(ev) = translate_window_event(input, &event) {
                input.apply_event(&ev);
                control = app.on_input(&ev, runtime);
            }
        });

        if control == AppControl::Continue {
            control = match &event {
                WindowEvent::CloseRequested => AppControl::Exit,
                WindowEvent::Resized(size) => self.resize(*size),
                WindowEvent::ScaleFactorChanged { .. } => {
                    match self.window.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                        Some(size) => self.resize(size),
                        None => AppControl::Continue,
                    }
                }
                WindowEvent::RedrawRequested => self.draw_frame(window_id),
                _ => AppControl::Continue,
            };
        }

        self.flush(event_loop, control);
    }
}
