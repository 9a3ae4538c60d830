use winit::dpi::PhysicalSize;

use crate::device::Gpu;
use crate::input::InputEvent;
use crate::render::RenderCtx;
use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
///
/// Frames are drawn on demand: callbacks ask for one through
/// `RuntimeCtx::request_redraw`, and requests made before the next frame
/// collapse into one.
pub trait App {
    /// Window and GPU are ready. An error here shuts the runtime down.
    fn on_start(&mut self, gpu: &Gpu<'_>, runtime: &mut RuntimeCtx) -> anyhow::Result<()> {
        let _ = (gpu, runtime);
        Ok(())
    }

    /// Called for every translated input event.
    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (event, runtime);
        AppControl::Continue
    }

    /// Drawable size changed (physical pixels). The surface is already reconfigured.
    fn on_resize(
        &mut self,
        ctx: &RenderCtx<'_>,
        size: PhysicalSize<u32>,
        runtime: &mut RuntimeCtx,
    ) -> AppControl {
        let _ = (ctx, size, runtime);
        AppControl::Continue
    }

    /// Called for each requested frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the window and GPU are torn down.
    fn on_exit(&mut self) {}
}
