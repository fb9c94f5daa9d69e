use crate::input::{InputEvent, InputState};
use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for every translated input event, before it is visible in the
    /// next frame's `InputFrame`. The default asks for a redraw.
    fn on_input(&mut self, event: &InputEvent, input: &InputState, runtime: &mut RuntimeCtx) {
        let _ = (event, input);
        runtime.request_redraw();
    }

    /// Called once per presented frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
