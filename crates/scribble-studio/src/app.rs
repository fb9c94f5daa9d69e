use scribble_engine::core::{App, AppControl, FrameCtx};
use scribble_engine::coords::{Color, Vec2, Viewport};
use scribble_engine::geometry::LineStyle;
use scribble_engine::input::{
    InputEvent, InputState, Key, MouseButton, MouseButtonState, PointerButtonEvent,
};
use scribble_engine::render::lines::{LineBatch, LinePipelineConfig, LineRenderer};
use scribble_engine::scene::Sketch;
use scribble_engine::transform::TransformVariant;
use scribble_engine::window::RuntimeCtx;

use crate::camera::Camera;
use crate::config::LinesConfig;

/// Radians per second while `Q`/`E` is held.
const ROTATE_SPEED: f32 = 1.5;

/// Zoom factor per wheel line.
const WHEEL_ZOOM: f32 = 1.1;

/// Freehand drawing on an infinite canvas.
///
/// Controls:
/// - left drag draws, release commits the stroke
/// - right drag pans, wheel zooms about the pointer
/// - `Q`/`E` rotate (matrix and affine pipelines only)
/// - `1`/`2`/`3` select the matrix, pan/zoom or affine pipeline
/// - `C` clears, `Z` undoes the last stroke, `Escape` quits
pub struct ScribbleApp {
    title: String,
    lines: LinesConfig,

    camera: Camera,
    sketch: Sketch,

    renderer: LineRenderer,
    batch: LineBatch,
    title_dirty: bool,
}

impl ScribbleApp {
    pub fn new(title: String, lines: LinesConfig) -> Self {
        let variant = lines.variant;
        Self {
            title,
            camera: Camera::default(),
            sketch: Sketch::with_limits(lines.min_point_distance, lines.max_instances),
            renderer: LineRenderer::new(LinePipelineConfig::new(variant)),
            batch: LineBatch::new(variant),
            title_dirty: true,
            lines,
        }
    }

    #[inline]
    fn variant(&self) -> TransformVariant {
        self.renderer.variant()
    }

    fn select_variant(&mut self, variant: TransformVariant) {
        if variant == self.variant() {
            return;
        }
        self.renderer.set_variant(variant);
        self.batch = LineBatch::new(variant);
        self.title_dirty = true;
    }

    fn window_title(&self) -> String {
        format!("{} [{}]", self.title, self.variant().label())
    }

    /// Feeds this frame's pointer events to the sketch, in arrival order.
    fn capture_strokes(&mut self, events: &[InputEvent], viewport: Viewport) {
        let variant = self.variant();
        for ev in events {
            match ev {
                InputEvent::PointerButton(PointerButtonEvent {
                    button: MouseButton::Left,
                    state,
                    position,
                    ..
                }) => match state {
                    MouseButtonState::Pressed => self.append(*position, viewport, variant),
                    MouseButtonState::Released => {
                        if self.sketch.is_drawing() {
                            self.append(*position, viewport, variant);
                            self.sketch.commit_stroke();
                        }
                    }
                },
                InputEvent::PointerMoved(p) if self.sketch.is_drawing() => {
                    self.append(*p, viewport, variant)
                }
                InputEvent::Focused(false) if self.sketch.is_drawing() => {
                    self.sketch.commit_stroke();
                }
                _ => {}
            }
        }
    }

    fn append(&mut self, pixel: Vec2, viewport: Viewport, variant: TransformVariant) {
        if let Some(world) = self.camera.screen_to_world(pixel, viewport, variant) {
            self.sketch.append_point(world);
        }
    }

    fn style(&self, viewport: Viewport) -> LineStyle {
        LineStyle::new(self.lines.thickness)
            .with_color(self.lines.color)
            .with_aa_border(LineStyle::aa_border_from_pixels(self.lines.aa_border_px, viewport))
    }

    fn background(&self) -> Color {
        self.lines.background
    }
}

impl App for ScribbleApp {
    fn on_input(&mut self, event: &InputEvent, input: &InputState, runtime: &mut RuntimeCtx) {
        let relevant = match event {
            InputEvent::PointerMoved(_) => {
                input.button_down(MouseButton::Left) || input.button_down(MouseButton::Right)
            }
            InputEvent::ModifiersChanged(_) => false,
            _ => true,
        };
        if relevant {
            runtime.request_redraw();
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.viewport();
        let frame = ctx.input_frame;
        let input = ctx.input;

        if frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        for (key, variant) in [
            (Key::Digit1, TransformVariant::Matrix),
            (Key::Digit2, TransformVariant::PanZoom),
            (Key::Digit3, TransformVariant::Affine),
        ] {
            if frame.key_pressed(key) {
                self.select_variant(variant);
            }
        }
        if self.title_dirty {
            ctx.runtime.set_title(self.window_title());
            self.title_dirty = false;
        }

        if frame.key_pressed(Key::C) {
            self.sketch.clear();
        }
        if frame.key_pressed(Key::Z) && !self.sketch.is_drawing() {
            self.sketch.undo();
        }

        let variant = self.variant();

        if variant != TransformVariant::PanZoom {
            let spin = match (input.key_down(Key::Q), input.key_down(Key::E)) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            };
            if spin != 0.0 {
                self.camera.rotate(spin * ROTATE_SPEED * ctx.time.dt);
                ctx.runtime.request_redraw();
            }
        }

        if frame.wheel.y != 0.0 {
            if let Some(pointer) = input.pointer_pos {
                self.camera
                    .zoom_at(pointer, WHEEL_ZOOM.powf(frame.wheel.y), viewport, variant);
            }
        }

        if input.button_down(MouseButton::Right) {
            self.camera.pan_pixels(frame.pointer_delta, viewport, variant);
        }

        self.capture_strokes(&frame.events, viewport);

        self.batch.clear();
        let instances = self.sketch.instances();
        if let Err(err) = self
            .batch
            .push(&instances, self.camera.params(variant, viewport), self.style(viewport))
        {
            log::warn!("skipping sketch draw: {err}");
        }

        let background = self.background();
        let renderer = &mut self.renderer;
        let batch = &self.batch;
        ctx.render(background, |rctx, target| {
            if let Err(err) = renderer.render(rctx, target, batch) {
                log::error!("line render failed: {err}");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use scribble_engine::input::Modifiers;

    fn app() -> ScribbleApp {
        let config = Config::embedded().unwrap();
        ScribbleApp::new(config.window.title, config.lines)
    }

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            position: Vec2::new(x, y),
            modifiers: Modifiers::default(),
        })
    }

    const VP: Viewport = Viewport::new(400.0, 400.0);

    #[test]
    fn left_drag_draws_a_stroke() {
        let mut app = app();
        app.capture_strokes(
            &[
                button(MouseButtonState::Pressed, 100.0, 100.0),
                InputEvent::PointerMoved(Vec2::new(150.0, 100.0)),
                InputEvent::PointerMoved(Vec2::new(200.0, 120.0)),
                button(MouseButtonState::Released, 200.0, 120.0),
            ],
            VP,
        );
        assert_eq!(app.sketch.stroke_count(), 1);
        assert_eq!(app.sketch.len(), 2);
        assert!(!app.sketch.is_drawing());
    }

    #[test]
    fn hover_without_button_draws_nothing() {
        let mut app = app();
        app.capture_strokes(
            &[
                InputEvent::PointerMoved(Vec2::new(10.0, 10.0)),
                InputEvent::PointerMoved(Vec2::new(300.0, 300.0)),
            ],
            VP,
        );
        assert!(app.sketch.is_empty());
    }

    #[test]
    fn stroke_spans_frames() {
        let mut app = app();
        app.capture_strokes(&[button(MouseButtonState::Pressed, 100.0, 100.0)], VP);
        app.capture_strokes(&[InputEvent::PointerMoved(Vec2::new(180.0, 100.0))], VP);
        assert!(app.sketch.is_drawing());
        assert_eq!(app.sketch.len(), 1);
        app.capture_strokes(&[InputEvent::Focused(false)], VP);
        assert_eq!(app.sketch.stroke_count(), 1);
        assert!(!app.sketch.is_drawing());
    }

    #[test]
    fn points_are_stored_in_world_space() {
        let mut app = app();
        app.camera.zoom = 2.0;
        app.capture_strokes(
            &[
                button(MouseButtonState::Pressed, 200.0, 200.0),
                button(MouseButtonState::Released, 300.0, 200.0),
            ],
            VP,
        );
        let segs = app.sketch.instances();
        let (a, b) = segs[0].endpoints();
        assert!(a.abs_diff_eq(Vec2::zero(), 1e-5));
        // 100 px = 0.5 NDC = 0.25 world at zoom 2.
        assert!(b.abs_diff_eq(Vec2::new(0.25, 0.0), 1e-5));
    }

    #[test]
    fn switching_variant_rebuilds_batch() {
        let mut app = app();
        assert_eq!(app.variant(), TransformVariant::PanZoom);
        app.title_dirty = false;

        app.select_variant(TransformVariant::Affine);
        assert_eq!(app.variant(), TransformVariant::Affine);
        assert_eq!(app.batch.variant(), TransformVariant::Affine);
        assert!(app.title_dirty);
        assert_eq!(app.window_title(), "Scribble [affine]");
    }

    #[test]
    fn release_outside_a_stroke_is_ignored() {
        let mut app = app();
        app.capture_strokes(&[button(MouseButtonState::Released, 50.0, 50.0)], VP);
        assert!(!app.sketch.is_drawing());
        assert!(app.sketch.is_empty());
    }

    #[test]
    fn style_uses_pixel_aa_border() {
        let app = app();
        let style = app.style(VP);
        // 1.5 px over 200 px per NDC unit.
        assert!((style.aa_border - 0.0075).abs() < 1e-7);
        assert_eq!(style.thickness, 0.005);
    }
}
