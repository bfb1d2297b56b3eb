//! Browser collaborators
//!
//! Screens are `.screen` elements toggled with a `hidden` class; the world is
//! drawn as plain shapes on a 2D canvas.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, KeyboardEvent};

use super::{FrameSink, Presenter, RawInput, Screen, Viewport};
use crate::sim::Snapshot;

/// Size of the browser window's layout viewport
#[derive(Debug, Default)]
pub struct WindowViewport;

impl Viewport for WindowViewport {
    fn size(&self) -> Vec2 {
        let Some(window) = web_sys::window() else {
            return Vec2::new(
                crate::consts::DEFAULT_VIEWPORT_WIDTH,
                crate::consts::DEFAULT_VIEWPORT_HEIGHT,
            );
        };
        let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>, fallback: f32| {
            v.ok()
                .and_then(|v| v.as_f64())
                .map(|v| v as f32)
                .unwrap_or(fallback)
        };
        Vec2::new(
            read(window.inner_width(), crate::consts::DEFAULT_VIEWPORT_WIDTH),
            read(window.inner_height(), crate::consts::DEFAULT_VIEWPORT_HEIGHT),
        )
    }
}

/// Shows one of `#start-screen`, `#game-screen`, `#end-screen`
pub struct DomPresenter {
    document: Document,
}

impl DomPresenter {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn show_only(&self, id: &str) {
        if let Ok(screens) = self.document.query_selector_all(".screen") {
            for i in 0..screens.length() {
                if let Some(el) = screens.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    let _ = el.class_list().add_1("hidden");
                }
            }
        }
        match self.document.get_element_by_id(id) {
            Some(el) => {
                let _ = el.class_list().remove_1("hidden");
            }
            None => log::warn!("Missing screen element #{id}"),
        }
    }
}

impl Presenter for DomPresenter {
    fn show(&mut self, screen: Screen) {
        match screen {
            Screen::Start => self.show_only("start-screen"),
            Screen::Playing => self.show_only("game-screen"),
            Screen::Ended { final_score } => {
                if let Some(el) = self.document.get_element_by_id("score") {
                    el.set_text_content(Some(&final_score.to_string()));
                }
                self.show_only("end-screen");
            }
        }
    }
}

/// Plain-shape renderer (no textures)
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// `None` if the canvas has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl FrameSink for CanvasRenderer {
    fn frame(&mut self, snapshot: &Snapshot) {
        let ctx = &self.ctx;
        let w = f64::from(self.canvas.width());
        let h = f64::from(self.canvas.height());
        ctx.clear_rect(0.0, 0.0, w, h);

        // Trail
        if snapshot.trail.len() > 1 {
            ctx.set_stroke_style_str("orange");
            ctx.set_line_width(2.0);
            ctx.begin_path();
            for pair in snapshot.trail.windows(2) {
                ctx.move_to(f64::from(pair[0].x), f64::from(pair[0].y));
                ctx.line_to(f64::from(pair[1].x), f64::from(pair[1].y));
            }
            ctx.stroke();
        }

        ctx.set_fill_style_str("#3c8d2f");
        for pipe in &snapshot.pipes {
            for r in [&pipe.top, &pipe.bottom] {
                ctx.fill_rect(
                    f64::from(r.x),
                    f64::from(r.y),
                    f64::from(r.w),
                    f64::from(r.h),
                );
            }
        }

        let b = &snapshot.bird;
        ctx.set_fill_style_str("#f4c430");
        ctx.fill_rect(
            f64::from(b.x),
            f64::from(b.y),
            f64::from(b.w),
            f64::from(b.h),
        );

        ctx.set_fill_style_str("black");
        ctx.set_font("20px 'Pixelify Sans', sans-serif");
        let _ = ctx.fill_text(&format!("Score: {}", snapshot.score), 10.0, 30.0);
    }

    fn round_ended(&mut self, final_score: u32) {
        log::info!("Final score: {final_score}");
    }
}

/// Keyboard event as a raw input (by physical key code)
pub fn keyboard_input(event: &KeyboardEvent) -> RawInput {
    RawInput::KeyDown { code: event.code() }
}
