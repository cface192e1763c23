//! Viewport module for pan/zoom transforms and animated page focus.

use crate::config::EngineConfig;
use crate::input::Modifiers;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use std::f64::consts::PI;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Zoom percentage that maps canvas units 1:1 to screen pixels.
pub const DEFAULT_ZOOM: f64 = 100.0;

/// Identifies one scroll-to-page animation.
///
/// A newer animation supersedes an older one; the older handle then stops
/// being current and cancelling it does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

#[derive(Debug, Clone)]
struct PanAnimation {
    handle: AnimationHandle,
    from: Vec2,
    to: Vec2,
    started: Instant,
    duration: Duration,
}

/// Something that can bring a page into view.
///
/// Handed to the navigator and presentation mode instead of a global hook.
pub trait PageScroller {
    /// Start bringing `page_rect` (canvas space) into view.
    fn scroll_to_page(&mut self, page_rect: Rect, now: Instant) -> AnimationHandle;
}

/// Cosine ease-in-out over `t` in `[0, 1]`.
pub fn ease_in_out(t: f64) -> f64 {
    0.5 - (PI * t.clamp(0.0, 1.0)).cos() / 2.0
}

/// Viewport manages the view transform for the canvas.
///
/// Zoom is a percentage; `screen = canvas * zoom/100 + pan_offset`.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Current translation offset in screen pixels.
    pub pan_offset: Vec2,
    zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change of the zoom buttons.
    pub zoom_step: f64,
    /// Zoom change per wheel pixel while Ctrl/Cmd is held.
    pub wheel_sensitivity: f64,
    /// Duration of the scroll-to-page animation.
    pub animation_duration: Duration,
    /// Size of the visible canvas area in screen pixels.
    pub size: Size,
    animation: Option<PanAnimation>,
    next_animation: u64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Viewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            pan_offset: Vec2::ZERO,
            zoom: DEFAULT_ZOOM.max(config.zoom_min).min(config.zoom_max),
            min_zoom: config.zoom_min,
            max_zoom: config.zoom_max,
            zoom_step: config.zoom_step,
            wheel_sensitivity: config.wheel_zoom_sensitivity,
            animation_duration: Duration::from_millis(config.pan_animation_ms),
            size: Size::new(1280.0, 800.0),
            animation: None,
            next_animation: 0,
        }
    }

    /// Current zoom percentage.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current zoom as a scale factor.
    pub fn scale(&self) -> f64 {
        self.zoom / 100.0
    }

    /// Set the zoom percentage, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.max(self.min_zoom).min(self.max_zoom);
        }
    }

    /// Transform from canvas to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan_offset) * Affine::scale(self.scale())
    }

    /// Transform from screen to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale()) * Affine::translate(-self.pan_offset)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Convert a screen-space delta to a canvas-space delta.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.scale()
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_offset += delta;
    }

    /// Zoom to `zoom`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, zoom: f64) {
        let anchor = self.screen_to_canvas(screen_point);
        let before = self.zoom;
        self.set_zoom(zoom);
        if (self.zoom - before).abs() < f64::EPSILON {
            return;
        }
        let moved = self.canvas_to_screen(anchor);
        self.pan_offset += screen_point - moved;
    }

    /// Step the zoom in to the next multiple of the step, around the viewport centre.
    pub fn zoom_in(&mut self) {
        let center = self.center();
        let target = (self.zoom_steps().floor() + 1.0) * self.zoom_step;
        self.zoom_at(center, target);
    }

    /// Step the zoom out to the previous multiple of the step, around the viewport centre.
    pub fn zoom_out(&mut self) {
        let center = self.center();
        let target = (self.zoom_steps().ceil() - 1.0) * self.zoom_step;
        self.zoom_at(center, target);
    }

    /// Zoom level in units of `zoom_step`, with float noise around whole steps removed.
    fn zoom_steps(&self) -> f64 {
        let steps = self.zoom / self.zoom_step;
        let whole = steps.round();
        if (steps - whole).abs() < 1e-9 { whole } else { steps }
    }

    /// Reset to 100%, around the viewport centre.
    pub fn reset_zoom(&mut self) {
        let center = self.center();
        self.zoom_at(center, DEFAULT_ZOOM);
    }

    /// Handle a wheel/trackpad scroll: zoom with Ctrl/Cmd, pan otherwise.
    pub fn handle_wheel(&mut self, position: Point, delta: Vec2, modifiers: Modifiers) {
        if modifiers.ctrl || modifiers.meta {
            let factor = 1.0 - delta.y * self.wheel_sensitivity;
            if factor > 0.0 {
                self.zoom_at(position, self.zoom * factor);
            }
        } else {
            self.pan(-delta);
        }
    }

    /// Fit the viewport to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        if bounds.is_zero_area() {
            self.zoom = DEFAULT_ZOOM;
            self.pan_offset = Vec2::ZERO;
            return;
        }

        let available = Size::new(
            (self.size.width - padding * 2.0).max(1.0),
            (self.size.height - padding * 2.0).max(1.0),
        );
        let scale = (available.width / bounds.width()).min(available.height / bounds.height());
        self.set_zoom(scale * 100.0);

        let bounds_center = bounds.center();
        self.pan_offset = self.center().to_vec2() - bounds_center.to_vec2() * self.scale();
    }

    fn center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Whether `handle` is the animation currently running.
    pub fn is_current(&self, handle: AnimationHandle) -> bool {
        self.animation.as_ref().is_some_and(|a| a.handle == handle)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Stop an animation if it is still the current one.
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        if self.is_current(handle) {
            self.animation = None;
            true
        } else {
            false
        }
    }

    /// Advance the running animation. Returns true while it is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = &self.animation else {
            return false;
        };
        let elapsed = now.saturating_duration_since(animation.started);
        let t = if animation.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / animation.duration.as_secs_f64()
        };
        let eased = ease_in_out(t);
        self.pan_offset = animation.from + (animation.to - animation.from) * eased;

        if t >= 1.0 {
            self.pan_offset = animation.to;
            self.animation = None;
            false
        } else {
            true
        }
    }
}

impl PageScroller for Viewport {
    /// Reset zoom to 100% and animate the pan so the page is centred.
    fn scroll_to_page(&mut self, page_rect: Rect, now: Instant) -> AnimationHandle {
        self.set_zoom(DEFAULT_ZOOM);
        let target = self.center().to_vec2() - page_rect.center().to_vec2() * self.scale();

        self.next_animation += 1;
        let handle = AnimationHandle(self.next_animation);
        if let Some(previous) = self.animation.replace(PanAnimation {
            handle,
            from: self.pan_offset,
            to: target,
            started: now,
            duration: self.animation_duration,
        }) {
            log::debug!("pan animation {:?} superseded by {:?}", previous.handle, handle);
        }
        handle
    }
}
