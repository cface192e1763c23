//! Input events and the single-pointer gesture state machine.

use crate::config::EngineConfig;
use crate::document::{ElementId, PageId};
use crate::geometry::distance;
use crate::snap::ResizeDirection;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    Escape,
    Char(char),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            " " | "Space" | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// A key press with the modifiers held at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// What a gesture acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// Moving a whole page.
    Page(PageId),
    /// Moving an element within its page.
    Element { page: PageId, element: ElementId },
    /// Resizing an element from one of its handles.
    Resize {
        page: PageId,
        element: ElementId,
        direction: ResizeDirection,
    },
}

impl DragTarget {
    /// The page this target lives on.
    pub fn page(&self) -> PageId {
        match *self {
            DragTarget::Page(page) => page,
            DragTarget::Element { page, .. } | DragTarget::Resize { page, .. } => page,
        }
    }

    /// The element this target acts on, if any.
    pub fn element(&self) -> Option<ElementId> {
        match *self {
            DragTarget::Page(_) => None,
            DragTarget::Element { element, .. } | DragTarget::Resize { element, .. } => Some(element),
        }
    }
}

/// Everything recorded at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    pub target: DragTarget,
    /// Pointer position in screen coordinates.
    pub screen: Point,
    pub time: Instant,
    /// Target geometry at pointer-down (canvas space for pages, page-local for elements).
    pub origin: Rect,
}

impl DragStart {
    /// Cumulative screen-space movement since pointer-down.
    pub fn delta(&self, screen: Point) -> Vec2 {
        screen - self.screen
    }
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Pressed on a target but not yet past the drag threshold.
    DragReady(DragStart),
    Dragging(DragStart),
}

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Nothing was pressed.
    None,
    /// Short press without movement.
    Click(DragStart),
    /// The target was dragged; `delta` is the final screen-space movement.
    /// `needs_final_move` is set when the threshold was crossed only at release.
    Drag {
        start: DragStart,
        delta: Vec2,
        needs_final_move: bool,
    },
    /// Long press without movement. Neither a click nor a drag.
    Held(DragStart),
}

/// Tracks one pointer gesture at a time: idle, ready, dragging, idle.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: Gesture,
    /// Screen pixels of travel before a press becomes a drag.
    pub drag_threshold: f64,
    /// Longest press that still counts as a click.
    pub click_max: Duration,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            state: Gesture::Idle,
            drag_threshold: config.drag_threshold,
            click_max: Duration::from_millis(config.click_max_ms),
        }
    }

    pub fn state(&self) -> &Gesture {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, Gesture::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, Gesture::Dragging(_))
    }

    /// The pointer-down record of the active gesture.
    pub fn active(&self) -> Option<&DragStart> {
        match &self.state {
            Gesture::Idle => None,
            Gesture::DragReady(start) | Gesture::Dragging(start) => Some(start),
        }
    }

    /// Pointer pressed over a target. Replaces any gesture still in flight.
    pub fn press(&mut self, target: DragTarget, screen: Point, origin: Rect, now: Instant) {
        log::debug!("gesture ready on {:?}", target);
        self.state = Gesture::DragReady(DragStart {
            target,
            screen,
            time: now,
            origin,
        });
    }

    /// Pointer moved. Returns the cumulative screen delta when the gesture is dragging.
    pub fn motion(&mut self, screen: Point) -> Option<(DragStart, Vec2)> {
        match self.state {
            Gesture::Idle => None,
            Gesture::DragReady(start) => {
                if distance(start.screen, screen) >= self.drag_threshold {
                    log::debug!("gesture dragging {:?}", start.target);
                    self.state = Gesture::Dragging(start);
                    Some((start, start.delta(screen)))
                } else {
                    None
                }
            }
            Gesture::Dragging(start) => Some((start, start.delta(screen))),
        }
    }

    /// Pointer released. Always returns to idle.
    pub fn release(&mut self, screen: Point, now: Instant) -> Release {
        let state = std::mem::take(&mut self.state);
        let release = match state {
            Gesture::Idle => Release::None,
            Gesture::DragReady(start) => {
                let moved = distance(start.screen, screen);
                let elapsed = now.saturating_duration_since(start.time);
                if moved >= self.drag_threshold {
                    Release::Drag {
                        start,
                        delta: start.delta(screen),
                        needs_final_move: true,
                    }
                } else if elapsed < self.click_max {
                    Release::Click(start)
                } else {
                    Release::Held(start)
                }
            }
            Gesture::Dragging(start) => Release::Drag {
                start,
                delta: start.delta(screen),
                needs_final_move: false,
            },
        };
        if !matches!(release, Release::None) {
            log::debug!("gesture released: {:?}", release);
        }
        release
    }

    /// Drop the active gesture without classifying it.
    pub fn reset(&mut self) {
        self.state = Gesture::Idle;
    }
}
