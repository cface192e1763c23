//! Presentation mode: stepping through pages along the reading route.

use crate::config::EngineConfig;
use crate::document::{Page, PageId};
use crate::input::Key;
use crate::layout::{
    build_adjacency, build_reading_route, directional_neighbor, Direction, MinimapProjection,
};
use crate::viewport::PageScroller;
use kurbo::Size;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Result of a key press in presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationAction {
    /// Nothing to do (no neighbour, already at the end, unbound key).
    None,
    /// The current page changed.
    Moved(PageId),
    /// Presentation mode should close.
    Exit,
}

#[derive(Debug, Clone, Copy)]
struct Autoplay {
    interval: Duration,
    last_step: Instant,
}

/// A running presentation.
#[derive(Debug, Clone)]
pub struct Presentation {
    route: Vec<PageId>,
    current: usize,
    minimap: Size,
    minimap_max_scale: f64,
    autoplay_interval: Duration,
    autoplay: Option<Autoplay>,
}

impl Presentation {
    /// Build the reading route and show the first page.
    ///
    /// Starts at `start` when it is one of `pages`, else at the head of the
    /// route. Returns `None` when there are no pages.
    pub fn start(
        pages: &[Page],
        start: Option<PageId>,
        config: &EngineConfig,
        scroller: &mut impl PageScroller,
        now: Instant,
    ) -> Option<Self> {
        let adjacency = build_adjacency(pages, config.adjacency_tolerance);
        let route = build_reading_route(pages, &adjacency);
        if route.is_empty() {
            return None;
        }
        let current = start
            .and_then(|id| route.iter().position(|&r| r == id))
            .unwrap_or(0);

        let mut presentation = Self {
            route,
            current,
            minimap: Size::new(config.minimap_width, config.minimap_height),
            minimap_max_scale: config.minimap_max_scale,
            autoplay_interval: Duration::from_millis(config.autoplay_interval_ms),
            autoplay: None,
        };
        log::info!(
            "Presentation started with {} pages at {}",
            presentation.route.len(),
            presentation.current_page()
        );
        presentation.show(pages, scroller, now);
        Some(presentation)
    }

    /// Page currently shown.
    pub fn current_page(&self) -> PageId {
        self.route[self.current]
    }

    /// Position of the current page in the route.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn route(&self) -> &[PageId] {
        &self.route
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.route.len()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_some()
    }

    /// Turn autoplay on or off. The interval counts from `now`.
    pub fn set_autoplay(&mut self, enabled: bool, now: Instant) {
        self.autoplay = enabled.then_some(Autoplay {
            interval: self.autoplay_interval,
            last_step: now,
        });
    }

    /// Handle a key press.
    pub fn handle_key(
        &mut self,
        key: Key,
        pages: &[Page],
        scroller: &mut impl PageScroller,
        now: Instant,
    ) -> PresentationAction {
        let target = match key {
            Key::ArrowLeft => self.neighbor(pages, Direction::Left),
            Key::ArrowRight => self.neighbor(pages, Direction::Right),
            Key::ArrowUp => self.neighbor(pages, Direction::Up),
            Key::ArrowDown => self.neighbor(pages, Direction::Down),
            Key::Home => Some(0),
            Key::End => Some(self.route.len() - 1),
            Key::Space | Key::PageDown => (!self.is_last()).then(|| self.current + 1),
            Key::PageUp => self.current.checked_sub(1),
            Key::Escape => {
                self.stop();
                return PresentationAction::Exit;
            }
            Key::Char(_) => None,
        };

        match target {
            Some(index) if index != self.current => {
                self.current = index;
                self.show(pages, scroller, now);
                PresentationAction::Moved(self.current_page())
            }
            _ => PresentationAction::None,
        }
    }

    /// Advance autoplay. Returns the new page when it stepped.
    ///
    /// Autoplay turns itself off on the last page.
    pub fn tick(
        &mut self,
        pages: &[Page],
        scroller: &mut impl PageScroller,
        now: Instant,
    ) -> Option<PageId> {
        let autoplay = self.autoplay?;
        if now.saturating_duration_since(autoplay.last_step) < autoplay.interval {
            return None;
        }
        if self.is_last() {
            log::debug!("Autoplay reached the last page");
            self.autoplay = None;
            return None;
        }
        self.current += 1;
        self.show(pages, scroller, now);
        if self.is_last() {
            self.autoplay = None;
        }
        Some(self.current_page())
    }

    /// End the presentation.
    pub fn stop(&mut self) {
        self.autoplay = None;
        log::info!("Presentation stopped at {}", self.current_page());
    }

    /// Route index of the directional neighbour in minimap space.
    fn neighbor(&self, pages: &[Page], direction: Direction) -> Option<usize> {
        let projection = MinimapProjection::fit(pages, self.minimap, self.minimap_max_scale)?;
        let id = directional_neighbor(pages, self.current_page(), direction, &projection)?;
        self.route.iter().position(|&r| r == id)
    }

    fn show(&mut self, pages: &[Page], scroller: &mut impl PageScroller, now: Instant) {
        let id = self.current_page();
        match pages.iter().find(|p| p.id() == id) {
            Some(page) => {
                scroller.scroll_to_page(page.rect(), now);
            }
            None => log::warn!("Presentation page {} no longer exists", id),
        }
        if let Some(autoplay) = &mut self.autoplay {
            autoplay.last_step = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{AnimationHandle, Viewport};
    use kurbo::{Point, Rect};

    /// Records every page rect it was asked to show.
    #[derive(Default)]
    struct RecordingScroller {
        viewport: Viewport,
        shown: Vec<Rect>,
    }

    impl PageScroller for RecordingScroller {
        fn scroll_to_page(&mut self, page_rect: Rect, now: Instant) -> AnimationHandle {
            self.shown.push(page_rect);
            self.viewport.scroll_to_page(page_rect, now)
        }
    }

    fn grid() -> Vec<Page> {
        // TL, TR, BL, BR
        [(0.0, 0.0), (1300.0, 0.0), (0.0, 900.0), (1300.0, 900.0)]
            .iter()
            .map(|&(x, y)| Page::new(Point::new(x, y)))
            .collect()
    }

    fn start(pages: &[Page], scroller: &mut RecordingScroller) -> Presentation {
        Presentation::start(pages, None, &EngineConfig::default(), scroller, Instant::now()).unwrap()
    }

    #[test]
    fn test_start_on_empty_is_none() {
        let mut scroller = RecordingScroller::default();
        let result = Presentation::start(&[], None, &EngineConfig::default(), &mut scroller, Instant::now());
        assert!(result.is_none());
        assert!(scroller.shown.is_empty());
    }

    #[test]
    fn test_start_shows_route_head() {
        let pages = grid();
        let mut scroller = RecordingScroller::default();
        let presentation = start(&pages, &mut scroller);
        assert_eq!(presentation.current_page(), pages[0].id());
        assert_eq!(presentation.route().len(), 4);
        assert_eq!(scroller.shown, vec![pages[0].rect()]);
    }

    #[test]
    fn test_start_at_given_page() {
        let pages = grid();
        let mut scroller = RecordingScroller::default();
        let presentation = Presentation::start(
            &pages,
            Some(pages[3].id()),
            &EngineConfig::default(),
            &mut scroller,
            Instant::now(),
        )
        .unwrap();
        assert_eq!(presentation.current_page(), pages[3].id());
    }

    #[test]
    fn test_sequential_keys_follow_route() {
        let pages = grid();
        let mut scroller = RecordingScroller::default();
        let mut presentation = start(&pages, &mut scroller);
        let now = Instant::now();

        // Route is TL, TR, BR, BL.
        let action = presentation.handle_key(Key::Space, &pages, &mut scroller, now);
        assert_eq!(action, PresentationAction::Moved(pages[1].id()));
        let action = presentation.handle_key(Key::PageDown, &pages, &mut scroller, now);
        assert_eq!(action, PresentationAction::Moved(pages[3].id()));
        let action = presentation.handle_key(Key::End, &pages, &mut scroller, now);
        assert_eq!(action, PresentationAction::Moved(pages[2].id()));
        assert_eq!(
            presentation.handle_key(Key::PageDown, &pages, &mut scroller, now),
            PresentationAction::None
        );
        let action = presentation.handle_key(Key::PageUp, &pages, &mut scroller, now);
        assert_eq!(action, PresentationAction::Moved(pages[3].id()));
        let action = presentation.handle_key(Key::Home, &pages, &mut scroller, now);
        assert_eq!(action, PresentationAction::Moved(pages[0].id()));
        assert_eq!(
            presentation.handle_key(Key::PageUp, &pages, &mut scroller, now),
            PresentationAction::None
        );
    }

    #[test]
    fn test_arrow_keys_use_directional_neighbour() {
        let pages = grid();
        let mut scroller = RecordingScroller::default();
        let mut presentation = start(&pages, &mut scroller);
        let now = Instant::now();

        let action = presentation.handle_key(Key::ArrowDown, &pages, &mut scroller, now);
        assert_eq!(action, PresentationAction::Moved(pages[2].id()));
        let action = presentation.handle_key(Key::ArrowRight, &pages, &mut scroller, now);
        assert_eq!(action, PresentationAction::Moved(pages[3].id()));
        assert_eq!(
            presentation.handle_key(Key::ArrowDown, &pages, &mut scroller, now),
            PresentationAction::None
        );
        assert_eq!(scroller.shown.len(), 3);
    }

    #[test]
    fn test_escape_exits() {
        let pages = grid();
        let mut scroller = RecordingScroller::default();
        let mut presentation = start(&pages, &mut scroller);
        let action = presentation.handle_key(Key::Escape, &pages, &mut scroller, Instant::now());
        assert_eq!(action, PresentationAction::Exit);
    }

    #[test]
    fn test_autoplay_advances_and_stops_at_last_page() {
        let pages = grid();
        let mut scroller = RecordingScroller::default();
        let mut presentation = start(&pages, &mut scroller);
        let t0 = Instant::now();
        presentation.set_autoplay(true, t0);

        let step = Duration::from_millis(5000);
        assert_eq!(presentation.tick(&pages, &mut scroller, t0 + step / 2), None);
        assert_eq!(presentation.tick(&pages, &mut scroller, t0 + step), Some(pages[1].id()));
        assert_eq!(presentation.tick(&pages, &mut scroller, t0 + step * 2), Some(pages[3].id()));
        assert_eq!(presentation.tick(&pages, &mut scroller, t0 + step * 3), Some(pages[2].id()));
        assert!(!presentation.is_autoplaying());
        assert_eq!(presentation.tick(&pages, &mut scroller, t0 + step * 4), None);
        assert!(presentation.is_last());
    }

    #[test]
    fn test_manual_step_restarts_autoplay_interval() {
        let pages = grid();
        let mut scroller = RecordingScroller::default();
        let mut presentation = start(&pages, &mut scroller);
        let t0 = Instant::now();
        presentation.set_autoplay(true, t0);

        let step = Duration::from_millis(5000);
        presentation.handle_key(Key::Space, &pages, &mut scroller, t0 + step / 2);
        assert_eq!(presentation.tick(&pages, &mut scroller, t0 + step), None);
        assert!(presentation.tick(&pages, &mut scroller, t0 + step * 2).is_some());
    }
}
