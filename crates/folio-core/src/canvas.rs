//! Canvas: document, viewport and the active gesture in one place.

use crate::config::{ConfigError, EngineConfig};
use crate::document::{Document, Element, ElementId, PAGE_SIZE, Page, PageId};
use crate::geometry::distance;
use crate::input::{DragStart, DragTarget, Gesture, GestureTracker, Key, KeyEvent, Modifiers, Release};
use crate::layout;
use crate::persistence::PersistRequest;
use crate::presentation::{Presentation, PresentationAction};
use crate::snap::{
    clamp_dragged_edges, compute_page_snap, compute_resize_snap, compute_snap, resize_rect, Guide,
    PageSnapParams, ResizeDirection, SnapResult,
};
use crate::viewport::{AnimationHandle, PageScroller, Viewport};
use kurbo::{Point, Rect, Size, Vec2};

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// What is currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Page(PageId),
    Element { page: PageId, element: ElementId },
}

impl From<DragTarget> for Selection {
    fn from(target: DragTarget) -> Self {
        match target {
            DragTarget::Page(page) => Selection::Page(page),
            DragTarget::Element { page, element } | DragTarget::Resize { page, element, .. } => {
                Selection::Element { page, element }
            }
        }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    SelectionChanged(Option<Selection>),
    /// Live frame of a page drag.
    PageMoved { page: PageId, position: Point },
    /// Live frame of an element move or resize (page-local bounds).
    ElementChanged {
        page: PageId,
        element: ElementId,
        bounds: Rect,
    },
    /// A gesture finished and queued this update.
    Committed(PersistRequest),
    HistoryChanged,
    ViewportChanged,
    PresentationMoved(PageId),
    PresentationEnded,
}

/// Runtime canvas state (not persisted).
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: Document,
    pub viewport: Viewport,
    config: EngineConfig,
    gesture: GestureTracker,
    /// Whether the active gesture already pushed its undo snapshot.
    gesture_mutated: bool,
    selection: Option<Selection>,
    /// Guides of the current drag frame, in canvas space.
    guides: Vec<Guide>,
    outbox: Vec<PersistRequest>,
    presentation: Option<Presentation>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document and default settings.
    pub fn new() -> Self {
        Self::build(Document::new(), EngineConfig::default())
    }

    /// Create a canvas with an existing document.
    pub fn with_document(document: Document) -> Self {
        Self::build(document, EngineConfig::default())
    }

    /// Create a canvas with custom thresholds.
    pub fn with_config(document: Document, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(document, config))
    }

    fn build(document: Document, config: EngineConfig) -> Self {
        Self {
            document,
            viewport: Viewport::from_config(&config),
            gesture: GestureTracker::from_config(&config),
            config,
            gesture_mutated: false,
            selection: None,
            guides: Vec::new(),
            outbox: Vec::new(),
            presentation: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.size = Size::new(width, height);
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn gesture(&self) -> &Gesture {
        self.gesture.state()
    }

    /// Guide lines of the current drag frame, in canvas space.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Take the queued persistence requests.
    pub fn take_outbox(&mut self) -> Vec<PersistRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_requests(&self) -> &[PersistRequest] {
        &self.outbox
    }

    // --- Pages ---

    /// Append a page at the next free slot of the bottom row.
    pub fn add_page(&mut self, elements: Vec<Element>) -> PageId {
        self.document.push_undo();
        let position = self
            .document
            .next_page_position(self.config.page_padding, self.config.navigator_row_tolerance);
        log::debug!("Adding page at {:?}", position);
        self.document.insert_page(Page::new(position).with_elements(elements))
    }

    /// Add a page centred on a screen point (template drop).
    pub fn drop_page_at(&mut self, screen: Point, elements: Vec<Element>) -> PageId {
        self.document.push_undo();
        let position = Document::drop_position(self.viewport.screen_to_canvas(screen));
        log::debug!("Dropping page at {:?}", position);
        self.document.insert_page(Page::new(position).with_elements(elements))
    }

    /// Page ids in side-navigator order.
    pub fn navigator_order(&self) -> Vec<PageId> {
        layout::navigator_order(&self.document.pages, self.config.navigator_row_tolerance)
    }

    /// Animate the viewport to a page.
    pub fn navigate_to(&mut self, page: PageId, now: Instant) -> Option<AnimationHandle> {
        let rect = self.document.page(page)?.rect();
        Some(self.viewport.scroll_to_page(rect, now))
    }

    /// Fit the view to show all pages.
    pub fn fit_to_content(&mut self) {
        if let Some(bounds) = self.document.bounds() {
            self.viewport.fit_to_bounds(bounds, 50.0);
        }
    }

    // --- Pointer ---

    /// Pointer pressed. Picks resize handles of the selected element first,
    /// then elements, then pages. Empty canvas clears the selection.
    /// Ignored while presenting.
    pub fn pointer_down(&mut self, screen: Point, now: Instant) -> Action {
        self.guides.clear();
        self.gesture_mutated = false;

        if self.presentation.is_some() {
            self.gesture.reset();
            return Action::None;
        }

        if let Some((target, origin)) = self.hit_test(screen) {
            self.gesture.press(target, screen, origin, now);
            return Action::None;
        }

        self.gesture.reset();
        match self.selection.take() {
            Some(_) => Action::SelectionChanged(None),
            None => Action::None,
        }
    }

    /// Pointer moved. While dragging, applies the snapped geometry live.
    pub fn pointer_move(&mut self, screen: Point) -> Action {
        match self.gesture.motion(screen) {
            Some((start, delta)) => self.apply_drag(start, delta),
            None => Action::None,
        }
    }

    /// Pointer released: click, drag completion or plain release.
    pub fn pointer_up(&mut self, screen: Point, now: Instant) -> Action {
        let action = match self.gesture.release(screen, now) {
            Release::None | Release::Held(_) => Action::None,
            Release::Click(start) => {
                let selection = Selection::from(start.target);
                self.selection = Some(selection);
                Action::SelectionChanged(Some(selection))
            }
            Release::Drag {
                start,
                delta,
                needs_final_move,
            } => {
                if needs_final_move {
                    self.apply_drag(start, delta);
                }
                self.commit(start.target)
            }
        };
        self.guides.clear();
        self.gesture_mutated = false;
        action
    }

    /// Wheel or trackpad scroll.
    pub fn handle_wheel(&mut self, screen: Point, delta: Vec2, modifiers: Modifiers) -> Action {
        self.viewport.handle_wheel(screen, delta, modifiers);
        Action::ViewportChanged
    }

    // --- Keyboard ---

    /// Key pressed. Presentation mode gets keys first while it runs.
    pub fn handle_key(&mut self, event: KeyEvent, now: Instant) -> Action {
        if let Some(presentation) = &mut self.presentation {
            return match presentation.handle_key(event.key, &self.document.pages, &mut self.viewport, now) {
                PresentationAction::None => Action::None,
                PresentationAction::Moved(page) => Action::PresentationMoved(page),
                PresentationAction::Exit => {
                    self.presentation = None;
                    Action::PresentationEnded
                }
            };
        }

        let command = event.modifiers.command();
        match event.key {
            Key::Char('z') if command && event.modifiers.shift => self.redo(),
            Key::Char('z') if command => self.undo(),
            Key::Char('y') if command => self.redo(),
            Key::Escape if self.selection.is_some() => {
                self.selection = None;
                Action::SelectionChanged(None)
            }
            _ => Action::None,
        }
    }

    pub fn undo(&mut self) -> Action {
        if self.document.undo() {
            self.after_history_change();
            Action::HistoryChanged
        } else {
            Action::None
        }
    }

    pub fn redo(&mut self) -> Action {
        if self.document.redo() {
            self.after_history_change();
            Action::HistoryChanged
        } else {
            Action::None
        }
    }

    fn after_history_change(&mut self) {
        self.gesture.reset();
        self.guides.clear();
        let still_exists = match self.selection {
            Some(Selection::Page(page)) => self.document.page(page).is_some(),
            Some(Selection::Element { page, element }) => self.document.element(page, element).is_some(),
            None => true,
        };
        if !still_exists {
            self.selection = None;
        }
    }

    // --- Presentation ---

    /// Enter presentation mode at `start` (or the head of the reading route).
    pub fn start_presentation(&mut self, start: Option<PageId>, now: Instant) -> bool {
        self.gesture.reset();
        self.guides.clear();
        self.presentation =
            Presentation::start(&self.document.pages, start, &self.config, &mut self.viewport, now);
        self.presentation.is_some()
    }

    pub fn stop_presentation(&mut self) {
        if let Some(mut presentation) = self.presentation.take() {
            presentation.stop();
        }
    }

    pub fn presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    pub fn set_autoplay(&mut self, enabled: bool, now: Instant) {
        if let Some(presentation) = &mut self.presentation {
            presentation.set_autoplay(enabled, now);
        }
    }

    /// Advance animations and autoplay. Returns true while a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let stepped = match &mut self.presentation {
            Some(presentation) => presentation
                .tick(&self.document.pages, &mut self.viewport, now)
                .is_some(),
            None => false,
        };
        let animating = self.viewport.tick(now);
        stepped || animating
    }

    // --- Internals ---

    fn hit_test(&self, screen: Point) -> Option<(DragTarget, Rect)> {
        if let Some(hit) = self.hit_resize_handle(screen) {
            return Some(hit);
        }

        let point = self.viewport.screen_to_canvas(screen);
        let page = self.document.page(self.document.page_at(point)?)?;
        match page.element_at(page.to_local(point)).and_then(|id| page.element(id)) {
            Some(element) => Some((
                DragTarget::Element {
                    page: page.id(),
                    element: element.id(),
                },
                element.bounds(),
            )),
            None => Some((DragTarget::Page(page.id()), page.rect())),
        }
    }

    fn hit_resize_handle(&self, screen: Point) -> Option<(DragTarget, Rect)> {
        let Some(Selection::Element { page, element }) = self.selection else {
            return None;
        };
        let owner = self.document.page(page)?;
        let bounds = owner.element(element)?.bounds();
        let on_canvas = owner.local_rect_to_canvas(bounds);

        ResizeDirection::ALL
            .into_iter()
            .find(|direction| {
                let handle = self.viewport.canvas_to_screen(direction.anchor(on_canvas));
                distance(handle, screen) <= self.config.handle_hit_radius
            })
            .map(|direction| {
                (
                    DragTarget::Resize {
                        page,
                        element,
                        direction,
                    },
                    bounds,
                )
            })
    }

    /// Push the gesture's undo snapshot before its first mutation.
    fn begin_mutation(&mut self) {
        if !self.gesture_mutated {
            self.document.push_undo();
            self.gesture_mutated = true;
        }
    }

    /// Apply one drag frame. Geometry is always `origin + delta`, never incremental.
    fn apply_drag(&mut self, start: DragStart, screen_delta: Vec2) -> Action {
        let delta = self.viewport.screen_delta_to_canvas(screen_delta);

        let action = match start.target {
            DragTarget::Page(page) => {
                let others: Vec<Rect> = self
                    .document
                    .pages
                    .iter()
                    .filter(|p| p.id() != page)
                    .map(Page::rect)
                    .collect();
                let result = compute_page_snap(start.origin + delta, &others, &PageSnapParams::from(&self.config));
                let position = result.rect.origin();

                self.begin_mutation();
                if self.document.set_page_position(page, position) {
                    self.guides = result.guides;
                    Some(Action::PageMoved { page, position })
                } else {
                    None
                }
            }
            DragTarget::Element { page, element } => {
                let threshold = self.element_threshold();
                self.element_frame(page, element, |statics| {
                    compute_snap(start.origin + delta, statics, threshold)
                })
            }
            DragTarget::Resize {
                page,
                element,
                direction,
            } => {
                let threshold = self.element_threshold();
                let min_size = self.config.min_element_size;
                let raw = resize_rect(start.origin, direction, delta, min_size);
                let raw = clamp_dragged_edges(raw, direction, Rect::from_origin_size(Point::ZERO, PAGE_SIZE));
                self.element_frame(page, element, |statics| {
                    compute_resize_snap(raw, direction, statics, threshold, min_size)
                })
            }
        };

        action.unwrap_or_else(|| {
            log::warn!("Drag target {:?} disappeared, dropping gesture", start.target);
            self.gesture.reset();
            self.guides.clear();
            Action::None
        })
    }

    /// Element snap threshold in canvas units at the current zoom.
    fn element_threshold(&self) -> f64 {
        self.config.element_snap_threshold / self.viewport.scale()
    }

    /// Snap an element against its siblings and its page, then apply it clamped.
    fn element_frame(
        &mut self,
        page: PageId,
        element: ElementId,
        snap: impl FnOnce(&[Rect]) -> SnapResult,
    ) -> Option<Action> {
        let owner = self.document.page(page)?;
        let offset = owner.position.to_vec2();
        let mut statics: Vec<Rect> = owner
            .elements
            .iter()
            .filter(|e| e.id() != element)
            .map(Element::bounds)
            .collect();
        statics.push(Rect::from_origin_size(Point::ZERO, PAGE_SIZE));

        let result = snap(&statics);
        self.begin_mutation();
        let bounds = self.document.set_element_bounds(page, element, result.rect)?;
        self.guides = result.guides.into_iter().map(|g| g.translate(offset)).collect();
        Some(Action::ElementChanged {
            page,
            element,
            bounds,
        })
    }

    /// Queue the final geometry of a finished gesture.
    fn commit(&mut self, target: DragTarget) -> Action {
        let request = match target {
            DragTarget::Page(page) => self.document.page(page).map(|p| PersistRequest::UpdatePagePosition {
                page,
                position: p.position,
            }),
            DragTarget::Element { page, element } | DragTarget::Resize { page, element, .. } => self
                .document
                .element(page, element)
                .map(|e| PersistRequest::UpdateElement {
                    element,
                    geometry: e.geometry(),
                }),
        };

        match request {
            Some(request) => {
                log::debug!("Committed {:?}", request);
                self.outbox.push(request.clone());
                Action::Committed(request)
            }
            None => Action::None,
        }
    }
}
