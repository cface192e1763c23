//! Folio Core Library
//!
//! Platform-agnostic spatial engine for the Folio page canvas: magnetic
//! snapping with smart guides, the page layout graph, the pointer gesture
//! state machine and the viewport.

pub mod canvas;
pub mod config;
pub mod document;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod persistence;
pub mod presentation;
pub mod snap;
pub mod viewport;

pub use canvas::{Action, Canvas, Selection};
pub use config::{ConfigError, EngineConfig};
pub use document::{Document, Element, ElementGeometry, ElementId, ElementKind, Page, PageId};
pub use input::{DragTarget, Gesture, GestureTracker, Key, KeyEvent, Modifiers, Release};
pub use layout::{build_adjacency, build_reading_route, directional_neighbor, navigator_order, Direction, MinimapProjection};
pub use persistence::{dispatch, MemoryPersistence, PersistError, PersistRequest, PersistResult, PersistenceSink};
pub use presentation::{Presentation, PresentationAction};
pub use snap::{compute_page_snap, compute_resize_snap, compute_snap, Guide, GuideOrientation, ResizeDirection, SnapResult};
pub use viewport::{AnimationHandle, PageScroller, Viewport};
