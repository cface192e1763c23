//! Alignment engine: magnetic snapping and smart guides.
//!
//! Three flavours share the same per-axis scan:
//! - element moves snap edges and centres to sibling rectangles,
//! - element resizes snap only the edges being dragged,
//! - page moves snap to neighbouring pages with a fixed gap, and give up
//!   the snap entirely if the snapped page would collide with another one.
//!
//! Per axis the scan keeps a running best candidate and only replaces it
//! with a strictly closer one, so ties go to the first candidate found.

use crate::config::EngineConfig;
use crate::geometry::{edges_of, gap_between, is_degenerate, rects_overlap, Axis};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length added to both ends of a guide line.
pub const GUIDE_MARGIN: f64 = 20.0;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuideOrientation {
    /// A vertical line at a fixed x (produced by X-axis snaps).
    Vertical,
    /// A horizontal line at a fixed y (produced by Y-axis snaps).
    Horizontal,
}

/// A transient alignment line shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub orientation: GuideOrientation,
    /// x for vertical guides, y for horizontal guides.
    pub position: f64,
    /// Start of the span along the line.
    pub start: f64,
    /// End of the span along the line.
    pub end: f64,
}

impl Guide {
    /// Shift the guide by an offset (e.g. page-local to canvas space).
    pub fn translate(self, offset: Vec2) -> Self {
        match self.orientation {
            GuideOrientation::Vertical => Self {
                position: self.position + offset.x,
                start: self.start + offset.y,
                end: self.end + offset.y,
                ..self
            },
            GuideOrientation::Horizontal => Self {
                position: self.position + offset.y,
                start: self.start + offset.x,
                end: self.end + offset.x,
                ..self
            },
        }
    }

    /// A guide for a snap on `axis` at `line`, spanning both rects plus the margin.
    fn spanning(axis: Axis, line: f64, a: Rect, b: Rect) -> Self {
        let (a_start, a_end, _) = edges_of(a).along(axis.cross());
        let (b_start, b_end, _) = edges_of(b).along(axis.cross());
        let orientation = match axis {
            Axis::X => GuideOrientation::Vertical,
            Axis::Y => GuideOrientation::Horizontal,
        };
        Self {
            orientation,
            position: line,
            start: a_start.min(b_start) - GUIDE_MARGIN,
            end: a_end.max(b_end) + GUIDE_MARGIN,
        }
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// The snapped (or unchanged) rectangle.
    pub rect: Rect,
    /// Whether the X axis was snapped.
    pub snapped_x: bool,
    /// Whether the Y axis was snapped.
    pub snapped_y: bool,
    /// Guides to draw, one per accepted snap.
    pub guides: Vec<Guide>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(rect: Rect) -> Self {
        Self {
            rect,
            snapped_x: false,
            snapped_y: false,
            guides: Vec::new(),
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Best candidate found so far on one axis.
#[derive(Debug, Clone, Copy)]
struct AxisSnap {
    /// New start coordinate of the moving rect (or new edge value for resizes).
    value: f64,
    /// Coordinate of the guide line.
    line: f64,
    distance: f64,
    other: Rect,
}

fn consider(best: &mut Option<AxisSnap>, candidate: AxisSnap, threshold: f64) {
    if candidate.distance > threshold {
        return;
    }
    if best.is_none_or(|b| candidate.distance < b.distance) {
        *best = Some(candidate);
    }
}

fn with_start(rect: Rect, axis: Axis, start: f64) -> Rect {
    match axis {
        Axis::X => Rect::new(start, rect.y0, start + rect.width(), rect.y1),
        Axis::Y => Rect::new(rect.x0, start, rect.x1, start + rect.height()),
    }
}

/// Scan static rects for the closest edge/centre alignment on one axis.
fn scan_move_axis(moving: Rect, statics: &[Rect], axis: Axis, threshold: f64) -> Option<AxisSnap> {
    let (m_start, m_end, m_center) = edges_of(moving).along(axis);
    let size = m_end - m_start;
    let mut best = None;

    for &other in statics.iter().filter(|r| !is_degenerate(**r)) {
        let (s_start, s_end, s_center) = edges_of(other).along(axis);
        // (moving edge, target line, resulting start), in priority order:
        // same edge, opposite edge, centre.
        let candidates = [
            (m_start, s_start, s_start),
            (m_end, s_end, s_end - size),
            (m_start, s_end, s_end),
            (m_end, s_start, s_start - size),
            (m_center, s_center, s_center - size / 2.0),
        ];
        for (edge, line, start) in candidates {
            let candidate = AxisSnap {
                value: start,
                line,
                distance: (edge - line).abs(),
                other,
            };
            consider(&mut best, candidate, threshold);
        }
    }
    best
}

/// Snap a moving rectangle to a set of static rectangles.
///
/// X and Y are evaluated independently and each snaps to at most one
/// target. Degenerate rectangles never participate.
pub fn compute_snap(moving: Rect, statics: &[Rect], threshold: f64) -> SnapResult {
    if is_degenerate(moving) || statics.is_empty() {
        return SnapResult::none(moving);
    }

    let snap_x = scan_move_axis(moving, statics, Axis::X, threshold);
    let snap_y = scan_move_axis(moving, statics, Axis::Y, threshold);

    let mut rect = moving;
    if let Some(snap) = snap_x {
        rect = with_start(rect, Axis::X, snap.value);
    }
    if let Some(snap) = snap_y {
        rect = with_start(rect, Axis::Y, snap.value);
    }

    let mut guides = Vec::new();
    if let Some(snap) = snap_x {
        guides.push(Guide::spanning(Axis::X, snap.line, rect, snap.other));
    }
    if let Some(snap) = snap_y {
        guides.push(Guide::spanning(Axis::Y, snap.line, rect, snap.other));
    }

    log::trace!("move snap: {:?} -> {:?} ({} guides)", moving, rect, guides.len());
    SnapResult {
        rect,
        snapped_x: snap_x.is_some(),
        snapped_y: snap_y.is_some(),
        guides,
    }
}

/// Which edges a resize handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResizeDirection {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

/// Invalid resize direction token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid resize direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl ResizeDirection {
    pub const N: Self = Self::new(true, false, false, false);
    pub const S: Self = Self::new(false, true, false, false);
    pub const E: Self = Self::new(false, false, true, false);
    pub const W: Self = Self::new(false, false, false, true);
    pub const NE: Self = Self::new(true, false, true, false);
    pub const NW: Self = Self::new(true, false, false, true);
    pub const SE: Self = Self::new(false, true, true, false);
    pub const SW: Self = Self::new(false, true, false, true);

    /// All eight handles: corners first, then edges.
    pub const ALL: [Self; 8] = [
        Self::NW,
        Self::NE,
        Self::SE,
        Self::SW,
        Self::N,
        Self::E,
        Self::S,
        Self::W,
    ];

    const fn new(north: bool, south: bool, east: bool, west: bool) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Handle position on a rectangle.
    pub fn anchor(self, rect: Rect) -> kurbo::Point {
        let x = if self.east {
            rect.x1
        } else if self.west {
            rect.x0
        } else {
            rect.center().x
        };
        let y = if self.south {
            rect.y1
        } else if self.north {
            rect.y0
        } else {
            rect.center().y
        };
        kurbo::Point::new(x, y)
    }
}

impl FromStr for ResizeDirection {
    type Err = ParseDirectionError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut dir = Self::default();
        for c in token.chars() {
            let flag = match c.to_ascii_lowercase() {
                'n' => &mut dir.north,
                's' => &mut dir.south,
                'e' => &mut dir.east,
                'w' => &mut dir.west,
                _ => return Err(ParseDirectionError(token.to_string())),
            };
            if *flag {
                return Err(ParseDirectionError(token.to_string()));
            }
            *flag = true;
        }
        let contradictory = (dir.north && dir.south) || (dir.east && dir.west);
        if contradictory || dir == Self::default() {
            return Err(ParseDirectionError(token.to_string()));
        }
        Ok(dir)
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.north {
            f.write_str("n")?;
        }
        if self.south {
            f.write_str("s")?;
        }
        if self.east {
            f.write_str("e")?;
        }
        if self.west {
            f.write_str("w")?;
        }
        Ok(())
    }
}

/// Apply a raw resize delta to the dragged edges, keeping a minimum size.
///
/// North and west drags move the position so the opposite edge stays put.
pub fn resize_rect(origin: Rect, direction: ResizeDirection, delta: Vec2, min_size: f64) -> Rect {
    let mut rect = origin.abs();
    if direction.east {
        rect.x1 = (rect.x1 + delta.x).max(rect.x0 + min_size);
    }
    if direction.west {
        rect.x0 = (rect.x0 + delta.x).min(rect.x1 - min_size);
    }
    if direction.south {
        rect.y1 = (rect.y1 + delta.y).max(rect.y0 + min_size);
    }
    if direction.north {
        rect.y0 = (rect.y0 + delta.y).min(rect.y1 - min_size);
    }
    rect
}

/// Pull the dragged edges of a resized rect back inside `bounds`.
///
/// Undragged edges are left alone, so a resize pushed past the page edge
/// stops at that edge instead of shifting the whole box.
pub fn clamp_dragged_edges(rect: Rect, direction: ResizeDirection, bounds: Rect) -> Rect {
    let mut rect = rect;
    if direction.east {
        rect.x1 = rect.x1.min(bounds.x1);
    }
    if direction.west {
        rect.x0 = rect.x0.max(bounds.x0);
    }
    if direction.south {
        rect.y1 = rect.y1.min(bounds.y1);
    }
    if direction.north {
        rect.y0 = rect.y0.max(bounds.y0);
    }
    rect
}

/// Scan static rects for the closest target of one dragged edge.
fn scan_edge(edge: f64, statics: &[Rect], axis: Axis, threshold: f64) -> Option<AxisSnap> {
    let mut best = None;
    for &other in statics.iter().filter(|r| !is_degenerate(**r)) {
        let (s_start, s_end, s_center) = edges_of(other).along(axis);
        for line in [s_start, s_end, s_center] {
            let candidate = AxisSnap {
                value: line,
                line,
                distance: (edge - line).abs(),
                other,
            };
            consider(&mut best, candidate, threshold);
        }
    }
    best
}

/// Snap the dragged edges of a resizing rectangle.
///
/// Only edges named by `direction` participate. A snap that would shrink
/// the rect below `min_size` is ignored.
pub fn compute_resize_snap(
    moving: Rect,
    direction: ResizeDirection,
    statics: &[Rect],
    threshold: f64,
    min_size: f64,
) -> SnapResult {
    if is_degenerate(moving) || statics.is_empty() {
        return SnapResult::none(moving);
    }

    let mut rect = moving;
    let mut snaps: Vec<(Axis, AxisSnap)> = Vec::with_capacity(2);

    if direction.east || direction.west {
        let edge = if direction.east { rect.x1 } else { rect.x0 };
        if let Some(snap) = scan_edge(edge, statics, Axis::X, threshold) {
            let candidate = if direction.east {
                Rect::new(rect.x0, rect.y0, snap.value, rect.y1)
            } else {
                Rect::new(snap.value, rect.y0, rect.x1, rect.y1)
            };
            if candidate.width() >= min_size {
                rect = candidate;
                snaps.push((Axis::X, snap));
            }
        }
    }
    if direction.north || direction.south {
        let edge = if direction.south { rect.y1 } else { rect.y0 };
        if let Some(snap) = scan_edge(edge, statics, Axis::Y, threshold) {
            let candidate = if direction.south {
                Rect::new(rect.x0, rect.y0, rect.x1, snap.value)
            } else {
                Rect::new(rect.x0, snap.value, rect.x1, rect.y1)
            };
            if candidate.height() >= min_size {
                rect = candidate;
                snaps.push((Axis::Y, snap));
            }
        }
    }

    let guides = snaps
        .iter()
        .map(|(axis, snap)| Guide::spanning(*axis, snap.line, rect, snap.other))
        .collect();

    log::trace!("resize snap ({}): {:?} -> {:?}", direction, moving, rect);
    SnapResult {
        rect,
        snapped_x: snaps.iter().any(|(axis, _)| *axis == Axis::X),
        snapped_y: snaps.iter().any(|(axis, _)| *axis == Axis::Y),
        guides,
    }
}

/// Thresholds for page-level snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSnapParams {
    /// Max distance between the raw and snapped position, per axis.
    pub snap_distance: f64,
    /// Pages further than this (edge gap) are ignored.
    pub proximity: f64,
    /// Gap kept between a page and the neighbour it snaps beside.
    pub padding: f64,
    /// Buffer for the post-snap collision check.
    pub overlap_buffer: f64,
}

impl Default for PageSnapParams {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for PageSnapParams {
    fn from(config: &EngineConfig) -> Self {
        Self {
            snap_distance: config.page_snap_distance,
            proximity: config.page_proximity,
            padding: config.page_padding,
            overlap_buffer: config.overlap_buffer,
        }
    }
}

fn scan_page_axis(moving: Rect, nearby: &[Rect], axis: Axis, params: &PageSnapParams) -> Option<AxisSnap> {
    let (m_start, m_end, _) = edges_of(moving).along(axis);
    let size = m_end - m_start;
    let mut best = None;

    for &other in nearby {
        let (o_start, o_end, _) = edges_of(other).along(axis);
        let after = o_end + params.padding;
        let before = o_start - params.padding;
        // (resulting start, guide line): aligned, after (right/below), before (left/above).
        let candidates = [(o_start, o_start), (after, after), (before - size, before)];
        for (start, line) in candidates {
            let candidate = AxisSnap {
                value: start,
                line,
                distance: (m_start - start).abs(),
                other,
            };
            consider(&mut best, candidate, params.snap_distance);
        }
    }
    best
}

/// Snap a dragged page against the other pages.
///
/// Only pages within the proximity prefilter are snap targets. If the
/// snapped rectangle would overlap any other page, the raw rectangle is
/// returned with no guides.
pub fn compute_page_snap(moving: Rect, others: &[Rect], params: &PageSnapParams) -> SnapResult {
    if is_degenerate(moving) {
        return SnapResult::none(moving);
    }

    let nearby: Vec<Rect> = others
        .iter()
        .copied()
        .filter(|r| !is_degenerate(*r) && gap_between(moving, *r) <= params.proximity)
        .collect();
    if nearby.is_empty() {
        return SnapResult::none(moving);
    }

    let snap_x = scan_page_axis(moving, &nearby, Axis::X, params);
    let snap_y = scan_page_axis(moving, &nearby, Axis::Y, params);
    if snap_x.is_none() && snap_y.is_none() {
        return SnapResult::none(moving);
    }

    let mut rect = moving;
    if let Some(snap) = snap_x {
        rect = with_start(rect, Axis::X, snap.value);
    }
    if let Some(snap) = snap_y {
        rect = with_start(rect, Axis::Y, snap.value);
    }

    if others.iter().any(|o| rects_overlap(rect, *o, params.overlap_buffer)) {
        log::trace!("page snap to {:?} collides, keeping raw {:?}", rect, moving);
        return SnapResult::none(moving);
    }

    let mut guides = Vec::new();
    if let Some(snap) = snap_x {
        guides.push(Guide::spanning(Axis::X, snap.line, rect, snap.other));
    }
    if let Some(snap) = snap_y {
        guides.push(Guide::spanning(Axis::Y, snap.line, rect, snap.other));
    }

    log::trace!("page snap: {:?} -> {:?}", moving, rect);
    SnapResult {
        rect,
        snapped_x: snap_x.is_some(),
        snapped_y: snap_y.is_some(),
        guides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PAGE_HEIGHT, PAGE_WIDTH};
    use kurbo::Point;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    fn page(x: f64, y: f64) -> Rect {
        rect(x, y, PAGE_WIDTH, PAGE_HEIGHT)
    }

    #[test]
    fn test_no_statics_is_noop() {
        let moving = rect(13.0, 27.0, 100.0, 50.0);
        let result = compute_snap(moving, &[], 8.0);
        assert_eq!(result.rect, moving);
        assert!(result.guides.is_empty());
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_snap_left_edges() {
        let statics = [rect(100.0, 300.0, 200.0, 50.0)];
        let result = compute_snap(rect(105.0, 0.0, 80.0, 40.0), &statics, 8.0);
        assert_eq!(result.rect.x0, 100.0);
        assert!(result.snapped_x);
        assert!(!result.snapped_y);
        assert_eq!(result.guides.len(), 1);

        let guide = result.guides[0];
        assert_eq!(guide.orientation, GuideOrientation::Vertical);
        assert_eq!(guide.position, 100.0);
        assert_eq!(guide.start, -20.0);
        assert_eq!(guide.end, 370.0);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let statics = [rect(100.0, 100.0, 200.0, 100.0)];
        let moving = rect(300.0, 100.0, 50.0, 50.0);
        let result = compute_snap(moving, &statics, 8.0);
        assert_eq!(result.rect, moving);
        assert!(!result.guides.is_empty());

        let again = compute_snap(result.rect, &statics, 8.0);
        assert_eq!(again.rect, result.rect);
    }

    #[test]
    fn test_closest_candidate_wins() {
        // Left edge is 6 away from the first rect, 2 away from the second.
        let statics = [rect(0.0, 500.0, 50.0, 50.0), rect(4.0, 700.0, 50.0, 50.0)];
        let result = compute_snap(rect(6.0, 0.0, 30.0, 30.0), &statics, 8.0);
        assert_eq!(result.rect.x0, 4.0);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        // Both rects are 3 away from the moving left edge, on opposite sides.
        let statics = [rect(7.0, 500.0, 50.0, 50.0), rect(13.0, 700.0, 50.0, 50.0)];
        let result = compute_snap(rect(10.0, 0.0, 30.0, 30.0), &statics, 8.0);
        assert_eq!(result.rect.x0, 7.0);
    }

    #[test]
    fn test_same_edge_beats_centre_on_tie() {
        // Same-size rects: left and centre alignment are both exact.
        let statics = [rect(0.0, 200.0, 40.0, 40.0)];
        let result = compute_snap(rect(2.0, 0.0, 40.0, 40.0), &statics, 8.0);
        assert_eq!(result.guides[0].position, 0.0);
    }

    #[test]
    fn test_opposite_edge_snap() {
        let statics = [rect(0.0, 0.0, 100.0, 100.0)];
        // Moving rect's left edge near static's right edge.
        let result = compute_snap(rect(104.0, 300.0, 50.0, 50.0), &statics, 8.0);
        assert_eq!(result.rect.x0, 100.0);
        assert_eq!(result.guides[0].position, 100.0);
    }

    #[test]
    fn test_centre_snap() {
        let statics = [rect(0.0, 0.0, 200.0, 200.0)];
        let result = compute_snap(rect(73.0, 400.0, 50.0, 20.0), &statics, 8.0);
        assert_eq!(result.rect.x0, 75.0);
        assert_eq!(result.guides[0].position, 100.0);
    }

    #[test]
    fn test_both_axes_snap_independently() {
        let statics = [rect(0.0, 0.0, 100.0, 100.0)];
        let result = compute_snap(rect(103.0, 5.0, 40.0, 40.0), &statics, 8.0);
        assert_eq!(result.rect.origin(), Point::new(100.0, 0.0));
        assert_eq!(result.guides.len(), 2);
    }

    #[test]
    fn test_degenerate_rects_are_skipped() {
        let statics = [rect(100.0, 0.0, 0.0, 50.0), rect(f64::NAN, 0.0, 10.0, 10.0)];
        let result = compute_snap(rect(102.0, 0.0, 30.0, 30.0), &statics, 8.0);
        assert!(!result.is_snapped());
        assert!(result.guides.iter().all(|g| g.position.is_finite()));

        let flat = rect(0.0, 0.0, 0.0, 0.0);
        assert_eq!(compute_snap(flat, &[rect(0.0, 0.0, 10.0, 10.0)], 8.0).rect, flat);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("se".parse::<ResizeDirection>().unwrap(), ResizeDirection::SE);
        assert_eq!("n".parse::<ResizeDirection>().unwrap(), ResizeDirection::N);
        assert_eq!("W".parse::<ResizeDirection>().unwrap(), ResizeDirection::W);
        assert!("ns".parse::<ResizeDirection>().is_err());
        assert!("ee".parse::<ResizeDirection>().is_err());
        assert!("".parse::<ResizeDirection>().is_err());
        assert!("x".parse::<ResizeDirection>().is_err());
        assert_eq!(ResizeDirection::NW.to_string(), "nw");
    }

    #[test]
    fn test_resize_rect_keeps_opposite_edge() {
        let origin = rect(100.0, 100.0, 200.0, 100.0);
        let resized = resize_rect(origin, ResizeDirection::NW, Vec2::new(-30.0, 20.0), 20.0);
        assert_eq!(resized, Rect::new(70.0, 120.0, 300.0, 200.0));

        let collapsed = resize_rect(origin, ResizeDirection::E, Vec2::new(-500.0, 0.0), 20.0);
        assert_eq!(collapsed.width(), 20.0);
        assert_eq!(collapsed.x0, 100.0);
    }

    #[test]
    fn test_resize_snap_east_edge() {
        let statics = [rect(400.0, 0.0, 100.0, 100.0)];
        let result = compute_resize_snap(rect(100.0, 300.0, 295.0, 50.0), ResizeDirection::E, &statics, 8.0, 20.0);
        assert_eq!(result.rect, Rect::new(100.0, 300.0, 400.0, 350.0));
        assert_eq!(result.guides.len(), 1);
        assert_eq!(result.guides[0].orientation, GuideOrientation::Vertical);
    }

    #[test]
    fn test_resize_snap_west_shifts_position() {
        let statics = [rect(0.0, 0.0, 50.0, 50.0)];
        let result = compute_resize_snap(rect(55.0, 300.0, 100.0, 50.0), ResizeDirection::W, &statics, 8.0, 20.0);
        assert_eq!(result.rect.x0, 50.0);
        assert_eq!(result.rect.x1, 155.0);
    }

    #[test]
    fn test_resize_snap_north_keeps_bottom_edge() {
        let statics = [rect(400.0, 100.0, 100.0, 50.0)];
        let moving = resize_rect(rect(100.0, 150.0, 200.0, 50.0), ResizeDirection::N, Vec2::new(0.0, -47.0), 20.0);
        assert_eq!(moving, Rect::new(100.0, 103.0, 300.0, 200.0));

        let result = compute_resize_snap(moving, ResizeDirection::N, &statics, 8.0, 20.0);
        assert_eq!(result.rect, Rect::new(100.0, 100.0, 300.0, 200.0));
        assert!(result.snapped_y);
        assert!(!result.snapped_x);
        assert_eq!(result.guides.len(), 1);
        assert_eq!(result.guides[0].orientation, GuideOrientation::Horizontal);
        assert_eq!(result.guides[0].position, 100.0);
    }

    #[test]
    fn test_clamp_dragged_edges_leaves_opposite_edge() {
        let bounds = page(0.0, 0.0);
        let east = clamp_dragged_edges(Rect::new(100.0, 100.0, 1400.0, 200.0), ResizeDirection::E, bounds);
        assert_eq!(east, Rect::new(100.0, 100.0, 1200.0, 200.0));

        let west = clamp_dragged_edges(Rect::new(-200.0, 100.0, 500.0, 200.0), ResizeDirection::W, bounds);
        assert_eq!(west, Rect::new(0.0, 100.0, 500.0, 200.0));

        let corner = clamp_dragged_edges(Rect::new(-50.0, -80.0, 500.0, 200.0), ResizeDirection::NW, bounds);
        assert_eq!(corner, Rect::new(0.0, 0.0, 500.0, 200.0));

        // Only dragged edges are touched, even when another one is outside.
        let south = clamp_dragged_edges(Rect::new(-10.0, 100.0, 500.0, 900.0), ResizeDirection::S, bounds);
        assert_eq!(south, Rect::new(-10.0, 100.0, 500.0, 800.0));
    }

    #[test]
    fn test_resize_snap_ignores_undragged_edges() {
        // Left edge is 2 away from a target, but only the south edge is dragged.
        let statics = [rect(0.0, 0.0, 50.0, 50.0)];
        let result = compute_resize_snap(rect(52.0, 300.0, 100.0, 50.0), ResizeDirection::S, &statics, 8.0, 20.0);
        assert_eq!(result.rect.x0, 52.0);
        assert!(!result.snapped_x);
    }

    #[test]
    fn test_page_snap_right_adjacent() {
        let params = PageSnapParams::default();
        let result = compute_page_snap(page(1235.0, 5.0), &[page(0.0, 0.0)], &params);
        assert_eq!(result.rect.origin(), Point::new(1230.0, 0.0));

        let vertical = result.guides.iter().filter(|g| g.orientation == GuideOrientation::Vertical).count();
        let horizontal = result.guides.iter().filter(|g| g.orientation == GuideOrientation::Horizontal).count();
        assert_eq!((vertical, horizontal), (1, 1));
    }

    #[test]
    fn test_page_snap_below() {
        let params = PageSnapParams::default();
        let result = compute_page_snap(page(40.0, 870.0), &[page(0.0, 0.0)], &params);
        assert_eq!(result.rect.origin(), Point::new(0.0, 830.0));
    }

    #[test]
    fn test_page_snap_left_adjacent() {
        let params = PageSnapParams::default();
        let result = compute_page_snap(page(-1235.0, 5.0), &[page(0.0, 0.0)], &params);
        assert_eq!(result.rect.origin(), Point::new(-1230.0, 0.0));

        let vertical: Vec<_> = result
            .guides
            .iter()
            .filter(|g| g.orientation == GuideOrientation::Vertical)
            .collect();
        assert_eq!(vertical.len(), 1);
        assert_eq!(vertical[0].position, -30.0);
    }

    #[test]
    fn test_page_snap_above() {
        let params = PageSnapParams::default();
        let result = compute_page_snap(page(-4.0, -836.0), &[page(0.0, 0.0)], &params);
        assert_eq!(result.rect.origin(), Point::new(0.0, -830.0));
    }

    #[test]
    fn test_page_snap_outside_proximity() {
        let params = PageSnapParams::default();
        let moving = page(1500.0, 10.0);
        let result = compute_page_snap(moving, &[page(0.0, 0.0)], &params);
        assert_eq!(result.rect, moving);
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_page_snap_collision_falls_back_to_raw() {
        let params = PageSnapParams::default();
        // Snapping below A would land 5px above B.
        let others = [page(0.0, 0.0), page(0.0, 1635.0)];
        let moving = page(50.0, 860.0);
        let result = compute_page_snap(moving, &others, &params);
        assert_eq!(result.rect, moving);
        assert!(result.guides.is_empty());
    }
}
