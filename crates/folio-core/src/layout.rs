//! Page layout graph derived from raw page coordinates.
//!
//! Nothing here is authored: neighbours, the reading route and the navigator
//! order are all recomputed from page positions on demand.
//!
//! Two deliberately separate notions of "direction" live in this module.
//! [`build_adjacency`] links pages whose positions line up within a
//! tolerance, and drives the reading route. [`directional_neighbor`] works in
//! minimap space and drives arrow-key navigation in presentation mode.

use crate::document::{Page, PageId};
use crate::geometry::distance;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Compass direction on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Nearest neighbour of a page in each direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub left: Option<PageId>,
    pub right: Option<PageId>,
    pub up: Option<PageId>,
    pub down: Option<PageId>,
}

impl Neighbors {
    pub fn get(&self, direction: Direction) -> Option<PageId> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    fn slot(&mut self, direction: Direction) -> &mut Option<PageId> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        }
    }

    /// Neighbours in the order the reading route prefers them.
    fn route_preference(&self) -> [Option<PageId>; 4] {
        [self.right, self.down, self.left, self.up]
    }
}

/// Directional neighbours of every page.
pub type Adjacency = HashMap<PageId, Neighbors>;

/// Link every page to its nearest aligned neighbour in each direction.
///
/// A page is a left/right candidate when its y is within `tolerance`, and an
/// up/down candidate when its x is within `tolerance`. Among candidates the
/// closest centre wins; on equal distance the earlier page is kept.
pub fn build_adjacency(pages: &[Page], tolerance: f64) -> Adjacency {
    let mut adjacency = Adjacency::with_capacity(pages.len());

    for page in pages {
        let mut neighbors = Neighbors::default();
        let mut best: HashMap<Direction, f64> = HashMap::new();

        for other in pages.iter().filter(|o| o.id() != page.id()) {
            let dx = other.position.x - page.position.x;
            let dy = other.position.y - page.position.y;

            let mut directions = Vec::with_capacity(2);
            if dy.abs() <= tolerance {
                if dx > 0.0 {
                    directions.push(Direction::Right);
                } else if dx < 0.0 {
                    directions.push(Direction::Left);
                }
            }
            if dx.abs() <= tolerance {
                if dy > 0.0 {
                    directions.push(Direction::Down);
                } else if dy < 0.0 {
                    directions.push(Direction::Up);
                }
            }

            let dist = distance(page.center(), other.center());
            for direction in directions {
                if best.get(&direction).is_none_or(|&d| dist < d) {
                    best.insert(direction, dist);
                    *neighbors.slot(direction) = Some(other.id());
                }
            }
        }
        adjacency.insert(page.id(), neighbors);
    }
    adjacency
}

/// Linear visiting order over all pages.
///
/// Starts at the page with the smallest `x + y`, then repeatedly prefers the
/// right neighbour, then down, then any other unvisited neighbour, and
/// finally jumps to the nearest unvisited page.
pub fn build_reading_route(pages: &[Page], adjacency: &Adjacency) -> Vec<PageId> {
    let Some(start) = pages
        .iter()
        .reduce(|best, p| if p.position.x + p.position.y < best.position.x + best.position.y { p } else { best })
    else {
        return Vec::new();
    };

    let positions: HashMap<PageId, Point> = pages.iter().map(|p| (p.id(), p.position)).collect();
    let mut visited = HashSet::with_capacity(pages.len());
    let mut route = Vec::with_capacity(pages.len());
    let mut current = Some(start.id());

    while let Some(id) = current {
        visited.insert(id);
        route.push(id);

        // Neighbours that are not among `pages` are skipped.
        let via_graph = adjacency.get(&id).and_then(|n| {
            n.route_preference()
                .into_iter()
                .flatten()
                .find(|next| positions.contains_key(next) && !visited.contains(next))
        });

        current = via_graph.or_else(|| {
            let here = *positions.get(&id)?;
            pages
                .iter()
                .filter(|p| !visited.contains(&p.id()))
                .map(|p| (p.id(), distance(here, p.position)))
                .reduce(|best, c| if c.1 < best.1 { c } else { best })
                .map(|(next, _)| next)
        });
    }
    route
}

/// Row-major ordering used by the side navigator.
///
/// Pages are sorted by y, grouped into rows whose y stays within
/// `row_tolerance` of the row's first page, and each row is sorted by x.
pub fn navigator_order(pages: &[Page], row_tolerance: f64) -> Vec<PageId> {
    let mut sorted: Vec<&Page> = pages.iter().collect();
    sorted.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));

    let mut rows: Vec<Vec<&Page>> = Vec::new();
    for page in sorted {
        match rows.last_mut() {
            Some(row) if (page.position.y - row[0].position.y).abs() <= row_tolerance => row.push(page),
            _ => rows.push(vec![page]),
        }
    }

    rows.into_iter()
        .flat_map(|mut row| {
            row.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
            row.into_iter().map(Page::id)
        })
        .collect()
}

/// Uniform projection of the canvas into a fixed-size minimap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapProjection {
    /// Canvas point mapped to the minimap origin.
    pub origin: Point,
    pub scale: f64,
}

impl MinimapProjection {
    /// Fit all pages into `viewport`, never scaling above `max_scale`.
    pub fn fit(pages: &[Page], viewport: Size, max_scale: f64) -> Option<Self> {
        let bounds = pages.iter().map(Page::rect).reduce(|a, b| a.union(b))?;
        Some(Self::fit_bounds(bounds, viewport, max_scale))
    }

    fn fit_bounds(bounds: Rect, viewport: Size, max_scale: f64) -> Self {
        let scale = (viewport.width / bounds.width())
            .min(viewport.height / bounds.height())
            .min(max_scale);
        Self {
            origin: bounds.origin(),
            scale,
        }
    }

    /// Map a canvas point into minimap space.
    pub fn project(&self, point: Point) -> Point {
        ((point - self.origin) * self.scale).to_point()
    }
}

/// Page to show when pressing an arrow key in presentation mode.
///
/// Candidates are pages strictly beyond the current page on the pressed
/// axis in minimap space; the closest one in that space wins.
pub fn directional_neighbor(
    pages: &[Page],
    current: PageId,
    direction: Direction,
    projection: &MinimapProjection,
) -> Option<PageId> {
    let here = projection.project(pages.iter().find(|p| p.id() == current)?.position);

    pages
        .iter()
        .filter(|p| p.id() != current)
        .map(|p| (p.id(), projection.project(p.position)))
        .filter(|(_, there)| match direction {
            Direction::Left => there.x < here.x,
            Direction::Right => there.x > here.x,
            Direction::Up => there.y < here.y,
            Direction::Down => there.y > here.y,
        })
        .map(|(id, there)| (id, distance(here, there)))
        .reduce(|best, c| if c.1 < best.1 { c } else { best })
        .map(|(id, _)| id)
}
