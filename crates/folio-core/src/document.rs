//! Pages, elements and the document that owns them.
//!
//! Pages are peers on the canvas: there is no grid or tree, and all spatial
//! structure is derived from page positions. Elements live in page-local
//! space and are always kept inside their page's 1200×800 rectangle.

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a page.
pub type PageId = Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Logical page width, identical for every page.
pub const PAGE_WIDTH: f64 = 1200.0;
/// Logical page height, identical for every page.
pub const PAGE_HEIGHT: f64 = 800.0;
/// Logical page size.
pub const PAGE_SIZE: Size = Size::new(PAGE_WIDTH, PAGE_HEIGHT);

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Where a freshly added element lands before clamping.
const DEFAULT_ELEMENT_ORIGIN: Point = Point::new(100.0, 100.0);

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Chart flavour for chart elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
}

/// One labelled value of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Content of an element, one variant per element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ElementKind {
    Text {
        content: String,
        font_size: f64,
    },
    Heading {
        content: String,
        level: u8,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },
    Video {
        src: String,
        #[serde(default)]
        autoplay: bool,
    },
    Chart {
        chart_type: ChartType,
        #[serde(default)]
        series: Vec<ChartPoint>,
    },
    Table {
        rows: Vec<Vec<String>>,
    },
    Footer {
        content: String,
    },
    AiAgent {
        agent_name: String,
        #[serde(default)]
        prompt: String,
    },
    Cta {
        label: String,
        url: String,
    },
    #[serde(rename = "datawidget")]
    DataWidget {
        label: String,
        value: String,
        #[serde(default)]
        trend: Option<f64>,
    },
    Demo {
        url: String,
    },
    Embed {
        url: String,
    },
}

impl ElementKind {
    /// The type name used on the wire and by template palettes.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Text { .. } => "text",
            ElementKind::Heading { .. } => "heading",
            ElementKind::Image { .. } => "image",
            ElementKind::Video { .. } => "video",
            ElementKind::Chart { .. } => "chart",
            ElementKind::Table { .. } => "table",
            ElementKind::Footer { .. } => "footer",
            ElementKind::AiAgent { .. } => "ai-agent",
            ElementKind::Cta { .. } => "cta",
            ElementKind::DataWidget { .. } => "datawidget",
            ElementKind::Demo { .. } => "demo",
            ElementKind::Embed { .. } => "embed",
        }
    }

    /// Placeholder content for a type name, as used when a palette item is dropped.
    pub fn placeholder(type_name: &str) -> Option<Self> {
        let kind = match type_name {
            "text" => ElementKind::Text {
                content: "Add your text here".to_string(),
                font_size: 16.0,
            },
            "heading" => ElementKind::Heading {
                content: "Heading".to_string(),
                level: 1,
            },
            "image" => ElementKind::Image {
                src: String::new(),
                alt: String::new(),
            },
            "video" => ElementKind::Video {
                src: String::new(),
                autoplay: false,
            },
            "chart" => ElementKind::Chart {
                chart_type: ChartType::Bar,
                series: Vec::new(),
            },
            "table" => ElementKind::Table {
                rows: vec![vec![String::new(); 3]; 3],
            },
            "footer" => ElementKind::Footer {
                content: String::new(),
            },
            "ai-agent" => ElementKind::AiAgent {
                agent_name: "Assistant".to_string(),
                prompt: String::new(),
            },
            "cta" => ElementKind::Cta {
                label: "Get started".to_string(),
                url: String::new(),
            },
            "datawidget" => ElementKind::DataWidget {
                label: "Metric".to_string(),
                value: "0".to_string(),
                trend: None,
            },
            "demo" => ElementKind::Demo { url: String::new() },
            "embed" => ElementKind::Embed { url: String::new() },
            _ => return None,
        };
        Some(kind)
    }

    /// Initial width and height for a new element of this type.
    pub fn default_size(&self) -> Size {
        match self {
            ElementKind::Text { .. } => Size::new(400.0, 100.0),
            ElementKind::Heading { .. } => Size::new(600.0, 80.0),
            ElementKind::Image { .. } => Size::new(400.0, 300.0),
            ElementKind::Video { .. } => Size::new(640.0, 360.0),
            ElementKind::Chart { .. } => Size::new(500.0, 300.0),
            ElementKind::Table { .. } => Size::new(600.0, 250.0),
            ElementKind::Footer { .. } => Size::new(PAGE_WIDTH, 60.0),
            ElementKind::AiAgent { .. } => Size::new(400.0, 200.0),
            ElementKind::Cta { .. } => Size::new(240.0, 60.0),
            ElementKind::DataWidget { .. } => Size::new(280.0, 160.0),
            ElementKind::Demo { .. } => Size::new(800.0, 450.0),
            ElementKind::Embed { .. } => Size::new(640.0, 360.0),
        }
    }
}

/// Element geometry as handed to the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rect> for ElementGeometry {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

impl From<ElementGeometry> for Rect {
    fn from(geometry: ElementGeometry) -> Self {
        Rect::new(
            geometry.x,
            geometry.y,
            geometry.x + geometry.width,
            geometry.y + geometry.height,
        )
    }
}

/// Clamp a page-local rectangle so it lies inside the page.
///
/// Oversized rectangles are shrunk to the page size first.
pub fn clamp_to_page(rect: Rect) -> Rect {
    let rect = rect.abs();
    let width = rect.width().min(PAGE_WIDTH);
    let height = rect.height().min(PAGE_HEIGHT);
    let x = rect.x0.clamp(0.0, PAGE_WIDTH - width);
    let y = rect.y0.clamp(0.0, PAGE_HEIGHT - height);
    Rect::new(x, y, x + width, y + height)
}

/// A content element placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    /// Top-left corner in page-local space.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Type-specific content.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create an element with the type's default size at `position`, clamped to the page.
    pub fn new(kind: ElementKind, position: Point) -> Self {
        let size = kind.default_size();
        let mut element = Self {
            id: Uuid::new_v4(),
            position,
            width: size.width,
            height: size.height,
            kind,
        };
        element.set_bounds(element.bounds());
        element
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Bounds in page-local space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, Size::new(self.width, self.height))
    }

    /// Set the bounds, clamped to the page. Returns the applied bounds.
    pub fn set_bounds(&mut self, rect: Rect) -> Rect {
        let clamped = clamp_to_page(rect);
        self.position = clamped.origin();
        self.width = clamped.width();
        self.height = clamped.height();
        clamped
    }

    pub fn geometry(&self) -> ElementGeometry {
        self.bounds().into()
    }
}

/// A fixed-size page positioned on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub(crate) id: PageId,
    /// Top-left corner in canvas space.
    pub position: Point,
    /// Elements back to front.
    pub elements: Vec<Element>,
    #[serde(default)]
    pub background: Option<SerializableColor>,
}

impl Page {
    /// Create an empty page at `position`.
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            elements: Vec::new(),
            background: None,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: impl Into<SerializableColor>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Add elements to the page, clamping each one.
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        for mut element in elements {
            element.set_bounds(element.bounds());
            self.elements.push(element);
        }
        self
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// Page rectangle in canvas space.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, PAGE_SIZE)
    }

    /// Page centre in canvas space.
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Convert a canvas point to page-local space.
    pub fn to_local(&self, point: Point) -> Point {
        point - self.position.to_vec2()
    }

    /// Convert a page-local rectangle to canvas space.
    pub fn local_rect_to_canvas(&self, rect: Rect) -> Rect {
        rect + self.position.to_vec2()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Topmost element under a page-local point.
    pub fn element_at(&self, local: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.bounds().contains(local))
            .map(|e| e.id)
    }
}

/// A snapshot of document state for undo/redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentSnapshot {
    pages: Vec<Page>,
}

/// A document: the ordered list of pages on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// Pages in explicit order (also the paint order).
    pub pages: Vec<Page>,
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            pages: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            pages: self.pages.clone(),
        }
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.undo_stack.pop() {
            self.redo_stack.push(self.snapshot());
            self.pages = snapshot.pages;
            true
        } else {
            false
        }
    }

    /// Redo the last undone change. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.redo_stack.pop() {
            self.undo_stack.push(self.snapshot());
            self.pages = snapshot.pages;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub fn page_index(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    /// Append a page as-is and return its ID.
    pub fn insert_page(&mut self, page: Page) -> PageId {
        let id = page.id;
        self.pages.push(page);
        id
    }

    pub fn remove_page(&mut self, id: PageId) -> Option<Page> {
        let index = self.page_index(id)?;
        Some(self.pages.remove(index))
    }

    /// Move the page at `from` to index `to`. Returns false if either index is out of range.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from >= self.pages.len() || to >= self.pages.len() {
            return false;
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        true
    }

    pub fn set_page_position(&mut self, id: PageId, position: Point) -> bool {
        match self.page_mut(id) {
            Some(page) => {
                page.position = position;
                true
            }
            None => false,
        }
    }

    /// Where the next appended page goes.
    ///
    /// The first page sits at the origin; later pages continue the bottom-most
    /// row to the right, `padding` away from its right-most page.
    pub fn next_page_position(&self, padding: f64, row_tolerance: f64) -> Point {
        let Some(bottom_y) = self.pages.iter().map(|p| p.position.y).reduce(f64::max) else {
            return Point::ZERO;
        };
        let row_end = self
            .pages
            .iter()
            .filter(|p| (p.position.y - bottom_y).abs() <= row_tolerance)
            .max_by(|a, b| a.position.x.total_cmp(&b.position.x));
        match row_end {
            Some(page) => Point::new(page.position.x + PAGE_WIDTH + padding, page.position.y),
            None => Point::new(0.0, bottom_y),
        }
    }

    /// Top-left for a page dropped at a canvas point, centred on it.
    pub fn drop_position(point: Point) -> Point {
        point - Vec2::new(PAGE_WIDTH / 2.0, PAGE_HEIGHT / 2.0)
    }

    /// Add a placeholder element to a page.
    pub fn add_element(&mut self, page: PageId, kind: ElementKind) -> Option<ElementId> {
        let page = self.page_mut(page)?;
        let element = Element::new(kind, DEFAULT_ELEMENT_ORIGIN);
        let id = element.id;
        page.elements.push(element);
        Some(id)
    }

    pub fn remove_element(&mut self, page: PageId, element: ElementId) -> Option<Element> {
        let page = self.page_mut(page)?;
        let index = page.elements.iter().position(|e| e.id == element)?;
        Some(page.elements.remove(index))
    }

    pub fn element(&self, page: PageId, element: ElementId) -> Option<&Element> {
        self.page(page)?.element(element)
    }

    /// Set an element's bounds (clamped). Returns the applied bounds.
    pub fn set_element_bounds(&mut self, page: PageId, element: ElementId, rect: Rect) -> Option<Rect> {
        let element = self.page_mut(page)?.element_mut(element)?;
        Some(element.set_bounds(rect))
    }

    pub fn update_element_kind(&mut self, page: PageId, element: ElementId, kind: ElementKind) -> bool {
        match self.page_mut(page).and_then(|p| p.element_mut(element)) {
            Some(element) => {
                element.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Find the page owning an element.
    pub fn find_element(&self, element: ElementId) -> Option<(PageId, &Element)> {
        self.pages
            .iter()
            .find_map(|p| p.element(element).map(|e| (p.id, e)))
    }

    /// Topmost page containing a canvas point.
    pub fn page_at(&self, point: Point) -> Option<PageId> {
        self.pages
            .iter()
            .rev()
            .find(|p| p.rect().contains(point))
            .map(|p| p.id)
    }

    /// Union of all page rectangles.
    pub fn bounds(&self) -> Option<Rect> {
        self.pages.iter().map(Page::rect).reduce(|a, b| a.union(b))
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON, re-clamping every element.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        for page in &mut doc.pages {
            for element in &mut page.elements {
                element.set_bounds(element.bounds());
            }
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> ElementKind {
        ElementKind::placeholder("text").unwrap()
    }

    #[test]
    fn test_clamp_to_page() {
        let clamped = clamp_to_page(Rect::new(-50.0, 780.0, 150.0, 880.0));
        assert_eq!(clamped, Rect::new(0.0, 700.0, 200.0, 800.0));

        let oversized = clamp_to_page(Rect::new(10.0, 10.0, 1500.0, 100.0));
        assert_eq!(oversized, Rect::new(0.0, 10.0, 1200.0, 100.0));
    }

    #[test]
    fn test_element_new_is_clamped() {
        let element = Element::new(ElementKind::placeholder("footer").unwrap(), Point::new(300.0, 790.0));
        assert_eq!(element.bounds(), Rect::new(0.0, 740.0, 1200.0, 800.0));
    }

    #[test]
    fn test_next_page_position() {
        let mut doc = Document::new();
        assert_eq!(doc.next_page_position(30.0, 100.0), Point::ZERO);

        doc.insert_page(Page::new(Point::ZERO));
        assert_eq!(doc.next_page_position(30.0, 100.0), Point::new(1230.0, 0.0));

        doc.insert_page(Page::new(Point::new(0.0, 900.0)));
        doc.insert_page(Page::new(Point::new(1230.0, 950.0)));
        assert_eq!(doc.next_page_position(30.0, 100.0), Point::new(2460.0, 950.0));
    }

    #[test]
    fn test_drop_position_centres_page() {
        let pos = Document::drop_position(Point::new(600.0, 400.0));
        assert_eq!(pos, Point::ZERO);
    }

    #[test]
    fn test_move_page() {
        let mut doc = Document::new();
        let a = doc.insert_page(Page::new(Point::ZERO));
        let b = doc.insert_page(Page::new(Point::new(1230.0, 0.0)));
        assert!(doc.move_page(1, 0));
        assert_eq!(doc.pages[0].id(), b);
        assert_eq!(doc.pages[1].id(), a);
        assert!(!doc.move_page(2, 0));
    }

    #[test]
    fn test_element_crud() {
        let mut doc = Document::new();
        let page = doc.insert_page(Page::new(Point::ZERO));
        let element = doc.add_element(page, text()).unwrap();

        let applied = doc
            .set_element_bounds(page, element, Rect::new(1100.0, 0.0, 1300.0, 50.0))
            .unwrap();
        assert_eq!(applied, Rect::new(1000.0, 0.0, 1200.0, 50.0));

        assert!(doc.update_element_kind(page, element, ElementKind::Footer { content: "x".into() }));
        assert_eq!(doc.find_element(element).map(|(p, _)| p), Some(page));
        assert!(doc.remove_element(page, element).is_some());
        assert!(doc.element(page, element).is_none());
    }

    #[test]
    fn test_hit_testing() {
        let mut doc = Document::new();
        let page = doc.insert_page(Page::new(Point::new(100.0, 100.0)));
        let lower = doc.add_element(page, text()).unwrap();
        let upper = doc.add_element(page, text()).unwrap();

        assert_eq!(doc.page_at(Point::new(150.0, 150.0)), Some(page));
        assert_eq!(doc.page_at(Point::new(50.0, 50.0)), None);

        let page_ref = doc.page(page).unwrap();
        assert_eq!(page_ref.element_at(Point::new(150.0, 150.0)), Some(upper));
        assert_ne!(page_ref.element_at(Point::new(150.0, 150.0)), Some(lower));
        assert_eq!(page_ref.element_at(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_undo_redo_positions() {
        let mut doc = Document::new();
        let page = doc.insert_page(Page::new(Point::ZERO));

        doc.push_undo();
        doc.set_page_position(page, Point::new(500.0, 0.0));
        assert!(doc.undo());
        assert_eq!(doc.page(page).unwrap().position, Point::ZERO);
        assert!(doc.redo());
        assert_eq!(doc.page(page).unwrap().position, Point::new(500.0, 0.0));
        assert!(!doc.redo());
    }

    #[test]
    fn test_kind_wire_names() {
        let kind = ElementKind::placeholder("datawidget").unwrap();
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "datawidget");
        assert_eq!(kind.type_name(), "datawidget");

        let agent = ElementKind::placeholder("ai-agent").unwrap();
        assert_eq!(serde_json::to_value(&agent).unwrap()["type"], "ai-agent");
        assert!(ElementKind::placeholder("marquee").is_none());
    }

    #[test]
    fn test_json_roundtrip_preserves_elements() {
        let mut doc = Document::new();
        let page = doc.insert_page(Page::new(Point::new(0.0, 0.0)).with_background(SerializableColor::white()));
        doc.add_element(page, ElementKind::placeholder("chart").unwrap());

        let json = doc.to_json().unwrap();
        let loaded = Document::from_json(&json).unwrap();
        assert_eq!(loaded.pages, doc.pages);
    }
}
