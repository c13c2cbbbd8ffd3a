//! In-memory, page-oriented drawing surface.
//!
//! The composer never talks to the PDF library directly.  It records drawing
//! operations in absolute millimetre coordinates (origin at the top-left corner
//! of the page, y growing downwards) and the [`crate::render`] module replays
//! them afterwards.  Keeping a display list also lets later passes draw onto
//! pages that were finished long ago, which the footer and severity overlays
//! rely on.

use crate::metrics::{self, FontWeight};
use crate::style::Color;

/// Horizontal anchoring of a text run relative to its `x` coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Style of a single text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub weight: FontWeight,
    pub color: Color,
}

impl TextStyle {
    /// Creates a style from its three parts.
    pub const fn new(size: f64, weight: FontWeight, color: Color) -> Self {
        Self {
            size,
            weight,
            color,
        }
    }

    /// Helvetica at `size` points.
    pub const fn regular(size: f64, color: Color) -> Self {
        Self::new(size, FontWeight::Regular, color)
    }

    /// Helvetica Bold at `size` points.
    pub const fn bold(size: f64, color: Color) -> Self {
        Self::new(size, FontWeight::Bold, color)
    }

    /// Vertical advance of one line in this style, in millimetres.
    pub fn line_height(&self) -> f64 {
        metrics::line_height(self.size)
    }

    /// Rendered width of `text` in millimetres.
    pub fn width_of(&self, text: &str) -> f64 {
        metrics::text_width(text, self.weight, self.size)
    }
}

/// A rectangle in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical midpoint.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Text whose baseline starts at (`x`, `y`); `x` is already alignment-resolved.
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
    /// Filled rectangle, optionally with rounded corners.
    Rect {
        rect: Rect,
        fill: Color,
        radius: f64,
    },
    /// Filled circle.
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: Color,
    },
    /// Stroked straight line.
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        thickness: f64,
    },
}

/// The operations recorded for one page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    /// Recorded operations in drawing order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Writes a single line of text.  The text is not wrapped.
    pub fn text(&mut self, text: impl Into<String>, x: f64, y: f64, style: TextStyle, align: TextAlign) {
        let text = text.into();
        let x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - style.width_of(&text) / 2.0,
            TextAlign::Right => x - style.width_of(&text),
        };
        self.ops.push(DrawOp::Text { x, y, text, style });
    }

    /// Fills `rect` with square corners.
    pub fn rect(&mut self, rect: Rect, fill: Color) {
        self.ops.push(DrawOp::Rect {
            rect,
            fill,
            radius: 0.0,
        });
    }

    /// Fills `rect` with corners of `radius`, clamped to half the shorter side.
    pub fn rounded_rect(&mut self, rect: Rect, radius: f64, fill: Color) {
        let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        self.ops.push(DrawOp::Rect { rect, fill, radius });
    }

    /// Fills a circle centred on (`cx`, `cy`).
    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64, fill: Color) {
        self.ops.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            fill,
        });
    }

    /// Strokes a straight line `thickness` points wide.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, thickness: f64) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    /// Iterates over the text runs on this page in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns whether any text run on the page equals `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text == needle)
    }
}

/// A sequence of pages sharing one physical size.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: f64,
    height: f64,
    pages: Vec<Page>,
}

impl Canvas {
    /// Creates an empty canvas; call [`Canvas::add_page`] before drawing.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pages: Vec::new(),
        }
    }

    /// Page width in millimetres.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Page height in millimetres.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Appends a blank page and returns its zero-based index.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        self.pages.len() - 1
    }

    /// The page currently being written, i.e. the last one.
    ///
    /// # Panics
    ///
    /// Panics if no page was added yet.
    pub fn current(&mut self) -> &mut Page {
        self.pages
            .last_mut()
            .expect("canvas has no page; add_page must be called first")
    }

    /// Mutable access to an earlier page, used by overlay and footer passes.
    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Read access to the page at `index`, if it exists.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
}
