//! Vertical cursor bookkeeping for a single report build.

use log::debug;

use crate::canvas::Canvas;

/// Physical page size and margin, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageGeometry {
    /// ISO A4 portrait with a 20 mm margin.
    pub const A4: Self = Self {
        width: 210.0,
        height: 297.0,
        margin: 20.0,
    };

    /// Creates a geometry from page width, height and a uniform margin.
    pub const fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// Lowest y a body write may reach.
    pub fn bottom(&self) -> f64 {
        self.height - self.margin
    }

    /// Usable height between the top and bottom margins.
    pub fn content_height(&self) -> f64 {
        self.bottom() - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Mutable layout state owned by exactly one composer for one report.
///
/// `margin <= cursor_y <= height - margin` holds before every body write; a
/// write that would cross the bottom margin starts a new page first.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutState {
    geometry: PageGeometry,
    cursor_y: f64,
    page_count: usize,
}

impl LayoutState {
    /// Creates a state with no pages; the first write opens one.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            cursor_y: geometry.margin,
            page_count: 0,
        }
    }

    /// Page size and margin this state lays out against.
    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Top of the next write, in millimetres from the top edge.
    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    /// Pages started so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Zero-based index of the page being written.
    pub fn page_index(&self) -> usize {
        self.page_count.saturating_sub(1)
    }

    /// Remaining height above the bottom margin on the current page.
    pub fn remaining(&self) -> f64 {
        self.geometry.bottom() - self.cursor_y
    }

    /// Returns whether `height` more millimetres fit below the cursor.
    pub fn fits(&self, height: f64) -> bool {
        self.cursor_y + height <= self.geometry.bottom()
    }

    /// Starts a new page and resets the cursor to the top margin.
    pub fn start_page(&mut self, canvas: &mut Canvas) -> usize {
        let index = canvas.add_page();
        self.page_count += 1;
        self.cursor_y = self.geometry.margin;
        debug!("started page {}", self.page_count);
        index
    }

    /// Breaks the page unless `height` more millimetres fit on the current one.
    ///
    /// Returns `true` when a page break was inserted.
    pub fn ensure_space(&mut self, canvas: &mut Canvas, height: f64) -> bool {
        if self.page_count > 0 && self.fits(height) {
            return false;
        }
        self.start_page(canvas);
        true
    }

    /// Moves the cursor down by `height` millimetres.
    pub fn advance(&mut self, height: f64) {
        self.cursor_y += height;
    }

    /// Moves the cursor to a position reported by a nested layout helper.
    pub fn resume_at(&mut self, cursor_y: f64) {
        self.cursor_y = cursor_y;
    }
}
