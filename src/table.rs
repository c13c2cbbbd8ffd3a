//! Paginated table layout with per-cell draw callbacks.
//!
//! A [`Table`] flows from the current cursor position downwards.  When the next
//! row does not fit above the bottom margin a new page is started and the
//! header is repeated.  Rows are never split unless a single row is taller
//! than an empty page, in which case it continues line by line on the
//! following pages.  Every drawn body cell is reported to a [`CellVisitor`],
//! which is how callers decorate individual cells after the fact.

use crate::canvas::{Canvas, Rect, TextAlign, TextStyle};
use crate::layout::LayoutState;
use crate::metrics::{self, FontWeight};
use crate::style::{self, Color};

const CELL_PADDING: f64 = 2.5;
const BASELINE_RATIO: f64 = 0.8;

/// Position of one drawn body cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellInfo {
    /// Index into the rows passed to the table.
    pub row: usize,
    pub column: usize,
    /// Zero-based page index the cell was drawn on.
    pub page: usize,
    pub rect: Rect,
    /// 0 for the first (usually only) part of a row, counting up for rows split across pages.
    pub fragment: usize,
}

/// Receives every body cell right after it has been drawn.
pub trait CellVisitor {
    fn visit_cell(&mut self, cell: &CellInfo);
}

impl<F> CellVisitor for F
where
    F: FnMut(&CellInfo),
{
    fn visit_cell(&mut self, cell: &CellInfo) {
        self(cell)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Column {
    header: String,
    weight: f64,
}

/// A table description; drawing it does not consume it.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    head_style: TextStyle,
    body_style: TextStyle,
    head_fill: Color,
    stripe_fill: Option<Color>,
    bold_first_column: bool,
}

impl Table {
    /// Creates a table from `(header, relative width)` pairs.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(header, weight)| Column {
                    header: header.into(),
                    weight: weight.max(0.0),
                })
                .collect(),
            rows: Vec::new(),
            head_style: TextStyle::bold(style::size::TABLE, style::WHITE),
            body_style: TextStyle::regular(style::size::TABLE, style::TEXT),
            head_fill: style::PRIMARY,
            stripe_fill: Some(style::ROW_STRIPE),
            bold_first_column: false,
        }
    }

    /// Two-column "Metric / Value" table with a bold label column.
    pub fn key_value<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new([("Metric", 0.55), ("Value", 0.45)]).with_bold_first_column(true);
        for (key, value) in rows {
            table.push_row([key.into(), value.into()]);
        }
        table
    }

    /// Appends a row; missing cells are treated as empty, extra cells are ignored.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.columns.len())
            .map(Into::into)
            .collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Builder form of [`Table::push_row`].
    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells);
        self
    }

    /// Renders the first body column in bold, for label columns.
    pub fn with_bold_first_column(mut self, bold: bool) -> Self {
        self.bold_first_column = bold;
        self
    }

    /// Sets the fill of every other body row; `None` draws all rows unfilled.
    pub fn with_stripes(mut self, stripe_fill: Option<Color>) -> Self {
        self.stripe_fill = stripe_fill;
        self
    }

    /// Body rows, each padded to the column count.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns whether the table has no body rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self, total: f64) -> Vec<f64> {
        let sum: f64 = self.columns.iter().map(|column| column.weight).sum();
        let count = self.columns.len().max(1) as f64;
        self.columns
            .iter()
            .map(|column| {
                if sum > 0.0 {
                    total * column.weight / sum
                } else {
                    total / count
                }
            })
            .collect()
    }

    fn cell_style(&self, column: usize) -> TextStyle {
        if self.bold_first_column && column == 0 {
            TextStyle {
                weight: FontWeight::Bold,
                ..self.body_style
            }
        } else {
            self.body_style
        }
    }

    fn wrap_cells(&self, cells: &[String], widths: &[f64], style_for: impl Fn(usize) -> TextStyle) -> Vec<Vec<String>> {
        cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(column, (text, width))| {
                let style = style_for(column);
                metrics::wrap_text(text, width - 2.0 * CELL_PADDING, style.weight, style.size)
            })
            .collect()
    }

    /// Draws the table starting at the state's cursor and returns the cursor
    /// position below the last drawn row, on whichever page that ended.
    ///
    /// Tables without rows draw nothing and leave the cursor untouched.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        state: &mut LayoutState,
        visitor: &mut dyn CellVisitor,
    ) -> f64 {
        if self.rows.is_empty() || self.columns.is_empty() {
            return state.cursor_y();
        }

        let geometry = state.geometry();
        let widths = self.column_widths(geometry.content_width());

        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let head_lines = self.wrap_cells(&headers, &widths, |_| self.head_style);
        let head_line_height = self.head_style.line_height();
        let head_height = line_count(&head_lines).max(1) as f64 * head_line_height + 2.0 * CELL_PADDING;

        let line_height = self.body_style.line_height();
        let body: Vec<Vec<Vec<String>>> = self
            .rows
            .iter()
            .map(|row| self.wrap_cells(row, &widths, |column| self.cell_style(column)))
            .collect();

        // Keep the header together with at least one body line.
        state.ensure_space(canvas, head_height + line_height + 2.0 * CELL_PADDING);
        self.draw_header(canvas, state, &widths, &head_lines, head_height);
        // True while nothing but the header sits on the current page.
        let mut header_only = true;

        for (row_index, lines) in body.iter().enumerate() {
            let total_lines = line_count(lines).max(1);
            let row_height = total_lines as f64 * line_height + 2.0 * CELL_PADDING;
            let fits_empty_page = head_height + row_height <= geometry.content_height();

            if !state.fits(row_height) && fits_empty_page {
                state.start_page(canvas);
                self.draw_header(canvas, state, &widths, &head_lines, head_height);
                header_only = true;
            }

            let mut start = 0;
            let mut fragment = 0;
            while start < total_lines {
                let available = ((state.remaining() - 2.0 * CELL_PADDING) / line_height).floor();
                if available < 1.0 && !header_only {
                    state.start_page(canvas);
                    self.draw_header(canvas, state, &widths, &head_lines, head_height);
                    header_only = true;
                    continue;
                }
                // A page too short for header plus one line still takes one line.
                let take = (available.max(1.0) as usize).min(total_lines - start);
                header_only = false;
                self.draw_fragment(
                    canvas,
                    state,
                    &widths,
                    lines,
                    (row_index, fragment),
                    start..start + take,
                    visitor,
                );
                start += take;
                fragment += 1;
            }
        }

        state.cursor_y()
    }

    fn draw_header(
        &self,
        canvas: &mut Canvas,
        state: &mut LayoutState,
        widths: &[f64],
        head_lines: &[Vec<String>],
        head_height: f64,
    ) {
        let geometry = state.geometry();
        let top = state.cursor_y();
        let page = canvas.current();
        page.rect(
            Rect::new(geometry.margin, top, geometry.content_width(), head_height),
            self.head_fill,
        );

        let line_height = self.head_style.line_height();
        let mut x = geometry.margin;
        for (lines, width) in head_lines.iter().zip(widths) {
            for (index, line) in lines.iter().enumerate() {
                let baseline = top + CELL_PADDING + (index as f64 + BASELINE_RATIO) * line_height;
                page.text(line.as_str(), x + CELL_PADDING, baseline, self.head_style, TextAlign::Left);
            }
            x += width;
        }

        state.advance(head_height);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_fragment(
        &self,
        canvas: &mut Canvas,
        state: &mut LayoutState,
        widths: &[f64],
        lines: &[Vec<String>],
        (row, fragment): (usize, usize),
        range: std::ops::Range<usize>,
        visitor: &mut dyn CellVisitor,
    ) {
        let geometry = state.geometry();
        let line_height = self.body_style.line_height();
        let top = state.cursor_y();
        let height = range.len() as f64 * line_height + 2.0 * CELL_PADDING;
        let page_index = state.page_index();

        let page = canvas.current();
        if let Some(fill) = self.stripe_fill.filter(|_| row % 2 == 1) {
            page.rect(Rect::new(geometry.margin, top, geometry.content_width(), height), fill);
        }

        let mut x = geometry.margin;
        let mut cells = Vec::with_capacity(widths.len());
        for (column, (cell_lines, width)) in lines.iter().zip(widths).enumerate() {
            let style = self.cell_style(column);
            let visible = cell_lines
                .iter()
                .enumerate()
                .filter(|(index, _)| range.contains(index));
            for (index, line) in visible {
                let offset = (index - range.start) as f64;
                let baseline = top + CELL_PADDING + (offset + BASELINE_RATIO) * line_height;
                page.text(line.as_str(), x + CELL_PADDING, baseline, style, TextAlign::Left);
            }
            cells.push(CellInfo {
                row,
                column,
                page: page_index,
                rect: Rect::new(x, top, *width, height),
                fragment,
            });
            x += width;
        }

        let bottom = top + height;
        page.line(
            (geometry.margin, bottom),
            (geometry.margin + geometry.content_width(), bottom),
            style::DIVIDER,
            0.1,
        );

        state.advance(height);
        for cell in &cells {
            visitor.visit_cell(cell);
        }
    }
}

fn line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageGeometry;

    fn fresh() -> (Canvas, LayoutState) {
        let geometry = PageGeometry::A4;
        let mut canvas = Canvas::new(geometry.width, geometry.height);
        let mut state = LayoutState::new(geometry);
        state.start_page(&mut canvas);
        (canvas, state)
    }

    #[test]
    fn short_table_stays_on_one_page() {
        let (mut canvas, mut state) = fresh();
        let table = Table::key_value([("Cap Rate", "5.1%"), ("Estimated ROI", "6.2%")]);

        let mut visited = Vec::new();
        let end = table.draw(&mut canvas, &mut state, &mut |cell: &CellInfo| {
            visited.push((cell.row, cell.column))
        });

        assert_eq!(canvas.page_count(), 1);
        assert!(end > PageGeometry::A4.margin);
        assert_eq!(end, state.cursor_y());
        assert_eq!(visited, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert!(canvas.pages()[0].contains_text("Cap Rate"));
    }

    #[test]
    fn long_table_paginates_and_repeats_header() {
        let (mut canvas, mut state) = fresh();
        let mut table = Table::new([("Item", 1.0), ("Amount", 1.0)]);
        for index in 0..120 {
            table.push_row([format!("Row {index}"), format!("{index}")]);
        }

        let mut pages_seen = Vec::new();
        table.draw(&mut canvas, &mut state, &mut |cell: &CellInfo| {
            if cell.column == 0 {
                pages_seen.push(cell.page);
            }
        });

        assert!(canvas.page_count() > 1);
        assert_eq!(pages_seen.len(), 120);
        for page in canvas.pages() {
            assert!(page.contains_text("Item"), "header repeated on every page");
        }
        let bottom = PageGeometry::A4.bottom();
        assert!(state.cursor_y() <= bottom);
    }

    #[test]
    fn rows_are_not_split_when_they_fit_a_fresh_page() {
        let (mut canvas, mut state) = fresh();
        state.advance(250.0);
        let long = "word ".repeat(60);
        let table = Table::new([("Type", 0.3), ("Description", 0.7)]).with_row(["Market", long.as_str()]);

        let mut fragments = Vec::new();
        table.draw(&mut canvas, &mut state, &mut |cell: &CellInfo| fragments.push(cell.fragment));

        assert_eq!(canvas.page_count(), 2);
        assert!(fragments.iter().all(|fragment| *fragment == 0));
    }

    #[test]
    fn oversized_rows_continue_on_next_page() {
        let (mut canvas, mut state) = fresh();
        let huge = "lorem ".repeat(2000);
        let table = Table::new([("Type", 0.2), ("Description", 0.8)]).with_row(["Market", huge.as_str()]);

        let mut fragments = Vec::new();
        table.draw(&mut canvas, &mut state, &mut |cell: &CellInfo| {
            if cell.column == 1 {
                fragments.push((cell.page, cell.fragment));
            }
        });

        assert!(canvas.page_count() > 1);
        assert_eq!(fragments[0], (0, 0));
        assert_eq!(fragments.len(), canvas.page_count());
        let style = TextStyle::regular(style::size::TABLE, style::TEXT);
        let expected = metrics::wrap_text(&huge, 0.8 * 170.0 - 2.0 * CELL_PADDING, style.weight, style.size);
        let drawn = canvas
            .pages()
            .iter()
            .flat_map(|page| page.texts())
            .filter(|text| text.starts_with("lorem"))
            .count();
        assert_eq!(drawn, expected.len());
    }

    #[test]
    fn page_shorter_than_header_and_one_line_still_terminates() {
        let geometry = PageGeometry::new(210.0, 50.0, 20.0);
        let mut canvas = Canvas::new(geometry.width, geometry.height);
        let mut state = LayoutState::new(geometry);
        state.start_page(&mut canvas);
        let table = Table::key_value([("Cap Rate", "5.1%"), ("Estimated ROI", "6.2%"), ("Units", "12")]);

        let mut visited = Vec::new();
        table.draw(&mut canvas, &mut state, &mut |cell: &CellInfo| {
            visited.push((cell.row, cell.column, cell.fragment))
        });

        assert_eq!(visited.len(), 6, "every cell drawn exactly once");
        assert!(visited.iter().all(|(_, _, fragment)| *fragment == 0));
        assert!(canvas.page_count() <= 4, "one page per row at most, plus the first");
    }

    #[test]
    fn empty_table_draws_nothing() {
        let (mut canvas, mut state) = fresh();
        let table = Table::new([("Type", 1.0)]);
        let before = state.cursor_y();

        let end = table.draw(&mut canvas, &mut state, &mut |_: &CellInfo| {});

        assert_eq!(end, before);
        assert!(canvas.pages()[0].ops().is_empty());
    }
}
