//! Replays a composed report onto `printpdf` pages.
//!
//! Canvas coordinates have their origin at the top-left corner with y growing
//! downwards; PDF user space starts at the bottom-left, so every y is flipped
//! against the page height here and nowhere else.

use std::f64::consts::{FRAC_PI_2, PI};
use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point, Rgb,
};

use crate::canvas::{DrawOp, Page, Rect};
use crate::composer::ComposedReport;
use crate::error::ReportError;
use crate::metrics::FontWeight;
use crate::style::Color;

const LAYER_NAME: &str = "Content";
const CIRCLE_SEGMENTS: usize = 48;
const CORNER_SEGMENTS: usize = 8;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn pdf_color(color: Color) -> PdfColor {
    let (r, g, b) = color.to_unit();
    PdfColor::Rgb(Rgb::new(r, g, b, None))
}

/// Renders every page of `report` and returns the PDF bytes.
pub fn render_pdf(report: &ComposedReport, title: &str) -> Result<Vec<u8>, ReportError> {
    let canvas = report.canvas();
    let width = Mm(canvas.width());
    let height = Mm(canvas.height());

    let (document, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let fonts = Fonts {
        regular: document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(ReportError::pdf)?,
        bold: document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(ReportError::pdf)?,
    };

    for (index, page) in canvas.pages().iter().enumerate() {
        let layer = if index == 0 {
            document.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = document.add_page(width, height, LAYER_NAME);
            document.get_page(page_index).get_layer(layer_index)
        };
        PageWriter {
            layer: &layer,
            fonts: &fonts,
            page_height: canvas.height(),
        }
        .write(page);
    }

    let mut writer = BufWriter::new(Vec::new());
    document.save(&mut writer).map_err(ReportError::pdf)?;
    writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))
}

struct PageWriter<'a> {
    layer: &'a PdfLayerReference,
    fonts: &'a Fonts,
    page_height: f64,
}

impl PageWriter<'_> {
    fn point(&self, x: f64, y: f64) -> (Point, bool) {
        (Point::new(Mm(x), Mm(self.page_height - y)), false)
    }

    fn write(&self, page: &Page) {
        for op in page.ops() {
            match op {
                DrawOp::Text { x, y, text, style } => {
                    self.layer.set_fill_color(pdf_color(style.color));
                    self.layer.use_text(
                        text.as_str(),
                        style.size,
                        Mm(*x),
                        Mm(self.page_height - y),
                        self.fonts.get(style.weight),
                    );
                }
                DrawOp::Rect { rect, fill, radius } => {
                    let outline = if *radius > 0.0 {
                        rounded_outline(rect, *radius)
                    } else {
                        vec![
                            (rect.x, rect.y),
                            (rect.x + rect.width, rect.y),
                            (rect.x + rect.width, rect.y + rect.height),
                            (rect.x, rect.y + rect.height),
                        ]
                    };
                    self.fill_polygon(&outline, *fill);
                }
                DrawOp::Circle { cx, cy, radius, fill } => {
                    let outline: Vec<(f64, f64)> = (0..CIRCLE_SEGMENTS)
                        .map(|step| {
                            let angle = 2.0 * PI * step as f64 / CIRCLE_SEGMENTS as f64;
                            (cx + radius * angle.cos(), cy + radius * angle.sin())
                        })
                        .collect();
                    self.fill_polygon(&outline, *fill);
                }
                DrawOp::Line {
                    from,
                    to,
                    color,
                    thickness,
                } => {
                    self.layer.set_outline_color(pdf_color(*color));
                    self.layer.set_outline_thickness(*thickness / crate::metrics::MM_PER_PT);
                    self.layer.add_shape(Line {
                        points: vec![self.point(from.0, from.1), self.point(to.0, to.1)],
                        is_closed: false,
                        has_fill: false,
                        has_stroke: true,
                        is_clipping_path: false,
                    });
                }
            }
        }
    }

    fn fill_polygon(&self, outline: &[(f64, f64)], fill: Color) {
        self.layer.set_fill_color(pdf_color(fill));
        self.layer.add_shape(Line {
            points: outline.iter().map(|&(x, y)| self.point(x, y)).collect(),
            is_closed: true,
            has_fill: true,
            has_stroke: false,
            is_clipping_path: false,
        });
    }
}

/// Polygon approximating a rectangle with quarter-circle corners.
fn rounded_outline(rect: &Rect, radius: f64) -> Vec<(f64, f64)> {
    // Corner centres in drawing order, each with the angle its arc starts at.
    let corners = [
        (rect.x + rect.width - radius, rect.y + radius, -FRAC_PI_2),
        (rect.x + rect.width - radius, rect.y + rect.height - radius, 0.0),
        (rect.x + radius, rect.y + rect.height - radius, FRAC_PI_2),
        (rect.x + radius, rect.y + radius, PI),
    ];

    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = start + FRAC_PI_2 * step as f64 / CORNER_SEGMENTS as f64;
            points.push((cx + radius * angle.cos(), cy + radius * angle.sin()));
        }
    }
    points
}
