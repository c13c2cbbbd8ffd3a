//! Lays out a property report onto pages.
//!
//! [`DocumentComposer`] performs a single forward pass: a fixed cover page,
//! then one block per report section, each starting on a fresh page.  Inside a
//! section every write goes through an overflow check against the bottom
//! margin, so long paragraphs, tables and lists continue on following pages
//! instead of being clipped.  Footers are stamped in a second pass because the
//! total page count is only known once layout has finished.

use chrono::{Local, NaiveDateTime};
use log::{debug, warn};

use crate::builder::ReportConfig;
use crate::canvas::{Canvas, Rect, TextAlign, TextStyle};
use crate::format;
use crate::layout::{LayoutState, PageGeometry};
use crate::metrics::{self, FontWeight, MM_PER_PT};
use crate::model::{Analysis, PricePosition, Property, ReportInput};
use crate::style::{self, size};
use crate::table::{CellInfo, Table};

const COVER_BAND_HEIGHT: f64 = 60.0;
const SCORE_BADGE_RADIUS: f64 = 18.0;
const MAX_NAME_LINES: usize = 3;
const SECTION_BAND_HEIGHT: f64 = 12.0;
const PARAGRAPH_GAP: f64 = 3.0;
const TABLE_GAP: f64 = 5.0;
const BULLET_INDENT: f64 = 8.0;
const BULLET_RADIUS: f64 = 0.9;
const BULLET_GAP: f64 = 2.0;
const SEVERITY_BADGE_WIDTH: f64 = 22.0;
const SEVERITY_BADGE_HEIGHT: f64 = 5.5;
const FOOTER_OFFSET: f64 = 5.0;

pub const EXECUTIVE_SUMMARY: &str = "Executive Summary";
pub const FINANCIAL_ANALYSIS: &str = "Financial Analysis";
pub const LOCATION_ANALYSIS: &str = "Location Analysis";
pub const RISKS_AND_OPPORTUNITIES: &str = "Risks & Opportunities";

/// Header of the severity column in the risks table.
pub const SEVERITY_HEADER: &str = "Severity";

/// First page of a laid-out section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionStart {
    pub title: String,
    /// Zero-based page index.
    pub page: usize,
}

/// The finished layout of one report, ready to be rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposedReport {
    canvas: Canvas,
    sections: Vec<SectionStart>,
    generated_at: NaiveDateTime,
}

impl ComposedReport {
    /// The laid-out pages.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Total number of pages, cover included.
    pub fn page_count(&self) -> usize {
        self.canvas.page_count()
    }

    /// Sections in order, with their first page.
    pub fn sections(&self) -> &[SectionStart] {
        &self.sections
    }

    /// Timestamp printed on the cover.
    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    /// Zero-based page range `[start, end)` covered by the named section.
    pub fn section_pages(&self, title: &str) -> Option<std::ops::Range<usize>> {
        let position = self.sections.iter().position(|s| s.title == title)?;
        let start = self.sections[position].page;
        let end = self
            .sections
            .get(position + 1)
            .map_or(self.page_count(), |next| next.page);
        Some(start..end)
    }
}

/// Footer label for zero-based page `index` out of `total`.
pub fn page_label(index: usize, total: usize) -> String {
    format!("Page {} of {}", index + 1, total)
}

/// One-shot layout engine; create a new composer for every report.
pub struct DocumentComposer<'a> {
    config: &'a ReportConfig,
    state: LayoutState,
    canvas: Canvas,
    sections: Vec<SectionStart>,
}

impl<'a> DocumentComposer<'a> {
    /// Creates a composer with an empty canvas for one report.
    pub fn new(config: &'a ReportConfig) -> Self {
        let geometry = config.geometry;
        Self {
            config,
            state: LayoutState::new(geometry),
            canvas: Canvas::new(geometry.width, geometry.height),
            sections: Vec::new(),
        }
    }

    /// Lays out the whole report.  Consumes the composer so its state can
    /// never leak into another report.
    pub fn compose(mut self, input: &ReportInput) -> ComposedReport {
        let generated_at = self
            .config
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());

        self.cover(&input.property, &input.analysis, generated_at);
        self.executive_summary(&input.property, &input.analysis);
        self.financial_analysis(&input.property, &input.analysis);
        self.location_analysis(&input.analysis);
        self.risks_and_opportunities(&input.analysis);
        self.stamp_footers();

        debug!(
            "composed report for '{}' over {} pages",
            input.property.name,
            self.canvas.page_count()
        );

        ComposedReport {
            canvas: self.canvas,
            sections: self.sections,
            generated_at,
        }
    }

    fn currency(&self, value: f64) -> String {
        format::currency(value, &self.config.currency_symbol)
    }

    // Positions are designed on A4 and scaled to the configured page height, so
    // the cover always fits one page and skips the overflow checks.
    fn cover(&mut self, property: &Property, analysis: &Analysis, generated_at: NaiveDateTime) {
        let geometry = self.config.geometry;
        let center = geometry.width / 2.0;
        let scale = geometry.height / PageGeometry::A4.height;
        let type_scale = scale.min(1.0);
        let at = |a4_y: f64| a4_y * scale;
        let pt = |size: f64| size * type_scale;

        let price_per_sqm = format::price_per_sqm(
            property.current_value,
            property.total_size_sqm,
            &self.config.currency_symbol,
        );
        let facts = [
            ("Acquisition Price", self.currency(property.acquisition_price)),
            ("Current Value", self.currency(property.current_value)),
            (
                "Total Size",
                property
                    .total_size_sqm
                    .map_or_else(|| format::NOT_AVAILABLE.to_owned(), format::area),
            ),
            ("Total Units", property.total_units.to_string()),
            ("Status", property.status.clone()),
            ("Price per sqm", price_per_sqm),
        ];

        self.state.start_page(&mut self.canvas);
        let page = self.canvas.current();

        let band_height = at(COVER_BAND_HEIGHT);
        page.rect(Rect::new(0.0, 0.0, geometry.width, band_height), style::PRIMARY);
        page.rect(
            Rect::new(0.0, band_height, geometry.width, 1.5 * type_scale),
            style::ACCENT,
        );
        page.text(
            self.config.title.as_str(),
            center,
            at(28.0),
            TextStyle::bold(pt(size::COVER_TITLE), style::WHITE),
            TextAlign::Center,
        );
        page.text(
            format!("{} | AI-Powered Investment Analysis", self.config.brand),
            center,
            at(40.0),
            TextStyle::regular(pt(size::COVER_SUBTITLE), style::WHITE),
            TextAlign::Center,
        );

        let name_style = TextStyle::bold(pt(size::PROPERTY_NAME), style::PRIMARY);
        let name_width = geometry.content_width();
        let name_lines = metrics::truncate_lines(
            metrics::wrap_text(&property.name, name_width, name_style.weight, name_style.size),
            MAX_NAME_LINES,
            name_width,
            name_style.weight,
            name_style.size,
        );
        let mut y = at(82.0);
        for line in name_lines {
            page.text(line, center, y, name_style, TextAlign::Center);
            y += name_style.line_height();
        }
        page.text(
            property.location_line(),
            center,
            y + type_scale,
            TextStyle::regular(pt(size::COVER_SUBTITLE), style::MUTED),
            TextAlign::Center,
        );

        let badge_center = at(132.0);
        let badge_radius = SCORE_BADGE_RADIUS * type_scale;
        page.circle(center, badge_center, badge_radius, style::score_color(analysis.ai_score));
        page.text(
            format::score(analysis.ai_score),
            center,
            badge_center + pt(size::SCORE) * MM_PER_PT * 0.35,
            TextStyle::bold(pt(size::SCORE), style::WHITE),
            TextAlign::Center,
        );
        page.text(
            "AI Score / 100",
            center,
            badge_center + badge_radius + 6.0 * type_scale,
            TextStyle::regular(pt(size::BODY), style::MUTED),
            TextAlign::Center,
        );

        let label = analysis.recommendation.label();
        let badge_style = TextStyle::bold(pt(size::BADGE), style::WHITE);
        let badge_width = (badge_style.width_of(label) + 16.0 * type_scale).max(50.0 * type_scale);
        let badge = Rect::new(center - badge_width / 2.0, at(164.0), badge_width, 12.0 * type_scale);
        page.rounded_rect(
            badge,
            3.0 * type_scale,
            style::recommendation_color(analysis.recommendation),
        );
        page.text(
            label,
            center,
            badge.center_y() + pt(size::BADGE) * MM_PER_PT * 0.35,
            badge_style,
            TextAlign::Center,
        );

        let inset = geometry.margin + 20.0 * type_scale;
        page.line(
            (inset, at(188.0)),
            (geometry.width - inset, at(188.0)),
            style::DIVIDER,
            0.3,
        );
        let label_style = TextStyle::bold(pt(size::BODY), style::TEXT);
        let value_style = TextStyle::regular(pt(size::BODY), style::TEXT);
        for (index, (name, value)) in facts.into_iter().enumerate() {
            let y = at(198.0 + index as f64 * 7.0);
            page.text(name, inset, y, label_style, TextAlign::Left);
            page.text(value, geometry.width - inset, y, value_style, TextAlign::Right);
        }

        page.text(
            format!("Generated on {}", generated_at.format("%Y-%m-%d %H:%M")),
            center,
            geometry.bottom(),
            TextStyle::regular(pt(size::SMALL + 1.0), style::MUTED),
            TextAlign::Center,
        );
    }

    fn begin_section(&mut self, title: &str) {
        let page = self.state.start_page(&mut self.canvas);
        debug!("section '{}' starts on page {}", title, page + 1);
        self.sections.push(SectionStart {
            title: title.to_owned(),
            page,
        });

        let geometry = self.config.geometry;
        let top = self.state.cursor_y();
        let page = self.canvas.current();
        page.rect(
            Rect::new(geometry.margin, top, geometry.content_width(), SECTION_BAND_HEIGHT),
            style::PRIMARY,
        );
        page.rect(
            Rect::new(geometry.margin, top + SECTION_BAND_HEIGHT, geometry.content_width(), 0.8),
            style::ACCENT,
        );
        page.text(
            title,
            geometry.margin + 4.0,
            top + 8.5,
            TextStyle::bold(size::SECTION_TITLE, style::WHITE),
            TextAlign::Left,
        );
        self.state.advance(SECTION_BAND_HEIGHT + 6.0);
    }

    /// A heading that always keeps at least one body line below it on the same page.
    fn subheading(&mut self, text: &str) {
        let style = TextStyle::bold(size::SUBHEADING, style::PRIMARY);
        let body_line = metrics::line_height(size::BODY);
        self.state
            .ensure_space(&mut self.canvas, style.line_height() + body_line);

        let baseline = self.state.cursor_y() + 0.8 * style.line_height();
        self.canvas.current().text(
            text,
            self.config.geometry.margin,
            baseline,
            style,
            TextAlign::Left,
        );
        self.state.advance(style.line_height() + 1.5);
    }

    /// Writes wrapped text line by line, breaking the page before any line that would overflow.
    fn paragraph(&mut self, text: &str) {
        let geometry = self.config.geometry;
        let style = TextStyle::regular(size::BODY, style::TEXT);
        let line_height = style.line_height();

        for line in metrics::wrap_text(text, geometry.content_width(), style.weight, style.size) {
            self.state.ensure_space(&mut self.canvas, line_height);
            let baseline = self.state.cursor_y() + 0.8 * line_height;
            self.canvas
                .current()
                .text(line, geometry.margin, baseline, style, TextAlign::Left);
            self.state.advance(line_height);
        }
        self.state.advance(PARAGRAPH_GAP);
    }

    fn bullets(&mut self, items: &[String]) {
        let geometry = self.config.geometry;
        let body = TextStyle::regular(size::BODY, style::TEXT);
        let line_height = body.line_height();
        let text_x = geometry.margin + BULLET_INDENT;
        let width = geometry.content_width() - BULLET_INDENT;

        for item in items {
            let lines = metrics::wrap_text(item, width, body.weight, body.size);
            if lines.is_empty() {
                continue;
            }

            self.state.ensure_space(&mut self.canvas, line_height);
            let bullet_y = self.state.cursor_y() + 0.55 * line_height;
            self.canvas
                .current()
                .circle(geometry.margin + 3.0, bullet_y, BULLET_RADIUS, style::ACCENT);

            for line in lines {
                self.state.ensure_space(&mut self.canvas, line_height);
                let baseline = self.state.cursor_y() + 0.8 * line_height;
                self.canvas
                    .current()
                    .text(line, text_x, baseline, body, TextAlign::Left);
                self.state.advance(line_height);
            }
            self.state.advance(BULLET_GAP);
        }
        self.state.advance(PARAGRAPH_GAP);
    }

    fn table(&mut self, table: &Table) {
        let end = table.draw(&mut self.canvas, &mut self.state, &mut |_: &CellInfo| {});
        self.state.resume_at(end + TABLE_GAP);
    }

    fn executive_summary(&mut self, property: &Property, analysis: &Analysis) {
        self.begin_section(EXECUTIVE_SUMMARY);

        let discount = format::discount_ratio(analysis.ideal_purchase_price, property.current_value);
        if property.current_value == 0.0 {
            warn!("property '{}' has a zero current value; discount is not computable", property.id);
        } else if discount < 0.0 {
            warn!(
                "ideal purchase price for '{}' exceeds its current value; rendering a negative discount",
                property.id
            );
        }

        self.subheading("Investment Recommendation");
        self.paragraph(&format!(
            "Based on the AI analysis, the recommendation for {} is {} with an overall score of {}/100.",
            property.name,
            analysis.recommendation.label(),
            format::score(analysis.ai_score)
        ));
        self.table(&Table::key_value([
            ("AI Score", format!("{}/100", format::score(analysis.ai_score))),
            ("Recommendation", analysis.recommendation.label().to_owned()),
            ("Current Value", self.currency(property.current_value)),
            ("Ideal Purchase Price", self.currency(analysis.ideal_purchase_price)),
            ("Suggested Discount", format::percent(discount)),
        ]));

        self.subheading("Analysis Rationale");
        if analysis.reasoning.trim().is_empty() {
            self.paragraph("No rationale was provided with this analysis.");
        } else {
            self.paragraph(&analysis.reasoning);
        }
    }

    fn financial_analysis(&mut self, property: &Property, analysis: &Analysis) {
        self.begin_section(FINANCIAL_ANALYSIS);
        let financials = &analysis.financial_metrics;

        self.subheading("Key Financial Metrics");
        self.table(&Table::key_value([
            ("Estimated ROI", format::percent(financials.estimated_roi)),
            ("Estimated Appreciation", format::percent(financials.estimated_appreciation)),
            ("Estimated Annual Rental Income", self.currency(financials.estimated_rental_income)),
            ("Cap Rate", format::percent(financials.cap_rate)),
        ]));

        self.subheading("Valuation");
        let value_change = (property.current_value / property.acquisition_price - 1.0) * 100.0;
        self.table(&Table::key_value([
            ("Acquisition Price", self.currency(property.acquisition_price)),
            ("Current Value", self.currency(property.current_value)),
            ("Value Change", format::percent(value_change)),
            (
                "Price per sqm",
                format::price_per_sqm(
                    property.current_value,
                    property.total_size_sqm,
                    &self.config.currency_symbol,
                ),
            ),
        ]));

        let comparables = &analysis.comparables;
        self.subheading("Market Comparables");
        self.table(&Table::key_value([
            ("Average Price per sqm", self.currency(comparables.average_price_per_sqm)),
            ("Price Position", comparables.price_position.label().to_owned()),
            ("Difference vs. Market", format::percent(comparables.percentage_difference)),
        ]));

        let difference = format::percent(comparables.percentage_difference.abs());
        let summary = match comparables.price_position {
            PricePosition::Below => {
                format!("The asset is priced {difference} below the average of comparable properties.")
            }
            PricePosition::At => "The asset is priced in line with comparable properties.".to_owned(),
            PricePosition::Above => {
                format!("The asset is priced {difference} above the average of comparable properties.")
            }
        };
        self.paragraph(&summary);
    }

    fn location_analysis(&mut self, analysis: &Analysis) {
        self.begin_section(LOCATION_ANALYSIS);
        let location = &analysis.location_score;

        self.subheading("Location Score");
        self.paragraph(&format!(
            "Overall location score: {}/100.",
            format::score(location.score)
        ));

        self.subheading("Proximity");
        let or_na = |value: &str| {
            if value.trim().is_empty() {
                format::NOT_AVAILABLE.to_owned()
            } else {
                value.to_owned()
            }
        };
        let proximity = Table::new([("Amenity", 0.4), ("Proximity", 0.6)])
            .with_bold_first_column(true)
            .with_row(["Metro".to_owned(), or_na(&location.proximity.metro)])
            .with_row(["Schools".to_owned(), or_na(&location.proximity.schools)])
            .with_row(["Shopping".to_owned(), or_na(&location.proximity.shopping)]);
        self.table(&proximity);

        self.subheading("Area Development");
        if location.development.trim().is_empty() {
            self.paragraph("No development information is available for this area.");
        } else {
            self.paragraph(&location.development);
        }
    }

    fn risks_and_opportunities(&mut self, analysis: &Analysis) {
        self.begin_section(RISKS_AND_OPPORTUNITIES);

        self.subheading("Risks");
        if analysis.risks.is_empty() {
            self.paragraph("No significant risks identified.");
        } else {
            let mut table = Table::new([
                ("Type", 0.25),
                (SEVERITY_HEADER, 0.18),
                ("Description", 0.57),
            ])
            .with_bold_first_column(true)
            .with_stripes(None);
            for risk in &analysis.risks {
                // The severity cell is painted by the overlay pass below.
                table.push_row([risk.kind.as_str(), "", risk.description.as_str()]);
            }

            let mut severity_cells = Vec::new();
            let end = table.draw(&mut self.canvas, &mut self.state, &mut |cell: &CellInfo| {
                if cell.column == 1 && cell.fragment == 0 {
                    severity_cells.push(*cell);
                }
            });
            self.overlay_severities(analysis, &severity_cells);
            self.state.resume_at(end + TABLE_GAP);
        }

        self.subheading("Opportunities");
        if analysis.opportunities.iter().all(|item| item.trim().is_empty()) {
            self.paragraph("No specific opportunities identified.");
        } else {
            self.bullets(&analysis.opportunities);
        }
    }

    /// Paints a coloured badge onto each severity cell, addressed by row index.
    fn overlay_severities(&mut self, analysis: &Analysis, cells: &[CellInfo]) {
        let label_style = TextStyle::new(size::SMALL, FontWeight::Bold, style::WHITE);
        let first_line = metrics::line_height(size::TABLE) + 5.0;

        for cell in cells {
            let Some(risk) = analysis.risks.get(cell.row) else {
                continue;
            };
            let Some(page) = self.canvas.page_mut(cell.page) else {
                continue;
            };

            let width = SEVERITY_BADGE_WIDTH.min(cell.rect.width - 4.0);
            let band = cell.rect.height.min(first_line);
            let badge = Rect::new(
                cell.rect.center_x() - width / 2.0,
                cell.rect.y + (band - SEVERITY_BADGE_HEIGHT) / 2.0,
                width,
                SEVERITY_BADGE_HEIGHT,
            );
            page.rounded_rect(badge, 1.5, style::severity_color(risk.severity));
            page.text(
                risk.severity.label(),
                badge.center_x(),
                badge.center_y() + size::SMALL * MM_PER_PT * 0.35,
                label_style,
                TextAlign::Center,
            );
        }
    }

    fn stamp_footers(&mut self) {
        let geometry = self.config.geometry;
        let total = self.canvas.page_count();
        // The footer lives inside the bottom margin, shrinking with narrow margins.
        let rule_y = geometry.bottom() + FOOTER_OFFSET.min(0.3 * geometry.margin);
        let text_y = rule_y + FOOTER_OFFSET.min(0.45 * geometry.margin);
        let footer_style = TextStyle::regular(size::SMALL, style::MUTED);

        for index in 0..total {
            let Some(page) = self.canvas.page_mut(index) else {
                continue;
            };
            page.line(
                (geometry.margin, rule_y),
                (geometry.width - geometry.margin, rule_y),
                style::DIVIDER,
                0.3,
            );
            page.text(
                self.config.brand.as_str(),
                geometry.margin,
                text_y,
                footer_style,
                TextAlign::Left,
            );
            page.text(
                page_label(index, total),
                geometry.width - geometry.margin,
                text_y,
                footer_style,
                TextAlign::Right,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, Page};
    use crate::sample;

    fn config(geometry: PageGeometry) -> ReportConfig {
        ReportConfig {
            geometry,
            generated_at: chrono::NaiveDate::from_ymd_opt(2024, 5, 17)
                .and_then(|date| date.and_hms_opt(9, 30, 0)),
            ..ReportConfig::default()
        }
    }

    fn compose_with(geometry: PageGeometry, input: &ReportInput) -> ComposedReport {
        DocumentComposer::new(&config(geometry)).compose(input)
    }

    fn text_ops(page: &Page) -> impl Iterator<Item = (&str, f64)> {
        page.ops().iter().filter_map(|op| match op {
            DrawOp::Text { text, y, .. } => Some((text.as_str(), *y)),
            _ => None,
        })
    }

    fn is_footer(text: &str) -> bool {
        text == crate::builder::DEFAULT_BRAND || text.starts_with("Page ")
    }

    #[test]
    fn many_opportunities_spill_without_clipping() {
        let geometry = PageGeometry::A4;
        let mut input = sample::via_garibaldi();
        input.analysis.opportunities = (0..80)
            .map(|i| {
                format!(
                    "Opportunity {i}: reposition the ground floor units towards furnished \
                     corporate lets and renegotiate the service contracts at renewal."
                )
            })
            .collect();

        let report = compose_with(geometry, &input);
        let range = report
            .section_pages(RISKS_AND_OPPORTUNITIES)
            .expect("risks section");
        let pages = &report.canvas().pages()[range];
        assert!(pages.len() > 1, "eighty items need more than one page");

        let width = geometry.content_width() - BULLET_INDENT;
        let expected: Vec<String> = input
            .analysis
            .opportunities
            .iter()
            .flat_map(|item| metrics::wrap_text(item, width, FontWeight::Regular, size::BODY))
            .collect();

        let body: Vec<(&str, f64)> = pages
            .iter()
            .flat_map(text_ops)
            .filter(|(text, _)| !is_footer(text))
            .collect();
        let start = body
            .iter()
            .position(|(text, _)| *text == "Opportunities")
            .expect("opportunities heading")
            + 1;
        let drawn: Vec<&str> = body[start..].iter().map(|(text, _)| *text).collect();
        assert_eq!(drawn, expected);
        assert!(body[start..].iter().all(|(_, y)| *y <= geometry.bottom()));

        let bullets: Vec<f64> = pages
            .iter()
            .flat_map(|page| page.ops())
            .filter_map(|op| match op {
                DrawOp::Circle { cy, fill, .. } if *fill == style::ACCENT => Some(*cy),
                _ => None,
            })
            .collect();
        assert_eq!(bullets.len(), 80);
        assert!(bullets.iter().all(|cy| *cy <= geometry.bottom()));
    }

    #[test]
    fn cover_fits_smaller_pages() {
        for geometry in [
            PageGeometry::new(148.0, 210.0, 15.0),
            PageGeometry::new(215.9, 279.4, 19.0),
            PageGeometry::new(105.0, 148.0, 10.0),
        ] {
            let report = compose_with(geometry, &sample::lisbon_showcase());
            let cover = &report.canvas().pages()[0];

            assert_eq!(report.sections()[0].page, 1, "cover is a single page");
            for (text, y) in text_ops(cover) {
                assert!(
                    (0.0..=geometry.height).contains(&y),
                    "'{text}' at y={y} is off a {}mm page",
                    geometry.height
                );
            }
            assert!(cover.contains_text("Price per sqm"));
        }
    }

    #[test]
    fn long_names_stop_above_the_score_badge() {
        let mut input = sample::via_garibaldi();
        input.property.name = "Residenza Panoramica ".repeat(12);

        let report = compose_with(PageGeometry::A4, &input);
        let cover = &report.canvas().pages()[0];

        let name_lines: Vec<(&str, f64)> = text_ops(cover)
            .filter(|(text, _)| text.contains("Residenza") || text.contains("Panoramica"))
            .collect();
        assert_eq!(name_lines.len(), MAX_NAME_LINES);
        assert!(name_lines[MAX_NAME_LINES - 1].0.ends_with("..."));

        let badge_top = cover
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::Circle { cy, radius, .. } => Some(cy - radius),
                _ => None,
            })
            .expect("score badge");
        let last_name_y = name_lines[MAX_NAME_LINES - 1].1;
        assert!(last_name_y < badge_top);
    }

    #[test]
    fn footer_stays_on_the_page_with_narrow_margins() {
        let geometry = PageGeometry::new(210.0, 297.0, 6.0);
        let report = compose_with(geometry, &sample::via_garibaldi());
        let total = report.page_count();

        for (index, page) in report.canvas().pages().iter().enumerate() {
            let (_, y) = text_ops(page)
                .find(|(text, _)| *text == page_label(index, total))
                .expect("page label");
            assert!(y > geometry.bottom() && y <= geometry.height);
        }
    }

    #[test]
    fn very_short_pages_still_finish() {
        let geometry = PageGeometry::new(210.0, 50.0, 20.0);
        let report = compose_with(geometry, &sample::lisbon_showcase());

        assert_eq!(report.sections().len(), 4);
        assert_eq!(report.sections()[0].page, 1);
        let last = report.canvas().pages().last().expect("pages");
        let total = report.page_count();
        assert!(last.contains_text(&page_label(total - 1, total)));
    }
}
