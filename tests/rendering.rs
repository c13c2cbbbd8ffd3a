use chrono::{NaiveDate, NaiveDateTime};
use property_report::canvas::{DrawOp, Page, Rect};
use property_report::composer::{
    page_label, ComposedReport, EXECUTIVE_SUMMARY, RISKS_AND_OPPORTUNITIES, SEVERITY_HEADER,
};
use property_report::metrics::{self, FontWeight};
use property_report::model::{ReportInput, Risk, Severity};
use property_report::sample;
use property_report::style::{self, size, Color};
use property_report::{ReportBuilder, ReportGenerator};
use sha2::{Digest, Sha256};

fn pinned_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 17)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

fn generator() -> ReportGenerator {
    ReportBuilder::new().with_generated_at(pinned_time()).build()
}

fn section_pages<'a>(report: &'a ComposedReport, title: &str) -> &'a [Page] {
    let range = report.section_pages(title).expect("section laid out");
    &report.canvas().pages()[range]
}

/// Severity badges on `pages` in drawing order, paired with their rectangles.
fn severity_badges(pages: &[Page]) -> Vec<(usize, Color, Rect, String)> {
    let severity_colors = [style::SEVERITY_HIGH, style::SEVERITY_MEDIUM, style::SEVERITY_LOW];
    let mut badges = Vec::new();
    for (page_index, page) in pages.iter().enumerate() {
        let ops = page.ops();
        for (index, op) in ops.iter().enumerate() {
            let DrawOp::Rect { rect, fill, radius } = op else {
                continue;
            };
            if *radius <= 0.0 || !severity_colors.contains(fill) {
                continue;
            }
            let label = match ops.get(index + 1) {
                Some(DrawOp::Text { text, .. }) => text.clone(),
                _ => String::new(),
            };
            badges.push((page_index, *fill, *rect, label));
        }
    }
    badges
}

fn text_y(page: &Page, needle: &str) -> Option<f64> {
    page.ops().iter().find_map(|op| match op {
        DrawOp::Text { text, y, .. } if text == needle => Some(*y),
        _ => None,
    })
}

#[test]
fn via_garibaldi_end_to_end() {
    let report = generator().compose(&sample::via_garibaldi());
    let pages = report.canvas().pages();
    let total = report.page_count();

    let cover = &pages[0];
    assert!(cover.contains_text("92"), "cover shows the AI score");
    assert!(cover.contains_text("COMPRAR"), "cover shows the recommendation badge");
    assert!(cover.contains_text("€7,000"), "500 sqm at €3,500,000");

    let risks = section_pages(&report, RISKS_AND_OPPORTUNITIES);
    assert!(risks.iter().all(|page| !page.contains_text(SEVERITY_HEADER)));
    assert!(risks
        .iter()
        .any(|page| page.contains_text("No significant risks identified.")));
    assert!(risks.iter().any(|page| page.contains_text("High rental yield")));

    let bullets = risks
        .iter()
        .flat_map(|page| page.ops())
        .filter(|op| matches!(op, DrawOp::Circle { fill, .. } if *fill == style::ACCENT))
        .count();
    assert_eq!(bullets, 1, "one opportunity, one bullet");

    let last = pages.last().expect("at least one page");
    assert!(last.contains_text(&format!("Page {total} of {total}")));
}

#[test]
fn every_section_starts_a_fresh_page() {
    let report = generator().compose(&sample::lisbon_showcase());
    let starts: Vec<usize> = report.sections().iter().map(|s| s.page).collect();

    assert_eq!(starts.len(), 4);
    assert_eq!(starts[0], 1, "the cover occupies exactly one page");
    assert!(starts.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn footers_are_stamped_on_every_page() {
    let report = generator().compose(&sample::lisbon_showcase());
    let total = report.page_count();

    for (index, page) in report.canvas().pages().iter().enumerate() {
        assert!(page.contains_text(&page_label(index, total)), "page {}", index + 1);
        assert!(page.contains_text("GoldenVisa"));
    }
}

#[test]
fn layout_is_idempotent() {
    let generator = generator();
    let input = sample::lisbon_showcase();

    let first = generator.compose(&input);
    let second = generator.compose(&input);

    let footers = |report: &ComposedReport| -> Vec<String> {
        report
            .canvas()
            .pages()
            .iter()
            .flat_map(|page| page.texts().filter(|text| text.starts_with("Page ")))
            .map(str::to_owned)
            .collect()
    };

    assert_eq!(first.page_count(), second.page_count());
    assert_eq!(footers(&first), footers(&second));
    assert_eq!(first, second);
}

#[test]
fn long_reasoning_is_never_clipped() {
    let generator = generator();
    let geometry = generator.config().geometry;

    for words in [0usize, 1, 40, 500] {
        let mut input = sample::via_garibaldi();
        input.analysis.reasoning = (0..words)
            .map(|i| format!("lorem{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let expected = metrics::wrap_text(
            &input.analysis.reasoning,
            geometry.content_width(),
            FontWeight::Regular,
            size::BODY,
        );

        let report = generator.compose(&input);
        let pages = section_pages(&report, EXECUTIVE_SUMMARY);

        let mut rendered = Vec::new();
        for page in pages {
            for op in page.ops() {
                if let DrawOp::Text { text, y, .. } = op {
                    if text.contains("lorem") {
                        assert!(*y <= geometry.bottom(), "line below the bottom margin: {text}");
                        rendered.push(text.clone());
                    }
                }
            }
        }

        assert_eq!(rendered, expected, "{words} words");
        if words == 500 {
            assert!(pages.len() > 1, "500 words spill onto a second page");
        }
    }
}

#[test]
fn null_size_renders_not_available() {
    let mut input = sample::via_garibaldi();
    input.property.total_size_sqm = None;
    input.property.current_value = 0.0;

    let report = generator().render(&input).expect("render without a size");
    assert!(report.page_count >= 5);

    let composed = generator().compose(&input);
    let cover = &composed.canvas().pages()[0];
    let na = cover.texts().filter(|text| *text == "N/A").count();
    assert_eq!(na, 2, "total size and price per sqm");
}

#[test]
fn negative_discount_passes_through() {
    let report = generator().compose(&sample::lisbon_showcase());
    let summary = section_pages(&report, EXECUTIVE_SUMMARY);
    assert!(summary.iter().any(|page| page.contains_text("-4.0%")));
}

#[test]
fn severity_overlay_follows_row_order() {
    let input = sample::lisbon_showcase();
    let report = generator().compose(&input);
    let pages = section_pages(&report, RISKS_AND_OPPORTUNITIES);

    let badges = severity_badges(pages);
    assert_eq!(badges.len(), input.analysis.risks.len());

    for ((page_index, fill, rect, label), risk) in badges.iter().zip(&input.analysis.risks) {
        assert_eq!(*fill, style::severity_color(risk.severity));
        assert_eq!(label, risk.severity.label());

        let kind_y = text_y(&pages[*page_index], &risk.kind).expect("risk type drawn");
        assert!(
            rect.y <= kind_y && kind_y <= rect.y + rect.height,
            "badge for '{}' sits on its own row",
            risk.kind
        );
    }
}

#[test]
fn severity_overlay_survives_table_pagination() {
    let mut input = sample::lisbon_showcase();
    input.analysis.risks = (0..60)
        .map(|i| {
            let severity = match i % 3 {
                0 => Severity::Low,
                1 => Severity::High,
                _ => Severity::Medium,
            };
            Risk::new(format!("Risk {i}"), severity, "Needs a closer look before closing.")
        })
        .collect();

    let report = generator().compose(&input);
    let pages = section_pages(&report, RISKS_AND_OPPORTUNITIES);
    assert!(pages.len() > 1, "sixty risks span several pages");

    let badges = severity_badges(pages);
    for (page_index, ..) in &badges {
        assert!(
            pages[*page_index].contains_text(SEVERITY_HEADER),
            "header repeated on risk page {page_index}"
        );
    }

    let fills: Vec<Color> = badges.into_iter().map(|badge| badge.1).collect();
    let expected: Vec<Color> = input
        .analysis
        .risks
        .iter()
        .map(|risk| style::severity_color(risk.severity))
        .collect();
    assert_eq!(fills, expected);
}

#[test]
fn filename_uses_brand_name_and_date() {
    let report = ReportBuilder::new()
        .with_brand("Acme")
        .with_generated_at(pinned_time())
        .build()
        .render(&sample::via_garibaldi())
        .expect("render sample");

    assert_eq!(
        report.filename,
        "Acme_Property_Report_Via_Garibaldi_Complex_2024-05-17.pdf"
    );
    assert!(report.bytes.starts_with(b"%PDF"));
}

fn render_sample_pdf(input: &ReportInput) -> Vec<u8> {
    generator().render(input).expect("render sample pdf").bytes
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if !data[index..].starts_with(tag) {
                index += 1;
                continue;
            }
            let mut cursor = index + tag.len();
            while cursor < data.len() && data[cursor] != terminator {
                let byte = data[cursor];
                if terminator == b')' || !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                    data[cursor] = b'0';
                }
                cursor += 1;
            }
            index = cursor;
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while let Some(start_pos) = data[offset..]
            .windows(start.len())
            .position(|window| window == start)
        {
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    let literal_tags: [&[u8]; 3] = [b"/CreationDate(", b"/ModDate(", b"/Producer("];
    for tag in literal_tags {
        scrub_segment(&mut normalized, tag, b')');
    }
    scrub_segment(&mut normalized, b"/ID[", b']');
    for tag in [
        "xmp:CreateDate",
        "xmp:ModifyDate",
        "xmp:MetadataDate",
        "xmpMM:DocumentID",
        "xmpMM:InstanceID",
        "xmpMM:VersionID",
    ] {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        scrub_xml(&mut normalized, open.as_bytes(), close.as_bytes());
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn rendering_is_deterministic() {
    let input = sample::lisbon_showcase();
    let bytes_a = render_sample_pdf(&input);
    let bytes_b = render_sample_pdf(&input);

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[cfg(feature = "bookmarks")]
#[test]
fn bookmarks_point_at_section_pages() {
    let report = ReportBuilder::new()
        .with_generated_at(pinned_time())
        .with_bookmarks(true)
        .build()
        .render(&sample::lisbon_showcase())
        .expect("render with bookmarks");

    let document = lopdf::Document::load_mem(&report.bytes).expect("reload pdf");
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(lopdf::Object::as_reference)
        .expect("catalog reference");
    let catalog = document.get_dictionary(catalog_id).expect("catalog");
    assert!(catalog.get(b"Outlines").is_ok());
    assert_eq!(report.sections.len(), 4);
}
