//! Font-free text measurement for the PDF base-14 Helvetica family.
//!
//! The renderer uses the builtin Helvetica fonts, so the advance widths below
//! (taken from the Adobe font metrics, in 1/1000 em) match what a viewer draws.
//! Measuring without loading font files keeps layout deterministic and lets the
//! composer run in tests on machines without any fonts installed.

/// Millimetres per PDF point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

const ELLIPSIS: &str = "...";

/// Width used for characters outside the printable ASCII range.
const FALLBACK_WIDTH: u16 = 556;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

// Advance widths for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn glyph_width(ch: char, weight: FontWeight) -> u16 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    };
    match ch {
        ' '..='~' => table[ch as usize - 0x20],
        '€' => 556,
        '•' => 350,
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in millimetres at `size_pt`.
pub fn text_width(text: &str, weight: FontWeight, size_pt: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(ch, weight))).sum();
    f64::from(units) / 1000.0 * size_pt * MM_PER_PT
}

/// Vertical advance of one line in millimetres at `size_pt`.
pub fn line_height(size_pt: f64) -> f64 {
    size_pt * MM_PER_PT * LINE_HEIGHT_FACTOR
}

/// Splits `text` into lines no wider than `max_width` millimetres.
///
/// Explicit newlines start a new line, words are packed greedily and a word
/// wider than the whole line is broken between characters.  Blank input yields
/// no lines at all.
pub fn wrap_text(text: &str, max_width: f64, weight: FontWeight, size_pt: f64) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let space = text_width(" ", weight, size_pt);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = text_width(word, weight, size_pt);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let (mut pieces, rest) = break_word(word, max_width, weight, size_pt);
                lines.append(&mut pieces);
                current_width = text_width(&rest, weight, size_pt);
                current = rest;
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
                current_width = word_width;
            }
        }

        lines.push(current);
    }

    lines
}

/// Keeps at most `max_lines` of `lines`.  When lines are dropped, the last
/// kept line is shortened until it fits `max_width` with a trailing "...".
pub fn truncate_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    max_width: f64,
    weight: FontWeight,
    size_pt: f64,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let mut kept = last.trim_end().to_owned();
        while !kept.is_empty() && text_width(&format!("{kept}{ELLIPSIS}"), weight, size_pt) > max_width {
            kept.pop();
        }
        *last = format!("{}{ELLIPSIS}", kept.trim_end());
    }
    lines
}

/// Breaks an over-long word into full-width pieces plus a trailing remainder.
fn break_word(
    word: &str,
    max_width: f64,
    weight: FontWeight,
    size_pt: f64,
) -> (Vec<String>, String) {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;

    for ch in word.chars() {
        let ch_width = f64::from(glyph_width(ch, weight)) / 1000.0 * size_pt * MM_PER_PT;
        if width + ch_width > max_width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(ch);
        width += ch_width;
    }

    (pieces, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_known_glyphs() {
        // "Hi" = 722 + 222 units; at 10pt that is 9.44pt.
        let width = text_width("Hi", FontWeight::Regular, 10.0);
        assert!((width - 9.44 * MM_PER_PT).abs() < 1e-9);
        assert!(text_width("Hi", FontWeight::Bold, 10.0) > width);
    }

    #[test]
    fn blank_text_has_no_lines() {
        assert!(wrap_text("", 50.0, FontWeight::Regular, 10.0).is_empty());
        assert!(wrap_text(" \n  ", 50.0, FontWeight::Regular, 10.0).is_empty());
    }

    #[test]
    fn wrapped_lines_fit_and_keep_every_word() {
        let text = "The asset sits in a prime district with strong rental demand and limited new supply";
        let lines = wrap_text(text, 40.0, FontWeight::Regular, 10.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, FontWeight::Regular, 10.0) <= 40.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn keeps_explicit_line_breaks() {
        let lines = wrap_text("first\n\nthird", 100.0, FontWeight::Regular, 10.0);
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn breaks_words_longer_than_the_line() {
        let word = "x".repeat(200);
        let lines = wrap_text(&word, 30.0, FontWeight::Regular, 10.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(text_width(line, FontWeight::Regular, 10.0) <= 30.0);
        }
    }

    #[test]
    fn truncation_marks_dropped_text() {
        let text = "Residenza ".repeat(40);
        let lines = wrap_text(&text, 60.0, FontWeight::Bold, 20.0);
        assert!(lines.len() > 3);

        let kept = truncate_lines(lines, 3, 60.0, FontWeight::Bold, 20.0);
        assert_eq!(kept.len(), 3);
        assert!(kept[2].ends_with("..."));
        assert!(text_width(&kept[2], FontWeight::Bold, 20.0) <= 60.0);

        let short = vec!["one".to_owned()];
        assert_eq!(truncate_lines(short.clone(), 3, 60.0, FontWeight::Bold, 20.0), short);
    }
}
