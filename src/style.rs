//! Brand palette and type scale shared by every report.

use crate::model::{Recommendation, Severity};

/// An sRGB colour with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Creates a colour from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `0.0..=1.0`, as PDF colour operators expect.
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

pub const PRIMARY: Color = Color::rgb(30, 58, 95);
pub const ACCENT: Color = Color::rgb(201, 162, 39);
pub const TEXT: Color = Color::rgb(51, 51, 51);
pub const MUTED: Color = Color::rgb(120, 120, 120);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const ROW_STRIPE: Color = Color::rgb(245, 247, 250);
pub const DIVIDER: Color = Color::rgb(200, 200, 200);

pub const SUCCESS: Color = Color::rgb(34, 197, 94);
pub const WARNING: Color = Color::rgb(245, 158, 11);
pub const DANGER: Color = Color::rgb(239, 68, 68);

pub const SCORE_EXCELLENT: Color = Color::rgb(22, 163, 74);
pub const SCORE_GOOD: Color = Color::rgb(101, 163, 13);
pub const SCORE_FAIR: Color = Color::rgb(234, 179, 8);
pub const SCORE_POOR: Color = Color::rgb(220, 38, 38);

pub const SEVERITY_HIGH: Color = Color::rgb(220, 38, 38);
pub const SEVERITY_MEDIUM: Color = Color::rgb(245, 158, 11);
pub const SEVERITY_LOW: Color = Color::rgb(34, 197, 94);

/// Font sizes in points.
pub mod size {
    pub const COVER_TITLE: f64 = 24.0;
    pub const COVER_SUBTITLE: f64 = 12.0;
    pub const PROPERTY_NAME: f64 = 20.0;
    pub const SCORE: f64 = 28.0;
    pub const BADGE: f64 = 14.0;
    pub const SECTION_TITLE: f64 = 16.0;
    pub const SUBHEADING: f64 = 12.0;
    pub const BODY: f64 = 10.0;
    pub const TABLE: f64 = 9.0;
    pub const SMALL: f64 = 8.0;
}

/// Colour of the cover score badge.
pub fn score_color(score: f64) -> Color {
    if score >= 85.0 {
        SCORE_EXCELLENT
    } else if score >= 70.0 {
        SCORE_GOOD
    } else if score >= 50.0 {
        SCORE_FAIR
    } else {
        SCORE_POOR
    }
}

/// Badge colour for a recommendation: buy, review and reject map to success, warning and danger.
pub fn recommendation_color(recommendation: Recommendation) -> Color {
    match recommendation {
        Recommendation::Buy => SUCCESS,
        Recommendation::Review => WARNING,
        Recommendation::Reject => DANGER,
    }
}

/// Overlay colour for a risk severity.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => SEVERITY_HIGH,
        Severity::Medium => SEVERITY_MEDIUM,
        Severity::Low => SEVERITY_LOW,
    }
}
