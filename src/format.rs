//! Number and filename formatting used throughout the report.

use chrono::NaiveDate;

/// Placeholder printed whenever a value cannot be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Rounds half away from zero to the given number of decimals.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a monetary amount: thousands-grouped, no decimals, e.g. `€1,250,000`.
pub fn currency(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_owned();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{symbol}{}", group_thousands(&digits))
}

/// Formats a percentage with exactly one decimal place, e.g. `6.2%`.
pub fn percent(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_owned();
    }

    let rounded = round_to(value, 1);
    // -0.04 rounds to -0.0, which would print with a stray sign.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.1}%")
}

/// Floor area rounded to whole square metres, e.g. `1,250 sqm`.
pub fn area(sqm: f64) -> String {
    format!("{} sqm", currency(sqm, ""))
}

/// Current value per square metre, or `N/A` when the size is unknown.
pub fn price_per_sqm(current_value: f64, total_size_sqm: Option<f64>, symbol: &str) -> String {
    match total_size_sqm {
        Some(size) if size != 0.0 => currency((current_value / size).round(), symbol),
        _ => NOT_AVAILABLE.to_owned(),
    }
}

/// Raw discount of the ideal purchase price against the current value, in percent.
///
/// Not clamped: an ideal price above the current value yields a negative number.
pub fn discount_ratio(ideal_purchase_price: f64, current_value: f64) -> f64 {
    (1.0 - ideal_purchase_price / current_value) * 100.0
}

/// Formatted suggested discount, e.g. `5.7%` or `-4.0%`.
pub fn suggested_discount(ideal_purchase_price: f64, current_value: f64) -> String {
    percent(discount_ratio(ideal_purchase_price, current_value))
}

/// Score printed on the cover badge.
pub fn score(value: f64) -> String {
    if value.is_finite() {
        format!("{:.0}", value.round())
    } else {
        NOT_AVAILABLE.to_owned()
    }
}

/// Replaces everything but ASCII letters and digits with underscores.
pub fn sanitize_file_component(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

/// Download filename: `<brand>_Property_Report_<name>_<YYYY-MM-DD>.pdf`.
///
/// Brand and name are both sanitized, so the result never contains a path separator.
pub fn report_filename(brand: &str, property_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_Property_Report_{}_{}.pdf",
        sanitize_file_component(brand),
        sanitize_file_component(property_name),
        date.format("%Y-%m-%d")
    )
}
