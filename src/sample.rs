//! Ready-made report inputs for demos and smoke tests.

use crate::model::{
    Analysis, Comparables, FinancialMetrics, LocationScore, PricePosition, Property, Proximity,
    Recommendation, ReportInput, Risk, Severity,
};

/// The Milan residential complex used throughout the documentation.
///
/// It has no risks and a single opportunity, which exercises the empty-table path.
pub fn via_garibaldi() -> ReportInput {
    let property = Property {
        id: "via-garibaldi".to_owned(),
        name: "Via Garibaldi Complex".to_owned(),
        address: "Via Garibaldi 24".to_owned(),
        city: "Milano".to_owned(),
        country: "Italy".to_owned(),
        acquisition_price: 3_100_000.0,
        current_value: 3_500_000.0,
        total_size_sqm: Some(500.0),
        total_units: 12,
        status: "Active".to_owned(),
    };

    let analysis = Analysis {
        ai_score: 92.0,
        recommendation: Recommendation::Buy,
        financial_metrics: FinancialMetrics {
            estimated_roi: 6.2,
            estimated_appreciation: 4.5,
            estimated_rental_income: 196_000.0,
            cap_rate: 5.6,
        },
        location_score: LocationScore {
            score: 88.0,
            proximity: Proximity {
                metro: "Garibaldi FS, 250 m".to_owned(),
                schools: "3 within 1 km".to_owned(),
                shopping: "Corso Como, 400 m".to_owned(),
            },
            development: "Porta Nuova regeneration continues to attract offices and premium retail."
                .to_owned(),
        },
        risks: Vec::new(),
        opportunities: vec!["High rental yield".to_owned()],
        comparables: Comparables {
            average_price_per_sqm: 7_400.0,
            price_position: PricePosition::Below,
            percentage_difference: -5.4,
        },
        ideal_purchase_price: 3_300_000.0,
        reasoning: "Strong transport links and sustained rental demand from corporate tenants \
                    support the valuation. The asset trades below comparable properties in the \
                    district, leaving room for appreciation."
            .to_owned(),
    };

    ReportInput::new(property, analysis)
}

/// A fuller input with several risks and opportunities.
pub fn lisbon_showcase() -> ReportInput {
    let property = Property {
        id: "alfama-lofts".to_owned(),
        name: "Alfama Riverside Lofts".to_owned(),
        address: "Rua dos Remédios 87".to_owned(),
        city: "Lisboa".to_owned(),
        country: "Portugal".to_owned(),
        acquisition_price: 1_850_000.0,
        current_value: 2_050_000.0,
        total_size_sqm: None,
        total_units: 8,
        status: "Under review".to_owned(),
    };

    let analysis = Analysis {
        ai_score: 68.0,
        recommendation: Recommendation::Review,
        financial_metrics: FinancialMetrics {
            estimated_roi: 5.25,
            estimated_appreciation: 3.8,
            estimated_rental_income: 98_500.0,
            cap_rate: 4.8,
        },
        location_score: LocationScore {
            score: 74.0,
            proximity: Proximity {
                metro: "Santa Apolónia, 600 m".to_owned(),
                schools: "1 within 1 km".to_owned(),
                shopping: String::new(),
            },
            development: "Riverfront promenade works are scheduled for completion next year."
                .to_owned(),
        },
        risks: vec![
            Risk::new(
                "Regulatory",
                Severity::Medium,
                "Short-term rental licences are capped in the historic centre.",
            ),
            Risk::new(
                "Structural",
                Severity::High,
                "Pre-1755 masonry requires a seismic retrofit survey before purchase.",
            ),
            Risk::new("Market", Severity::Low, "Demand is resilient across cycles."),
        ],
        opportunities: vec![
            "Convert the ground floor into a boutique retail unit.".to_owned(),
            "Golden Visa eligible investment threshold is met.".to_owned(),
        ],
        comparables: Comparables {
            average_price_per_sqm: 6_200.0,
            price_position: PricePosition::Above,
            percentage_difference: 3.1,
        },
        ideal_purchase_price: 2_132_000.0,
        reasoning: "Attractive location with regulatory and structural uncertainty.".to_owned(),
    };

    ReportInput::new(property, analysis)
}
