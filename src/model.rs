//! Data structures describing the input of a property report.
//!
//! The types mirror the JSON records produced by the portal: a property row
//! fetched from the relational store and the analysis object returned by the
//! LLM (or loaded from a cached run).  Field names follow the camelCase wire
//! format so the values can be deserialized directly with `serde_json`.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReportError;

/// Everything the composer needs for one report run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportInput {
    /// Descriptive facts about the asset.
    pub property: Property,
    /// AI-produced assessment of the asset.
    pub analysis: Analysis,
}

impl ReportInput {
    /// Creates a report input from its two halves.
    pub fn new(property: Property, analysis: Analysis) -> Self {
        Self { property, analysis }
    }

    /// Parses a report input from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ReportError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads and parses a report input from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_json_slice(&bytes)
    }
}

/// A property record as stored by the portal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub acquisition_price: f64,
    pub current_value: f64,
    #[serde(default)]
    pub total_size_sqm: Option<f64>,
    #[serde(default)]
    pub total_units: u32,
    #[serde(default)]
    pub status: String,
}

impl Property {
    /// Parses a bare property record from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ReportError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads and parses a bare property record from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_json_slice(&bytes)
    }

    /// Returns the "address, city, country" line, skipping empty parts.
    pub fn location_line(&self) -> String {
        [&self.address, &self.city, &self.country]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The structured assessment produced by the analysis service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub ai_score: f64,
    pub recommendation: Recommendation,
    pub financial_metrics: FinancialMetrics,
    pub location_score: LocationScore,
    #[serde(default)]
    pub risks: Vec<Risk>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    pub comparables: Comparables,
    pub ideal_purchase_price: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    #[serde(rename = "estimatedROI")]
    pub estimated_roi: f64,
    #[serde(rename = "estimatedAppreciation")]
    pub estimated_appreciation: f64,
    #[serde(rename = "estimatedRentalIncome")]
    pub estimated_rental_income: f64,
    #[serde(rename = "capRate")]
    pub cap_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationScore {
    pub score: f64,
    pub proximity: Proximity,
    #[serde(default)]
    pub development: String,
}

/// Distances or short descriptions of nearby amenities.
///
/// The analysis service is inconsistent about whether these are numbers or
/// strings, so both are accepted and kept in their display form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Proximity {
    #[serde(default, deserialize_with = "string_or_number")]
    pub metro: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub schools: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub shopping: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}

impl Risk {
    /// Creates a risk entry.
    pub fn new(
        kind: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            severity,
            description: description.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparables {
    pub average_price_per_sqm: f64,
    pub price_position: PricePosition,
    pub percentage_difference: f64,
}

/// Investment verdict. Serialized with the portal's wire values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "COMPRAR", alias = "BUY", alias = "Buy", alias = "buy")]
    Buy,
    #[serde(rename = "REVISAR", alias = "REVIEW", alias = "Review", alias = "review")]
    Review,
    #[serde(
        rename = "RECHAZAR",
        alias = "REJECT",
        alias = "Reject",
        alias = "reject"
    )]
    Reject,
}

impl Recommendation {
    /// Label printed on the recommendation badge.
    pub fn label(self) -> &'static str {
        match self {
            Self::Buy => "COMPRAR",
            Self::Review => "REVISAR",
            Self::Reject => "RECHAZAR",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(alias = "LOW", alias = "low", alias = "BAJO", alias = "BAJA")]
    Low,
    #[serde(alias = "MEDIUM", alias = "medium", alias = "MEDIO", alias = "MEDIA")]
    Medium,
    #[serde(alias = "HIGH", alias = "high", alias = "ALTO", alias = "ALTA")]
    High,
}

impl Severity {
    /// Label printed on the severity badge.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricePosition {
    #[serde(alias = "BELOW", alias = "below")]
    Below,
    #[serde(alias = "AT", alias = "at")]
    At,
    #[serde(alias = "ABOVE", alias = "above")]
    Above,
}

impl PricePosition {
    /// Label used in the comparables table.
    pub fn label(self) -> &'static str {
        match self {
            Self::Below => "Below market",
            Self::At => "At market",
            Self::Above => "Above market",
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
        Raw::Missing(_) => String::new(),
    })
}
