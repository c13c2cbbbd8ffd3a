//! Seams to the collaborators that supply report inputs.
//!
//! In the portal the analysis comes either from a fresh LLM completion or from
//! a cached earlier run.  The composer does not care which; it only needs an
//! [`AnalysisProvider`].  [`AnalysisCache`] is the in-memory implementation used
//! by the command line tool and the tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::ReportError;
use crate::model::{Analysis, Property, ReportInput};

/// Supplies the analysis for a property.
pub trait AnalysisProvider {
    fn analysis_for(&self, property: &Property) -> Result<Analysis, ReportError>;
}

/// Previously computed analyses keyed by property id.
#[derive(Clone, Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<String, Analysis>,
}

impl AnalysisCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `analysis` for `property_id`, replacing any earlier entry.
    pub fn insert(&mut self, property_id: impl Into<String>, analysis: Analysis) {
        self.entries.insert(property_id.into(), analysis);
    }

    /// Number of cached analyses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the cache holds no analyses.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a JSON object mapping property ids to analyses.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ReportError> {
        Ok(Self {
            entries: serde_json::from_slice(bytes)?,
        })
    }

    /// Reads and parses a cache file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_json_slice(&bytes)
    }
}

impl AnalysisProvider for AnalysisCache {
    fn analysis_for(&self, property: &Property) -> Result<Analysis, ReportError> {
        self.entries
            .get(&property.id)
            .cloned()
            .ok_or_else(|| ReportError::MissingAnalysis {
                property_id: property.id.clone(),
            })
    }
}

/// Pairs a property with the analysis its provider returns.
pub fn assemble_input(
    property: Property,
    provider: &dyn AnalysisProvider,
) -> Result<ReportInput, ReportError> {
    let analysis = provider.analysis_for(&property)?;
    debug!("resolved analysis for property '{}'", property.id);
    Ok(ReportInput::new(property, analysis))
}
