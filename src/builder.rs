//! Report construction entry points for the property_report crate.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::info;

use crate::composer::{ComposedReport, DocumentComposer, SectionStart};
use crate::error::ReportError;
use crate::format;
use crate::layout::PageGeometry;
use crate::model::ReportInput;
use crate::render;

/// Brand printed in footers and used as the download filename prefix.
pub const DEFAULT_BRAND: &str = "GoldenVisa";
pub const DEFAULT_TITLE: &str = "Property Investment Report";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "€";

const BRAND_ENV: &str = "PROPERTY_REPORT_BRAND";
const CURRENCY_ENV: &str = "PROPERTY_REPORT_CURRENCY";

/// Settings shared by every report a generator produces.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub brand: String,
    pub title: String,
    pub currency_symbol: String,
    /// Fixed cover timestamp; `None` stamps the local time of each render.
    pub generated_at: Option<NaiveDateTime>,
    /// Adds a PDF outline entry per section (requires the `bookmarks` feature).
    pub bookmarks: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::A4,
            brand: DEFAULT_BRAND.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
            generated_at: None,
            bookmarks: false,
        }
    }
}

fn env_value(var: &str) -> Option<String> {
    env::var(var).ok().and_then(|value| {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_owned())
        }
    })
}

impl ReportConfig {
    /// Defaults overridden by `PROPERTY_REPORT_BRAND` and `PROPERTY_REPORT_CURRENCY` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(brand) = env_value(BRAND_ENV) {
            config.brand = brand;
        }
        if let Some(symbol) = env_value(CURRENCY_ENV) {
            config.currency_symbol = symbol;
        }
        config
    }
}

/// Builder for [`ReportGenerator`] instances pre-configured with the crate defaults.
#[derive(Default)]
pub struct ReportBuilder {
    config: ReportConfig,
}

impl ReportBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration, e.g. [`ReportConfig::from_env`].
    pub fn from_config(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Sets the page size and margin used for every page.
    pub fn with_page_geometry(mut self, geometry: PageGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    /// Sets the brand printed on the cover, in footers and in the filename.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.config.brand = brand.into();
        self
    }

    /// Sets the cover title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Sets the symbol placed before currency amounts.
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.config.currency_symbol = symbol.into();
        self
    }

    /// Pins the cover timestamp, which makes repeated renders byte-comparable.
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.config.generated_at = Some(generated_at);
        self
    }

    /// Enables section bookmarks in the rendered PDF.
    #[cfg(feature = "bookmarks")]
    pub fn with_bookmarks(mut self, bookmarks: bool) -> Self {
        self.config.bookmarks = bookmarks;
        self
    }

    /// Finishes configuration.
    pub fn build(self) -> ReportGenerator {
        ReportGenerator {
            config: self.config,
        }
    }
}

/// Produces reports; holds no per-report state, so one instance can serve
/// any number of concurrent requests.
#[derive(Clone, Debug, Default)]
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Creates a generator from a finished configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// The configuration every report is built with.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Lays out the report without touching the PDF library.
    pub fn compose(&self, input: &ReportInput) -> ComposedReport {
        DocumentComposer::new(&self.config).compose(input)
    }

    /// Lays out and renders the report to PDF bytes.
    pub fn render(&self, input: &ReportInput) -> Result<RenderedReport, ReportError> {
        let composed = self.compose(input);
        let title = format!("{} - {}", self.config.title, input.property.name);
        let bytes = render::render_pdf(&composed, &title)?;
        let bytes = self.apply_bookmarks(bytes, composed.sections())?;

        let filename = format::report_filename(
            &self.config.brand,
            &input.property.name,
            composed.generated_at().date(),
        );
        info!(
            "rendered {} ({} pages, {} bytes)",
            filename,
            composed.page_count(),
            bytes.len()
        );

        Ok(RenderedReport {
            bytes,
            page_count: composed.page_count(),
            filename,
            sections: composed.sections().to_vec(),
        })
    }

    #[cfg(feature = "bookmarks")]
    fn apply_bookmarks(
        &self,
        bytes: Vec<u8>,
        sections: &[SectionStart],
    ) -> Result<Vec<u8>, ReportError> {
        if !self.config.bookmarks {
            return Ok(bytes);
        }
        Ok(crate::bookmarks::apply_section_bookmarks(&bytes, sections)?)
    }

    #[cfg(not(feature = "bookmarks"))]
    fn apply_bookmarks(
        &self,
        bytes: Vec<u8>,
        _sections: &[SectionStart],
    ) -> Result<Vec<u8>, ReportError> {
        if self.config.bookmarks {
            log::warn!("bookmarks requested but the `bookmarks` feature is disabled; skipping");
        }
        Ok(bytes)
    }
}

/// A finished PDF together with the metadata callers need to deliver it.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Suggested download name, `<brand>_Property_Report_<name>_<date>.pdf`.
    pub filename: String,
    pub sections: Vec<SectionStart>,
}

impl RenderedReport {
    /// Writes the PDF into `dir` under its download filename and returns the path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Convenience wrapper: renders `input` with the default configuration.
pub fn compose(input: &ReportInput) -> Result<Vec<u8>, ReportError> {
    Ok(ReportGenerator::default().render(input)?.bytes)
}
