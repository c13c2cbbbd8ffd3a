//! Core entry point for the property_report crate.
//!
//! Builds paginated PDF investment reports for a property and its AI analysis:
//! [`composer`] lays the report out onto an in-memory [`canvas`], and
//! [`render`] turns the finished pages into PDF bytes.

pub mod builder;
pub mod canvas;
pub mod composer;
pub mod error;
pub mod format;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod render;
pub mod sample;
pub mod source;
pub mod style;
pub mod table;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use builder::{compose, RenderedReport, ReportBuilder, ReportConfig, ReportGenerator};
pub use composer::{ComposedReport, DocumentComposer};
pub use error::ReportError;
pub use model::ReportInput;
