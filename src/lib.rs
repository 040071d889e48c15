//! # Sheetpress
//!
//! Paginates character and loot sheets into fixed-size pages and exports
//! them as PDF, PNG, JPEG or WEBP.
//!
//! A sheet is a handful of content lists (weapons, skills, traits, notes,
//! equipment...) whose rows wrap to whatever width their column receives.
//! Nothing about the final height is known until text has been measured, so
//! pages are filled by measuring, checking the fit, and cutting sections at
//! row boundaries where they overflow. A section never splits inside a row.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON)
//!       ↓
//!   [model]     - Document: top block, keyed lists, block layout
//!       ↓
//!   [section]   - Registry builds a measurable table per list key
//!       ↓
//!   [layout]    - Row groups packed into pages, cut at row boundaries
//!       ↓
//!   [provider]  - Pages drawn on demand through a Canvas
//!       ↓
//!   [pdf] / [raster]  - PDF bytes, or one bitmap per page
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod provider;
pub mod raster;
pub mod render;
pub mod section;
pub mod style;
pub mod text;

pub use config::ExportSettings;
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use model::{Document, DocumentKind};
pub use provider::{PageProvider, PagedDocument};
pub use render::{LiveTheme, ThemeMode, ThemeService};
pub use section::SectionRegistry;

/// Render a document to PDF bytes with the standard sections and default
/// settings.
pub fn render_pdf(document: &Document) -> Result<Vec<u8>, Error> {
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    Exporter::new(document, ExportSettings::default(), &registry, &theme)?.export_pdf_bytes()
}

/// Render a document described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>, Error> {
    let document = Document::from_json(json)?;
    render_pdf(&document)
}
