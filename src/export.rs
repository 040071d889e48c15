//! # Export
//!
//! Paginates a document once, then writes the pages out as one PDF or as
//! one image file per page. Every export forces the light theme for its
//! duration and restores whatever mode was active afterwards, however the
//! export ends.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use crate::config::ExportSettings;
use crate::error::Error;
use crate::layout::{Footer, LayoutContext, PageTemplate, Paginator, TopPanel};
use crate::model::Document;
use crate::pdf::{self, PdfMetadata};
use crate::provider::{PageProvider, PagedDocument};
use crate::raster::{JpegOutput, PngOutput, RasterCanvas, RasterEncoder, WebpOutput};
use crate::render::{ThemeOverride, ThemeService};
use crate::section::SectionRegistry;

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "webp" => Ok(ExportFormat::Webp),
            other => Err(Error::Config(format!("unknown export format '{}'", other))),
        }
    }
}

pub struct Exporter<'t> {
    document: PagedDocument,
    metadata: PdfMetadata,
    settings: ExportSettings,
    theme: &'t dyn ThemeService,
}

impl<'t> Exporter<'t> {
    /// Paginate `doc` with the sections `registry` builds. Out-of-range
    /// settings are reset to their defaults first.
    ///
    /// Fails on an unusable page size or a layout naming an unknown section.
    pub fn new(
        doc: &Document,
        mut settings: ExportSettings,
        registry: &SectionRegistry,
        theme: &'t dyn ThemeService,
    ) -> Result<Self, Error> {
        settings.normalize();
        let size = settings.page.dimensions()?;
        let ctx = LayoutContext::new(&settings);
        let footer = Footer {
            left: doc.title().to_string(),
            center: doc.footer.clone(),
        };
        let template = PageTemplate::new(size, settings.page.margins).with_footer(footer, &ctx);

        let start = Instant::now();
        let pages = Paginator::new(template, registry, ctx.clone())
            .paginate_document(doc, Some(TopPanel::new(doc.top.clone())))?;
        log::info!(
            "paginated '{}' into {} pages in {:.1}ms",
            doc.title(),
            pages.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        let metadata = PdfMetadata {
            title: Some(doc.title().to_string()).filter(|t| !t.is_empty()),
            author: doc.metadata.author.clone(),
            subject: doc.metadata.subject.clone(),
            keywords: doc.metadata.keywords.clone(),
            creator: Some("sheetpress".to_string()),
        };

        Ok(Self {
            document: PagedDocument::new(pages, size, ctx),
            metadata,
            settings,
            theme,
        })
    }

    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }

    pub fn document(&self) -> &PagedDocument {
        &self.document
    }

    /// Run `f` against the pages with the light palette in force.
    fn with_light_theme<T>(
        &mut self,
        f: impl FnOnce(&PagedDocument) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let theme = self.theme;
        let guard = ThemeOverride::light(theme);
        self.document.set_palette(guard.palette());
        f(&self.document)
    }

    pub fn export_pdf_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let metadata = self.metadata.clone();
        let start = Instant::now();
        let bytes = self.with_light_theme(|doc| pdf::write_pdf(doc, &metadata))?;
        log::info!(
            "wrote {} pdf pages ({} bytes) in {:.1}ms",
            self.page_count(),
            bytes.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(bytes)
    }

    /// Write the PDF to `path`, removing any file already there first.
    pub fn export_pdf_file(&mut self, path: &Path) -> Result<(), Error> {
        remove_stale(path)?;
        let bytes = self.export_pdf_bytes()?;
        fs::write(path, bytes).map_err(|e| Error::io(path, e))
    }

    /// Render every page and write it as `<base>-<n>.<ext>`.
    ///
    /// The first page that fails to encode or write aborts the export.
    pub fn export_images(
        &mut self,
        base: &Path,
        encoder: &dyn RasterEncoder,
    ) -> Result<Vec<PathBuf>, Error> {
        let dpi = self.settings.image_resolution;
        let start = Instant::now();
        let written = self.with_light_theme(|doc| {
            let mut written = Vec::new();
            let mut n = 1;
            while doc.has_page(n) {
                let mut canvas = RasterCanvas::new(doc.page_size(), dpi);
                doc.draw_page(&mut canvas, n)?;
                let bytes = encoder.encode(canvas.image())?;
                let path = page_file_name(base, n, encoder.extension());
                fs::write(&path, bytes).map_err(|e| Error::io(&path, e))?;
                log::debug!("wrote {}", path.display());
                written.push(path);
                n += 1;
            }
            Ok(written)
        })?;
        log::info!(
            "wrote {} {} pages at {} dpi in {:.1}ms",
            written.len(),
            encoder.extension(),
            dpi,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(written)
    }

    pub fn export_pngs(&mut self, base: &Path) -> Result<Vec<PathBuf>, Error> {
        let encoder = PngOutput {
            compression: self.settings.png_compression,
        };
        self.export_images(base, &encoder)
    }

    pub fn export_jpegs(&mut self, base: &Path) -> Result<Vec<PathBuf>, Error> {
        let encoder = JpegOutput {
            quality: self.settings.jpeg_quality,
        };
        self.export_images(base, &encoder)
    }

    pub fn export_webps(&mut self, base: &Path) -> Result<Vec<PathBuf>, Error> {
        self.export_images(base, &WebpOutput)
    }

    /// Export in `format`, returning the files written.
    pub fn export(&mut self, format: ExportFormat, path: &Path) -> Result<Vec<PathBuf>, Error> {
        match format {
            ExportFormat::Pdf => {
                self.export_pdf_file(path)?;
                Ok(vec![path.to_path_buf()])
            }
            ExportFormat::Png => self.export_pngs(path),
            ExportFormat::Jpeg => self.export_jpegs(path),
            ExportFormat::Webp => self.export_webps(path),
        }
    }
}

fn remove_stale(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// `<base>-<n>.<ext>`, with any extension already on `base` dropped.
pub fn page_file_name(base: &Path, page_number: usize, extension: &str) -> PathBuf {
    let mut name = base.with_extension("").into_os_string();
    name.push(format!("-{}.{}", page_number, extension));
    PathBuf::from(name)
}
