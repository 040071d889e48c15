//! # PDF Serializer
//!
//! Drives a [`PageProvider`] once, page by page, and writes the result as a
//! PDF 1.7 file. We write the raw bytes ourselves: the subset needed here is
//! two standard fonts, one compressed content stream per page and an Info
//! dictionary.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, pages, content streams
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```

mod canvas;

pub use canvas::PdfCanvas;

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::Error;
use crate::provider::PageProvider;
use canvas::{encode_text, BOLD_FONT, REGULAR_FONT};

/// Document-level information recorded in the Info dictionary.
#[derive(Debug, Clone, Default)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
}

impl PdfBuilder {
    /// Append an object and return its id.
    fn add(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }
}

/// Render every page the provider has into one PDF document.
pub fn write_pdf(provider: &dyn PageProvider, metadata: &PdfMetadata) -> Result<Vec<u8>, Error> {
    let size = provider.page_size();

    // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
    let mut builder = PdfBuilder {
        objects: vec![Vec::new(), Vec::new(), Vec::new()],
    };
    let regular = builder.add(standard_font("Helvetica"));
    let bold = builder.add(standard_font("Helvetica-Bold"));
    let resources = format!(
        "/Font << /{} {} 0 R /{} {} 0 R >>",
        REGULAR_FONT, regular, BOLD_FONT, bold
    );

    let mut page_ids = Vec::new();
    let mut page_number = 1;
    while provider.has_page(page_number) {
        let mut canvas = PdfCanvas::new(size.height);
        provider.draw_page(&mut canvas, page_number)?;
        let compressed = compress_to_vec_zlib(canvas.into_content().as_bytes(), 6);

        let mut content: Vec<u8> = Vec::new();
        let _ = write!(
            content,
            "<< /Length {} /Filter /FlateDecode >>\nstream\n",
            compressed.len()
        );
        content.extend_from_slice(&compressed);
        content.extend_from_slice(b"\nendstream");
        let content_id = builder.add(content);

        let page_dict = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Contents {} 0 R /Resources << {} >> >>",
            size.width, size.height, content_id, resources
        );
        page_ids.push(builder.add(page_dict.into_bytes()));
        page_number += 1;
    }

    builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
    let kids: String = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    builder.objects[2] = format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids,
        page_ids.len()
    )
    .into_bytes();

    let info_id = builder.add(info_dictionary(metadata).into_bytes());
    Ok(serialize(&builder, info_id))
}

fn standard_font(base: &str) -> Vec<u8> {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        base
    )
    .into_bytes()
}

fn info_dictionary(metadata: &PdfMetadata) -> String {
    let mut info = String::from("<< ");
    let entries = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
        ("Creator", &metadata.creator),
    ];
    for (name, value) in entries {
        if let Some(value) = value {
            let _ = write!(info, "/{} ({}) ", name, encode_text(value));
        }
    }
    let _ = write!(info, "/Producer (sheetpress {}) >>", env!("CARGO_PKG_VERSION"));
    info
}

fn serialize(builder: &PdfBuilder, info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, data) in builder.objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{} 0 obj\n", i);
        output.extend_from_slice(data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
    let _ = write!(output, "0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{:010} 00000 n \n", offset);
    }

    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        builder.objects.len(),
        info_id,
        xref_offset
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Canvas;
    use crate::style::{Color, Rect, Size};

    struct Blank {
        pages: usize,
    }

    impl PageProvider for Blank {
        fn has_page(&self, n: usize) -> bool {
            n >= 1 && n <= self.pages
        }
        fn page_size(&self) -> Size {
            Size::new(612.0, 792.0)
        }
        fn draw_page(&self, canvas: &mut dyn Canvas, n: usize) -> Result<(), Error> {
            canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
            canvas.text(10.0, 20.0, &format!("page {}", n), 10.0, false, Color::BLACK);
            Ok(())
        }
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn writes_one_page_object_per_page() {
        let bytes = write_pdf(&Blank { pages: 3 }, &PdfMetadata::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert_eq!(count(&bytes, b"/Type /Page "), 3);
        assert_eq!(count(&bytes, b"/Count 3"), 1);
        assert_eq!(count(&bytes, b"/MediaBox [0 0 612.00 792.00]"), 3);
    }

    #[test]
    fn metadata_lands_in_info_dictionary() {
        let metadata = PdfMetadata {
            title: Some("Hero (v2)".into()),
            author: Some("GM".into()),
            subject: Some("Hero (v2)".into()),
            keywords: None,
            creator: None,
        };
        let bytes = write_pdf(&Blank { pages: 1 }, &metadata).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Title (Hero \\(v2\\))"));
        assert!(text.contains("/Author (GM)"));
        assert!(!text.contains("/Keywords"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = write_pdf(&Blank { pages: 2 }, &PdfMetadata::default()).unwrap();
        // The header's binary marker is not UTF-8, so index the raw bytes.
        let marker = bytes.windows(10).rposition(|w| w == b"startxref\n").unwrap();
        let trailer = std::str::from_utf8(&bytes[marker..]).unwrap();
        let xref: usize = trailer.lines().nth(1).unwrap().parse().unwrap();
        assert!(bytes[xref..].starts_with(b"xref\n"));
        let table = std::str::from_utf8(&bytes[xref..]).unwrap();
        let mut lines = table.lines().skip(1);
        let size: usize = lines.next().unwrap()[2..].parse().unwrap();
        assert_eq!(lines.next(), Some("0000000000 65535 f "));
        for id in 1..size {
            let entry = lines.next().unwrap();
            let offset: usize = entry[..10].parse().unwrap();
            let header = format!("{} 0 obj", id);
            assert!(
                bytes[offset..].starts_with(header.as_bytes()),
                "object {} not at offset {}",
                id,
                offset
            );
        }
    }

    #[test]
    fn provider_errors_propagate() {
        struct Broken;
        impl PageProvider for Broken {
            fn has_page(&self, n: usize) -> bool {
                n == 1
            }
            fn page_size(&self) -> Size {
                Size::new(100.0, 100.0)
            }
            fn draw_page(&self, _: &mut dyn Canvas, n: usize) -> Result<(), Error> {
                Err(Error::InvalidPage { page: n, count: 0 })
            }
        }
        assert!(matches!(
            write_pdf(&Broken, &PdfMetadata::default()),
            Err(Error::InvalidPage { .. })
        ));
    }
}
