//! Integration tests for the sheetpress export pipeline.
//!
//! These tests exercise the full path from a document to pages and files.
//! They verify:
//! - Rows are partitioned across pages with no gaps, overlaps or reordering
//! - Pagination terminates on rows taller than a page
//! - Row groups that cannot start on a page move whole to the next one
//! - Page numbering is stable and out-of-range pages draw nothing
//! - Exports render light and leave the live theme as they found it
//! - PDF and image files land where they should

use std::cell::Cell;
use std::fs;
use std::ops::Range;

use sheetpress::config::ExportSettings;
use sheetpress::layout::{LayoutContext, Page, PageTemplate, Paginator};
use sheetpress::model::{keys, Column, Document, DocumentKind, Field, ListData, Row};
use sheetpress::raster::RasterEncoder;
use sheetpress::render::{Canvas, LiveTheme, Palette, RecordingCanvas, ThemeMode, ThemeService};
use sheetpress::section::{Section, SectionRegistry};
use sheetpress::style::{Edges, Rect, Size};
use sheetpress::{Error, ExportFormat, Exporter, PageProvider};

// ─── Helpers ────────────────────────────────────────────────────

fn list(title: &str, columns: &[&str], rows: usize) -> ListData {
    ListData {
        title: title.to_string(),
        columns: columns.iter().map(|c| Column::new(*c, 1.0)).collect(),
        rows: (0..rows)
            .map(|i| Row::new(columns.iter().map(|c| format!("{} {}", c, i))))
            .collect(),
    }
}

fn big_sheet() -> Document {
    let mut doc = Document::new(DocumentKind::Sheet);
    doc.metadata.title = Some("Mira Vance".into());
    doc.top.title = "Mira Vance".into();
    doc.top.fields = vec![
        Field::new("Player", "Player One"),
        Field::new("ST", "10"),
        Field::new("DX", "13"),
        Field::new("IQ", "12"),
    ];
    doc.lists.insert(keys::TRAITS.into(), list("Traits", &["Trait", "Points"], 150));
    doc.lists.insert(keys::SKILLS.into(), list("Skills", &["Skill", "Level"], 220));
    doc.lists.insert(keys::MELEE.into(), list("Melee", &["Weapon", "Damage"], 12));
    doc.lists.insert(keys::NOTES.into(), list("Notes", &["Note"], 90));
    doc
}

fn small_sheet() -> Document {
    let mut doc = Document::new(DocumentKind::Sheet);
    doc.top.title = "Small".into();
    doc.lists.insert(keys::SKILLS.into(), list("Skills", &["Skill", "Level"], 3));
    doc
}

/// Every draw range of `key`, in page order, with the page it sits on.
fn ranges(pages: &[Page], key: &str) -> Vec<(usize, Range<usize>)> {
    pages
        .iter()
        .enumerate()
        .flat_map(|(n, page)| {
            page.groups()
                .iter()
                .flat_map(|g| g.members())
                .filter(|m| m.key() == key)
                .map(move |m| (n, m.draw_range()))
        })
        .collect()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.starts_with(b"%PDF-1.7"), "missing PDF header");
    assert!(bytes.ends_with(b"%%EOF\n"), "missing EOF marker");
    let text = String::from_utf8_lossy(bytes);
    assert!(text.contains("/Type /Catalog"));
    assert!(text.contains("xref\n"));
    assert!(text.contains("startxref"));
}

fn page_objects(bytes: &[u8]) -> usize {
    let needle = b"/Type /Page ";
    bytes.windows(needle.len()).filter(|w| *w == needle).count()
}

/// A section with fixed heights, for scenarios stated in points.
struct Fixed {
    key: String,
    overhead: f64,
    heights: Vec<f64>,
    range: Range<usize>,
}

impl Section for Fixed {
    fn key(&self) -> &str {
        &self.key
    }
    fn row_count(&self) -> usize {
        self.heights.len()
    }
    fn layout(&mut self, _width: f64, _ctx: &LayoutContext) {}
    fn overhead_height(&self) -> f64 {
        self.overhead
    }
    fn row_heights(&self) -> &[f64] {
        &self.heights
    }
    fn draw_range(&self) -> Range<usize> {
        self.range.clone()
    }
    fn set_draw_range(&mut self, range: Range<usize>) {
        self.range = range;
    }
    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect, _: &LayoutContext, palette: &Palette) {
        canvas.stroke_rect(rect, 1.0, palette.border);
    }
}

fn fixed_registry(sections: &[(&'static str, f64, Vec<f64>)]) -> SectionRegistry {
    let mut registry = SectionRegistry::new();
    for (key, overhead, heights) in sections {
        let (key, overhead, heights) = (*key, *overhead, heights.clone());
        registry.register(key, move |_| {
            Some(Box::new(Fixed {
                key: key.to_string(),
                overhead,
                heights: heights.clone(),
                range: 0..heights.len(),
            }) as Box<dyn Section>)
        });
    }
    registry
}

fn paginate_fixed(registry: &SectionRegistry, sets: &[&[&str]], content_height: f64) -> Vec<Page> {
    let template = PageTemplate::new(Size::new(300.0, content_height), Edges::default());
    let ctx = LayoutContext::new(&ExportSettings::default());
    let sets: Vec<Vec<String>> = sets
        .iter()
        .map(|s| s.iter().map(|k| k.to_string()).collect())
        .collect();
    Paginator::new(template, registry, ctx)
        .paginate(&Document::new(DocumentKind::Sheet), &sets, None)
        .unwrap()
}

// ─── Partition and monotonicity ─────────────────────────────────

#[test]
fn test_rows_partition_across_pages() {
    let doc = big_sheet();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let pages = exporter.document().pages();
    assert!(pages.len() > 2, "expected a multi-page export, got {}", pages.len());

    for key in [keys::TRAITS, keys::SKILLS, keys::MELEE, keys::NOTES] {
        let count = doc.list(key).map(|l| l.rows.len()).unwrap_or(0);
        let mut next = 0;
        for (_, range) in ranges(pages, key) {
            assert_eq!(range.start, next, "gap or overlap in '{}'", key);
            assert!(range.end > range.start, "empty slice of '{}'", key);
            next = range.end;
        }
        assert_eq!(next, count, "'{}' not fully placed", key);
    }
}

#[test]
fn test_resume_points_advance_every_page() {
    let doc = big_sheet();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let pages = exporter.document().pages();

    for key in [keys::TRAITS, keys::SKILLS, keys::NOTES] {
        let placed = ranges(pages, key);
        assert!(placed.len() > 1, "'{}' should span pages", key);
        for pair in placed.windows(2) {
            let ((page_a, a), (page_b, b)) = (&pair[0], &pair[1]);
            assert!(page_b > page_a, "'{}' placed twice on one page", key);
            assert!(b.start > a.start, "'{}' went backwards", key);
        }
    }
}

#[test]
fn test_pages_never_exceed_content_height_without_oversized_rows() {
    let doc = big_sheet();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    for (n, page) in exporter.document().pages().iter().enumerate() {
        assert!(page.fits(), "page {} overflows", n + 1);
    }
}

// ─── Termination and minimum fit ────────────────────────────────

#[test]
fn test_oversized_row_still_terminates() {
    let mut doc = Document::new(DocumentKind::Sheet);
    let huge = "word ".repeat(6000);
    doc.lists.insert(
        keys::NOTES.into(),
        ListData {
            title: "Notes".into(),
            columns: vec![],
            rows: vec![Row::new(["short"]), Row::new([huge]), Row::new(["short"])],
        },
    );
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let pages = exporter.document().pages();

    let placed: Vec<Range<usize>> = ranges(pages, keys::NOTES)
        .into_iter()
        .map(|(_, r)| r)
        .collect();
    assert_eq!(placed, vec![0..1, 1..2, 2..3]);
    assert_eq!(pages.len(), 3);
}

#[test]
fn test_group_below_minimum_moves_to_next_page() {
    let registry = fixed_registry(&[
        ("melee", 20.0, vec![100.0, 100.0]),
        ("traits", 10.0, vec![20.0, 20.0, 20.0]),
        ("skills", 30.0, vec![25.0, 25.0]),
    ]);
    // melee takes 220pt; 250 - 221 leaves 29pt, below both traits (30) and
    // skills (55) minimums.
    let pages = paginate_fixed(&registry, &[&["melee"], &["traits", "skills"]], 250.0);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].groups().len(), 1);
    assert!(ranges(&pages[..1], "traits").is_empty());
    assert_eq!(ranges(&pages, "traits"), vec![(1, 0..3)]);
    assert_eq!(ranges(&pages, "skills"), vec![(1, 0..2)]);
}

#[test]
fn test_group_above_minimum_is_cut_in_place() {
    let registry = fixed_registry(&[
        ("melee", 20.0, vec![100.0]),
        ("notes", 10.0, vec![50.0, 50.0, 50.0]),
    ]);
    // 250 - 121 leaves 129pt: notes header plus two rows.
    let pages = paginate_fixed(&registry, &[&["melee"], &["notes"]], 250.0);
    assert_eq!(ranges(&pages, "notes"), vec![(0, 0..2), (1, 2..3)]);
}

#[test]
fn test_four_hundred_point_rows_split_two_and_two() {
    let registry = fixed_registry(&[("notes", 20.0, vec![100.0, 100.0, 100.0, 100.0])]);
    let pages = paginate_fixed(&registry, &[&["notes"]], 250.0);
    assert_eq!(pages.len(), 2);
    assert_eq!(ranges(&pages, "notes"), vec![(0, 0..2), (1, 2..4)]);
}

#[test]
fn test_unknown_column_set_key_is_config_error() {
    let registry = SectionRegistry::standard();
    let template = PageTemplate::new(Size::new(612.0, 792.0), Edges::uniform(18.0));
    let ctx = LayoutContext::new(&ExportSettings::default());
    let result = Paginator::new(template, &registry, ctx).paginate(
        &small_sheet(),
        &[vec!["skills".into(), "portrait".into()]],
        None,
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

// ─── Page provider ──────────────────────────────────────────────

#[test]
fn test_has_page_matches_count_and_is_stable() {
    let doc = big_sheet();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let provider = exporter.document();
    let count = provider.page_count();

    assert!(!provider.has_page(0));
    for n in 1..=count {
        assert!(provider.has_page(n));
        let mut canvas = RecordingCanvas::new();
        provider.draw_page(&mut canvas, n).unwrap();
        assert!(!canvas.ops.is_empty());
    }
    assert!(!provider.has_page(count + 1));
    assert_eq!(provider.page_count(), count);
}

#[test]
fn test_invalid_pages_draw_nothing() {
    let doc = small_sheet();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let provider = exporter.document();
    let count = provider.page_count();

    for n in [0, count + 1] {
        let mut canvas = RecordingCanvas::new();
        let result = provider.draw_page(&mut canvas, n);
        assert!(
            matches!(result, Err(Error::InvalidPage { page, count: c }) if page == n && c == count),
            "page {} should be rejected",
            n
        );
        assert!(canvas.ops.is_empty());
    }
}

#[test]
fn test_footer_numbers_every_page() {
    let mut doc = big_sheet();
    doc.footer = Some("Modified 2026-10-16".into());
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let provider = exporter.document();
    let count = provider.page_count();

    for n in 1..=count {
        let mut canvas = RecordingCanvas::new();
        provider.draw_page(&mut canvas, n).unwrap();
        let texts = canvas.texts();
        assert!(texts.contains(&format!("Page {} of {}", n, count).as_str()));
        assert!(texts.contains(&"Modified 2026-10-16"));
        assert!(texts.contains(&"Mira Vance"));
    }
}

#[test]
fn test_top_block_only_on_first_page() {
    let doc = big_sheet();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let provider = exporter.document();

    let mut first = RecordingCanvas::new();
    provider.draw_page(&mut first, 1).unwrap();
    assert!(first.texts().contains(&"Player One"));

    let mut second = RecordingCanvas::new();
    provider.draw_page(&mut second, 2).unwrap();
    assert!(!second.texts().contains(&"Player One"));
}

// ─── Document kinds ─────────────────────────────────────────────

#[test]
fn test_loot_sheets_skip_combat_lists() {
    let mut doc = Document::new(DocumentKind::Loot);
    doc.lists.insert(keys::MELEE.into(), list("Melee Weapons", &["Weapon"], 2));
    doc.lists.insert(keys::EQUIPMENT.into(), list("Carried Equipment", &["Item"], 2));
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();

    let mut canvas = RecordingCanvas::new();
    exporter.document().draw_page(&mut canvas, 1).unwrap();
    let texts = canvas.texts();
    assert!(texts.contains(&"Carried Equipment"));
    assert!(!texts.contains(&"Melee Weapons"));

    doc.kind = DocumentKind::Sheet;
    let exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let mut canvas = RecordingCanvas::new();
    exporter.document().draw_page(&mut canvas, 1).unwrap();
    assert!(canvas.texts().contains(&"Melee Weapons"));
}

#[test]
fn test_json_document_renders() {
    let json = r#"{
        "kind": "loot",
        "metadata": { "title": "Dragon Hoard", "author": "GM" },
        "top": { "title": "Dragon Hoard", "fields": [ { "label": "Location", "value": "Cave" } ] },
        "lists": { "equipment": { "columns": [ { "title": "Item" } ], "rows": [ { "cells": ["Gold"] } ] } }
    }"#;
    let bytes = sheetpress::render_json(json).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(page_objects(&bytes), 1);
    assert!(String::from_utf8_lossy(&bytes).contains("/Title (Dragon Hoard)"));
}

// ─── Export ─────────────────────────────────────────────────────

#[test]
fn test_pdf_has_one_page_object_per_page() {
    let doc = big_sheet();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let mut exporter = Exporter::new(&doc, ExportSettings::default(), &registry, &theme).unwrap();
    let count = exporter.page_count();
    let bytes = exporter.export_pdf_bytes().unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(page_objects(&bytes), count);
    assert!(String::from_utf8_lossy(&bytes).contains(&format!("/Count {}", count)));
}

#[test]
fn test_pdf_replaces_stale_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hero.pdf");
    fs::write(&path, b"stale contents that are not a pdf").unwrap();

    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let mut exporter =
        Exporter::new(&small_sheet(), ExportSettings::default(), &registry, &theme).unwrap();
    exporter.export_pdf_file(&path).unwrap();
    assert_valid_pdf(&fs::read(&path).unwrap());
}

#[test]
fn test_raster_files_are_numbered_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = ExportSettings::default();
    settings.image_resolution = 50;
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let mut exporter = Exporter::new(&big_sheet(), settings, &registry, &theme).unwrap();
    let count = exporter.page_count();

    let written = exporter
        .export(ExportFormat::Jpeg, &dir.path().join("hero.jpeg"))
        .unwrap();
    assert_eq!(written.len(), count);
    for n in 1..=count {
        let path = dir.path().join(format!("hero-{}.jpeg", n));
        assert!(path.exists(), "{} missing", path.display());
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (425, 550));
    }
    assert!(!dir.path().join("hero.jpeg").exists());
}

#[test]
fn test_out_of_range_resolution_renders_at_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = ExportSettings::default();
    settings.image_resolution = 0;
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let mut exporter = Exporter::new(&small_sheet(), settings, &registry, &theme).unwrap();

    let written = exporter.export_pngs(&dir.path().join("hero")).unwrap();
    let img = image::open(&written[0]).unwrap();
    // Letter at 200 dpi.
    assert_eq!((img.width(), img.height()), (1700, 2200));
}

#[test]
fn test_dark_theme_exports_light_and_is_restored() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = ExportSettings::default();
    settings.image_resolution = 50;
    let theme = LiveTheme::new(ThemeMode::Dark);
    let registry = SectionRegistry::standard();
    let mut exporter = Exporter::new(&small_sheet(), settings, &registry, &theme).unwrap();

    let written = exporter.export_pngs(&dir.path().join("hero")).unwrap();
    assert_eq!(theme.mode(), ThemeMode::Dark);

    let img = image::open(&written[0]).unwrap().to_rgba8();
    let [r, g, b] = Palette::for_mode(ThemeMode::Light).page.to_rgb8();
    assert_eq!(img.get_pixel(0, 0).0, [r, g, b, 255]);
}

/// Fails every page, recording the theme mode it saw.
struct FailingEncoder<'t> {
    theme: &'t LiveTheme,
    seen: Cell<Option<ThemeMode>>,
}

impl RasterEncoder for FailingEncoder<'_> {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn encode(&self, _page: &image::RgbaImage) -> Result<Vec<u8>, Error> {
        self.seen.set(Some(self.theme.mode()));
        Err(Error::Config("encoder out of service".into()))
    }
}

#[test]
fn test_theme_restored_after_encode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let theme = LiveTheme::new(ThemeMode::Dark);
    let registry = SectionRegistry::standard();
    let mut settings = ExportSettings::default();
    settings.image_resolution = 50;
    let mut exporter = Exporter::new(&small_sheet(), settings, &registry, &theme).unwrap();

    let encoder = FailingEncoder {
        theme: &theme,
        seen: Cell::new(None),
    };
    let result = exporter.export_images(&dir.path().join("hero"), &encoder);
    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(encoder.seen.get(), Some(ThemeMode::Light));
    assert_eq!(theme.mode(), ThemeMode::Dark);
    assert_eq!(theme.palette(), Palette::for_mode(ThemeMode::Dark));
    assert!(!dir.path().join("hero-1.png").exists());
}

#[test]
fn test_theme_restored_after_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("hero.pdf");
    let theme = LiveTheme::new(ThemeMode::Dark);
    let registry = SectionRegistry::standard();
    let mut exporter =
        Exporter::new(&small_sheet(), ExportSettings::default(), &registry, &theme).unwrap();

    match exporter.export_pdf_file(&missing) {
        Err(Error::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected an I/O error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(theme.mode(), ThemeMode::Dark);
}

#[test]
fn test_bad_paper_size_fails_before_paginating() {
    let mut settings = ExportSettings::default();
    settings.page.size = "napkin".into();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let result = Exporter::new(&small_sheet(), settings, &registry, &theme);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_custom_paper_size_sets_media_box() {
    let mut settings = ExportSettings::default();
    settings.page.size = "5.5in x 8.5in".into();
    let theme = LiveTheme::default();
    let registry = SectionRegistry::standard();
    let mut exporter = Exporter::new(&small_sheet(), settings, &registry, &theme).unwrap();
    assert_eq!(exporter.document().page_size(), Size::new(396.0, 612.0));
    let bytes = exporter.export_pdf_bytes().unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/MediaBox [0 0 396.00 612.00]"));
}
