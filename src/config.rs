//! # Export Settings
//!
//! Paper, margins, raster resolution and encoder knobs. Every field has a
//! default so a settings file only needs to mention what it changes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::style::{Edges, Size};

const POINTS_PER_INCH: f64 = 72.0;

/// Accepted raster resolutions, in dots per inch.
pub const IMAGE_RESOLUTION_MIN: u32 = 50;
pub const IMAGE_RESOLUTION_MAX: u32 = 400;
pub const IMAGE_RESOLUTION_DEFAULT: u32 = 200;

/// Settings that shape one export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    pub page: PageSettings,

    /// Raster output resolution, in dots per inch.
    pub image_resolution: u32,

    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,

    pub png_compression: PngCompression,

    /// Font size of cell text.
    pub font_size: f64,

    /// Font size of section titles and column headers.
    pub header_font_size: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            page: PageSettings::default(),
            image_resolution: IMAGE_RESOLUTION_DEFAULT,
            jpeg_quality: 80,
            png_compression: PngCompression::Default,
            font_size: 7.0,
            header_font_size: 8.0,
        }
    }
}

impl ExportSettings {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.normalize();
        Ok(settings)
    }

    /// Reset out-of-range values to their defaults.
    pub fn normalize(&mut self) {
        if !(IMAGE_RESOLUTION_MIN..=IMAGE_RESOLUTION_MAX).contains(&self.image_resolution) {
            log::warn!(
                "image resolution {} dpi is outside {}..={}; using {}",
                self.image_resolution,
                IMAGE_RESOLUTION_MIN,
                IMAGE_RESOLUTION_MAX,
                IMAGE_RESOLUTION_DEFAULT
            );
            self.image_resolution = IMAGE_RESOLUTION_DEFAULT;
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            self.jpeg_quality = ExportSettings::default().jpeg_quality;
        }
    }
}

/// Trade-off between PNG file size and encoding time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

/// Paper size, orientation and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    /// A named paper (`letter`, `a4`, ...) or `"<w> x <h>"` with units.
    pub size: String,
    pub orientation: Orientation,
    pub margins: Edges,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            size: "letter".to_string(),
            orientation: Orientation::Portrait,
            margins: Edges::uniform(0.25 * POINTS_PER_INCH),
        }
    }
}

impl PageSettings {
    /// Physical page size in points, orientation applied.
    pub fn dimensions(&self) -> Result<Size, Error> {
        let paper: PaperSize = self.size.parse()?;
        let (w, h) = self.orientation.apply(paper.width, paper.height);
        Ok(Size::new(w, h))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Returns (width, height) for a paper given in portrait dimensions.
    pub fn apply(&self, width: f64, height: f64) -> (f64, f64) {
        let (short, long) = if width <= height {
            (width, height)
        } else {
            (height, width)
        };
        match self {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

/// Paper dimensions in points, portrait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width: f64,
    pub height: f64,
}

impl PaperSize {
    fn named(name: &str) -> Option<Self> {
        let (w, h) = match name {
            "letter" => (8.5 * POINTS_PER_INCH, 11.0 * POINTS_PER_INCH),
            "legal" => (8.5 * POINTS_PER_INCH, 14.0 * POINTS_PER_INCH),
            "tabloid" => (11.0 * POINTS_PER_INCH, 17.0 * POINTS_PER_INCH),
            "a0" => (mm(841.0), mm(1189.0)),
            "a1" => (mm(594.0), mm(841.0)),
            "a2" => (mm(420.0), mm(594.0)),
            "a3" => (mm(297.0), mm(420.0)),
            "a4" => (mm(210.0), mm(297.0)),
            "a5" => (mm(148.0), mm(210.0)),
            _ => return None,
        };
        Some(Self {
            width: w,
            height: h,
        })
    }
}

fn mm(v: f64) -> f64 {
    v / 25.4 * POINTS_PER_INCH
}

impl FromStr for PaperSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Some(paper) = Self::named(&normalized) {
            return Ok(paper);
        }
        let (w, h) = normalized
            .split_once(" x ")
            .or_else(|| normalized.split_once('x'))
            .ok_or_else(|| Error::Config(format!("unknown paper size '{}'", s)))?;
        let width = parse_length(w)?;
        let height = parse_length(h)?;
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::Config(format!("paper size '{}' must be positive", s)));
        }
        Ok(Self { width, height })
    }
}

/// Parse a length such as `8.5in`, `21 cm` or `612pt` into points.
/// A bare number is taken as inches.
pub fn parse_length(s: &str) -> Result<f64, Error> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid length '{}'", s)))?;
    let factor = match unit.trim() {
        "" | "in" => POINTS_PER_INCH,
        "cm" => POINTS_PER_INCH / 2.54,
        "mm" => POINTS_PER_INCH / 25.4,
        "pt" | "px" => 1.0,
        other => return Err(Error::Config(format!("unknown length unit '{}'", other))),
    };
    Ok(value * factor)
}
