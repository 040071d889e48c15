//! Image file encoders for rendered pages.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError, Rgb, RgbImage, RgbaImage};

use crate::config::PngCompression;
use crate::error::Error;

/// Turns one rendered page into the bytes of an image file.
pub trait RasterEncoder {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    fn encode(&self, page: &RgbaImage) -> Result<Vec<u8>, Error>;
}

fn encode_error(format: &'static str) -> impl Fn(ImageError) -> Error {
    move |source| Error::Encode { format, source }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PngOutput {
    pub compression: PngCompression,
}

impl RasterEncoder for PngOutput {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn encode(&self, page: &RgbaImage) -> Result<Vec<u8>, Error> {
        let compression = match self.compression {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        };
        let mut buf = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut buf, compression, FilterType::Adaptive);
        encoder
            .write_image(page.as_raw(), page.width(), page.height(), ExtendedColorType::Rgba8)
            .map_err(encode_error("png"))?;
        Ok(buf)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JpegOutput {
    /// 1-100.
    pub quality: u8,
}

impl RasterEncoder for JpegOutput {
    fn extension(&self) -> &'static str {
        "jpeg"
    }

    fn encode(&self, page: &RgbaImage) -> Result<Vec<u8>, Error> {
        // JPEG has no alpha channel.
        let rgb = RgbImage::from_fn(page.width(), page.height(), |x, y| {
            let [r, g, b, _] = page.get_pixel(x, y).0;
            Rgb([r, g, b])
        });
        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buf, self.quality.clamp(1, 100));
        encoder
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(encode_error("jpeg"))?;
        Ok(buf)
    }
}

/// Lossless WEBP.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpOutput;

impl RasterEncoder for WebpOutput {
    fn extension(&self) -> &'static str {
        "webp"
    }

    fn encode(&self, page: &RgbaImage) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        let encoder = WebPEncoder::new_lossless(&mut buf);
        encoder
            .write_image(page.as_raw(), page.width(), page.height(), ExtendedColorType::Rgba8)
            .map_err(encode_error("webp"))?;
        Ok(buf)
    }
}
