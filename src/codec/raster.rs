use std::io::Cursor;

use anyhow::Context;
use image::{ExtendedColorType, ImageEncoder};

use crate::compress::search::{CompressFormat, QualityEncoder, calculate_sample_size};
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{PixForgeError, PixForgeResult};
use crate::transform::geometry::sample;

/// [`QualityEncoder`] backed by the `image` crate for one output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageCodec {
    format: CompressFormat,
}

impl ImageCodec {
    pub fn new(format: CompressFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> CompressFormat {
        self.format
    }
}

impl QualityEncoder for ImageCodec {
    fn encode(&mut self, buf: &PixelBuffer, quality: u8) -> PixForgeResult<Vec<u8>> {
        encode_image(buf, self.format, quality)
    }
}

/// Encode `buf`. `quality` only affects JPEG, which also drops alpha.
pub fn encode_image(buf: &PixelBuffer, format: CompressFormat, quality: u8) -> PixForgeResult<Vec<u8>> {
    if buf.is_empty() {
        return Err(PixForgeError::empty_buffer("cannot encode an empty buffer"));
    }
    let (w, h) = buf.dimensions();
    let rgba = buf.to_rgba8();
    let mut out = Vec::new();
    match format {
        CompressFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect();
            // The encoder rejects quality 0.
            let mut enc =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
            enc.encode(&rgb, w, h, ExtendedColorType::Rgb8)
                .context("encode jpeg")?;
        }
        CompressFormat::Png => {
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
                .context("encode png")?;
        }
        CompressFormat::Webp => {
            image::codecs::webp::WebPEncoder::new_lossless(&mut out)
                .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
                .context("encode webp")?;
        }
    }
    if out.is_empty() {
        return Err(PixForgeError::encode_failure(format!("{format:?} encoder produced no bytes")));
    }
    Ok(out)
}

pub fn decode_image(bytes: &[u8]) -> PixForgeResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba8(width, height, rgba.as_raw())
}

/// Decode, then decimate by the power-of-two factor that fits `max_width x max_height`.
pub fn decode_image_with_max_size(
    bytes: &[u8],
    max_width: u32,
    max_height: u32,
) -> PixForgeResult<PixelBuffer> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?
        .into_dimensions()
        .context("read image dimensions")?;
    let factor = calculate_sample_size(width, height, max_width, max_height);
    tracing::debug!(width, height, factor, "decode with sample size");
    let full = decode_image(bytes)?;
    Ok(sample(&full, factor))
}

#[cfg(test)]
#[path = "../../tests/unit/codec/raster.rs"]
mod tests;
