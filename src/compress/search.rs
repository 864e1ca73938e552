//! Byte-budget compression: bisect an encoder's quality knob until the output fits.

use serde::{Deserialize, Serialize};

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{PixForgeError, PixForgeResult};

/// Upper bound on bisection encodes for the full `0..=100` range.
pub const MAX_SEARCH_STEPS: u32 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressFormat {
    Jpeg,
    Png,
    Webp,
}

impl CompressFormat {
    /// Whether the quality knob changes the output. Only JPEG is lossy here; WebP is encoded
    /// losslessly.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionTarget {
    pub max_bytes: u64,
    pub format: CompressFormat,
    pub quality_min: u8,
    pub quality_max: u8,
}

impl CompressionTarget {
    pub fn new(max_bytes: u64, format: CompressFormat) -> Self {
        Self {
            max_bytes,
            format,
            quality_min: 0,
            quality_max: 100,
        }
    }

    pub fn with_quality_bounds(mut self, min: u8, max: u8) -> PixForgeResult<Self> {
        if min > max || max > 100 {
            return Err(PixForgeError::validation(format!(
                "quality bounds must satisfy min <= max <= 100, got {min}..={max}"
            )));
        }
        self.quality_min = min;
        self.quality_max = max;
        Ok(self)
    }
}

/// Encodes a buffer at a quality in `0..=100`.
///
/// Larger quality must never produce fewer bytes; the search relies on it without checking.
pub trait QualityEncoder {
    fn encode(&mut self, buf: &PixelBuffer, quality: u8) -> PixForgeResult<Vec<u8>>;
}

impl<F> QualityEncoder for F
where
    F: FnMut(&PixelBuffer, u8) -> PixForgeResult<Vec<u8>>,
{
    fn encode(&mut self, buf: &PixelBuffer, quality: u8) -> PixForgeResult<Vec<u8>> {
        self(buf, quality)
    }
}

/// Encode `buf` at the highest quality whose output fits `target.max_bytes`.
///
/// If even the lowest quality does not fit, that encoding is returned anyway.
pub fn compress_to_byte_budget(
    buf: &PixelBuffer,
    target: &CompressionTarget,
    encoder: &mut dyn QualityEncoder,
) -> PixForgeResult<Vec<u8>> {
    search(buf, target, encoder).map(|(_, bytes)| bytes)
}

/// Like [`compress_to_byte_budget`] but returns only the chosen quality.
pub fn calculate_quality(
    buf: &PixelBuffer,
    target: &CompressionTarget,
    encoder: &mut dyn QualityEncoder,
) -> PixForgeResult<u8> {
    search(buf, target, encoder).map(|(quality, _)| quality)
}

#[tracing::instrument(skip(buf, encoder), fields(width = buf.width(), height = buf.height()))]
fn search(
    buf: &PixelBuffer,
    target: &CompressionTarget,
    encoder: &mut dyn QualityEncoder,
) -> PixForgeResult<(u8, Vec<u8>)> {
    if buf.is_empty() {
        return Err(PixForgeError::empty_buffer("nothing to compress"));
    }
    let max = target.max_bytes;
    let (lo, hi) = (target.quality_min, target.quality_max.min(100));
    let mut encode = |q: u8| -> PixForgeResult<Vec<u8>> {
        let bytes = encoder.encode(buf, q)?;
        if bytes.is_empty() {
            return Err(PixForgeError::encode_failure(format!(
                "encoder returned no bytes at quality {q}"
            )));
        }
        tracing::trace!(quality = q, len = bytes.len(), "encoded");
        Ok(bytes)
    };
    let fits = |bytes: &[u8]| bytes.len() as u64 <= max;

    let top = encode(hi)?;
    if !target.format.is_lossy() || fits(&top) {
        return Ok((hi, top));
    }
    let bottom = encode(lo)?;
    if bottom.len() as u64 >= max {
        if !fits(&bottom) {
            tracing::debug!(max_bytes = max, len = bottom.len(), "budget cannot be satisfied");
        }
        return Ok((lo, bottom));
    }

    let mut best = (lo, bottom);
    let (mut start, mut end) = (lo, hi);
    for _ in 0..MAX_SEARCH_STEPS {
        if start >= end {
            break;
        }
        let mid = start + (end - start) / 2;
        let bytes = encode(mid)?;
        let len = bytes.len() as u64;
        if len == max {
            return Ok((mid, bytes));
        }
        if len > max {
            match mid.checked_sub(1) {
                Some(e) => end = e,
                None => break,
            }
        } else {
            start = mid + 1;
            if mid > best.0 {
                best = (mid, bytes);
            }
        }
    }

    // `start` is the surviving upper candidate; `hi` is already known not to fit.
    if start > best.0 && start < hi {
        let bytes = encode(start)?;
        if fits(&bytes) {
            return Ok((start, bytes));
        }
    }
    Ok(best)
}

/// Power-of-two decode factor that brings `src` within `max_w x max_h`.
///
/// Halves both sides while either still exceeds its maximum. Maxima of zero count as one.
pub fn calculate_sample_size(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> u32 {
    let (max_w, max_h) = (max_w.max(1), max_h.max(1));
    let (mut w, mut h) = (src_w, src_h);
    let mut size = 1;
    while w > max_w || h > max_h {
        w /= 2;
        h /= 2;
        size *= 2;
    }
    size
}

#[cfg(test)]
#[path = "../../tests/unit/compress/search.rs"]
mod tests;
