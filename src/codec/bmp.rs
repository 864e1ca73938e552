//! 32-bit uncompressed BMP, written bottom-up with a 54-byte header.

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{PixForgeError, PixForgeResult};

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
pub const BMP_HEADER_LEN: usize = FILE_HEADER_LEN + INFO_HEADER_LEN;

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;

pub fn encode_bmp(buf: &PixelBuffer) -> PixForgeResult<Vec<u8>> {
    if buf.is_empty() {
        return Err(PixForgeError::empty_buffer("cannot encode an empty buffer as BMP"));
    }
    let (width, height) = buf.dimensions();
    let total = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|n| n.checked_mul(4))
        .and_then(|n| n.checked_add(BMP_HEADER_LEN as u64))
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            PixForgeError::encode_failure(format!("{width}x{height} exceeds the BMP size limit"))
        })?;

    let mut out = Vec::with_capacity(total as usize);

    // File header.
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(BMP_HEADER_LEN as u32).to_le_bytes());

    // Info header.
    out.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&32u16.to_le_bytes());
    out.extend_from_slice(&BI_RGB.to_le_bytes());
    out.resize(BMP_HEADER_LEN, 0);

    for y in (0..height).rev() {
        let Some(row) = buf.row(y) else { continue };
        for px in row {
            out.extend_from_slice(&px.to_le_bytes());
        }
    }
    Ok(out)
}

/// Decode a 32-bpp uncompressed BMP (either row order).
pub fn decode_bmp(bytes: &[u8]) -> PixForgeResult<PixelBuffer> {
    let malformed = |msg: &str| PixForgeError::validation(format!("malformed BMP: {msg}"));

    if bytes.len() < BMP_HEADER_LEN || !bytes.starts_with(b"BM") {
        return Err(malformed("missing BM header"));
    }
    let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
    let u32_at = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

    let data_offset = u32_at(10) as usize;
    let info_len = u32_at(14) as usize;
    let width = u32_at(18) as i32;
    let height = u32_at(22) as i32;
    let bpp = u16_at(28);
    let compression = u32_at(30);

    if info_len < INFO_HEADER_LEN || data_offset < FILE_HEADER_LEN + info_len {
        return Err(malformed("info header too short"));
    }
    if bpp != 32 || !matches!(compression, BI_RGB | BI_BITFIELDS) {
        return Err(malformed(&format!(
            "only 32-bpp uncompressed data is supported (bpp={bpp}, compression={compression})"
        )));
    }
    if width <= 0 || height == 0 {
        return Err(malformed("non-positive dimensions"));
    }
    let top_down = height < 0;
    let (width, height) = (width.unsigned_abs(), height.unsigned_abs());

    let row_len = width as usize * 4;
    let data = bytes
        .get(data_offset..)
        .filter(|d| d.len() / row_len >= height as usize)
        .ok_or_else(|| malformed("pixel data truncated"))?;

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        let src_row = if top_down { y } else { height as usize - 1 - y };
        let row = &data[src_row * row_len..(src_row + 1) * row_len];
        pixels.extend(
            row.chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]])),
        );
    }
    PixelBuffer::from_pixels(width, height, pixels)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/bmp.rs"]
mod tests;
