use crate::foundation::error::{PixForgeError, PixForgeResult};
use crate::foundation::math::{pack, unpack};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pack straight (non-premultiplied) channels into `0xAARRGGBB`.
#[inline]
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    pack(u32::from(a), u32::from(r), u32::from(g), u32::from(b))
}

/// Split `0xAARRGGBB` into `[a, r, g, b]`.
#[inline]
pub fn channels(px: u32) -> [u8; 4] {
    let [a, r, g, b] = unpack(px);
    [a as u8, r as u8, g as u8, b as u8]
}

/// In-memory raster of packed straight-alpha ARGB32 pixels, row-major, top row first.
///
/// A zero-area buffer is the canonical "empty" sentinel: operations short-circuit on it and
/// return another empty buffer instead of failing.
///
/// Buffers carry a mutability flag. Pure operations never look at it; in-place operations
/// such as [`stack_blur`](crate::stack_blur) refuse to run on a frozen buffer.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    mutable: bool,
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.pixels == other.pixels
    }
}

impl Eq for PixelBuffer {}

impl PixelBuffer {
    /// The zero-area sentinel.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            mutable: true,
        }
    }

    /// A fully transparent buffer; zero dimensions yield the empty sentinel.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// A buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::empty();
        }
        Self::from_raw(width, height, vec![color; area(width, height)])
    }

    /// Wrap an existing pixel vector. The length must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> PixForgeResult<Self> {
        if width == 0 || height == 0 {
            if pixels.is_empty() {
                return Ok(Self::empty());
            }
            return Err(PixForgeError::validation(
                "zero-area buffer must not carry pixels",
            ));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| PixForgeError::validation("buffer size overflow"))?;
        if pixels.len() != expected {
            return Err(PixForgeError::validation(format!(
                "expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self::from_raw(width, height, pixels))
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u32) -> Self {
        if width == 0 || height == 0 {
            return Self::empty();
        }
        let mut pixels = Vec::with_capacity(area(width, height));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::from_raw(width, height, pixels)
    }

    /// Convert straight RGBA8 bytes (as produced by most decoders) into a buffer.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> PixForgeResult<Self> {
        if rgba.len() % 4 != 0 {
            return Err(PixForgeError::validation(
                "rgba8 byte length must be a multiple of 4",
            ));
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| argb(p[3], p[0], p[1], p[2]))
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Straight RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &px in &self.pixels {
            let [a, r, g, b] = channels(px);
            out.extend_from_slice(&[r, g, b, a]);
        }
        out
    }

    pub(crate) fn from_raw(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), area(width, height));
        Self {
            width,
            height,
            pixels,
            mutable: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Mutable pixel access; fails with [`PixForgeError::NotMutable`] on a frozen buffer.
    pub fn pixels_mut(&mut self) -> PixForgeResult<&mut [u32]> {
        if !self.mutable {
            return Err(PixForgeError::not_mutable(
                "call to_mutable() before editing pixels in place",
            ));
        }
        Ok(&mut self.pixels)
    }

    pub fn row(&self, y: u32) -> Option<&[u32]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = (y as usize) * w;
        Some(&self.pixels[start..start + w])
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    pub fn set(&mut self, x: u32, y: u32, px: u32) -> PixForgeResult<()> {
        if x >= self.width || y >= self.height {
            return Err(PixForgeError::invalid_region(format!(
                "pixel ({x},{y}) outside {}x{}",
                self.width, self.height
            )));
        }
        let idx = self.index(x, y);
        self.pixels_mut()?[idx] = px;
        Ok(())
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Mark the buffer read-only for in-place operations.
    pub fn frozen(mut self) -> Self {
        self.mutable = false;
        self
    }

    /// A mutable copy of this buffer.
    pub fn to_mutable(&self) -> Self {
        Self {
            mutable: true,
            ..self.clone()
        }
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Same dimensions, each pixel mapped through `f`.
    pub(crate) fn map(&self, f: impl FnMut(u32) -> u32) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        Self::from_raw(
            self.width,
            self.height,
            self.pixels.iter().copied().map(f).collect(),
        )
    }
}

#[inline]
fn area(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
