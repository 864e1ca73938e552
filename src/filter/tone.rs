//! Per-pixel tone remaps built on a 4x5 color matrix.

use crate::foundation::core::PixelBuffer;
use crate::foundation::math::{clamp_u8, pack, unpack};

/// Default strength for [`sunshine`].
pub const SUNSHINE_STRENGTH: f32 = 150.0;

/// Row-major 4x5 matrix over straight `[r, g, b, a]` channels in `0..=255`, the fifth column being
/// an additive offset. Row `i` computes output channel `i`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    m: [f32; 20],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorMatrix {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ],
    };

    pub fn new(m: [f32; 20]) -> Self {
        Self { m }
    }

    /// An RGB-only remap `rgb' = m * rgb + bias`; alpha passes through.
    pub fn from_rgb(m: [[f32; 3]; 3], bias: [f32; 3]) -> Self {
        let mut out = Self::IDENTITY;
        for (row, (coeffs, b)) in m.iter().zip(bias).enumerate() {
            out.m[row * 5..row * 5 + 3].copy_from_slice(coeffs);
            out.m[row * 5 + 3] = 0.0;
            out.m[row * 5 + 4] = b;
        }
        out
    }

    pub fn scale(r: f32, g: f32, b: f32, a: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0] = r;
        out.m[6] = g;
        out.m[12] = b;
        out.m[18] = a;
        out
    }

    /// `0.0` is grayscale, `1.0` is identity, larger values oversaturate.
    pub fn saturation(sat: f32) -> Self {
        let inv = 1.0 - sat;
        let (r, g, b) = (0.213 * inv, 0.715 * inv, 0.072 * inv);
        Self::from_rgb(
            [[r + sat, g, b], [r, g + sat, b], [r, g, b + sat]],
            [0.0; 3],
        )
    }

    /// Luminance-preserving hue rotation.
    pub fn hue_rotation(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::from_rgb(
            [
                [
                    0.213 + cos * 0.787 - sin * 0.213,
                    0.715 - cos * 0.715 - sin * 0.715,
                    0.072 - cos * 0.072 + sin * 0.928,
                ],
                [
                    0.213 - cos * 0.213 + sin * 0.143,
                    0.715 + cos * 0.285 + sin * 0.140,
                    0.072 - cos * 0.072 - sin * 0.283,
                ],
                [
                    0.213 - cos * 0.213 - sin * 0.787,
                    0.715 - cos * 0.715 + sin * 0.715,
                    0.072 + cos * 0.928 + sin * 0.072,
                ],
            ],
            [0.0; 3],
        )
    }

    /// Nostalgic sepia; output is forced opaque.
    pub fn sepia() -> Self {
        let mut out = Self::from_rgb(
            [
                [0.393, 0.769, 0.189],
                [0.349, 0.686, 0.168],
                [0.272, 0.534, 0.131],
            ],
            [0.0; 3],
        );
        out.m[18] = 0.0;
        out.m[19] = 255.0;
        out
    }

    /// Film negative: `255 - c` per color channel.
    pub fn negative() -> Self {
        Self::from_rgb(
            [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]],
            [255.0; 3],
        )
    }

    /// The matrix equivalent to applying `self` first and then `next`.
    pub fn then(&self, next: &ColorMatrix) -> Self {
        let a = &self.m;
        let b = &next.m;
        let mut out = [0.0f32; 20];
        for i in 0..4 {
            for j in 0..5 {
                let mut v: f32 = (0..4).map(|k| b[i * 5 + k] * a[k * 5 + j]).sum();
                if j == 4 {
                    v += b[i * 5 + 4];
                }
                out[i * 5 + j] = v;
            }
        }
        Self { m: out }
    }

    pub fn as_array(&self) -> &[f32; 20] {
        &self.m
    }

    pub fn apply(&self, px: u32) -> u32 {
        let [a, r, g, b] = unpack(px);
        let src = [r as f32, g as f32, b as f32, a as f32];
        let row = |i: usize| {
            let m = &self.m[i * 5..i * 5 + 5];
            let v = m[0] * src[0] + m[1] * src[1] + m[2] * src[2] + m[3] * src[3] + m[4];
            clamp_u8(v.round() as i32)
        };
        pack(row(3), row(0), row(1), row(2))
    }
}

/// Apply `matrix` to every pixel.
pub fn tone_remap(buf: &PixelBuffer, matrix: &ColorMatrix) -> PixelBuffer {
    buf.map(|px| matrix.apply(px))
}

pub fn nostalgic(buf: &PixelBuffer) -> PixelBuffer {
    tone_remap(buf, &ColorMatrix::sepia())
}

pub fn film_negative(buf: &PixelBuffer) -> PixelBuffer {
    tone_remap(buf, &ColorMatrix::negative())
}

pub fn grayscale(buf: &PixelBuffer) -> PixelBuffer {
    tone_remap(buf, &ColorMatrix::saturation(0.0))
}

/// Map a `0..=255` slider value to a signed offset in `[-1, 1]`, `127` being neutral.
pub fn slider_delta(value: u8) -> f32 {
    ((f32::from(value) - 127.0) / 127.0).clamp(-1.0, 1.0)
}

fn saturation_matrix(value: u8) -> ColorMatrix {
    ColorMatrix::saturation(1.0 + slider_delta(value))
}

fn luminance_matrix(value: u8) -> ColorMatrix {
    let l = 1.0 + slider_delta(value);
    ColorMatrix::scale(l, l, l, 1.0)
}

fn hue_matrix(value: u8) -> ColorMatrix {
    ColorMatrix::hue_rotation(slider_delta(value) * 180.0)
}

/// Saturation slider: `0` grayscale, `127` unchanged, `255` doubled.
pub fn saturate(buf: &PixelBuffer, value: u8) -> PixelBuffer {
    tone_remap(buf, &saturation_matrix(value))
}

/// Luminance slider: `0` black, `127` unchanged, `255` doubled.
pub fn luminance(buf: &PixelBuffer, value: u8) -> PixelBuffer {
    tone_remap(buf, &luminance_matrix(value))
}

/// Hue slider: `0..=255` maps to `-180..=180` degrees, `127` unchanged.
pub fn hue(buf: &PixelBuffer, value: u8) -> PixelBuffer {
    tone_remap(buf, &hue_matrix(value))
}

/// Hue, then saturation, then luminance, folded into one matrix and applied in a single pass.
pub fn adjust(buf: &PixelBuffer, hue_value: u8, saturation_value: u8, luminance_value: u8) -> PixelBuffer {
    let m = hue_matrix(hue_value)
        .then(&saturation_matrix(saturation_value))
        .then(&luminance_matrix(luminance_value));
    tone_remap(buf, &m)
}

/// Brighten a disc centered at `(center_x, center_y)` with radius `min(center_x, center_y)`.
///
/// Each channel inside the disc gains `strength * (1 - dist / radius)`, clamped; pixels on or
/// outside the rim are unchanged, as is alpha.
pub fn radial_light(buf: &PixelBuffer, center_x: u32, center_y: u32, strength: f32) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let radius = f64::from(center_x.min(center_y));
    let (cx, cy) = (i64::from(center_x), i64::from(center_y));
    let r2 = radius * radius;
    PixelBuffer::from_fn(buf.width(), buf.height(), |x, y| {
        let px = buf.pixels()[buf.index(x, y)];
        let dx = cx - i64::from(x);
        let dy = cy - i64::from(y);
        let dist2 = (dx * dx + dy * dy) as f64;
        if dist2 >= r2 {
            return px;
        }
        let gain = (f64::from(strength) * (1.0 - dist2.sqrt() / radius)) as i32;
        let [a, r, g, b] = unpack(px);
        let lift = |c: u32| clamp_u8(c as i32 + gain);
        pack(a, lift(r), lift(g), lift(b))
    })
}

/// [`radial_light`] centered on the buffer at [`SUNSHINE_STRENGTH`].
pub fn sunshine(buf: &PixelBuffer) -> PixelBuffer {
    radial_light(buf, buf.width() / 2, buf.height() / 2, SUNSHINE_STRENGTH)
}

/// Keep alpha, replace color with `color`'s RGB.
pub fn extract_alpha(buf: &PixelBuffer, color: u32) -> PixelBuffer {
    let rgb = color & 0x00FF_FFFF;
    buf.map(|px| (px & 0xFF00_0000) | rgb)
}

#[cfg(test)]
#[path = "../../tests/unit/filter/tone.rs"]
mod tests;
