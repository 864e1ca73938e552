use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{PixForgeError, PixForgeResult};
use crate::foundation::math::{clamp_u8, pack, unpack};

const GAUSS_3X3: [i32; 9] = [1, 2, 1, 2, 4, 2, 1, 2, 1];
const LAPLACIAN_3X3: [i32; 9] = [-1, -1, -1, -1, 9, -1, -1, -1, -1];

/// Response scale applied by [`sharpen`].
pub const SHARPEN_ALPHA_SCALE: f32 = 0.3;

/// Square convolution kernel (3x3 or 5x5) with an integer divisor.
///
/// Each channel becomes `clamp(round(alpha_scale * sum(w * px) / divisor))`.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterKernel {
    weights: Vec<i32>,
    size: usize,
    divisor: i32,
    alpha_scale: f32,
}

impl FilterKernel {
    pub fn new(weights: &[i32], divisor: i32) -> PixForgeResult<Self> {
        let size = match weights.len() {
            9 => 3,
            25 => 5,
            n => return Err(PixForgeError::UnsupportedKernelSize(n)),
        };
        if divisor == 0 {
            return Err(PixForgeError::validation("kernel divisor must be non-zero"));
        }
        Ok(Self {
            weights: weights.to_vec(),
            size,
            divisor,
            alpha_scale: 1.0,
        })
    }

    pub fn with_alpha_scale(mut self, alpha_scale: f32) -> Self {
        self.alpha_scale = if alpha_scale.is_finite() { alpha_scale } else { 1.0 };
        self
    }

    /// The soften kernel `[1,2,1,2,4,2,1,2,1] / delta`, `delta` clamped to `1..=24`.
    pub fn soften(delta: i32) -> Self {
        Self {
            weights: GAUSS_3X3.to_vec(),
            size: 3,
            divisor: delta.clamp(1, 24),
            alpha_scale: 1.0,
        }
    }

    pub fn sharpen() -> Self {
        Self {
            weights: LAPLACIAN_3X3.to_vec(),
            size: 3,
            divisor: 1,
            alpha_scale: SHARPEN_ALPHA_SCALE,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    pub fn alpha_scale(&self) -> f32 {
        self.alpha_scale
    }
}

/// Convolve RGB with `kernel`. Pixels within `size / 2` of an edge pass through unfiltered, so the
/// kernel never samples outside the buffer. Alpha of each pixel is kept.
#[tracing::instrument(skip(buf, kernel), fields(w = buf.width(), h = buf.height(), size = kernel.size))]
pub fn apply_kernel(buf: &PixelBuffer, kernel: &FilterKernel) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let (w, h) = (buf.width() as usize, buf.height() as usize);
    let border = kernel.size / 2;
    let src = buf.pixels();
    let mut out = src.to_vec();
    if w <= 2 * border || h <= 2 * border {
        return PixelBuffer::from_raw(buf.width(), buf.height(), out);
    }

    let scale = kernel.alpha_scale / kernel.divisor as f32;
    for y in border..h - border {
        for x in border..w - border {
            let mut acc = [0i32; 3];
            let mut k = 0;
            for ky in y - border..=y + border {
                for kx in x - border..=x + border {
                    let [_, r, g, b] = unpack(src[ky * w + kx]);
                    let wgt = kernel.weights[k];
                    acc[0] += r as i32 * wgt;
                    acc[1] += g as i32 * wgt;
                    acc[2] += b as i32 * wgt;
                    k += 1;
                }
            }
            let a = src[y * w + x] >> 24;
            let ch = |sum: i32| clamp_u8((scale * sum as f32).round() as i32);
            out[y * w + x] = pack(a, ch(acc[0]), ch(acc[1]), ch(acc[2]));
        }
    }
    PixelBuffer::from_raw(buf.width(), buf.height(), out)
}

/// Gaussian-like smoothing; see [`FilterKernel::soften`].
pub fn soften(buf: &PixelBuffer, delta: i32) -> PixelBuffer {
    apply_kernel(buf, &FilterKernel::soften(delta))
}

/// Laplacian sharpening scaled by [`SHARPEN_ALPHA_SCALE`].
pub fn sharpen(buf: &PixelBuffer) -> PixelBuffer {
    apply_kernel(buf, &FilterKernel::sharpen())
}

/// Relief effect: each channel becomes `right_neighbor - self + 127`, clamped. The one-pixel border
/// passes through.
pub fn emboss(buf: &PixelBuffer) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let (w, h) = (buf.width() as usize, buf.height() as usize);
    let src = buf.pixels();
    let mut out = src.to_vec();
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let pos = y * w + x;
            let [a, r, g, b] = unpack(src[pos]);
            let [_, nr, ng, nb] = unpack(src[pos + 1]);
            let ch = |n: u32, c: u32| clamp_u8(n as i32 - c as i32 + 127);
            out[pos] = pack(a, ch(nr, r), ch(ng, g), ch(nb, b));
        }
    }
    PixelBuffer::from_raw(buf.width(), buf.height(), out)
}

#[cfg(test)]
#[path = "../../tests/unit/filter/kernel.rs"]
mod tests;
