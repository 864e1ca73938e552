use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{PixForgeError, PixForgeResult};
use crate::foundation::math::{pack, premultiply, unpack, unpremultiply};

/// Largest radius accepted by [`stack_blur`] and [`render_blur`].
pub const MAX_BLUR_RADIUS: u32 = 25;

/// Blur `buf` in place with the stack-blur approximation of a Gaussian.
///
/// Runs one horizontal then one vertical sliding-window pass, each costing O(1) per pixel
/// regardless of `radius`. RGB is blurred; alpha is kept bit-for-bit. `radius == 0` is a no-op.
///
/// The buffer must be mutable ([`PixelBuffer::is_mutable`]); a frozen buffer is rejected with
/// [`PixForgeError::NotMutable`] before anything else is checked.
#[tracing::instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn stack_blur(buf: &mut PixelBuffer, radius: u32) -> PixForgeResult<()> {
    if !buf.is_mutable() {
        return Err(PixForgeError::not_mutable("stack_blur edits pixels in place"));
    }
    if radius > MAX_BLUR_RADIUS {
        return Err(PixForgeError::validation(format!(
            "blur radius must be <= {MAX_BLUR_RADIUS}, got {radius}"
        )));
    }
    if buf.is_empty() || radius == 0 {
        return Ok(());
    }
    let (w, h) = (buf.width() as usize, buf.height() as usize);
    stack_blur_pixels(buf.pixels_mut()?, w, h, radius as usize);
    Ok(())
}

fn stack_blur_pixels(pix: &mut [u32], w: usize, h: usize, radius: usize) {
    let wm = w - 1;
    let hm = h - 1;
    let div = 2 * radius + 1;
    let r1 = radius + 1;

    let mut divsum = (div + 1) >> 1;
    divsum *= divsum;
    let dv: Vec<u32> = (0..256 * divsum).map(|i| (i / divsum) as u32).collect();

    let mut rgb = vec![[0u32; 3]; w * h];
    let mut vmin = vec![0usize; w.max(h)];
    let mut stack = vec![[0u32; 3]; div];

    let split = |p: u32| [(p >> 16) & 0xFF, (p >> 8) & 0xFF, p & 0xFF];

    // Horizontal pass: pix -> rgb.
    let mut yi = 0usize;
    let mut yw = 0usize;
    for y in 0..h {
        let mut sum = [0usize; 3];
        let mut in_sum = [0usize; 3];
        let mut out_sum = [0usize; 3];

        for i in -(radius as isize)..=(radius as isize) {
            let sx = i.clamp(0, wm as isize) as usize;
            let sir = split(pix[yi + sx]);
            stack[(i + radius as isize) as usize] = sir;
            let rbs = r1 - i.unsigned_abs();
            for c in 0..3 {
                sum[c] += sir[c] as usize * rbs;
                if i > 0 {
                    in_sum[c] += sir[c] as usize;
                } else {
                    out_sum[c] += sir[c] as usize;
                }
            }
        }

        let mut sp = radius;
        for x in 0..w {
            rgb[yi] = [dv[sum[0]], dv[sum[1]], dv[sum[2]]];

            let start = (sp + div - radius) % div;
            for c in 0..3 {
                sum[c] -= out_sum[c];
                out_sum[c] -= stack[start][c] as usize;
            }

            if y == 0 {
                vmin[x] = (x + r1).min(wm);
            }
            let incoming = split(pix[yw + vmin[x]]);
            stack[start] = incoming;
            for c in 0..3 {
                in_sum[c] += incoming[c] as usize;
                sum[c] += in_sum[c];
            }

            sp = (sp + 1) % div;
            let sir = stack[sp];
            for c in 0..3 {
                out_sum[c] += sir[c] as usize;
                in_sum[c] -= sir[c] as usize;
            }
            yi += 1;
        }
        yw += w;
    }

    // Vertical pass: rgb -> pix, alpha taken from the original pixel.
    for x in 0..w {
        let mut sum = [0usize; 3];
        let mut in_sum = [0usize; 3];
        let mut out_sum = [0usize; 3];

        let mut yp = -((radius * w) as isize);
        for i in -(radius as isize)..=(radius as isize) {
            let idx = yp.max(0) as usize + x;
            let sir = rgb[idx];
            stack[(i + radius as isize) as usize] = sir;
            let rbs = r1 - i.unsigned_abs();
            for c in 0..3 {
                sum[c] += sir[c] as usize * rbs;
                if i > 0 {
                    in_sum[c] += sir[c] as usize;
                } else {
                    out_sum[c] += sir[c] as usize;
                }
            }
            if i < hm as isize {
                yp += w as isize;
            }
        }

        let mut yi = x;
        let mut sp = radius;
        for y in 0..h {
            pix[yi] = (pix[yi] & 0xFF00_0000) | (dv[sum[0]] << 16) | (dv[sum[1]] << 8) | dv[sum[2]];

            let start = (sp + div - radius) % div;
            for c in 0..3 {
                sum[c] -= out_sum[c];
                out_sum[c] -= stack[start][c] as usize;
            }

            if x == 0 {
                vmin[y] = (y + r1).min(hm) * w;
            }
            let incoming = rgb[x + vmin[y]];
            stack[start] = incoming;
            for c in 0..3 {
                in_sum[c] += incoming[c] as usize;
                sum[c] += in_sum[c];
            }

            sp = (sp + 1) % div;
            let sir = stack[sp];
            for c in 0..3 {
                out_sum[c] += sir[c] as usize;
                in_sum[c] -= sir[c] as usize;
            }
            yi += w;
        }
    }
}

/// A swappable blur implementation with the radius semantics of [`stack_blur`].
///
/// Hosts with an accelerated convolution path implement this trait and select it themselves.
pub trait BlurBackend {
    fn blur(&self, buf: &PixelBuffer, radius: u32) -> PixForgeResult<PixelBuffer>;
}

/// Runs [`stack_blur`] on a private copy.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackBlurBackend;

impl BlurBackend for StackBlurBackend {
    fn blur(&self, buf: &PixelBuffer, radius: u32) -> PixForgeResult<PixelBuffer> {
        let mut out = buf.to_mutable();
        stack_blur(&mut out, radius)?;
        Ok(out)
    }
}

/// Separable Gaussian (Q16 fixed-point weights, sigma = radius / 2) over premultiplied pixels.
/// Unlike the stack blur this also blurs alpha.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussianBlurBackend;

impl BlurBackend for GaussianBlurBackend {
    fn blur(&self, buf: &PixelBuffer, radius: u32) -> PixForgeResult<PixelBuffer> {
        if buf.is_empty() || radius == 0 {
            return Ok(buf.to_mutable());
        }
        let kernel = gaussian_kernel_q16(radius, radius as f32 / 2.0)?;
        let (w, h) = buf.dimensions();
        let src: Vec<u32> = buf.pixels().iter().map(|&p| premultiply(p)).collect();
        let mut tmp = vec![0u32; src.len()];
        let mut out = vec![0u32; src.len()];
        convolve_pass(&src, &mut tmp, w as usize, h as usize, &kernel, Axis::Horizontal);
        convolve_pass(&tmp, &mut out, w as usize, h as usize, &kernel, Axis::Vertical);
        for px in &mut out {
            *px = unpremultiply(*px);
        }
        Ok(PixelBuffer::from_raw(w, h, out))
    }
}

/// Blur through the selected backend. Returns a new buffer; the input is not modified.
#[tracing::instrument(skip(buf, backend), fields(w = buf.width(), h = buf.height()))]
pub fn render_blur(
    buf: &PixelBuffer,
    radius: u32,
    backend: &dyn BlurBackend,
) -> PixForgeResult<PixelBuffer> {
    if radius > MAX_BLUR_RADIUS {
        return Err(PixForgeError::validation(format!(
            "blur radius must be <= {MAX_BLUR_RADIUS}, got {radius}"
        )));
    }
    if buf.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    backend.blur(buf, radius)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PixForgeResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PixForgeError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&q| i64::from(q)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn convolve_pass(src: &[u32], dst: &mut [u32], w: usize, h: usize, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as isize - radius;
                let idx = match axis {
                    Axis::Horizontal => y * w + (x as isize + d).clamp(0, w as isize - 1) as usize,
                    Axis::Vertical => (y as isize + d).clamp(0, h as isize - 1) as usize * w + x,
                };
                let px = unpack(src[idx]);
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(px[c]);
                }
            }
            let q = |v: u64| (((v + 32768) >> 16).min(255)) as u32;
            let a = q(acc[0]);
            dst[y * w + x] = pack(a, q(acc[1]).min(a), q(acc[2]).min(a), q(acc[3]).min(a));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/blur.rs"]
mod tests;
