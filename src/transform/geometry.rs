//! Geometric transforms: every operation returns a new buffer and leaves the input untouched.

use crate::foundation::core::{Affine, PixelBuffer, Point};
use crate::foundation::error::{PixForgeError, PixForgeResult};
use crate::foundation::math::{pack, premultiply, unpack, unpremultiply};

const CENTER_EPS: f64 = 1e-6;

/// Resample `buf` through `affine`.
///
/// The output is sized to the rounded bounding box of the transformed source rectangle and shifted
/// so that box starts at the origin. Output pixels whose pre-image falls outside the source stay
/// transparent.
#[tracing::instrument(skip(buf), fields(w = buf.width(), h = buf.height()))]
pub fn transform_affine(buf: &PixelBuffer, affine: Affine) -> PixelBuffer {
    if buf.is_empty() || !affine.is_finite() {
        return PixelBuffer::empty();
    }
    let bbox = affine.transform_rect_bbox(buf.bounds());
    let out_w = bbox.width().round();
    let out_h = bbox.height().round();
    if !(out_w >= 1.0 && out_h >= 1.0) || out_w > f64::from(u32::MAX) || out_h > f64::from(u32::MAX)
    {
        return PixelBuffer::empty();
    }
    let to_origin = Affine::translate(-bbox.origin().to_vec2()) * affine;
    resample(buf, to_origin, out_w as u32, out_h as u32)
}

/// Rotate by `degrees` (clockwise on screen) about `pivot`, defaulting to the buffer center.
pub fn rotate(buf: &PixelBuffer, degrees: f64, pivot: Option<Point>) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let pivot = pivot.unwrap_or_else(|| buf.bounds().center());
    transform_affine(buf, about(pivot, Affine::rotate(degrees.to_radians())))
}

/// Scale by independent factors. Negative factors mirror the corresponding axis.
pub fn scale(buf: &PixelBuffer, sx: f64, sy: f64) -> PixelBuffer {
    if buf.is_empty() || sx == 0.0 || sy == 0.0 {
        return PixelBuffer::empty();
    }
    transform_affine(buf, Affine::scale_non_uniform(sx, sy))
}

/// Scale to exact target dimensions.
pub fn zoom(buf: &PixelBuffer, new_width: u32, new_height: u32) -> PixelBuffer {
    if buf.is_empty() || new_width == 0 || new_height == 0 {
        return PixelBuffer::empty();
    }
    if buf.dimensions() == (new_width, new_height) {
        return buf.to_mutable();
    }
    let affine = Affine::scale_non_uniform(
        f64::from(new_width) / f64::from(buf.width()),
        f64::from(new_height) / f64::from(buf.height()),
    );
    resample(buf, affine, new_width, new_height)
}

/// Mirror left-right (`horizontal`) or top-bottom. Equivalent to a -1 scale on that axis, done as
/// an exact index permutation.
pub fn flip(buf: &PixelBuffer, horizontal: bool) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let (w, h) = buf.dimensions();
    PixelBuffer::from_fn(w, h, |x, y| {
        let (sx, sy) = if horizontal {
            (w - 1 - x, y)
        } else {
            (x, h - 1 - y)
        };
        buf.pixels()[buf.index(sx, sy)]
    })
}

/// Shear by `kx` (x += kx * y) and `ky` (y += ky * x) about `pivot`.
///
/// The output canvas is not clamped: keep `|kx|, |ky|` small (around 0.2 or less) or the target
/// buffer grows with the shear.
pub fn skew(buf: &PixelBuffer, kx: f64, ky: f64, pivot: Point) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    transform_affine(buf, about(pivot, Affine::skew(kx, ky)))
}

/// Copy the `width x height` rectangle at `(x, y)`.
pub fn crop(buf: &PixelBuffer, x: u32, y: u32, width: u32, height: u32) -> PixForgeResult<PixelBuffer> {
    if buf.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    let fits = |o: u32, len: u32, max: u32| o.checked_add(len).is_some_and(|end| end <= max);
    if width == 0 || height == 0 || !fits(x, width, buf.width()) || !fits(y, height, buf.height())
    {
        return Err(PixForgeError::invalid_region(format!(
            "{width}x{height}+{x}+{y} does not fit in {}x{}",
            buf.width(),
            buf.height()
        )));
    }
    Ok(PixelBuffer::from_fn(width, height, |cx, cy| {
        buf.pixels()[buf.index(x + cx, y + cy)]
    }))
}

/// Center-crop to the aspect ratio `w_ratio : h_ratio`, shrinking only the axis that is too long.
pub fn crop_to_aspect(buf: &PixelBuffer, w_ratio: u32, h_ratio: u32) -> PixelBuffer {
    if buf.is_empty() || w_ratio == 0 || h_ratio == 0 {
        return PixelBuffer::empty();
    }
    let (w, h) = (u64::from(buf.width()), u64::from(buf.height()));
    let (wr, hr) = (u64::from(w_ratio), u64::from(h_ratio));

    let (x, y, cw, ch) = if w * hr > h * wr {
        let cw = h * wr / hr;
        ((w - cw) / 2, 0, cw, h)
    } else {
        let ch = w * hr / wr;
        (0, (h - ch) / 2, w, ch)
    };
    if cw == 0 || ch == 0 {
        return PixelBuffer::empty();
    }
    debug_assert!(x + cw <= w && y + ch <= h);
    let (x, y) = (x as u32, y as u32);
    PixelBuffer::from_fn(cw as u32, ch as u32, |cx, cy| {
        buf.pixels()[buf.index(x + cx, y + cy)]
    })
}

/// Decimate by an integer factor, averaging each `sample_size x sample_size` block.
pub fn sample(buf: &PixelBuffer, sample_size: u32) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    if sample_size <= 1 {
        return buf.to_mutable();
    }
    let s = sample_size;
    let out_w = (buf.width() / s).max(1);
    let out_h = (buf.height() / s).max(1);
    PixelBuffer::from_fn(out_w, out_h, |ox, oy| {
        let x0 = ox * s;
        let y0 = oy * s;
        let x1 = (x0 + s).min(buf.width());
        let y1 = (y0 + s).min(buf.height());
        let mut acc = [0u64; 4];
        for y in y0..y1 {
            for x in x0..x1 {
                let p = unpack(premultiply(buf.pixels()[buf.index(x, y)]));
                for c in 0..4 {
                    acc[c] += u64::from(p[c]);
                }
            }
        }
        let n = u64::from((x1 - x0) * (y1 - y0));
        let avg = |c: usize| ((acc[c] + n / 2) / n) as u32;
        unpremultiply(pack(avg(0), avg(1), avg(2), avg(3)))
    })
}

fn about(pivot: Point, affine: Affine) -> Affine {
    let v = pivot.to_vec2();
    Affine::translate(v) * affine * Affine::translate(-v)
}

/// Inverse-map every output pixel center through `forward` and sample the source bilinearly.
fn resample(buf: &PixelBuffer, forward: Affine, out_w: u32, out_h: u32) -> PixelBuffer {
    if forward.determinant().abs() < f64::EPSILON {
        return PixelBuffer::empty();
    }
    let inverse = forward.inverse();
    PixelBuffer::from_fn(out_w, out_h, |x, y| {
        let src = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        sample_bilinear(buf, src)
    })
}

fn sample_bilinear(buf: &PixelBuffer, p: Point) -> u32 {
    let (w, h) = (f64::from(buf.width()), f64::from(buf.height()));
    if !(p.x >= 0.0 && p.y >= 0.0 && p.x <= w && p.y <= h) {
        return 0;
    }
    let fx = p.x - 0.5;
    let fy = p.y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let max_x = i64::from(buf.width()) - 1;
    let max_y = i64::from(buf.height()) - 1;
    let at = |xi: i64, yi: i64| -> u32 {
        let xi = xi.clamp(0, max_x) as u32;
        let yi = yi.clamp(0, max_y) as u32;
        buf.pixels()[buf.index(xi, yi)]
    };

    let (xi, yi) = (x0 as i64, y0 as i64);
    let snap_x = tx < CENTER_EPS || tx > 1.0 - CENTER_EPS;
    let snap_y = ty < CENTER_EPS || ty > 1.0 - CENTER_EPS;
    if snap_x && snap_y {
        let xi = if tx > 0.5 { xi + 1 } else { xi };
        let yi = if ty > 0.5 { yi + 1 } else { yi };
        return at(xi, yi);
    }

    let taps = [
        (unpack(premultiply(at(xi, yi))), (1.0 - tx) * (1.0 - ty)),
        (unpack(premultiply(at(xi + 1, yi))), tx * (1.0 - ty)),
        (unpack(premultiply(at(xi, yi + 1))), (1.0 - tx) * ty),
        (unpack(premultiply(at(xi + 1, yi + 1))), tx * ty),
    ];
    let mut acc = [0.0f64; 4];
    for (px, wgt) in taps {
        for c in 0..4 {
            acc[c] += f64::from(px[c]) * wgt;
        }
    }
    let ch = |c: usize| acc[c].round().clamp(0.0, 255.0) as u32;
    let a = ch(0);
    unpremultiply(pack(a, ch(1).min(a), ch(2).min(a), ch(3).min(a)))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/geometry.rs"]
mod tests;
