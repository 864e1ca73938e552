//! Alpha masks and outlines: rounded corners, circular crops, reflections, borders.

use kurbo::{Circle, RoundedRect, RoundedRectRadii};
use serde::{Deserialize, Serialize};

use crate::composite::blend::BlendMode;
use crate::composite::canvas::Canvas;
use crate::foundation::core::{PixelBuffer, Point, Rect};
use crate::foundation::math::pack;
use crate::transform::geometry::{flip, zoom};

const MASK_WHITE: u32 = 0xFFFF_FFFF;

/// Which corners [`round_corner`] rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Corners {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_right: bool,
    pub bottom_left: bool,
}

impl Default for Corners {
    fn default() -> Self {
        Self::ALL
    }
}

impl Corners {
    pub const ALL: Self = Self {
        top_left: true,
        top_right: true,
        bottom_right: true,
        bottom_left: true,
    };

    fn radii(self, radius: f64) -> RoundedRectRadii {
        let pick = |on: bool| if on { radius } else { 0.0 };
        RoundedRectRadii::new(
            pick(self.top_left),
            pick(self.top_right),
            pick(self.bottom_right),
            pick(self.bottom_left),
        )
    }
}

/// `[top_left, top_right, bottom_right, bottom_left]`.
impl From<[bool; 4]> for Corners {
    fn from([top_left, top_right, bottom_right, bottom_left]: [bool; 4]) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }
}

/// Outline shape drawn by [`add_border`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BorderShape {
    RoundedRect { corner_radius: f64 },
    Circle,
}

impl Default for BorderShape {
    fn default() -> Self {
        Self::RoundedRect { corner_radius: 0.0 }
    }
}

/// Clip `buf` to a rounded rectangle. The radius is capped at half the shorter side, so
/// `radius >= min(w, h)` on a square input yields a circle. Disabled corners stay square.
pub fn round_corner(buf: &PixelBuffer, radius: f64, corners: Corners) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let (w, h) = buf.dimensions();
    let radius = radius.clamp(0.0, f64::from(w.min(h)) / 2.0);
    let mask = RoundedRect::from_rect(buf.bounds(), corners.radii(radius));
    masked(buf, |canvas| canvas.fill_shape(&mask, MASK_WHITE, BlendMode::SrcOver))
}

/// Squeeze `buf` into the centered `min(w, h)` square and clip it to the inscribed circle, then
/// stroke an optional ring of `border_width` just inside its edge. The output keeps `w x h`.
pub fn round_circle(buf: &PixelBuffer, border_width: f64, border_color: u32) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let (w, h) = buf.dimensions();
    let size = w.min(h);
    let (ix, iy) = ((w - size) / 2, (h - size) / 2);
    let radius = f64::from(size) / 2.0;
    let center = Point::new(f64::from(ix) + radius, f64::from(iy) + radius);

    let mut canvas = Canvas::new(w, h);
    canvas.fill_shape(&Circle::new(center, radius), MASK_WHITE, BlendMode::SrcOver);
    let squeezed = zoom(buf, size, size);
    canvas.draw_buffer(&squeezed, i64::from(ix), i64::from(iy), BlendMode::SrcIn, 255);
    if border_width > 0.0 {
        canvas.stroke_circle(center, radius - border_width / 2.0, border_width, border_color);
    }
    canvas.into_buffer()
}

/// Append a mirrored copy of the bottom `reflection_height` rows (default: all of them) below
/// the source, `spacing` rows apart, fading from opaque to transparent.
pub fn reflection(buf: &PixelBuffer, spacing: u32, reflection_height: Option<u32>) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let (w, h) = buf.dimensions();
    let rh = reflection_height.unwrap_or(h).min(h);
    let top = h + spacing;

    let mut canvas = Canvas::new(w, top + rh);
    canvas.draw_buffer(buf, 0, 0, BlendMode::Src, 255);
    if rh == 0 {
        return canvas.into_buffer();
    }
    // Row 0 of the flipped copy is the source's last row.
    canvas.draw_buffer(&flip(buf, false), 0, i64::from(top), BlendMode::Src, 255);
    let region = Rect::new(0.0, f64::from(top), f64::from(w), f64::from(top + rh));
    let rh_f = f64::from(rh);
    canvas.paint(region, BlendMode::DstIn, |_, y| {
        let i = f64::from(y - top);
        let a = (255.0 * (1.0 - (i + 0.5) / rh_f)).round().clamp(0.0, 255.0) as u32;
        (pack(a, a, a, a), 255)
    });
    canvas.into_buffer()
}

/// Stroke an outline of `width` inside the edges of a copy of `buf`.
pub fn add_border(buf: &PixelBuffer, width: f64, color: u32, shape: BorderShape) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    if width <= 0.0 {
        return buf.to_mutable();
    }
    let (w, h) = buf.dimensions();
    let half = width / 2.0;
    let mut canvas = Canvas::from_buffer(buf);
    match shape {
        BorderShape::RoundedRect { corner_radius } => {
            let rect = Rect::new(half, half, f64::from(w) - half, f64::from(h) - half);
            canvas.stroke_rounded_rect(rect, corner_radius, width, color);
        }
        BorderShape::Circle => {
            let center = Point::new(f64::from(w) / 2.0, f64::from(h) / 2.0);
            let radius = f64::from(w.min(h)) / 2.0 - half;
            canvas.stroke_circle(center, radius, width, color);
        }
    }
    canvas.into_buffer()
}

/// Draw a white coverage mask, then keep `buf` only where the mask is.
fn masked(buf: &PixelBuffer, draw_mask: impl FnOnce(&mut Canvas)) -> PixelBuffer {
    let mut canvas = Canvas::new(buf.width(), buf.height());
    draw_mask(&mut canvas);
    canvas.draw_buffer(buf, 0, 0, BlendMode::SrcIn, 255);
    canvas.into_buffer()
}

#[cfg(test)]
#[path = "../../tests/unit/composite/mask.rs"]
mod tests;
