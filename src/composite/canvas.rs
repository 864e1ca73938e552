use kurbo::Shape;

use crate::composite::blend::{BlendMode, blend_px, blend_px_coverage};
use crate::foundation::core::{PixelBuffer, Point, Rect};
use crate::foundation::math::{mul_div255, pack, premultiply, unpack, unpremultiply};

/// Samples per axis when estimating shape coverage.
const SUPERSAMPLE: u32 = 4;

/// A premultiplied drawing surface. Buffers go in and come out as straight ARGB.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    px: Vec<u32>,
}

impl Canvas {
    /// A transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            px: vec![0; (width as usize) * (height as usize)],
        }
    }

    pub fn from_buffer(buf: &PixelBuffer) -> Self {
        Self {
            width: buf.width(),
            height: buf.height(),
            px: buf.pixels().iter().map(|&p| premultiply(p)).collect(),
        }
    }

    pub fn into_buffer(self) -> PixelBuffer {
        if self.width == 0 || self.height == 0 {
            return PixelBuffer::empty();
        }
        let px = self.px.into_iter().map(unpremultiply).collect();
        PixelBuffer::from_raw(self.width, self.height, px)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Draw `src` with its top-left at `(dx, dy)`, scaled by `opacity`. Only pixels under `src`
    /// are touched, whatever the mode.
    pub fn draw_buffer(&mut self, src: &PixelBuffer, dx: i64, dy: i64, mode: BlendMode, opacity: u8) {
        if src.is_empty() || (opacity == 0 && mode == BlendMode::SrcOver) {
            return;
        }
        let op = u32::from(opacity);
        let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + sw).min(i64::from(self.width));
        let y1 = (dy + sh).min(i64::from(self.height));
        for y in y0..y1 {
            for x in x0..x1 {
                let s = premultiply(src.pixels()[((y - dy) * sw + (x - dx)) as usize]);
                let s = if op == 255 { s } else { scale_px(s, op) };
                let idx = (y as usize) * (self.width as usize) + x as usize;
                self.px[idx] = blend_px(self.px[idx], s, mode);
            }
        }
    }

    /// Composite a per-pixel premultiplied color and coverage over the pixels in `region`.
    pub(crate) fn paint(
        &mut self,
        region: Rect,
        mode: BlendMode,
        mut shader: impl FnMut(u32, u32) -> (u32, u32),
    ) {
        let Some((x0, y0, x1, y1)) = self.clip(region) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let (color, cover) = shader(x, y);
                let idx = (y as usize) * (self.width as usize) + x as usize;
                self.px[idx] = blend_px_coverage(self.px[idx], color, mode, cover);
            }
        }
    }

    /// Fill the area where `inside` holds with the straight ARGB `color`, anti-aliased by
    /// supersampling.
    pub(crate) fn fill_where(
        &mut self,
        bounds: Rect,
        color: u32,
        mode: BlendMode,
        inside: impl Fn(Point) -> bool,
    ) {
        let color = premultiply(color);
        let n = SUPERSAMPLE * SUPERSAMPLE;
        let step = 1.0 / f64::from(SUPERSAMPLE);
        self.paint(bounds, mode, |x, y| {
            let mut hits = 0;
            for sy in 0..SUPERSAMPLE {
                for sx in 0..SUPERSAMPLE {
                    let p = Point::new(
                        f64::from(x) + (f64::from(sx) + 0.5) * step,
                        f64::from(y) + (f64::from(sy) + 0.5) * step,
                    );
                    if inside(p) {
                        hits += 1;
                    }
                }
            }
            (color, (hits * 255 + n / 2) / n)
        });
    }

    /// Fill a kurbo shape.
    pub fn fill_shape(&mut self, shape: &impl Shape, color: u32, mode: BlendMode) {
        self.fill_where(shape.bounding_box(), color, mode, |p| shape.contains(p));
    }

    /// Stroke a circle outline of `stroke_width` centered on radius `radius`.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, stroke_width: f64, color: u32) {
        if stroke_width <= 0.0 || radius < 0.0 {
            return;
        }
        let half = stroke_width / 2.0;
        let outer = radius + half;
        let inner = (radius - half).max(0.0);
        let bounds = Rect::from_center_size(center, (2.0 * outer, 2.0 * outer));
        self.fill_where(bounds, color, BlendMode::SrcOver, |p| {
            let d = p.distance(center);
            d <= outer && d >= inner
        });
    }

    /// Stroke a rounded rectangle outline of `stroke_width` centered on `rect`'s edges.
    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f64, stroke_width: f64, color: u32) {
        if stroke_width <= 0.0 {
            return;
        }
        let half = stroke_width / 2.0;
        let radius = radius.max(0.0);
        let outer = kurbo::RoundedRect::from_rect(
            Rect::new(rect.x0 - half, rect.y0 - half, rect.x1 + half, rect.y1 + half),
            if radius > 0.0 { radius + half } else { 0.0 },
        );
        let inner_rect = Rect::new(rect.x0 + half, rect.y0 + half, rect.x1 - half, rect.y1 - half);
        let has_inner = inner_rect.width() > 0.0 && inner_rect.height() > 0.0;
        let inner = kurbo::RoundedRect::from_rect(inner_rect, (radius - half).max(0.0));
        self.fill_where(outer.bounding_box(), color, BlendMode::SrcOver, |p| {
            outer.contains(p) && !(has_inner && inner.contains(p))
        });
    }

    fn clip(&self, region: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = region.x0.floor().max(0.0);
        let y0 = region.y0.floor().max(0.0);
        let x1 = region.x1.ceil().min(f64::from(self.width));
        let y1 = region.y1.ceil().min(f64::from(self.height));
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

fn scale_px(px: u32, op: u32) -> u32 {
    let [a, r, g, b] = unpack(px);
    pack(
        mul_div255(a, op),
        mul_div255(r, op),
        mul_div255(g, op),
        mul_div255(b, op),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/composite/canvas.rs"]
mod tests;
