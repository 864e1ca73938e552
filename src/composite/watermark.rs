use std::fmt;
use std::sync::Arc;

use anyhow::Context;

use crate::composite::blend::BlendMode;
use crate::composite::canvas::Canvas;
use crate::foundation::core::{PixelBuffer, Point};
use crate::foundation::error::{PixForgeError, PixForgeResult};
use crate::foundation::math::{pack, unpremultiply};

/// Turns a line of text into a straight-ARGB layer of a given size.
pub trait TextRasterizer {
    /// Rasterize `text` into a `width x height` layer. `origin` is the top-left of the text box;
    /// the baseline sits at `origin.y + size`.
    fn rasterize(
        &self,
        text: &str,
        size: f32,
        color: u32,
        origin: Point,
        width: u32,
        height: u32,
    ) -> PixForgeResult<PixelBuffer>;
}

/// Text rendering through an SVG `<text>` element, laid out by usvg and rasterized by resvg.
#[derive(Clone)]
pub struct SvgTextRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
    family: String,
}

impl fmt::Debug for SvgTextRasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgTextRasterizer")
            .field("faces", &self.fontdb.len())
            .field("family", &self.family)
            .finish()
    }
}

impl SvgTextRasterizer {
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::with_fontdb(Arc::new(db))
    }

    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            fontdb,
            family: "sans-serif".to_owned(),
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn fontdb(&self) -> &Arc<usvg::fontdb::Database> {
        &self.fontdb
    }

    fn svg_source(&self, text: &str, size: f32, color: u32, origin: Point, w: u32, h: u32) -> String {
        let alpha = f64::from(color >> 24) / 255.0;
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"><text x="{x}" y="{y}" font-size="{size}" font-family="{family}" fill="#{rgb:06X}" fill-opacity="{alpha:.4}">{body}</text></svg>"##,
            x = origin.x,
            y = origin.y + f64::from(size),
            family = escape_xml(&self.family),
            rgb = color & 0x00FF_FFFF,
            body = escape_xml(text),
        )
    }
}

impl TextRasterizer for SvgTextRasterizer {
    #[tracing::instrument(skip(self, text), fields(chars = text.chars().count()))]
    fn rasterize(
        &self,
        text: &str,
        size: f32,
        color: u32,
        origin: Point,
        width: u32,
        height: u32,
    ) -> PixForgeResult<PixelBuffer> {
        let svg = self.svg_source(text, size, color, origin, width, height);
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse watermark text svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| PixForgeError::validation("failed to allocate text pixmap"))?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        let px = pixmap
            .data()
            .chunks_exact(4)
            .map(|c| {
                unpremultiply(pack(
                    u32::from(c[3]),
                    u32::from(c[0]),
                    u32::from(c[1]),
                    u32::from(c[2]),
                ))
            })
            .collect();
        PixelBuffer::from_pixels(width, height, px)
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Draw `text` onto a copy of `buf` with its box anchored at `(x, y)`.
pub fn text_watermark(
    buf: &PixelBuffer,
    rasterizer: &dyn TextRasterizer,
    text: &str,
    size: f32,
    color: u32,
    x: f64,
    y: f64,
) -> PixForgeResult<PixelBuffer> {
    if buf.is_empty() {
        return Ok(PixelBuffer::empty());
    }
    if text.is_empty() || size <= 0.0 {
        return Ok(buf.to_mutable());
    }
    let (w, h) = buf.dimensions();
    let layer = rasterizer.rasterize(text, size, color, Point::new(x, y), w, h)?;
    let mut canvas = Canvas::from_buffer(buf);
    canvas.draw_buffer(&layer, 0, 0, BlendMode::SrcOver, 255);
    Ok(canvas.into_buffer())
}

/// Draw `mark` onto a copy of `buf` at `(x, y)` with overall opacity `alpha`.
pub fn image_watermark(buf: &PixelBuffer, mark: &PixelBuffer, x: i64, y: i64, alpha: u8) -> PixelBuffer {
    if buf.is_empty() {
        return PixelBuffer::empty();
    }
    let mut canvas = Canvas::from_buffer(buf);
    canvas.draw_buffer(mark, x, y, BlendMode::SrcOver, alpha);
    canvas.into_buffer()
}

#[cfg(test)]
#[path = "../../tests/unit/composite/watermark.rs"]
mod tests;
