use std::cell::RefCell;

use super::*;

const BLUE: u32 = 0xFF00_00FF;
const WHITE: u32 = 0xFFFF_FFFF;

/// Paints a `size`-tall block of `color`, one pixel per character, at the baseline box.
#[derive(Default)]
struct BlockRasterizer {
    calls: RefCell<Vec<(String, Point)>>,
}

impl TextRasterizer for BlockRasterizer {
    fn rasterize(
        &self,
        text: &str,
        size: f32,
        color: u32,
        origin: Point,
        width: u32,
        height: u32,
    ) -> PixForgeResult<PixelBuffer> {
        self.calls.borrow_mut().push((text.to_owned(), origin));
        let (x0, y0) = (origin.x as u32, origin.y as u32);
        let (x1, y1) = (x0 + text.chars().count() as u32, y0 + size as u32);
        Ok(PixelBuffer::from_fn(width, height, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                color
            } else {
                0
            }
        }))
    }
}

struct FailingRasterizer;

impl TextRasterizer for FailingRasterizer {
    fn rasterize(&self, _: &str, _: f32, _: u32, _: Point, _: u32, _: u32) -> PixForgeResult<PixelBuffer> {
        Err(PixForgeError::validation("no fonts"))
    }
}

#[test]
fn text_watermark_draws_layer_over_copy() {
    let buf = PixelBuffer::filled(8, 8, BLUE);
    let raster = BlockRasterizer::default();
    let out = text_watermark(&buf, &raster, "abc", 2.0, WHITE, 1.0, 4.0).unwrap();
    assert_eq!(out.get(1, 4), Some(WHITE));
    assert_eq!(out.get(3, 5), Some(WHITE));
    assert_eq!(out.get(4, 4), Some(BLUE));
    assert_eq!(out.get(1, 6), Some(BLUE));
    assert_eq!(buf.get(1, 4), Some(BLUE));
    assert_eq!(raster.calls.borrow().as_slice(), &[("abc".to_owned(), Point::new(1.0, 4.0))]);
}

#[test]
fn text_watermark_skips_empty_inputs() {
    let raster = BlockRasterizer::default();
    let buf = PixelBuffer::filled(2, 2, BLUE);
    assert_eq!(text_watermark(&buf, &raster, "", 12.0, WHITE, 0.0, 0.0).unwrap(), buf);
    assert!(text_watermark(&PixelBuffer::empty(), &raster, "x", 12.0, WHITE, 0.0, 0.0).unwrap().is_empty());
    assert!(raster.calls.borrow().is_empty());
}

#[test]
fn text_watermark_propagates_rasterizer_errors() {
    let buf = PixelBuffer::filled(2, 2, BLUE);
    let err = text_watermark(&buf, &FailingRasterizer, "x", 12.0, WHITE, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, PixForgeError::Validation(_)));
}

#[test]
fn svg_source_escapes_text_and_sets_baseline() {
    let raster = SvgTextRasterizer::with_fontdb(Arc::new(usvg::fontdb::Database::new()));
    let svg = raster.svg_source("a<b & \"c\"", 24.0, 0x80FF_8000, Point::new(3.0, 10.0), 100, 50);
    assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
    assert!(svg.contains(r#"y="34""#));
    assert!(svg.contains("fill=\"#FF8000\""));
    assert!(svg.contains(r#"width="100" height="50""#));
}

#[test]
fn svg_rasterizer_without_fonts_yields_transparent_layer() {
    let raster = SvgTextRasterizer::with_fontdb(Arc::new(usvg::fontdb::Database::new()));
    let layer = raster
        .rasterize("hello", 12.0, WHITE, Point::new(0.0, 0.0), 16, 8)
        .unwrap();
    assert_eq!(layer.dimensions(), (16, 8));
    assert!(layer.pixels().iter().all(|&p| p == 0));
}

#[test]
fn image_watermark_blends_with_alpha() {
    let buf = PixelBuffer::filled(4, 4, 0xFF00_0000);
    let mark = PixelBuffer::filled(2, 2, WHITE);
    let out = image_watermark(&buf, &mark, 3, -1, 0x80);
    assert_eq!(out.get(3, 0), Some(0xFF80_8080));
    assert_eq!(out.get(2, 0), Some(0xFF00_0000));
    assert_eq!(out.get(3, 1), Some(0xFF00_0000));
}
