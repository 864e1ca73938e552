use super::*;

#[test]
fn buffer_roundtrip_through_canvas() {
    let src = PixelBuffer::from_fn(4, 3, |x, y| 0xFF00_0000 | (x << 16) | y);
    assert_eq!(Canvas::from_buffer(&src).into_buffer(), src);
    assert!(Canvas::new(0, 5).into_buffer().is_empty());
}

#[test]
fn draw_buffer_clips_to_canvas() {
    let mut canvas = Canvas::new(3, 3);
    let dot = PixelBuffer::filled(2, 2, 0xFFFF_0000);
    canvas.draw_buffer(&dot, 2, -1, BlendMode::SrcOver, 255);
    let out = canvas.into_buffer();
    assert_eq!(out.get(2, 0), Some(0xFFFF_0000));
    assert_eq!(out.get(1, 0), Some(0));
    assert_eq!(out.get(2, 1), Some(0));
}

#[test]
fn draw_buffer_only_touches_its_footprint() {
    let mut canvas = Canvas::from_buffer(&PixelBuffer::filled(4, 1, 0xFF00_00FF));
    canvas.draw_buffer(&PixelBuffer::filled(1, 1, 0), 1, 0, BlendMode::DstIn, 255);
    let out = canvas.into_buffer();
    assert_eq!(out.pixels(), &[0xFF00_00FF, 0, 0xFF00_00FF, 0xFF00_00FF]);
}

#[test]
fn draw_buffer_applies_opacity() {
    let mut canvas = Canvas::new(1, 1);
    canvas.draw_buffer(&PixelBuffer::filled(1, 1, 0xFFFF_FFFF), 0, 0, BlendMode::SrcOver, 0x80);
    assert_eq!(canvas.into_buffer().get(0, 0), Some(0x80FF_FFFF));
}

#[test]
fn fill_rect_covers_whole_pixels() {
    let mut canvas = Canvas::new(4, 4);
    canvas.fill_shape(&Rect::new(1.0, 1.0, 3.0, 3.0), 0xFF00_FF00, BlendMode::SrcOver);
    let out = canvas.into_buffer();
    assert_eq!(out.get(1, 1), Some(0xFF00_FF00));
    assert_eq!(out.get(2, 2), Some(0xFF00_FF00));
    assert_eq!(out.get(0, 0), Some(0));
    assert_eq!(out.get(3, 3), Some(0));
}

#[test]
fn circle_edge_is_antialiased() {
    let mut canvas = Canvas::new(20, 20);
    canvas.fill_shape(&kurbo::Circle::new((10.0, 10.0), 7.5), 0xFFFF_FFFF, BlendMode::SrcOver);
    let out = canvas.into_buffer();
    assert_eq!(out.get(10, 10), Some(0xFFFF_FFFF));
    assert_eq!(out.get(0, 0), Some(0));
    let partial = (0..20)
        .filter_map(|x| out.get(x, 10))
        .filter(|p| {
            let a = p >> 24;
            a > 0 && a < 255
        })
        .count();
    assert!(partial > 0);
}

#[test]
fn stroke_circle_leaves_center_untouched() {
    let mut canvas = Canvas::new(21, 21);
    canvas.stroke_circle(Point::new(10.5, 10.5), 8.0, 2.0, 0xFF00_0000);
    let out = canvas.into_buffer();
    assert_eq!(out.get(10, 10), Some(0));
    assert_eq!(out.get(10, 2), Some(0xFF00_0000));
}

#[test]
fn stroke_rounded_rect_draws_frame() {
    let mut canvas = Canvas::new(10, 10);
    canvas.stroke_rounded_rect(Rect::new(1.0, 1.0, 9.0, 9.0), 0.0, 2.0, 0xFFFF_0000);
    let out = canvas.into_buffer();
    assert_eq!(out.get(0, 5), Some(0xFFFF_0000));
    assert_eq!(out.get(1, 5), Some(0xFFFF_0000));
    assert_eq!(out.get(2, 5), Some(0));
    assert_eq!(out.get(5, 5), Some(0));
}
