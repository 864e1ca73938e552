use super::*;

const RED: u32 = 0xFFFF_0000;
const GREEN: u32 = 0xFF00_FF00;
const BLUE: u32 = 0xFF00_00FF;

fn gradient(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::from_fn(w, h, |x, y| 0xFF00_0000 | (x << 16) | (y << 8))
}

#[test]
fn empty_input_yields_empty_output() {
    let e = PixelBuffer::empty();
    assert!(rotate(&e, 45.0, None).is_empty());
    assert!(scale(&e, 2.0, 2.0).is_empty());
    assert!(zoom(&e, 3, 3).is_empty());
    assert!(flip(&e, true).is_empty());
    assert!(skew(&e, 0.1, 0.1, Point::ZERO).is_empty());
    assert!(crop(&e, 0, 0, 1, 1).unwrap().is_empty());
    assert!(crop_to_aspect(&e, 1, 1).is_empty());
    assert!(sample(&e, 2).is_empty());
}

#[test]
fn flip_twice_is_identity() {
    let src = gradient(7, 5);
    assert_eq!(flip(&flip(&src, true), true), src);
    assert_eq!(flip(&flip(&src, false), false), src);
}

#[test]
fn flip_horizontal_mirrors_columns() {
    let src = PixelBuffer::from_pixels(3, 1, vec![RED, GREEN, BLUE]).unwrap();
    assert_eq!(flip(&src, true).pixels(), &[BLUE, GREEN, RED]);
    assert_eq!(flip(&src, false), src);
}

#[test]
fn negative_scale_matches_flip() {
    let src = gradient(6, 4);
    assert_eq!(scale(&src, -1.0, 1.0), flip(&src, true));
    assert_eq!(scale(&src, 1.0, -1.0), flip(&src, false));
}

#[test]
fn rotate_quarter_turn_is_clockwise() {
    let src = PixelBuffer::from_pixels(2, 1, vec![RED, GREEN]).unwrap();
    let out = rotate(&src, 90.0, None);
    assert_eq!(out.dimensions(), (1, 2));
    assert_eq!(out.pixels(), &[RED, GREEN]);

    let out = rotate(&src, 180.0, None);
    assert_eq!(out.dimensions(), (2, 1));
    assert_eq!(out.pixels(), &[GREEN, RED]);
}

#[test]
fn rotate_grows_canvas_to_fit_source() {
    let src = PixelBuffer::filled(10, 10, RED);
    let out = rotate(&src, 45.0, None);
    // 10 * sqrt(2) = 14.14
    assert_eq!(out.dimensions(), (14, 14));
    assert_eq!(out.get(0, 0), Some(0));
    assert_eq!(out.get(7, 7), Some(RED));
}

#[test]
fn pivot_does_not_change_rotated_pixels() {
    let src = gradient(4, 3);
    let a = rotate(&src, 90.0, None);
    let b = rotate(&src, 90.0, Some(Point::new(0.0, 0.0)));
    assert_eq!(a, b);
}

#[test]
fn zoom_hits_exact_dimensions() {
    let src = PixelBuffer::filled(3, 7, BLUE);
    let out = zoom(&src, 10, 4);
    assert_eq!(out.dimensions(), (10, 4));
    assert!(out.pixels().iter().all(|&p| p == BLUE));
}

#[test]
fn scale_halves_dimensions() {
    let out = scale(&gradient(8, 6), 0.5, 0.5);
    assert_eq!(out.dimensions(), (4, 3));
}

#[test]
fn zoom_interpolates_between_neighbors() {
    let src = PixelBuffer::from_pixels(2, 1, vec![0xFF00_0000, 0xFFFF_FFFF]).unwrap();
    let out = zoom(&src, 4, 1);
    let reds: Vec<u32> = out.pixels().iter().map(|p| (p >> 16) & 0xFF).collect();
    assert_eq!(reds[0], 0);
    assert_eq!(reds[3], 255);
    assert!(reds[1] > 0 && reds[1] < reds[2] && reds[2] < 255);
}

#[test]
fn skew_widens_canvas_by_shear() {
    let src = PixelBuffer::filled(10, 10, RED);
    assert_eq!(skew(&src, 0.0, 0.0, Point::ZERO), src);
    let out = skew(&src, 0.2, 0.0, Point::ZERO);
    assert_eq!(out.dimensions(), (12, 10));
}

#[test]
fn crop_copies_subrectangle() {
    let src = gradient(5, 4);
    let out = crop(&src, 1, 2, 3, 2).unwrap();
    assert_eq!(out.dimensions(), (3, 2));
    assert_eq!(out.get(0, 0), src.get(1, 2));
    assert_eq!(out.get(2, 1), src.get(3, 3));
}

#[test]
fn crop_out_of_range_is_invalid_region() {
    let src = gradient(5, 4);
    assert!(matches!(
        crop(&src, 3, 0, 3, 1),
        Err(PixForgeError::InvalidRegion(_))
    ));
    assert!(matches!(
        crop(&src, 0, 0, 0, 1),
        Err(PixForgeError::InvalidRegion(_))
    ));
    assert!(matches!(
        crop(&src, u32::MAX, 0, 2, 1),
        Err(PixForgeError::InvalidRegion(_))
    ));
}

#[test]
fn crop_to_aspect_centers_on_long_axis() {
    let src = gradient(100, 50);
    let out = crop_to_aspect(&src, 1, 1);
    assert_eq!(out.dimensions(), (50, 50));
    assert_eq!(out.get(0, 0), src.get(25, 0));

    let tall = gradient(40, 100);
    let out = crop_to_aspect(&tall, 2, 1);
    assert_eq!(out.dimensions(), (40, 20));
    assert_eq!(out.get(0, 0), tall.get(0, 40));
}

#[test]
fn crop_to_aspect_edge_ratios() {
    let src = gradient(6, 4);
    assert_eq!(crop_to_aspect(&src, 3, 2), src);
    let strip = crop_to_aspect(&src, 6, 1);
    assert_eq!(strip.dimensions(), (6, 1));
    assert_eq!(strip.get(5, 0), src.get(5, 1));
    // A ratio too extreme for the source leaves nothing to crop.
    assert!(crop_to_aspect(&PixelBuffer::filled(1, 1, RED), 1, 100).is_empty());
}

#[test]
fn sample_averages_blocks() {
    let src = PixelBuffer::from_fn(4, 4, |x, y| match (x / 2, y / 2) {
        (0, 0) => RED,
        (1, 0) => GREEN,
        (0, 1) => BLUE,
        _ => 0,
    });
    let out = sample(&src, 2);
    assert_eq!(out.pixels(), &[RED, GREEN, BLUE, 0]);
    assert_eq!(sample(&src, 1), src);
}
