use super::*;

const RED: u32 = 0xFFFF_0000;
const BLUE: u32 = 0xFF00_00FF;

#[test]
fn centered_offsets_per_axis() {
    let (bg, fg) = centered_offsets((100, 50), (60, 80));
    assert_eq!(fg, (20, 0));
    assert_eq!(bg, (0, 15));
}

#[test]
fn merge_centered_sizes_to_union() {
    let bg = PixelBuffer::filled(100, 50, BLUE);
    let fg = PixelBuffer::filled(60, 80, RED);
    let out = merge_centered(&bg, &fg, BlendMode::SrcOver);
    assert_eq!(out.dimensions(), (100, 80));
    assert_eq!(out.get(0, 0), Some(0));
    assert_eq!(out.get(0, 15), Some(BLUE));
    assert_eq!(out.get(20, 0), Some(RED));
    assert_eq!(out.get(19, 40), Some(BLUE));
}

#[test]
fn merge_applies_mode_to_foreground_only() {
    let bg = PixelBuffer::filled(4, 4, BLUE);
    let fg = PixelBuffer::filled(2, 2, RED);
    let out = merge(&bg, &fg, BlendMode::SrcAtop, (0, 0), (3, 3));
    assert_eq!(out.dimensions(), (5, 5));
    assert_eq!(out.get(3, 3), Some(RED));
    // SrcAtop leaves uncovered destination transparent.
    assert_eq!(out.get(4, 4), Some(0));
    assert_eq!(out.get(1, 1), Some(BLUE));
}

#[test]
fn merge_with_empty_layer_keeps_other() {
    let bg = PixelBuffer::filled(3, 2, BLUE);
    let out = merge(&bg, &PixelBuffer::empty(), BlendMode::SrcOver, (1, 0), (0, 0));
    assert_eq!(out.dimensions(), (4, 2));
    assert_eq!(out.get(1, 0), Some(BLUE));
    assert!(merge(&PixelBuffer::empty(), &PixelBuffer::empty(), BlendMode::SrcOver, (0, 0), (0, 0)).is_empty());
}

#[test]
fn merge_same_size_uses_smaller_dimensions() {
    let bg = PixelBuffer::filled(8, 3, BLUE);
    let fg = PixelBuffer::filled(4, 6, RED);
    let out = merge_same_size(&bg, &fg, BlendMode::SrcOver);
    assert_eq!(out.dimensions(), (4, 3));
    assert!(out.pixels().iter().all(|&p| p == RED));
}
