use super::*;

const SAMPLES: [u32; 5] = [0xFF00_0000, 0xFFFF_FFFF, 0xFF12_80F0, 0x80C0_4020, 0xFF7F_7F7F];

fn strip() -> PixelBuffer {
    PixelBuffer::from_pixels(SAMPLES.len() as u32, 1, SAMPLES.to_vec()).unwrap()
}

fn close(a: u32, b: u32, tol: i32) -> bool {
    let (a, b) = (unpack(a), unpack(b));
    (0..4).all(|i| (a[i] as i32 - b[i] as i32).abs() <= tol)
}

#[test]
fn identity_matrix_is_noop() {
    for px in SAMPLES {
        assert_eq!(ColorMatrix::IDENTITY.apply(px), px);
    }
    assert_eq!(tone_remap(&strip(), &ColorMatrix::default()), strip());
}

#[test]
fn sepia_is_opaque_and_warm() {
    assert_eq!(ColorMatrix::sepia().apply(0x00FF_FFFF), 0xFFFF_FFEF);
    let out = nostalgic(&strip());
    assert!(out.pixels().iter().all(|p| p >> 24 == 0xFF));
    let [_, r, g, b] = unpack(out.get(2, 0).unwrap());
    assert!(r >= g && g >= b);
}

#[test]
fn negative_inverts_color_and_keeps_alpha() {
    assert_eq!(ColorMatrix::negative().apply(0xFF10_2030), 0xFFEF_DFCF);
    assert_eq!(ColorMatrix::negative().apply(0x8000_0000), 0x80FF_FFFF);
    assert_eq!(film_negative(&film_negative(&strip())), strip());
}

#[test]
fn grayscale_equalizes_channels() {
    let out = grayscale(&strip());
    for &px in out.pixels() {
        let [_, r, g, b] = unpack(px);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
    assert_eq!(grayscale(&PixelBuffer::filled(1, 1, 0xFFFF_0000)).get(0, 0), Some(0xFF36_3636));
}

#[test]
fn neutral_slider_values_are_identity() {
    let src = strip();
    assert_eq!(saturate(&src, 127), src);
    assert_eq!(luminance(&src, 127), src);
    for (a, b) in hue(&src, 127).pixels().iter().zip(src.pixels()) {
        assert!(close(*a, *b, 1));
    }
    for (a, b) in adjust(&src, 127, 127, 127).pixels().iter().zip(src.pixels()) {
        assert!(close(*a, *b, 1));
    }
}

#[test]
fn slider_extremes() {
    assert_eq!(slider_delta(127), 0.0);
    assert_eq!(slider_delta(0), -1.0);
    assert_eq!(slider_delta(255), 1.0);
    assert_eq!(saturate(&strip(), 0), grayscale(&strip()));

    let dark = luminance(&PixelBuffer::filled(1, 1, 0x8040_4040), 0);
    assert_eq!(dark.get(0, 0), Some(0x8000_0000));
    let bright = luminance(&PixelBuffer::filled(1, 1, 0xFF40_4040), 255);
    assert_eq!(bright.get(0, 0), Some(0xFF80_8080));
}

#[test]
fn hue_rotation_keeps_grays() {
    let gray = PixelBuffer::filled(1, 1, 0xFF64_6464);
    let out = hue(&gray, 255);
    assert!(close(out.get(0, 0).unwrap(), 0xFF64_6464, 1));
}

#[test]
fn matrix_composition_applies_in_order() {
    let m = ColorMatrix::scale(2.0, 2.0, 2.0, 1.0).then(&ColorMatrix::scale(0.5, 0.5, 0.5, 1.0));
    assert_eq!(m.apply(0xFF10_2030), 0xFF10_2030);
    assert_eq!(ColorMatrix::IDENTITY.then(&ColorMatrix::sepia()), ColorMatrix::sepia());

    // negative then offset-free scale: (255 - c) * 0.5
    let m = ColorMatrix::negative().then(&ColorMatrix::scale(0.5, 0.5, 0.5, 1.0));
    assert_eq!(m.apply(0xFF00_0000), 0xFF80_8080);
}

#[test]
fn radial_light_brightens_inside_disc_only() {
    let src = PixelBuffer::filled(10, 10, 0xFF00_0000);
    let out = radial_light(&src, 5, 5, 100.0);
    assert_eq!(out.get(5, 5), Some(0xFF64_6464));
    assert_eq!(out.get(0, 0), Some(0xFF00_0000));
    assert_eq!(out.get(5, 0), Some(0xFF00_0000));
    let near = out.get(6, 5).unwrap() & 0xFF;
    assert!(near > 0 && near < 100);
}

#[test]
fn radial_light_degenerate_radius_is_noop() {
    let src = PixelBuffer::filled(4, 4, 0x8010_1010);
    assert_eq!(radial_light(&src, 0, 3, 150.0), src);
    assert_eq!(sunshine(&PixelBuffer::filled(1, 1, 0xFF00_0000)).get(0, 0), Some(0xFF00_0000));
    assert!(radial_light(&PixelBuffer::empty(), 1, 1, 1.0).is_empty());
}

#[test]
fn extract_alpha_replaces_color() {
    let out = extract_alpha(&strip(), 0xFFAA_BBCC);
    let alphas: Vec<u32> = out.pixels().iter().map(|p| p >> 24).collect();
    assert_eq!(alphas, vec![0xFF, 0xFF, 0xFF, 0x80, 0xFF]);
    assert!(out.pixels().iter().all(|p| p & 0x00FF_FFFF == 0x00AA_BBCC));
}
