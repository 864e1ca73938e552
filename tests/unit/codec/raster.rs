use super::*;
use crate::compress::search::{CompressionTarget, compress_to_byte_budget};

fn noise(w: u32, h: u32) -> PixelBuffer {
    let mut state = 0x1234_5678u32;
    PixelBuffer::from_fn(w, h, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        0xFF00_0000 | (state & 0x00FF_FFFF)
    })
}

#[test]
fn png_roundtrip_is_exact() {
    let buf = PixelBuffer::from_fn(5, 3, |x, y| ((x * 40) << 24) | (y << 16) | 0x7F);
    let bytes = encode_image(&buf, CompressFormat::Png, 0).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    assert_eq!(decode_image(&bytes).unwrap(), buf);
}

#[test]
fn webp_lossless_roundtrip_keeps_opaque_pixels() {
    let buf = noise(8, 8);
    let bytes = encode_image(&buf, CompressFormat::Webp, 50).unwrap();
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(decode_image(&bytes).unwrap(), buf);
}

#[test]
fn jpeg_quality_controls_size() {
    let buf = noise(32, 32);
    let low = encode_image(&buf, CompressFormat::Jpeg, 5).unwrap();
    let high = encode_image(&buf, CompressFormat::Jpeg, 95).unwrap();
    assert!(low.len() < high.len());
    assert_eq!(&low[0..2], &[0xFF, 0xD8]);
    let decoded = decode_image(&encode_image(&buf, CompressFormat::Jpeg, 0).unwrap()).unwrap();
    assert_eq!(decoded.dimensions(), (32, 32));
}

#[test]
fn codec_plugs_into_budget_search() {
    let buf = noise(32, 32);
    let high = encode_image(&buf, CompressFormat::Jpeg, 100).unwrap();
    let low = encode_image(&buf, CompressFormat::Jpeg, 1).unwrap();
    let budget = (low.len() + high.len()) / 2;
    let target = CompressionTarget::new(budget as u64, CompressFormat::Jpeg);
    let mut codec = ImageCodec::new(CompressFormat::Jpeg);
    let bytes = compress_to_byte_budget(&buf, &target, &mut codec).unwrap();
    assert!(bytes.len() <= budget);
}

#[test]
fn decode_with_max_size_decimates() {
    let buf = PixelBuffer::filled(40, 20, 0xFF80_4020);
    let bytes = encode_image(&buf, CompressFormat::Png, 0).unwrap();
    let small = decode_image_with_max_size(&bytes, 12, 12).unwrap();
    assert_eq!(small.dimensions(), (10, 5));
    assert!(small.pixels().iter().all(|&p| p == 0xFF80_4020));
    assert_eq!(decode_image_with_max_size(&bytes, 100, 100).unwrap(), buf);
}

#[test]
fn errors_are_typed() {
    assert!(matches!(
        encode_image(&PixelBuffer::empty(), CompressFormat::Png, 0),
        Err(PixForgeError::EmptyBuffer(_))
    ));
    assert!(matches!(decode_image(b"not an image"), Err(PixForgeError::Other(_))));
}
