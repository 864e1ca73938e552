//! Fixed-point helpers for packed ARGB32 pixels.

#[inline]
pub(crate) fn mul_div255(x: u32, y: u32) -> u32 {
    ((x * y) + 127) / 255
}

#[inline]
pub(crate) fn clamp_u8(v: i32) -> u32 {
    v.clamp(0, 255) as u32
}

#[inline]
pub(crate) fn pack(a: u32, r: u32, g: u32, b: u32) -> u32 {
    (a << 24) | (r << 16) | (g << 8) | b
}

#[inline]
pub(crate) fn unpack(px: u32) -> [u32; 4] {
    [px >> 24, (px >> 16) & 0xFF, (px >> 8) & 0xFF, px & 0xFF]
}

/// Straight ARGB -> premultiplied ARGB.
#[inline]
pub(crate) fn premultiply(px: u32) -> u32 {
    let [a, r, g, b] = unpack(px);
    match a {
        255 => px,
        0 => 0,
        _ => pack(a, mul_div255(r, a), mul_div255(g, a), mul_div255(b, a)),
    }
}

/// Premultiplied ARGB -> straight ARGB.
#[inline]
pub(crate) fn unpremultiply(px: u32) -> u32 {
    let [a, r, g, b] = unpack(px);
    match a {
        255 => px,
        0 => 0,
        _ => {
            let un = |c: u32| ((c * 255 + a / 2) / a).min(255);
            pack(a, un(r), un(g), un(b))
        }
    }
}

/// Lerp between two premultiplied pixels by an 8-bit coverage.
#[inline]
pub(crate) fn lerp_px(dst: u32, src: u32, cover: u32) -> u32 {
    if cover >= 255 {
        return src;
    }
    if cover == 0 {
        return dst;
    }
    let d = unpack(dst);
    let s = unpack(src);
    let inv = 255 - cover;
    let mix = |i: usize| mul_div255(s[i], cover) + mul_div255(d[i], inv);
    pack(mix(0).min(255), mix(1).min(255), mix(2).min(255), mix(3).min(255))
}
