use crate::foundation::math::{lerp_px, mul_div255, pack, unpack};

/// Porter-Duff compositing rules over premultiplied pixels.
///
/// Each mode is `out = src * Fa + dst * Fb` with the factors listed per variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Fa = 0, Fb = 0.
    Clear,
    /// Fa = 1, Fb = 0.
    Src,
    /// Fa = 0, Fb = 1.
    Dst,
    /// Fa = 1, Fb = 1 - Sa.
    #[default]
    SrcOver,
    /// Fa = 1 - Da, Fb = 1.
    DstOver,
    /// Fa = Da, Fb = 0.
    SrcIn,
    /// Fa = 0, Fb = Sa.
    DstIn,
    /// Fa = 1 - Da, Fb = 0.
    SrcOut,
    /// Fa = 0, Fb = 1 - Sa.
    DstOut,
    /// Fa = Da, Fb = 1 - Sa.
    SrcAtop,
    /// Fa = 1 - Da, Fb = Sa.
    DstAtop,
    /// Fa = 1 - Da, Fb = 1 - Sa.
    Xor,
}

impl BlendMode {
    fn factors(self, sa: u32, da: u32) -> (u32, u32) {
        match self {
            Self::Clear => (0, 0),
            Self::Src => (255, 0),
            Self::Dst => (0, 255),
            Self::SrcOver => (255, 255 - sa),
            Self::DstOver => (255 - da, 255),
            Self::SrcIn => (da, 0),
            Self::DstIn => (0, sa),
            Self::SrcOut => (255 - da, 0),
            Self::DstOut => (0, 255 - sa),
            Self::SrcAtop => (da, 255 - sa),
            Self::DstAtop => (255 - da, sa),
            Self::Xor => (255 - da, 255 - sa),
        }
    }
}

/// Composite premultiplied `src` onto premultiplied `dst`.
#[inline]
pub fn blend_px(dst: u32, src: u32, mode: BlendMode) -> u32 {
    match mode {
        BlendMode::Src => return src,
        BlendMode::Dst => return dst,
        BlendMode::SrcOver if src >> 24 == 255 => return src,
        BlendMode::SrcOver if src >> 24 == 0 => return dst,
        _ => {}
    }
    let s = unpack(src);
    let d = unpack(dst);
    let (fa, fb) = mode.factors(s[0], d[0]);
    let ch = |i: usize| (mul_div255(s[i], fa) + mul_div255(d[i], fb)).min(255);
    pack(ch(0), ch(1), ch(2), ch(3))
}

/// [`blend_px`] scaled by an 8-bit coverage, for anti-aliased edges.
#[inline]
pub fn blend_px_coverage(dst: u32, src: u32, mode: BlendMode, cover: u32) -> u32 {
    if cover == 0 {
        return dst;
    }
    lerp_px(dst, blend_px(dst, src, mode), cover)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
