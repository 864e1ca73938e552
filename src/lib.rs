//! Pixforge is an in-memory raster processing engine over packed ARGB32 buffers.
//!
//! A [`PixelBuffer`] comes from a decoder (or [`decode_image`] / [`decode_bmp`]), flows through
//! pure transform, filter and compositing functions, and leaves as bytes:
//!
//! 1. **Transform**: [`rotate`], [`zoom`], [`skew`], [`crop`], [`crop_to_aspect`], [`flip`], ...
//! 2. **Filter**: [`stack_blur`] (the one in-place operation), [`soften`], [`sharpen`],
//!    [`emboss`], color-matrix remaps such as [`nostalgic`] and [`adjust`]
//! 3. **Composite**: [`merge`], [`round_corner`], [`reflection`], [`add_border`], watermarks
//! 4. **Encode**: [`encode_bmp`], or [`compress_to_byte_budget`] with any [`QualityEncoder`]
//!
//! Operations on an empty buffer return an empty buffer instead of failing, so steps chain
//! without checks. Only encoding, cropping and in-place blurring report errors.
//!
//! Every call is synchronous and holds no state; [`PipelineSpec`] describes a chain of steps as
//! JSON.
#![forbid(unsafe_code)]

mod codec;
mod composite;
mod compress;
mod filter;
mod foundation;
mod pipeline;
mod transform;

pub use codec::bmp::{BMP_HEADER_LEN, decode_bmp, encode_bmp};
pub use codec::raster::{ImageCodec, decode_image, decode_image_with_max_size, encode_image};
pub use composite::blend::{BlendMode, blend_px, blend_px_coverage};
pub use composite::canvas::Canvas;
pub use composite::mask::{BorderShape, Corners, add_border, reflection, round_circle, round_corner};
pub use composite::merge::{centered_offsets, merge, merge_centered, merge_same_size};
pub use composite::watermark::{SvgTextRasterizer, TextRasterizer, image_watermark, text_watermark};
pub use compress::search::{
    CompressFormat, CompressionTarget, MAX_SEARCH_STEPS, QualityEncoder, calculate_quality,
    calculate_sample_size, compress_to_byte_budget,
};
pub use filter::blur::{
    BlurBackend, GaussianBlurBackend, MAX_BLUR_RADIUS, StackBlurBackend, render_blur, stack_blur,
};
pub use filter::kernel::{FilterKernel, SHARPEN_ALPHA_SCALE, apply_kernel, emboss, sharpen, soften};
pub use filter::tone::{
    ColorMatrix, SUNSHINE_STRENGTH, adjust, extract_alpha, film_negative, grayscale, hue,
    luminance, nostalgic, radial_light, saturate, slider_delta, sunshine, tone_remap,
};
pub use foundation::color::{ColorCache, parse_hex_color};
pub use foundation::core::{Affine, PixelBuffer, Point, Rect, Vec2, argb, channels};
pub use foundation::error::{PixForgeError, PixForgeResult};
pub use pipeline::spec::{BlurKind, MAX_OUTPUT_PIXELS, MAX_SCALE, MAX_SKEW, PipelineSpec, StepSpec};
pub use transform::geometry::{
    crop, crop_to_aspect, flip, rotate, sample, scale, skew, transform_affine, zoom,
};
