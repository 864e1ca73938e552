//! Declarative single-buffer pipelines loaded from JSON.
//!
//! ```json
//! { "steps": [
//!     { "op": "rotate", "degrees": 90 },
//!     { "op": "stack_blur", "radius": 4 },
//!     { "op": "round_corner", "radius": 12, "corners": { "bottom_left": false } },
//!     { "op": "add_border", "width": 2, "color": "#FF000000", "shape": { "kind": "circle" } }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::composite::mask::{BorderShape, Corners, add_border, reflection, round_circle, round_corner};
use crate::filter::blur::{GaussianBlurBackend, MAX_BLUR_RADIUS, StackBlurBackend, render_blur, stack_blur};
use crate::filter::kernel::{emboss, sharpen, soften};
use crate::filter::tone::{
    adjust, extract_alpha, film_negative, grayscale, hue, luminance, nostalgic, radial_light,
    saturate, sunshine,
};
use crate::foundation::color::ColorCache;
use crate::foundation::core::{PixelBuffer, Point};
use crate::foundation::error::{PixForgeError, PixForgeResult};
use crate::transform::geometry::{crop, crop_to_aspect, flip, rotate, sample, scale, skew, zoom};

/// Largest shear factor a step may request; the output canvas grows with it.
pub const MAX_SKEW: f64 = 1.0;

/// Largest per-axis factor a `scale` step may request.
pub const MAX_SCALE: f64 = 16.0;

/// Largest pixel count a resizing step may produce.
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 26;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurKind {
    #[default]
    Stack,
    Gaussian,
}

fn default_true() -> bool {
    true
}

fn default_slider() -> u8 {
    127
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepSpec {
    Rotate {
        degrees: f64,
        #[serde(default)]
        pivot: Option<[f64; 2]>,
    },
    Scale {
        sx: f64,
        sy: f64,
    },
    Zoom {
        width: u32,
        height: u32,
    },
    Flip {
        #[serde(default = "default_true")]
        horizontal: bool,
    },
    Skew {
        kx: f64,
        ky: f64,
        #[serde(default)]
        pivot: [f64; 2],
    },
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    CropToAspect {
        w_ratio: u32,
        h_ratio: u32,
    },
    Sample {
        sample_size: u32,
    },
    StackBlur {
        radius: u32,
    },
    Blur {
        radius: u32,
        #[serde(default)]
        backend: BlurKind,
    },
    Soften {
        delta: i32,
    },
    Sharpen,
    Emboss,
    Nostalgic,
    FilmNegative,
    Grayscale,
    Sunshine,
    RadialLight {
        center_x: u32,
        center_y: u32,
        strength: f32,
    },
    Saturate {
        value: u8,
    },
    Luminance {
        value: u8,
    },
    Hue {
        value: u8,
    },
    Adjust {
        #[serde(default = "default_slider")]
        hue: u8,
        #[serde(default = "default_slider")]
        saturation: u8,
        #[serde(default = "default_slider")]
        luminance: u8,
    },
    ExtractAlpha {
        color: String,
    },
    RoundCorner {
        radius: f64,
        #[serde(default)]
        corners: Corners,
    },
    RoundCircle {
        #[serde(default)]
        border_width: f64,
        #[serde(default)]
        border_color: Option<String>,
    },
    Reflection {
        #[serde(default)]
        spacing: u32,
        #[serde(default)]
        height: Option<u32>,
    },
    AddBorder {
        width: f64,
        color: String,
        #[serde(default)]
        shape: BorderShape,
    },
}

impl StepSpec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rotate { .. } => "rotate",
            Self::Scale { .. } => "scale",
            Self::Zoom { .. } => "zoom",
            Self::Flip { .. } => "flip",
            Self::Skew { .. } => "skew",
            Self::Crop { .. } => "crop",
            Self::CropToAspect { .. } => "crop_to_aspect",
            Self::Sample { .. } => "sample",
            Self::StackBlur { .. } => "stack_blur",
            Self::Blur { .. } => "blur",
            Self::Soften { .. } => "soften",
            Self::Sharpen => "sharpen",
            Self::Emboss => "emboss",
            Self::Nostalgic => "nostalgic",
            Self::FilmNegative => "film_negative",
            Self::Grayscale => "grayscale",
            Self::Sunshine => "sunshine",
            Self::RadialLight { .. } => "radial_light",
            Self::Saturate { .. } => "saturate",
            Self::Luminance { .. } => "luminance",
            Self::Hue { .. } => "hue",
            Self::Adjust { .. } => "adjust",
            Self::ExtractAlpha { .. } => "extract_alpha",
            Self::RoundCorner { .. } => "round_corner",
            Self::RoundCircle { .. } => "round_circle",
            Self::Reflection { .. } => "reflection",
            Self::AddBorder { .. } => "add_border",
        }
    }

    fn validate(&self, colors: &mut ColorCache) -> PixForgeResult<()> {
        let op = self.name();
        let fail = |msg: &str| Err(PixForgeError::validation(format!("{op}.{msg}")));
        let finite = |v: f64| v.is_finite();
        match self {
            Self::Rotate { degrees, pivot } => {
                if !finite(*degrees) || pivot.is_some_and(|p| !p.iter().copied().all(finite)) {
                    return fail("degrees and pivot must be finite");
                }
            }
            Self::Scale { sx, sy } => {
                let in_range = |v: f64| finite(v) && v > 0.0 && v <= MAX_SCALE;
                if !(in_range(*sx) && in_range(*sy)) {
                    return fail("sx and sy must be within (0, 16]");
                }
            }
            Self::Zoom { width, height } => {
                if *width == 0 || *height == 0 {
                    return fail("width and height must be > 0");
                }
                if u64::from(*width) * u64::from(*height) > MAX_OUTPUT_PIXELS {
                    return fail("width * height exceeds the output pixel limit");
                }
            }
            Self::Skew { kx, ky, pivot } => {
                if !(finite(*kx) && finite(*ky)) || kx.abs() > MAX_SKEW || ky.abs() > MAX_SKEW {
                    return fail("kx and ky must be within [-1, 1]");
                }
                if !pivot.iter().copied().all(finite) {
                    return fail("pivot must be finite");
                }
            }
            Self::Crop { width, height, .. } => {
                if *width == 0 || *height == 0 {
                    return fail("width and height must be > 0");
                }
            }
            Self::CropToAspect { w_ratio, h_ratio } => {
                if *w_ratio == 0 || *h_ratio == 0 {
                    return fail("w_ratio and h_ratio must be > 0");
                }
            }
            Self::Sample { sample_size } => {
                if *sample_size == 0 {
                    return fail("sample_size must be >= 1");
                }
            }
            Self::StackBlur { radius } | Self::Blur { radius, .. } => {
                if *radius > MAX_BLUR_RADIUS {
                    return fail("radius must be <= 25");
                }
            }
            Self::Soften { delta } => {
                if !(1..=24).contains(delta) {
                    return fail("delta must be within [1, 24]");
                }
            }
            Self::RadialLight { strength, .. } => {
                if !strength.is_finite() {
                    return fail("strength must be finite");
                }
            }
            Self::ExtractAlpha { color } => {
                colors.resolve(color)?;
            }
            Self::RoundCorner { radius, .. } => {
                if !finite(*radius) || *radius < 0.0 {
                    return fail("radius must be finite and >= 0");
                }
            }
            Self::RoundCircle {
                border_width,
                border_color,
            } => {
                if !finite(*border_width) || *border_width < 0.0 {
                    return fail("border_width must be finite and >= 0");
                }
                if let Some(c) = border_color {
                    colors.resolve(c)?;
                }
            }
            Self::AddBorder { width, color, shape } => {
                if !finite(*width) || *width < 0.0 {
                    return fail("width must be finite and >= 0");
                }
                if let BorderShape::RoundedRect { corner_radius } = shape
                    && (!finite(*corner_radius) || *corner_radius < 0.0)
                {
                    return fail("corner_radius must be finite and >= 0");
                }
                colors.resolve(color)?;
            }
            Self::Flip { .. }
            | Self::Sharpen
            | Self::Emboss
            | Self::Nostalgic
            | Self::FilmNegative
            | Self::Grayscale
            | Self::Sunshine
            | Self::Saturate { .. }
            | Self::Luminance { .. }
            | Self::Hue { .. }
            | Self::Adjust { .. }
            | Self::Reflection { .. } => {}
        }
        Ok(())
    }

    fn apply(&self, buf: PixelBuffer, colors: &mut ColorCache) -> PixForgeResult<PixelBuffer> {
        let out = match self {
            Self::Rotate { degrees, pivot } => {
                rotate(&buf, *degrees, pivot.map(|[x, y]| Point::new(x, y)))
            }
            Self::Scale { sx, sy } => {
                let w = (f64::from(buf.width()) * sx).round();
                let h = (f64::from(buf.height()) * sy).round();
                if w * h > MAX_OUTPUT_PIXELS as f64 {
                    return Err(PixForgeError::validation(format!(
                        "scale: {w}x{h} output exceeds {MAX_OUTPUT_PIXELS} pixels"
                    )));
                }
                scale(&buf, *sx, *sy)
            }
            Self::Zoom { width, height } => zoom(&buf, *width, *height),
            Self::Flip { horizontal } => flip(&buf, *horizontal),
            Self::Skew { kx, ky, pivot } => skew(&buf, *kx, *ky, Point::new(pivot[0], pivot[1])),
            Self::Crop {
                x,
                y,
                width,
                height,
            } => crop(&buf, *x, *y, *width, *height)?,
            Self::CropToAspect { w_ratio, h_ratio } => crop_to_aspect(&buf, *w_ratio, *h_ratio),
            Self::Sample { sample_size } => sample(&buf, *sample_size),
            Self::StackBlur { radius } => {
                let mut out = if buf.is_mutable() { buf } else { buf.to_mutable() };
                stack_blur(&mut out, *radius)?;
                out
            }
            Self::Blur { radius, backend } => match backend {
                BlurKind::Stack => render_blur(&buf, *radius, &StackBlurBackend)?,
                BlurKind::Gaussian => render_blur(&buf, *radius, &GaussianBlurBackend)?,
            },
            Self::Soften { delta } => soften(&buf, *delta),
            Self::Sharpen => sharpen(&buf),
            Self::Emboss => emboss(&buf),
            Self::Nostalgic => nostalgic(&buf),
            Self::FilmNegative => film_negative(&buf),
            Self::Grayscale => grayscale(&buf),
            Self::Sunshine => sunshine(&buf),
            Self::RadialLight {
                center_x,
                center_y,
                strength,
            } => radial_light(&buf, *center_x, *center_y, *strength),
            Self::Saturate { value } => saturate(&buf, *value),
            Self::Luminance { value } => luminance(&buf, *value),
            Self::Hue { value } => hue(&buf, *value),
            Self::Adjust {
                hue,
                saturation,
                luminance,
            } => adjust(&buf, *hue, *saturation, *luminance),
            Self::ExtractAlpha { color } => extract_alpha(&buf, colors.resolve(color)?),
            Self::RoundCorner { radius, corners } => round_corner(&buf, *radius, *corners),
            Self::RoundCircle {
                border_width,
                border_color,
            } => {
                let color = match border_color {
                    Some(c) => colors.resolve(c)?,
                    None => 0,
                };
                round_circle(&buf, *border_width, color)
            }
            Self::Reflection { spacing, height } => reflection(&buf, *spacing, *height),
            Self::AddBorder {
                width,
                color,
                shape,
            } => add_border(&buf, *width, colors.resolve(color)?, *shape),
        };
        Ok(out)
    }
}

impl PipelineSpec {
    pub fn from_json(s: &str) -> PixForgeResult<Self> {
        serde_json::from_str(s).map_err(|e| PixForgeError::serde(e.to_string()))
    }

    pub fn from_value(v: serde_json::Value) -> PixForgeResult<Self> {
        serde_json::from_value(v).map_err(|e| PixForgeError::serde(e.to_string()))
    }

    pub fn to_json(&self) -> PixForgeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PixForgeError::serde(e.to_string()))
    }

    pub fn validate(&self) -> PixForgeResult<()> {
        let mut colors = ColorCache::new();
        self.validate_with(&mut colors)
    }

    fn validate_with(&self, colors: &mut ColorCache) -> PixForgeResult<()> {
        for (i, step) in self.steps.iter().enumerate() {
            step.validate(colors).map_err(|e| match e {
                PixForgeError::Validation(msg) => {
                    PixForgeError::validation(format!("steps[{i}]: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Validate every step, then apply them in order. Stops at the first failing step.
    #[tracing::instrument(skip(self, buf), fields(steps = self.steps.len(), w = buf.width(), h = buf.height()))]
    pub fn run(&self, buf: &PixelBuffer) -> PixForgeResult<PixelBuffer> {
        let mut colors = ColorCache::new();
        self.validate_with(&mut colors)?;
        let mut current = buf.clone();
        for step in &self.steps {
            if current.is_empty() {
                tracing::debug!(op = step.name(), "buffer empty, skipping remaining steps");
                break;
            }
            current = step.apply(current, &mut colors)?;
            tracing::trace!(op = step.name(), w = current.width(), h = current.height(), "step applied");
        }
        Ok(current)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/spec.rs"]
mod tests;
