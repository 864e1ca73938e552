//! Blur, convolution kernels and per-pixel tone remaps.

pub(crate) mod blur;
pub(crate) mod kernel;
pub(crate) mod tone;
