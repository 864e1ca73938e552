//! Alpha compositing over premultiplied canvases.

pub(crate) mod blend;
pub(crate) mod canvas;
pub(crate) mod mask;
pub(crate) mod merge;
pub(crate) mod watermark;
