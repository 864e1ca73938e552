/// Hand-written BMP.
pub(crate) mod bmp;
/// Adapter over the `image` crate's codecs.
pub(crate) mod raster;
