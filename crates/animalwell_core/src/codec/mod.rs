//! Conversion between packed save bitmaps and ordinary raster images.

mod bitmap;
mod palette;
mod raster;

pub use bitmap::BitmapGeometry;
pub use palette::{ColorDistance, Palette, Rgb};
pub use raster::{
    Dither, EncodeOptions, IndexedImage, Resample, decode_region, encode_raster, load_raster,
    quantize,
};
