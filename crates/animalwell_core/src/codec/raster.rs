use image::imageops::{self, BiLevel, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};

use super::bitmap::BitmapGeometry;
use super::palette::{ColorDistance, Palette};
use crate::error::{Result, SaveError};

/// What to do when an imported image is not the bitmap's native size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resample {
    /// Refuse with `DimensionMismatch`.
    Disabled,
    Nearest,
    /// Linear (triangle) filtering.
    #[default]
    Smooth,
}

/// Reduction to two colours. Ignored for palettes with more entries, which
/// always use nearest-colour matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dither {
    /// Threshold luma at 128.
    None,
    #[default]
    FloydSteinberg,
    /// 4x4 Bayer matrix.
    Ordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub resample: Resample,
    pub dither: Dither,
    pub invert: bool,
    pub distance: ColorDistance,
}

const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
    pub palette: Palette,
}

impl IndexedImage {
    /// 8-bit palette PNG, one palette entry per colour index.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(self.palette.to_flat());
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.indices)?;
        writer.finish()?;
        Ok(out)
    }
}

pub fn decode_region(bytes: &[u8], geometry: BitmapGeometry, palette: &Palette) -> Result<IndexedImage> {
    Ok(IndexedImage {
        width: geometry.width,
        height: geometry.height,
        indices: geometry.unpack(bytes)?,
        palette: palette.clone(),
    })
}

/// Decodes any raster format the `image` crate was built with.
pub fn load_raster(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Converts `image` into one palette index per pixel at `geometry`'s size.
pub fn quantize(
    image: &DynamicImage,
    geometry: BitmapGeometry,
    palette: &Palette,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    let rgb = fit(image.to_rgb8(), geometry, options.resample)?;

    let mut indices = if palette.len() == 2 {
        bilevel(&rgb, palette, options.dither)
    } else {
        rgb.pixels()
            .map(|pixel| palette.nearest(pixel.0, options.distance))
            .collect()
    };

    if options.invert && !palette.is_empty() {
        let top = (palette.len() - 1) as u8;
        for index in &mut indices {
            *index = top.saturating_sub(*index);
        }
    }
    Ok(indices)
}

/// Converts `image` into packed bitmap bytes for `geometry`.
pub fn encode_raster(
    image: &DynamicImage,
    geometry: BitmapGeometry,
    palette: &Palette,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    let indices = quantize(image, geometry, palette, options)?;
    geometry.pack(&indices)
}

fn fit(rgb: RgbImage, geometry: BitmapGeometry, resample: Resample) -> Result<RgbImage> {
    if rgb.width() == geometry.width && rgb.height() == geometry.height {
        return Ok(rgb);
    }
    let filter = match resample {
        Resample::Disabled => {
            return Err(SaveError::DimensionMismatch {
                width: geometry.width,
                height: geometry.height,
                found_width: rgb.width(),
                found_height: rgb.height(),
            });
        }
        Resample::Nearest => FilterType::Nearest,
        Resample::Smooth => FilterType::Triangle,
    };
    tracing::debug!(
        from_width = rgb.width(),
        from_height = rgb.height(),
        to_width = geometry.width,
        to_height = geometry.height,
        "resampling imported image"
    );
    Ok(imageops::resize(&rgb, geometry.width, geometry.height, filter))
}

fn luma(rgb: [u8; 3]) -> u32 {
    2126 * u32::from(rgb[0]) + 7152 * u32::from(rgb[1]) + 722 * u32::from(rgb[2])
}

fn bilevel(rgb: &RgbImage, palette: &Palette, dither: Dither) -> Vec<u8> {
    let colors = palette.colors();
    let (dark, bright) = if luma(colors[0]) <= luma(colors[1]) {
        (0u8, 1u8)
    } else {
        (1u8, 0u8)
    };

    let mut gray: GrayImage = imageops::grayscale(rgb);
    match dither {
        Dither::None => {}
        Dither::FloydSteinberg => imageops::dither(&mut gray, &BiLevel),
        Dither::Ordered => {
            for (x, y, pixel) in gray.enumerate_pixels_mut() {
                let level = BAYER_4X4[(y % 4) as usize][(x % 4) as usize];
                let threshold = u16::from(level) * 16 + 8;
                pixel.0[0] = if u16::from(pixel.0[0]) >= threshold { 255 } else { 0 };
            }
        }
    }

    gray.pixels()
        .map(|pixel| if pixel.0[0] >= 128 { bright } else { dark })
        .collect()
}
