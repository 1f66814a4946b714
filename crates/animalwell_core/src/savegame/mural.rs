use image::DynamicImage;

use crate::codec::{
    BitmapGeometry, EncodeOptions, IndexedImage, Palette, decode_region, encode_raster,
};
use crate::composite::CompositeBuilder;
use crate::error::Result;
use crate::field::RawBytesField;
use crate::store::BufferStore;

pub const MURAL_WIDTH: u32 = 40;
pub const MURAL_HEIGHT: u32 = 20;
pub const MURAL_BITS_PER_PIXEL: u8 = 2;
pub const MURAL_BYTES: usize = 200;

/// The mural as a new slot shows it.
pub const MURAL_DEFAULT: [u8; MURAL_BYTES] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x28, 0x00, 0x00,
    0x00, 0x02, 0x00, 0x00, 0x00, 0x80, 0x25, 0x96, 0x00, 0x00,
    0x80, 0x08, 0x00, 0x00, 0x00, 0x80, 0x24, 0x86, 0x00, 0x00,
    0x00, 0x02, 0x00, 0x02, 0x00, 0x80, 0x24, 0x86, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x94, 0x85, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x55, 0x25, 0x00, 0x08,
    0x00, 0x00, 0x00, 0x00, 0x80, 0x6A, 0x55, 0x95, 0x00, 0x22,
    0x00, 0x00, 0x00, 0xA0, 0x6A, 0x55, 0x55, 0x95, 0x00, 0x08,
    0xC0, 0x00, 0x8A, 0x5A, 0x55, 0x55, 0x54, 0x91, 0x00, 0x00,
    0x30, 0x80, 0x65, 0x55, 0x55, 0x55, 0x54, 0x91, 0x00, 0x00,
    0x0C, 0x80, 0x65, 0x55, 0x55, 0x55, 0x55, 0x95, 0x00, 0x00,
    0x03, 0x00, 0x5A, 0x55, 0x55, 0x55, 0x45, 0x25, 0x00, 0x00,
    0xC0, 0x00, 0x56, 0x55, 0x55, 0x55, 0x11, 0x25, 0x00, 0x20,
    0x30, 0x00, 0x56, 0x55, 0x55, 0x55, 0x55, 0x95, 0x0A, 0x00,
    0x0C, 0x80, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x25, 0x00,
    0x03, 0x83, 0x55, 0x55, 0xA5, 0x5A, 0x55, 0x29, 0x00, 0x00,
    0xC0, 0x80, 0x55, 0x95, 0x0A, 0xA0, 0x5A, 0x95, 0x02, 0x00,
    0x30, 0xA0, 0x55, 0x25, 0x00, 0x00, 0xA0, 0x55, 0x09, 0x00,
    0x0C, 0x60, 0x55, 0x02, 0x00, 0x00, 0x00, 0xAA, 0x02, 0x00,
    0x00, 0x58, 0xA5, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The mural with the bunny puzzle solved.
pub const MURAL_SOLVED: [u8; MURAL_BYTES] = [
    0x37, 0x00, 0x00, 0x00, 0x40, 0x01, 0x05, 0x00, 0x00, 0x00,
    0x0C, 0x00, 0x40, 0x00, 0x40, 0x46, 0x05, 0x0C, 0x18, 0x09,
    0x08, 0x01, 0x90, 0x31, 0x40, 0x46, 0x05, 0x37, 0xF4, 0x07,
    0x48, 0x04, 0x40, 0x0E, 0x40, 0x19, 0x01, 0x0C, 0xF0, 0x03,
    0x32, 0x09, 0x00, 0x02, 0x00, 0x59, 0x00, 0x18, 0xF4, 0x07,
    0x02, 0x48, 0x00, 0x02, 0x00, 0x54, 0x05, 0x44, 0x98, 0x09,
    0x02, 0x98, 0x01, 0x08, 0x00, 0x55, 0x14, 0x10, 0x80, 0x00,
    0x0E, 0x42, 0x00, 0x58, 0x05, 0x15, 0x52, 0x20, 0x8C, 0x00,
    0x32, 0x82, 0x00, 0x55, 0x55, 0x55, 0x50, 0x82, 0x8C, 0x08,
    0x82, 0x80, 0x40, 0x55, 0x55, 0x55, 0x55, 0x81, 0x88, 0x32,
    0x88, 0x80, 0x50, 0x55, 0x55, 0x55, 0x55, 0x81, 0x88, 0xC0,
    0x88, 0x80, 0x54, 0x55, 0x55, 0x55, 0x55, 0x20, 0x20, 0x88,
    0x88, 0x20, 0x54, 0x55, 0x55, 0x55, 0x15, 0x20, 0x20, 0x20,
    0x8C, 0x23, 0x54, 0x55, 0x55, 0x55, 0xE5, 0xEF, 0x23, 0x2C,
    0xEF, 0xFE, 0x56, 0x55, 0x55, 0x55, 0xE5, 0xFF, 0xEF, 0xEF,
    0xBE, 0xFD, 0x56, 0x55, 0x55, 0x55, 0xE5, 0xFF, 0xFF, 0xBB,
    0x7B, 0xF6, 0x54, 0x55, 0x55, 0x55, 0x01, 0xFC, 0xE7, 0xEE,
    0xEF, 0xF9, 0x50, 0x55, 0x55, 0x55, 0x00, 0xF0, 0x99, 0xBB,
    0xBE, 0xEF, 0x43, 0x55, 0x55, 0x15, 0x00, 0xFF, 0xE6, 0xEE,
    0xFB, 0xBE, 0x0F, 0x00, 0x00, 0x00, 0xFC, 0xBF, 0xBB, 0xBB,
];

/// The bunny mural: 40x20 pixels, four colours.
#[derive(Debug, Clone, Copy)]
pub struct Mural {
    data: RawBytesField,
}

impl Mural {
    pub const GEOMETRY: BitmapGeometry =
        BitmapGeometry::new(MURAL_WIDTH, MURAL_HEIGHT, MURAL_BITS_PER_PIXEL);

    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        Self {
            data: b.raw("Bunny Mural", MURAL_BYTES),
        }
    }

    pub fn field(&self) -> RawBytesField {
        self.data
    }

    pub fn clear(&self, store: &mut BufferStore) -> Result<()> {
        self.data.fill(store, 0)
    }

    pub fn to_default(&self, store: &mut BufferStore) -> Result<()> {
        self.data.write(store, &MURAL_DEFAULT)
    }

    pub fn to_solved(&self, store: &mut BufferStore) -> Result<()> {
        self.data.write(store, &MURAL_SOLVED)
    }

    pub fn export_raw(&self, store: &BufferStore) -> Result<Vec<u8>> {
        Ok(self.data.read(store)?.to_vec())
    }

    /// Fails with `SizeMismatch` unless `data` is exactly 200 bytes.
    pub fn import_raw(&self, store: &mut BufferStore, data: &[u8]) -> Result<()> {
        self.data.write(store, data)?;
        tracing::info!(len = data.len(), "imported raw mural data");
        Ok(())
    }

    pub fn export_image(&self, store: &BufferStore) -> Result<IndexedImage> {
        decode_region(self.data.read(store)?, Self::GEOMETRY, &Palette::mural())
    }

    pub fn export_png(&self, store: &BufferStore) -> Result<Vec<u8>> {
        self.export_image(store)?.encode_png()
    }

    /// Maps every pixel of `image` onto the mural palette. Nothing is written
    /// if the conversion fails.
    pub fn import_image(
        &self,
        store: &mut BufferStore,
        image: &DynamicImage,
        options: &EncodeOptions,
    ) -> Result<()> {
        let packed = encode_raster(image, Self::GEOMETRY, &Palette::mural(), options)?;
        self.data.write(store, &packed)?;
        tracing::info!("imported mural image");
        Ok(())
    }
}
